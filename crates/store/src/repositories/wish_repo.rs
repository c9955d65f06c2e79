//! Persistence for wish records.
//!
//! Records are stored as JSON under `wish:<id>` with a TTL; there is no
//! update or delete path.

use wishlink_core::id::WishId;
use wishlink_core::wish::{wish_key, WishRecord};

use crate::error::StoreError;
use crate::KvStore;

/// Provides create and lookup operations for wishes.
pub struct WishRepo;

impl WishRepo {
    /// Store `record` under a freshly generated identifier, expiring after
    /// `ttl_secs` seconds.
    pub async fn create(
        store: &dyn KvStore,
        record: &WishRecord,
        ttl_secs: u64,
    ) -> Result<WishId, StoreError> {
        let id = WishId::generate();
        let payload = serde_json::to_string(record)?;
        store.set_ex(&wish_key(&id), &payload, ttl_secs).await?;
        Ok(id)
    }

    /// Fetch the record for `id`. Returns `None` if it was never written or
    /// has expired.
    pub async fn find_by_id(
        store: &dyn KvStore,
        id: &WishId,
    ) -> Result<Option<WishRecord>, StoreError> {
        let Some(payload) = store.get(&wish_key(id)).await? else {
            return Ok(None);
        };
        let record = serde_json::from_str(&payload)?;
        Ok(Some(record))
    }
}

//! Repositories over the key-value store.

pub mod wish_repo;

pub use wish_repo::WishRepo;

//! Page state machine for the wish front end.
//!
//! A page request is decided from the URL query:
//!
//! ```text
//! ?id=<id>                          -> Fetch   (loading; resolved by a store lookup)
//! ?name=&description=[&sender=]     -> Inline  (legacy direct render, no store)
//! (nothing usable)                  -> Create  (form)
//! ```
//!
//! A fetch resolves to [`Page::View`] or to the terminal [`Page::Error`],
//! whose only way out is navigating back to the create form.

use serde::Deserialize;

use crate::wish::WishRecord;

/// Query parameters accepted by the page route.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub sender: Option<String>,
}

/// What the query asks for, before any store access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    /// Show the creation form.
    Create,
    /// Load the wish with this raw identifier.
    Fetch(String),
    /// Render a wish carried in the query itself.
    Inline(WishRecord),
}

impl PageRequest {
    /// Decide the request from the query. An identifier wins over inline
    /// fields; inline rendering needs both a name and a description.
    pub fn from_query(query: PageQuery) -> Self {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());

        if present(&query.id) {
            return Self::Fetch(query.id.unwrap_or_default());
        }

        if present(&query.name) && present(&query.description) {
            return Self::Inline(WishRecord {
                name: query.name.unwrap_or_default(),
                description: query.description.unwrap_or_default(),
                sender: query.sender.filter(|s| !s.trim().is_empty()),
            });
        }

        Self::Create
    }
}

/// Result of looking a wish up for a [`PageRequest::Fetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Found(WishRecord),
    NotFound,
    Failed,
}

/// Why a page ended in the error state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageErrorKind {
    NotFound,
    LoadFailed,
}

/// A page ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Create,
    View(WishRecord),
    Error { kind: PageErrorKind, message: String },
}

impl Page {
    /// Transition out of the loading state.
    pub fn loaded(outcome: FetchOutcome) -> Self {
        match outcome {
            FetchOutcome::Found(record) => Self::View(record),
            FetchOutcome::NotFound => Self::Error {
                kind: PageErrorKind::NotFound,
                message: "Wish not found or expired".to_string(),
            },
            FetchOutcome::Failed => Self::Error {
                kind: PageErrorKind::LoadFailed,
                message: "Failed to load wish".to_string(),
            },
        }
    }

    /// Document title for the page (unescaped).
    pub fn title(&self) -> String {
        match self {
            Self::View(record) => format!("Happy Birthday, {}!", record.name),
            Self::Create | Self::Error { .. } => "Birthday Wish".to_string(),
        }
    }
}

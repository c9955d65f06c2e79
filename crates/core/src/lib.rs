//! Domain layer for birthday wish links.
//!
//! Pure types and rules with no I/O: the wish record and its validation,
//! identifier generation, HTML escaping, the page state machine and the
//! rate-limit window arithmetic. The store and API crates build on these.

pub mod error;
pub mod html;
pub mod id;
pub mod page;
pub mod rate_limit;
pub mod wish;

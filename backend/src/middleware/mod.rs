//! Actix middleware for the governance service.

pub mod routing;
pub mod trace;

pub use routing::PageRouting;
pub use trace::Trace;

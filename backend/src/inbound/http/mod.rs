//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod boards;
pub mod error;
pub mod health;
pub mod hierarchy;
pub mod organizations;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;
pub mod votes;

pub use error::ApiResult;

//! Shared state, change propagation and the error umbrella.

pub mod blog;
pub mod context;
pub mod error;
pub mod events;
pub(crate) mod lock;

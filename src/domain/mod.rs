//! Domain layer: posts, the search derivation and the archive pool.

pub mod archive;
pub mod error;
pub mod generator;
pub mod posts;
pub mod search;

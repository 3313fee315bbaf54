//! URL handling module for link-health
//!
//! This module provides the URL normalizer/filter used for the seed and for
//! every discovered link, plus host extraction for per-host limits.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::host_key;
pub use normalize::{normalize, parse_seed};

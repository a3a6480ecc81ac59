//! Ozon marketplace integration.

mod client;
mod types;

pub use client::OzonAdapter;
pub use types::{classify_errors, ImportError, ImportPrice};

//! Cached reads and cache-invalidating writes on top of the row store.
//!
//! Reads are keyed by device id and disabled while the id is empty. A write
//! invalidates its collection only after the store accepted it.

pub mod cache;
pub mod problems;
pub mod sessions;

pub use cache::QueryCache;
pub use problems::ProblemQueries;
pub use sessions::SessionQueries;

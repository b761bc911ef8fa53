//! Network fetch client for the league site.
//!
//! This module provides the `Fetcher` seam used by the cache manager for
//! precache population and cache-miss fallback, together with the
//! `HttpFetcher` implementation over reqwest.
//!
//! The fetcher returns whatever the server sent, error status included;
//! callers decide whether a non-success response is acceptable.

pub mod client;
pub mod error;

pub use client::{Fetcher, HttpFetcher};
pub use error::ApiError;

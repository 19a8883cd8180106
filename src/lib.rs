//! Client for the Natusfera biodiversity-observation API.
//!
//! Filters become one or more requests ([`query`]), collection endpoints are
//! walked page by page ([`fetch`]) and raw JSON is mapped into typed records
//! ([`normalize`]). [`client::Natusfera`] ties them together.

pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod fetch;
pub mod normalize;
pub mod photos;
pub mod query;
pub mod records;
pub mod transport;

pub use client::Natusfera;
pub use error::NatusferaError;

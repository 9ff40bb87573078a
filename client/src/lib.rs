//! Chain client: read-only access to a Cosmos SDK LCD REST gateway.
//!
//! Design:
//! - [`ChainApi`] is the seam: the service layer is generic over it, so tests
//!   drive it with scripted responses instead of the network.
//! - [`LcdClient`] implements it over HTTP with `reqwest`.
//! - Any non-2xx status or transport failure surfaces as a [`ClientError`];
//!   nothing here retries.

pub mod api;
pub mod client;
pub mod error;

pub use api::ChainApi;
pub use client::{LcdClient, DEFAULT_LCD_ENDPOINT};
pub use error::ClientError;

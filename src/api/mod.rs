//! Boundary to the remote path-cost service.

mod client;
mod types;

pub use client::{CostClient, DEFAULT_ENDPOINT};
pub use types::parse_paths;

use thiserror::Error;

/// Failures of the route-service call. `Status` carries the server-provided
/// detail verbatim; everything else gets a generic transport message.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RequestError {
	#[error("Error {status}: {detail}")]
	Status { status: u16, detail: String },
	#[error("Could not reach the route service: {0}")]
	Network(String),
	#[error("Unexpected response from the route service: {0}")]
	Payload(String),
}

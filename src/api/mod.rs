//! REST API client module for the ClassHub backend.
//!
//! This module provides the `ApiClient` pipeline through which every
//! authenticated call flows: it attaches the bearer credential from the
//! session store, dispatches over an injectable transport, and normalizes
//! every outcome (including transport failures) into an `ApiResponse`.
//!
//! A 401 from the backend tears the session down and fires the host's
//! session-invalidated hook; no other failure mutates global state.

pub mod client;
pub mod error;
pub mod response;
pub mod transport;

pub use client::{ApiClient, Registration, RequestOptions};
pub use error::ApiError;
pub use response::{ApiResponse, ResponseBody};
pub use transport::{HttpTransport, Transport, TransportError, TransportResponse};

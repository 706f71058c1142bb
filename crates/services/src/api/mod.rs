//! Outbound HTTP: the transport seam and the authenticated request pipeline.

mod client;
mod transport;

pub use client::{ApiClient, ApiConfig};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, ReqwestTransport};

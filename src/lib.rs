//! Request forwarding backend for an API testing tool.
//!
//! Clients describe an HTTP request as JSON and post it to `/api/proxy`;
//! the service issues it and answers with a normalized envelope, which
//! sidesteps browser cross-origin restrictions.

pub mod config;
pub mod forward;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod resilience;

pub use config::ForwarderConfig;
pub use forward::{Forwarder, NormalizedError, NormalizedResponse, OutgoingRequestDescription};
pub use http::HttpServer;
pub use lifecycle::Shutdown;

//! Request forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! OutgoingRequestDescription (JSON from the client)
//!     → prepare.rs (validate url, assemble headers, encode body)
//!     → client.rs (pick client for redirect / TLS settings)
//!     → forwarder.rs (send under a per-call deadline)
//!     → outcome.rs (NormalizedResponse | NormalizedError)
//! ```
//!
//! # Design Decisions
//! - One attempt per call, no retries
//! - Calls share no mutable state; each owns its headers, body and deadline
//! - Failures are classified once: validation, target HTTP, timeout, transport

pub mod client;
pub mod description;
pub mod error;
pub mod forwarder;
pub mod outcome;
pub mod prepare;

pub use description::{BodyType, ForwardSettings, KeyValue, OutgoingRequestDescription, RequestBody};
pub use error::TransportError;
pub use forwarder::Forwarder;
pub use outcome::{error_message, ErrorKind, HeaderMapping, NormalizedError, NormalizedResponse};

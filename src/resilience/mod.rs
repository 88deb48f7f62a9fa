//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Forwarded call:
//!     → timeouts.rs (arm per-call deadline, race the call against it)
//!     → On expiry: call dropped, caller sees a 408
//! ```
//!
//! # Design Decisions
//! - Every outbound call has a deadline
//! - Single attempt: failures are reported, never retried

pub mod timeouts;

pub use timeouts::{Aborted, Deadline, ABORT_MESSAGE};

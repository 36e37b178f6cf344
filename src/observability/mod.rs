//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing / config produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (registration and resolution counters)
//!
//! Consumers:
//!     → tracing-subscriber fmt layer (stdout)
//!     → whatever metrics recorder the host application installs
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event (method, path, version)
//! - Metrics go through the `metrics` facade; without a recorder they cost
//!   next to nothing
//! - The engine never installs global state itself; binaries call
//!   [`logging::init_logging`]

pub mod logging;
pub mod metrics;

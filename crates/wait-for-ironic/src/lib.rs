//! Wait for Ironic and Ironic Inspector to become ready.
//!
//! Used while bootstrapping a bare-metal provisioning stack: Ironic must
//! answer on its API root and list at least one driver, and Ironic Inspector
//! must answer on its API root, before anything downstream starts.

pub mod cache;
pub mod config;
pub mod orchestrator;
pub mod poll;
pub mod prober;
pub mod readiness;
pub mod telemetry;
pub mod verifier;

pub use cache::ReadinessCache;
pub use config::{Cli, ConfigError, WaitConfig};
pub use orchestrator::Orchestrator;
pub use poll::{Deadline, PollSettings};
pub use readiness::{
    DriverPolicy, ReadinessReport, ReadinessResult, Service, ServiceReport, WaitError, WaitOutcome,
};

use std::time::Duration;

use clap::Parser;
use ironic_api::{ApiError, Endpoint};

use crate::poll::PollSettings;
use crate::readiness::DriverPolicy;

/// Microversion requested from Ironic when none is configured.
pub const DEFAULT_MICROVERSION: &str = "1.52";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing {env}: pass --{flag} or set the {env} environment variable")]
    MissingEndpoint {
        flag: &'static str,
        env: &'static str,
    },
    #[error("invalid {name}: {source}")]
    InvalidEndpoint {
        name: &'static str,
        #[source]
        source: ApiError,
    },
    #[error("{name} must be greater than zero")]
    InvalidDuration { name: &'static str },
}

#[derive(Debug, Parser)]
#[command(
    name = "wait-for-ironic",
    about = "Wait for Ironic and Ironic Inspector to be up and running"
)]
pub struct Cli {
    /// Ironic API endpoint, e.g. http://ironic:6385/v1/
    #[arg(long, env = "IRONIC_ENDPOINT")]
    pub ironic_endpoint: Option<String>,

    /// Ironic API microversion to request.
    #[arg(long, env = "IRONIC_MICROVERSION")]
    pub ironic_microversion: Option<String>,

    /// Ironic Inspector endpoint, e.g. http://ironic:5050/v1/
    #[arg(long, env = "IRONIC_INSPECTOR_ENDPOINT")]
    pub inspector_endpoint: Option<String>,

    /// Overall time budget in seconds.
    #[arg(long, env = "IRONIC_WAIT_TIMEOUT", default_value_t = 600)]
    pub timeout: u64,

    /// Seconds to sleep between attempts.
    #[arg(long, env = "IRONIC_WAIT_RETRY_INTERVAL", default_value_t = 5)]
    pub retry_interval: u64,

    /// Seconds before a single HTTP attempt is abandoned.
    #[arg(long, env = "IRONIC_WAIT_REQUEST_TIMEOUT", default_value_t = 5)]
    pub request_timeout: u64,

    /// Treat an empty driver list as not ready instead of a warning.
    #[arg(long, env = "IRONIC_WAIT_REQUIRE_DRIVERS")]
    pub require_drivers: bool,

    /// Check once without polling and exit.
    #[arg(long)]
    pub once: bool,
}

/// Validated settings for one run.
#[derive(Debug, Clone)]
pub struct WaitConfig {
    pub ironic: Endpoint,
    pub inspector: Endpoint,
    pub poll: PollSettings,
    pub driver_policy: DriverPolicy,
    pub once: bool,
}

impl Cli {
    pub fn into_config(self) -> Result<WaitConfig, ConfigError> {
        let ironic_url = required(self.ironic_endpoint, "ironic-endpoint", "IRONIC_ENDPOINT")?;
        let inspector_url = required(
            self.inspector_endpoint,
            "inspector-endpoint",
            "IRONIC_INSPECTOR_ENDPOINT",
        )?;

        let microversion = self
            .ironic_microversion
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MICROVERSION.to_string());

        let ironic = Endpoint::new(&ironic_url)
            .map_err(|source| ConfigError::InvalidEndpoint {
                name: "IRONIC_ENDPOINT",
                source,
            })?
            .with_microversion(microversion);
        let inspector =
            Endpoint::new(&inspector_url).map_err(|source| ConfigError::InvalidEndpoint {
                name: "IRONIC_INSPECTOR_ENDPOINT",
                source,
            })?;

        let poll = PollSettings {
            timeout: seconds(self.timeout, "timeout")?,
            retry_interval: seconds(self.retry_interval, "retry-interval")?,
            request_timeout: seconds(self.request_timeout, "request-timeout")?,
        };

        let driver_policy = if self.require_drivers {
            DriverPolicy::Required
        } else {
            DriverPolicy::Advisory
        };

        Ok(WaitConfig {
            ironic,
            inspector,
            poll,
            driver_policy,
            once: self.once,
        })
    }
}

fn required(
    value: Option<String>,
    flag: &'static str,
    env: &'static str,
) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingEndpoint { flag, env })
}

fn seconds(value: u64, name: &'static str) -> Result<Duration, ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidDuration { name });
    }
    Ok(Duration::from_secs(value))
}

use std::fmt;

/// The two services a run waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// Ironic, the provisioning API.
    Provisioning,
    /// Ironic Inspector.
    Inspection,
}

impl Service {
    pub fn name(&self) -> &'static str {
        match self {
            Service::Provisioning => "Ironic",
            Service::Inspection => "Ironic Inspector",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Terminal state of a single polling wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Ready { attempts: u32 },
    TimedOut { attempts: u32 },
    Cancelled { attempts: u32 },
}

impl WaitOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, WaitOutcome::Ready { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            WaitOutcome::Ready { attempts }
            | WaitOutcome::TimedOut { attempts }
            | WaitOutcome::Cancelled { attempts } => *attempts,
        }
    }
}

/// How an empty driver listing affects overall readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverPolicy {
    /// Logged as a warning; reachability alone decides readiness.
    #[default]
    Advisory,
    /// Ironic is not ready until at least one driver is registered.
    Required,
}

/// Result of waiting for one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceReport {
    pub service: Service,
    pub reachable: WaitOutcome,
    /// Driver registration outcome. Only ever set for Ironic, and only once
    /// it was reachable.
    pub drivers: Option<WaitOutcome>,
}

impl ServiceReport {
    pub fn is_reachable(&self) -> bool {
        self.reachable.is_ready()
    }

    pub fn has_drivers(&self) -> bool {
        self.drivers.is_some_and(|d| d.is_ready())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WaitError {
    #[error("wait for {service} was cancelled")]
    Cancelled { service: Service },
    #[error("wait for {service} failed: {reason}")]
    TaskFailed { service: Service, reason: String },
}

/// Outcome of one orchestrated run, per service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessReport {
    pub provisioning: Result<ServiceReport, WaitError>,
    pub inspection: Result<ServiceReport, WaitError>,
    pub driver_policy: DriverPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadinessResult {
    Ready,
    TimedOut(String),
    Failed(WaitError),
}

impl fmt::Display for ReadinessResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadinessResult::Ready => f.write_str("ready"),
            ReadinessResult::TimedOut(reason) => write!(f, "timed out: {reason}"),
            ReadinessResult::Failed(err) => write!(f, "failed: {err}"),
        }
    }
}

impl ReadinessReport {
    /// Fold both service reports into one verdict.
    ///
    /// Cancellation or a crashed wait wins over timeouts. Otherwise every
    /// unreachable service is named in the timeout reason. Missing drivers
    /// only count under [`DriverPolicy::Required`].
    pub fn result(&self) -> ReadinessResult {
        let mut problems = Vec::new();

        for report in [&self.provisioning, &self.inspection] {
            let report = match report {
                Ok(report) => report,
                Err(err) => return ReadinessResult::Failed(err.clone()),
            };
            let service = report.service;

            match report.reachable {
                WaitOutcome::Ready { .. } => {}
                WaitOutcome::TimedOut { attempts } => problems.push(format!(
                    "{service} did not become reachable after {attempts} attempts"
                )),
                WaitOutcome::Cancelled { .. } => {
                    return ReadinessResult::Failed(WaitError::Cancelled { service });
                }
            }

            match report.drivers {
                Some(WaitOutcome::Cancelled { .. }) => {
                    return ReadinessResult::Failed(WaitError::Cancelled { service });
                }
                Some(WaitOutcome::TimedOut { .. })
                    if self.driver_policy == DriverPolicy::Required =>
                {
                    problems.push(format!("{service} has no registered drivers"));
                }
                _ => {}
            }
        }

        if problems.is_empty() {
            ReadinessResult::Ready
        } else {
            ReadinessResult::TimedOut(problems.join("; "))
        }
    }

    pub fn is_ready(&self) -> bool {
        self.result() == ReadinessResult::Ready
    }
}

#![forbid(unsafe_code)]

use crate::domain::Entity;
use crate::restart::Restarter;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Live,
    /// Decide and report everything, but never call the restarter.
    DryRun,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestartStatus {
    Restarted,
    Failed { diagnostic: String },
    /// Would have been restarted outside of dry-run mode.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestartOutcome {
    pub unit: String,
    pub status: RestartStatus,
    /// Whatever the service manager printed.
    pub output: String,
}

impl RestartOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, RestartStatus::Failed { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestartReport {
    pub outcomes: Vec<RestartOutcome>,
}

impl RestartReport {
    pub fn restarted(&self) -> usize {
        self.count(|s| matches!(s, RestartStatus::Restarted))
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, RestartStatus::Skipped))
    }

    fn count(&self, f: impl Fn(&RestartStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| f(&o.status)).count()
    }
}

/// Restarts units one at a time.
///
/// Units are never restarted concurrently, and consecutive restarts are
/// separated by `delay` so that whatever depends on them (load balancer
/// health checks, clients reconnecting) can settle. A failed restart is
/// recorded and the queue carries on; nothing is retried.
pub struct RestartOrchestrator {
    restarter: Box<dyn Restarter + Send + Sync>,
    delay: Duration,
    mode: Mode,
}

impl RestartOrchestrator {
    pub fn new(restarter: Box<dyn Restarter + Send + Sync>, delay: Duration, mode: Mode) -> Self {
        Self {
            restarter,
            delay,
            mode,
        }
    }

    /// Restart every eligible entity in iteration order.
    ///
    /// Entities without stale evidence, and command lines, are not eligible
    /// and are dropped with a warning.
    pub async fn restart<'a, I>(&self, entities: I) -> RestartReport
    where
        I: IntoIterator<Item = &'a Entity>,
    {
        let mut report = RestartReport::default();
        let queue: Vec<&Entity> = entities
            .into_iter()
            .filter(|entity| {
                let eligible = entity.is_restartable() && entity.has_evidence();
                if !eligible {
                    warn!(name = %entity.name, kind = %entity.kind, "not eligible for restart");
                }
                eligible
            })
            .collect();

        for (index, entity) in queue.iter().enumerate() {
            if self.mode == Mode::DryRun {
                info!(unit = %entity.name, "dry run, not restarting");
                report.outcomes.push(RestartOutcome {
                    unit: entity.name.clone(),
                    status: RestartStatus::Skipped,
                    output: String::new(),
                });
                continue;
            }

            if index > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            info!(unit = %entity.name, reasons = entity.reasons.len(), "restarting");
            let outcome = match self.restarter.restart(&entity.name).await {
                Ok(output) if output.success => {
                    info!(unit = %entity.name, "restarted");
                    RestartOutcome {
                        unit: entity.name.clone(),
                        status: RestartStatus::Restarted,
                        output: output.output,
                    }
                }
                Ok(output) => {
                    let diagnostic = match output.code {
                        Some(code) => format!("exited with status {code}"),
                        None => "terminated by signal".to_owned(),
                    };
                    warn!(unit = %entity.name, %diagnostic, "restart failed");
                    RestartOutcome {
                        unit: entity.name.clone(),
                        status: RestartStatus::Failed { diagnostic },
                        output: output.output,
                    }
                }
                Err(err) => {
                    warn!(unit = %entity.name, %err, "failed to run restart command");
                    RestartOutcome {
                        unit: entity.name.clone(),
                        status: RestartStatus::Failed {
                            diagnostic: err.to_string(),
                        },
                        output: String::new(),
                    }
                }
            };
            report.outcomes.push(outcome);
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::restart::RestartOutput;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;

    #[derive(Debug, Default, Clone)]
    struct SpyRestarter {
        calls: Arc<Mutex<Vec<(String, Instant)>>>,
        failing: Vec<&'static str>,
    }

    #[async_trait]
    impl Restarter for SpyRestarter {
        async fn restart(&self, unit: &str) -> std::io::Result<RestartOutput> {
            self.calls
                .lock()
                .unwrap()
                .push((unit.to_owned(), Instant::now()));
            if unit == "broken.service" {
                return Err(std::io::Error::other("spawn failed"));
            }
            let success = !self.failing.iter().any(|f| *f == unit);
            Ok(RestartOutput {
                success,
                code: Some(if success { 0 } else { 1 }),
                output: format!("restart {unit}"),
            })
        }
    }

    fn stale_unit(name: &str) -> Entity {
        let mut entity = Entity::unit(name);
        entity.reasons.insert("/usr/lib/libc.so.6".into());
        entity
    }

    #[tokio::test(start_paused = true)]
    async fn restarts_sequentially_with_delay_between() {
        let spy = SpyRestarter::default();
        let orchestrator =
            RestartOrchestrator::new(Box::new(spy.clone()), Duration::from_secs(5), Mode::Live);
        let units = [stale_unit("a.service"), stale_unit("b.service"), stale_unit("c.service")];

        let report = orchestrator.restart(&units).await;

        assert_eq!(report.restarted(), 3);
        let calls = spy.calls.lock().unwrap();
        let names: Vec<_> = calls.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["a.service", "b.service", "c.service"]);
        for pair in calls.windows(2) {
            assert!(pair[1].1 - pair[0].1 >= Duration::from_secs(5));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failures_do_not_stop_the_queue() {
        let spy = SpyRestarter {
            failing: vec!["b.service"],
            ..SpyRestarter::default()
        };
        let orchestrator =
            RestartOrchestrator::new(Box::new(spy.clone()), Duration::from_secs(5), Mode::Live);
        let units = [
            stale_unit("a.service"),
            stale_unit("b.service"),
            stale_unit("broken.service"),
            stale_unit("c.service"),
        ];

        let report = orchestrator.restart(&units).await;

        assert_eq!(spy.calls.lock().unwrap().len(), 4);
        assert_eq!(report.restarted(), 2);
        assert_eq!(report.failed(), 2);
        assert_eq!(
            report.outcomes[1].status,
            RestartStatus::Failed {
                diagnostic: "exited with status 1".into()
            }
        );
        assert_eq!(report.outcomes[1].output, "restart b.service");
        assert_eq!(
            report.outcomes[2].status,
            RestartStatus::Failed {
                diagnostic: "spawn failed".into()
            }
        );
    }

    #[tokio::test]
    async fn dry_run_never_calls_the_restarter() {
        let spy = SpyRestarter::default();
        let orchestrator =
            RestartOrchestrator::new(Box::new(spy.clone()), Duration::from_secs(5), Mode::DryRun);
        let units = [stale_unit("a.service"), stale_unit("b.service")];

        let report = orchestrator.restart(&units).await;

        assert!(spy.calls.lock().unwrap().is_empty());
        assert_eq!(report.skipped(), 2);
        assert_eq!(report.outcomes[0].unit, "a.service");
    }

    #[tokio::test]
    async fn ineligible_entities_are_dropped() {
        let spy = SpyRestarter::default();
        let orchestrator =
            RestartOrchestrator::new(Box::new(spy.clone()), Duration::ZERO, Mode::Live);
        let mut cmdline = Entity::cmdline("/usr/bin/thing");
        cmdline.reasons.insert("/usr/lib/libthing.so".into());
        let entities = [Entity::unit("clean.service"), cmdline];

        let report = orchestrator.restart(&entities).await;

        assert!(spy.calls.lock().unwrap().is_empty());
        assert!(report.outcomes.is_empty());
    }
}

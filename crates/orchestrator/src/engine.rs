#![forbid(unsafe_code)]

use crate::error::Error;
use crate::inventory::Inventory;
use crate::observation::{ScanWarning, Scanner};
use crate::plan::{Plan, Verdict};
use crate::restart::{Mode, RestartOrchestrator, RestartReport, Restarter};
use crate::strategy::Strategy;
use config::Config;
use tracing::info;

pub struct Services {
    pub scanner: Box<dyn Scanner + Send + Sync>,
    pub restarter: Box<dyn Restarter + Send + Sync>,
}

/// Everything one run found and did.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Number of processes that were inspected successfully.
    pub processes: usize,
    pub plan: Plan,
    pub restarts: RestartReport,
    pub warnings: Vec<ScanWarning>,
}

/// Single pass: scan, aggregate, decide, restart.
pub struct Engine {
    scanner: Box<dyn Scanner + Send + Sync>,
    strategy: Strategy,
    orchestrator: RestartOrchestrator,
}

impl Engine {
    /// Build the engine. Fails on invalid strategy patterns, before anything
    /// is scanned.
    pub fn new(config: &Config, services: Services, mode: Mode) -> Result<Self, Error> {
        let strategy = Strategy::new(&config.strategy)?;
        Ok(Self {
            scanner: services.scanner,
            strategy,
            orchestrator: RestartOrchestrator::new(services.restarter, config.restart.delay, mode),
        })
    }

    pub async fn run(&mut self) -> Result<RunReport, Error> {
        let scan = self.scanner.scan()?;
        let inventory = Inventory::aggregate(&scan.processes);
        let plan = Plan::new(inventory, &self.strategy);

        info!(
            processes = scan.processes.len(),
            units = plan.units.len(),
            cmdlines = plan.cmdlines.len(),
            restart = plan.count(Verdict::Restart),
            not_selected = plan.count(Verdict::NotSelected),
            "plan ready"
        );

        let restarts = self.orchestrator.restart(plan.restart_queue()).await;

        Ok(RunReport {
            processes: scan.processes.len(),
            plan,
            restarts,
            warnings: scan.warnings,
        })
    }
}

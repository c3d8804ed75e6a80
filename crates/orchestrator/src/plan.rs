#![forbid(unsafe_code)]

use crate::domain::Entity;
use crate::inventory::Inventory;
use crate::strategy::Strategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Unit with stale evidence selected by the strategy.
    Restart,
    /// Command line with stale evidence selected by the strategy. Command
    /// lines cannot be restarted, so this is informational.
    Report,
    /// Nothing stale is mapped. Never restarted, whatever the rules say.
    NoEvidence,
    /// Stale, but the strategy did not select it.
    NotSelected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub entity: Entity,
    pub verdict: Verdict,
}

/// Every entity of one scan together with what should happen to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub units: Vec<Decision>,
    pub cmdlines: Vec<Decision>,
}

impl Plan {
    pub fn new(inventory: Inventory, strategy: &Strategy) -> Self {
        let decide = |entity: Entity| {
            let verdict = if !entity.has_evidence() {
                Verdict::NoEvidence
            } else if !strategy.selects(&entity) {
                Verdict::NotSelected
            } else if entity.is_restartable() {
                Verdict::Restart
            } else {
                Verdict::Report
            };
            Decision { entity, verdict }
        };

        Self {
            units: inventory.units.into_values().map(decide).collect(),
            cmdlines: inventory.cmdlines.into_values().map(decide).collect(),
        }
    }

    /// Units to restart, in name order.
    pub fn restart_queue(&self) -> impl Iterator<Item = &Entity> {
        self.units
            .iter()
            .filter(|d| d.verdict == Verdict::Restart)
            .map(|d| &d.entity)
    }

    pub fn decisions(&self) -> impl Iterator<Item = &Decision> {
        self.units.iter().chain(self.cmdlines.iter())
    }

    pub fn count(&self, verdict: Verdict) -> usize {
        self.decisions().filter(|d| d.verdict == verdict).count()
    }
}

#![forbid(unsafe_code)]

use crate::domain::{Entity, Process};
use std::collections::BTreeMap;

/// Processes grouped into units and command lines.
///
/// The two views are independent: a process with both a unit and a command
/// line contributes its evidence to one entry in each.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    pub units: BTreeMap<String, Entity>,
    pub cmdlines: BTreeMap<String, Entity>,
}

impl Inventory {
    pub fn aggregate<'a, I>(processes: I) -> Self
    where
        I: IntoIterator<Item = &'a Process>,
    {
        let mut inventory = Self::default();
        for process in processes {
            inventory.add(process);
        }
        inventory
    }

    /// Attribute one process. Adding the same process twice changes nothing.
    pub fn add(&mut self, process: &Process) {
        if let Some(unit) = &process.unit {
            self.units
                .entry(unit.clone())
                .or_insert_with(|| Entity::unit(unit.as_str()))
                .merge(&process.stale_maps);
        }
        if let Some(cmdline) = &process.cmdline {
            self.cmdlines
                .entry(cmdline.clone())
                .or_insert_with(|| Entity::cmdline(cmdline.as_str()))
                .merge(&process.stale_maps);
        }
    }

    /// Fold another inventory into this one, e.g. one built from a disjoint
    /// slice of the process table. Commutative and associative.
    pub fn merge(&mut self, other: Inventory) {
        for (name, entity) in other.units {
            merge_entry(&mut self.units, name, entity);
        }
        for (name, entity) in other.cmdlines {
            merge_entry(&mut self.cmdlines, name, entity);
        }
    }
}

fn merge_entry(map: &mut BTreeMap<String, Entity>, name: String, entity: Entity) {
    match map.get_mut(&name) {
        Some(existing) => existing.merge(&entity.reasons),
        None => {
            map.insert(name, entity);
        }
    }
}

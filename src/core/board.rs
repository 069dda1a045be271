//! Aggregate health view and dependency-gating channels.
//!
//! [`HealthBoard`] keeps one watch channel per unit. It serves two consumers:
//!
//! - **dependency gating**: each unit actor watches its prerequisites'
//!   channels and proceeds only once they report
//!   [`Running`](UnitState::Running);
//! - **status surface**: external monitors read an atomic
//!   [`snapshot`](HealthBoard::snapshot) of all unit states.
//!
//! ## Rules
//! - The unit set is fixed at construction; no channels are added or removed
//!   afterwards.
//! - Each unit's state is written only by that unit's actor (single-writer);
//!   everyone else holds read-only receivers.

use std::collections::{BTreeMap, HashMap};

use tokio::sync::watch;

use crate::units::UnitState;

/// Read-mostly map of unit name → lifecycle state.
pub struct HealthBoard {
    units: HashMap<String, watch::Sender<UnitState>>,
}

impl HealthBoard {
    /// Creates a board with every unit in [`UnitState::Pending`].
    pub(crate) fn new(names: &[String]) -> Self {
        let units = names
            .iter()
            .map(|name| {
                let (tx, _rx) = watch::channel(UnitState::Pending);
                (name.clone(), tx)
            })
            .collect();
        Self { units }
    }

    /// Returns the combined up/down view of all units.
    ///
    /// The map is rebuilt on demand from the per-unit channels; sorted by
    /// unit name for stable output.
    pub fn snapshot(&self) -> BTreeMap<String, UnitState> {
        self.units
            .iter()
            .map(|(name, tx)| (name.clone(), *tx.borrow()))
            .collect()
    }

    /// Returns the current state of one unit, if it exists.
    pub fn state(&self, name: &str) -> Option<UnitState> {
        self.units.get(name).map(|tx| *tx.borrow())
    }

    /// Publishes a new state for `name`. Called only by the unit's actor.
    pub(crate) fn set(&self, name: &str, state: UnitState) {
        if let Some(tx) = self.units.get(name) {
            tx.send_replace(state);
        }
    }

    /// Returns a receiver observing `name`'s state changes.
    pub(crate) fn watch(&self, name: &str) -> Option<watch::Receiver<UnitState>> {
        self.units.get(name).map(watch::Sender::subscribe)
    }
}

//! # Serializable emitter state.
//!
//! [`Snapshot`] is what [`Emitter::snapshot`](crate::Emitter::snapshot)
//! returns and what `Display` renders:
//!
//! ```text
//! live       {"maxListeners":10,"listenerCount":{"a":2}}
//! destroyed  "destroyed"
//! ```
//!
//! The JSON map is keyed by type name. A type literally named `"*"` keeps
//! its key; wildcard listeners have no name and are left out of the map.
//! [`Snapshot::listener_count`] still reports them.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::events::EventType;

const DESTROYED: &str = "destroyed";

/// Point-in-time view of an emitter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Snapshot {
    Live {
        /// Effective threshold (`0` = unlimited).
        max_listeners: usize,
        /// Listener count per populated event type.
        listener_count: BTreeMap<EventType, usize>,
    },
    Destroyed,
}

impl Snapshot {
    pub fn is_destroyed(&self) -> bool {
        matches!(self, Snapshot::Destroyed)
    }

    /// Count recorded for `event` (`0` when absent or destroyed).
    pub fn listener_count(&self, event: &EventType) -> usize {
        match self {
            Snapshot::Live { listener_count, .. } => {
                listener_count.get(event).copied().unwrap_or(0)
            }
            Snapshot::Destroyed => 0,
        }
    }

    /// JSON value of this snapshot.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Snapshot::Destroyed => serializer.serialize_str(DESTROYED),
            Snapshot::Live {
                max_listeners,
                listener_count,
            } => {
                let mut state = serializer.serialize_struct("Snapshot", 2)?;
                state.serialize_field("maxListeners", max_listeners)?;
                state.serialize_field("listenerCount", &Counts(listener_count))?;
                state.end()
            }
        }
    }
}

/// Map keyed by the name of each named event type.
struct Counts<'a>(&'a BTreeMap<EventType, usize>);

impl Serialize for Counts<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.0
                .iter()
                .filter_map(|(event, n)| event.as_str().map(|name| (name, n))),
        )
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Snapshot::Destroyed => f.write_str(DESTROYED),
            Snapshot::Live { .. } => write!(f, "{}", self.to_json()),
        }
    }
}

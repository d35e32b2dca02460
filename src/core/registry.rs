//! # Listener registry - per-instance type → listener(s) storage.
//!
//! Registry owns the mapping of one emitter and nothing else: it never
//! invokes listeners and never fires meta-events. The emitter wraps it in a
//! lock, mutates it, releases the lock and only then dispatches.
//!
//! ## Storage
//! ```text
//! HashMap<EventType, Slot>
//!   absent                       no listeners
//!   Slot::One(listener)          exactly one (no Vec allocated)
//!   Slot::Many { listeners, .. } two or more, in dispatch order
//! ```
//!
//! ## Rules
//! - A `Many` slot never holds fewer than 2 listeners: shrinking to one
//!   demotes it to `One`, shrinking to zero deletes the key.
//! - Removal scans from the end (most recent duplicate goes first).
//! - `warned` is set the first time a `Many` slot exceeds the threshold and
//!   is lost when the slot is demoted.

use std::collections::{BTreeMap, HashMap};

use crate::core::config;
use crate::error::EmitterError;
use crate::events::EventType;
use crate::listeners::Listener;

/// Where a new listener goes inside its type's sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Position {
    Append,
    Prepend,
    Index(usize),
}

/// Storage for one event type.
#[derive(Debug)]
enum Slot {
    One(Listener),
    Many { listeners: Vec<Listener>, warned: bool },
}

impl Slot {
    fn len(&self) -> usize {
        match self {
            Slot::One(_) => 1,
            Slot::Many { listeners, .. } => listeners.len(),
        }
    }

    fn to_vec(&self) -> Vec<Listener> {
        match self {
            Slot::One(l) => vec![l.clone()],
            Slot::Many { listeners, .. } => listeners.clone(),
        }
    }
}

/// Outcome of a successful insert.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Inserted {
    /// Set to the threshold when this insert is the first to exceed it.
    pub exceeded: Option<usize>,
}

/// Type → listener(s) mapping of one emitter.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    slots: HashMap<EventType, Slot>,
    max_listeners: Option<usize>,
}

impl Registry {
    pub fn new(max_listeners: Option<usize>) -> Self {
        Self {
            slots: HashMap::new(),
            max_listeners,
        }
    }

    pub fn max_listeners(&self) -> Option<usize> {
        self.max_listeners
    }

    pub fn set_max_listeners(&mut self, n: Option<usize>) {
        self.max_listeners = n;
    }

    /// Threshold after resolving the process-wide default (`None` = unlimited).
    pub fn limit(&self) -> Option<usize> {
        config::limit(self.max_listeners)
    }

    /// Validates `position` against the current storage of `event`.
    ///
    /// The first listener of a type accepts any position. Otherwise an
    /// explicit index must lie in `0..=len`.
    pub fn check_position(&self, event: &EventType, position: Position) -> Result<(), EmitterError> {
        let len = self.count(event);
        match position {
            Position::Index(i) if len > 0 && i > len => Err(EmitterError::invalid_argument(
                "index",
                format!("{i} is out of range for `{event}` with {len} listener(s)"),
            )),
            _ => Ok(()),
        }
    }

    /// Inserts `listener` for `event` at `position`.
    pub fn insert(
        &mut self,
        event: EventType,
        listener: Listener,
        position: Position,
    ) -> Result<Inserted, EmitterError> {
        self.check_position(&event, position)?;
        let limit = self.limit();

        let slot = match self.slots.remove(&event) {
            None => {
                self.slots.insert(event, Slot::One(listener));
                return Ok(Inserted::default());
            }
            Some(Slot::One(existing)) => {
                let listeners = match position {
                    Position::Prepend | Position::Index(0) => vec![listener, existing],
                    Position::Append | Position::Index(_) => vec![existing, listener],
                };
                Slot::Many {
                    listeners,
                    warned: false,
                }
            }
            Some(Slot::Many {
                mut listeners,
                warned,
            }) => {
                match position {
                    Position::Append => listeners.push(listener),
                    Position::Prepend => listeners.insert(0, listener),
                    Position::Index(i) => listeners.insert(i, listener),
                }
                Slot::Many { listeners, warned }
            }
        };

        let mut inserted = Inserted::default();
        let slot = match (slot, limit) {
            (
                Slot::Many {
                    listeners,
                    warned: false,
                },
                Some(max),
            ) if listeners.len() > max => {
                inserted.exceeded = Some(max);
                Slot::Many {
                    listeners,
                    warned: true,
                }
            }
            (slot, _) => slot,
        };
        self.slots.insert(event, slot);
        Ok(inserted)
    }

    /// Removes the last listener of `event` accepted by `matches`.
    pub fn remove_last(
        &mut self,
        event: &EventType,
        matches: impl Fn(&Listener) -> bool,
    ) -> Option<Listener> {
        let slot = self.slots.get_mut(event)?;
        if let Slot::Many { listeners, .. } = slot {
            let index = listeners.iter().rposition(|l| matches(l))?;
            let removed = listeners.remove(index);
            if listeners.len() == 1 {
                if let Some(last) = listeners.pop() {
                    *slot = Slot::One(last);
                }
            }
            return Some(removed);
        }

        match self.slots.get(event) {
            Some(Slot::One(l)) if matches(l) => {}
            _ => return None,
        }
        match self.slots.remove(event) {
            Some(Slot::One(l)) => Some(l),
            _ => None,
        }
    }

    /// Defensive copy of the listeners of `event`, in dispatch order.
    pub fn listeners(&self, event: &EventType) -> Vec<Listener> {
        self.slots.get(event).map(Slot::to_vec).unwrap_or_default()
    }

    pub fn count(&self, event: &EventType) -> usize {
        self.slots.get(event).map_or(0, Slot::len)
    }

    pub fn contains(&self, event: &EventType) -> bool {
        self.slots.contains_key(event)
    }

    /// Returns sorted list of populated event types.
    pub fn types(&self) -> Vec<EventType> {
        let mut types: Vec<EventType> = self.slots.keys().cloned().collect();
        types.sort_unstable();
        types
    }

    pub fn counts(&self) -> BTreeMap<EventType, usize> {
        self.slots
            .iter()
            .map(|(event, slot)| (event.clone(), slot.len()))
            .collect()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn clear_event(&mut self, event: &EventType) {
        self.slots.remove(event);
    }

    #[cfg(test)]
    fn is_warned(&self, event: &EventType) -> bool {
        matches!(self.slots.get(event), Some(Slot::Many { warned: true, .. }))
    }

    #[cfg(test)]
    fn is_single(&self, event: &EventType) -> bool {
        matches!(self.slots.get(event), Some(Slot::One(_)))
    }
}

//! Fixed table of emitter operations available to a [`Mixin`](super::Mixin).

use std::fmt;
use std::str::FromStr;

use crate::error::EmitterError;

/// One public emitter operation, addressable by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    On,
    OnAny,
    Once,
    Many,
    Until,
    First,
    At,
    Off,
    OffAny,
    Emit,
    Trigger,
    Tick,
    Listeners,
    ListenerCount,
    EventTypes,
    Clear,
    SetMaxListeners,
    GetMaxListeners,
    Destroy,
    ToJson,
}

impl Operation {
    /// Every operation, in table order.
    pub const ALL: [Operation; 20] = [
        Operation::On,
        Operation::OnAny,
        Operation::Once,
        Operation::Many,
        Operation::Until,
        Operation::First,
        Operation::At,
        Operation::Off,
        Operation::OffAny,
        Operation::Emit,
        Operation::Trigger,
        Operation::Tick,
        Operation::Listeners,
        Operation::ListenerCount,
        Operation::EventTypes,
        Operation::Clear,
        Operation::SetMaxListeners,
        Operation::GetMaxListeners,
        Operation::Destroy,
        Operation::ToJson,
    ];

    /// Name under which the operation is exposed by default.
    pub fn name(self) -> &'static str {
        match self {
            Operation::On => "on",
            Operation::OnAny => "on_any",
            Operation::Once => "once",
            Operation::Many => "many",
            Operation::Until => "until",
            Operation::First => "first",
            Operation::At => "at",
            Operation::Off => "off",
            Operation::OffAny => "off_any",
            Operation::Emit => "emit",
            Operation::Trigger => "trigger",
            Operation::Tick => "tick",
            Operation::Listeners => "listeners",
            Operation::ListenerCount => "listener_count",
            Operation::EventTypes => "event_types",
            Operation::Clear => "clear",
            Operation::SetMaxListeners => "set_max_listeners",
            Operation::GetMaxListeners => "get_max_listeners",
            Operation::Destroy => "destroy",
            Operation::ToJson => "to_json",
        }
    }
}

impl FromStr for Operation {
    type Err = EmitterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .iter()
            .copied()
            .find(|op| op.name() == s)
            .ok_or_else(|| EmitterError::UnknownOperation { name: s.to_string() })
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for op in Operation::ALL {
            assert_eq!(op.name().parse::<Operation>().unwrap(), op);
        }
    }

    #[test]
    fn test_unknown_name() {
        let err = "subscribe".parse::<Operation>().unwrap_err();
        assert_eq!(err.as_label(), "emitter_unknown_operation");
    }
}

//! Dynamic, name-addressed view over an emitter.
//!
//! A [`Mixin`] exposes a chosen subset of [`Operation`]s under chosen names.
//! Calls take positional [`Args`] and are decoded into the typed emitter
//! method:
//!
//! ```text
//! on / once / until / first / off   (event, listener)
//! on_any / off_any                  (listener)
//! many                              (event, times, listener)
//! at                                (event, index, listener)
//! emit / tick                       (event, payload...)
//! trigger                           (event, Args)
//! listeners / listener_count        (event)
//! clear                             (event?)
//! set_max_listeners                 (n?)
//! event_types / get_max_listeners / destroy / to_json   ()
//! ```
//!
//! Event types may be passed as [`EventType`], `&'static str` or `String`.
//! Counts accept any unsigned or signed primitive integer that is not negative.

use std::any::Any;
use std::collections::BTreeMap;

use crate::api::Operation;
use crate::core::{Emitter, Snapshot, Tick};
use crate::error::EmitterError;
use crate::events::{Arg, Args, EventType};
use crate::listeners::Listener;

/// Which operations a [`Mixin`] exposes and under what names.
#[derive(Clone, Debug, Default)]
pub enum Selection {
    /// Every operation under its default name.
    #[default]
    All,
    /// The named operations under their default names.
    Only(Vec<String>),
    /// `(alias, operation name)` pairs.
    Renamed(Vec<(String, String)>),
}

impl Selection {
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selection::Only(names.into_iter().map(Into::into).collect())
    }

    pub fn renamed<I, A, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, S)>,
        A: Into<String>,
        S: Into<String>,
    {
        Selection::Renamed(
            pairs
                .into_iter()
                .map(|(alias, name)| (alias.into(), name.into()))
                .collect(),
        )
    }
}

/// Result of a [`Mixin::call`].
#[derive(Debug)]
pub enum Reply {
    /// A chaining operation succeeded.
    Chained,
    Emitted(bool),
    Count(usize),
    Listeners(Vec<Listener>),
    Types(Vec<EventType>),
    MaxListeners(usize),
    Snapshot(Snapshot),
    Scheduled(Tick),
    Destroyed,
}

/// Named operation table bound to one emitter.
#[derive(Debug, Clone)]
pub struct Mixin {
    emitter: Emitter,
    table: BTreeMap<String, Operation>,
}

impl Mixin {
    /// Builds the table for `selection` over `emitter`.
    ///
    /// # Errors
    /// [`EmitterError::UnknownOperation`] when the selection names an
    /// operation that does not exist.
    pub fn apply(selection: Selection, emitter: &Emitter) -> Result<Self, EmitterError> {
        let table: BTreeMap<String, Operation> = match selection {
            Selection::All => Operation::ALL
                .iter()
                .map(|op| (op.name().to_string(), *op))
                .collect(),
            Selection::Only(names) => names
                .into_iter()
                .map(|name| {
                    let op = name.parse::<Operation>()?;
                    Ok((name, op))
                })
                .collect::<Result<_, EmitterError>>()?,
            Selection::Renamed(pairs) => pairs
                .into_iter()
                .map(|(alias, name)| Ok((alias, name.parse::<Operation>()?)))
                .collect::<Result<_, EmitterError>>()?,
        };
        Ok(Self {
            emitter: emitter.clone(),
            table,
        })
    }

    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    /// Exposed names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    /// Operation exposed under `name`, if any.
    pub fn operation(&self, name: &str) -> Option<Operation> {
        self.table.get(name).copied()
    }

    /// Invokes the operation exposed under `name` with positional `args`.
    ///
    /// # Errors
    /// - [`EmitterError::UnknownOperation`] for names not in the table.
    /// - [`EmitterError::InvalidListener`] when a listener slot holds something else.
    /// - [`EmitterError::InvalidArgument`] for missing, mistyped or negative arguments.
    /// - Any error of the underlying emitter method.
    pub fn call(&self, name: &str, args: Args) -> Result<Reply, EmitterError> {
        let op = self
            .operation(name)
            .ok_or_else(|| EmitterError::UnknownOperation { name: name.to_string() })?;
        let e = &self.emitter;

        let reply = match op {
            Operation::On => chained(e.on(event(&args, 0)?, listener(&args, 1)?))?,
            Operation::OnAny => chained(e.on_any(listener(&args, 0)?))?,
            Operation::Once => chained(e.once(event(&args, 0)?, listener(&args, 1)?))?,
            Operation::Many => chained(e.many(
                event(&args, 0)?,
                count(&args, 1, "times")?,
                listener(&args, 2)?,
            ))?,
            Operation::Until => chained(e.until(event(&args, 0)?, listener(&args, 1)?))?,
            Operation::First => chained(e.first(event(&args, 0)?, listener(&args, 1)?))?,
            Operation::At => chained(e.at(
                event(&args, 0)?,
                count(&args, 1, "index")?,
                listener(&args, 2)?,
            ))?,
            Operation::Off => chained(e.off(event(&args, 0)?, &listener(&args, 1)?))?,
            Operation::OffAny => chained(e.off_any(&listener(&args, 0)?))?,
            Operation::Emit => Reply::Emitted(e.emit(event(&args, 0)?, payload(&args))?),
            Operation::Trigger => {
                let values = args
                    .get::<Args>(1)
                    .cloned()
                    .ok_or_else(|| EmitterError::invalid_argument("args", "expected an argument list"))?;
                Reply::Emitted(e.trigger(event(&args, 0)?, values.iter().cloned())?)
            }
            Operation::Tick => Reply::Scheduled(e.tick(event(&args, 0)?, payload(&args))),
            Operation::Listeners => Reply::Listeners(e.listeners(event(&args, 0)?)),
            Operation::ListenerCount => Reply::Count(e.listener_count(event(&args, 0)?)),
            Operation::EventTypes => Reply::Types(e.event_types()),
            Operation::Clear if args.is_empty() => chained(e.clear())?,
            Operation::Clear => chained(e.clear_event(event(&args, 0)?))?,
            Operation::SetMaxListeners => {
                let n = if args.is_empty() {
                    None
                } else {
                    Some(count(&args, 0, "n")?)
                };
                e.set_max_listeners(n);
                Reply::Chained
            }
            Operation::GetMaxListeners => Reply::MaxListeners(e.get_max_listeners()),
            Operation::Destroy => {
                e.destroy();
                Reply::Destroyed
            }
            Operation::ToJson => Reply::Snapshot(e.snapshot()),
        };
        Ok(reply)
    }
}

fn chained(outcome: Result<&Emitter, EmitterError>) -> Result<Reply, EmitterError> {
    outcome.map(|_| Reply::Chained)
}

fn required<'a>(args: &'a Args, index: usize, name: &'static str) -> Result<&'a Arg, EmitterError> {
    args.arg(index).ok_or_else(|| {
        EmitterError::invalid_argument(name, format!("missing argument at position {index}"))
    })
}

fn event(args: &Args, index: usize) -> Result<EventType, EmitterError> {
    let value: &(dyn Any + Send + Sync) = &**required(args, index, "event")?;
    if let Some(event) = value.downcast_ref::<EventType>() {
        return Ok(event.clone());
    }
    if let Some(name) = value.downcast_ref::<&'static str>() {
        return Ok(EventType::from(*name));
    }
    if let Some(name) = value.downcast_ref::<String>() {
        return Ok(EventType::from(name.as_str()));
    }
    Err(EmitterError::invalid_argument(
        "event",
        format!("expected an event type, got {}", kind(value)),
    ))
}

fn listener(args: &Args, index: usize) -> Result<Listener, EmitterError> {
    let value: &(dyn Any + Send + Sync) = &**args
        .arg(index)
        .ok_or(EmitterError::InvalidListener { found: "nothing" })?;
    value
        .downcast_ref::<Listener>()
        .cloned()
        .ok_or_else(|| EmitterError::InvalidListener { found: kind(value) })
}

fn count(args: &Args, index: usize, name: &'static str) -> Result<usize, EmitterError> {
    let value: &(dyn Any + Send + Sync) = &**required(args, index, name)?;
    match integer(value) {
        Some(n) => usize::try_from(n).map_err(|_| {
            EmitterError::invalid_argument(name, format!("must be a non-negative integer, got {n}"))
        }),
        None => Err(EmitterError::invalid_argument(
            name,
            format!("expected an integer, got {}", kind(value)),
        )),
    }
}

fn payload(args: &Args) -> Args {
    args.iter().skip(1).cloned().collect()
}

fn integer(value: &(dyn Any + Send + Sync)) -> Option<i128> {
    macro_rules! widen {
        ($($t:ty),*) => {
            $(
                if let Some(n) = value.downcast_ref::<$t>() {
                    return i128::try_from(*n).ok();
                }
            )*
        };
    }
    widen!(usize, u64, u32, u16, u8, isize, i64, i32, i16, i8);
    None
}

fn kind(value: &(dyn Any + Send + Sync)) -> &'static str {
    if value.is::<Listener>() {
        "listener"
    } else if integer(value).is_some() {
        "integer"
    } else if value.is::<f64>() || value.is::<f32>() {
        "float"
    } else if value.is::<bool>() {
        "bool"
    } else if value.is::<String>() || value.is::<&'static str>() {
        "string"
    } else if value.is::<EventType>() {
        "event type"
    } else {
        "unsupported value"
    }
}

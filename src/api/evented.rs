use crate::core::Emitter;
use crate::error::EmitterError;
use crate::events::{Args, EventType};
use crate::listeners::Listener;

/// Gives a type the common emitter operations by delegating to an owned [`Emitter`].
///
/// # Example
/// ```
/// use nsemitter::{args, Args, Emitter, Evented, Listener};
///
/// struct Door {
///     events: Emitter,
/// }
///
/// impl Evented for Door {
///     fn emitter(&self) -> &Emitter {
///         &self.events
///     }
/// }
///
/// let door = Door { events: Emitter::new() };
/// door.on("open", Listener::new(|_: &Args| {}))?;
/// assert!(door.emit("open", args!())?);
/// assert_eq!(door.listener_count("open"), 1);
/// # Ok::<(), nsemitter::EmitterError>(())
/// ```
pub trait Evented {
    fn emitter(&self) -> &Emitter;

    fn on(&self, event: impl Into<EventType>, listener: Listener) -> Result<&Self, EmitterError> {
        self.emitter().on(event, listener)?;
        Ok(self)
    }

    fn once(&self, event: impl Into<EventType>, listener: Listener) -> Result<&Self, EmitterError> {
        self.emitter().once(event, listener)?;
        Ok(self)
    }

    fn off(&self, event: impl Into<EventType>, listener: &Listener) -> Result<&Self, EmitterError> {
        self.emitter().off(event, listener)?;
        Ok(self)
    }

    fn emit(&self, event: impl Into<EventType>, args: Args) -> Result<bool, EmitterError> {
        self.emitter().emit(event, args)
    }

    fn listener_count(&self, event: impl Into<EventType>) -> usize {
        self.emitter().listener_count(event)
    }
}

use crate::{
    core::{Config, Emitter},
    error::EmitterError,
    events::EventType,
    listeners::Listener,
};

/// Builder for constructing an [`Emitter`] with custom settings and initial listeners.
///
/// # Example
/// ```
/// use nsemitter::{Args, Emitter, Listener};
///
/// let emitter = Emitter::builder()
///     .with_max_listeners(2)
///     .with_listeners("ready", vec![Listener::new(|_: &Args| {})])
///     .build()?;
/// assert_eq!(emitter.get_max_listeners(), 2);
/// assert_eq!(emitter.listener_count("ready"), 1);
/// # Ok::<(), nsemitter::EmitterError>(())
/// ```
#[derive(Debug)]
pub struct EmitterBuilder {
    cfg: Config,
    initial: Vec<(EventType, Vec<Listener>)>,
}

impl EmitterBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            initial: Vec::new(),
        }
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets the per-type alert threshold (`0` = unlimited).
    pub fn with_max_listeners(mut self, n: usize) -> Self {
        self.cfg.max_listeners = Some(n);
        self
    }

    /// Enables or disables panic capture during dispatch.
    pub fn with_catch_panics(mut self, enabled: bool) -> Self {
        self.cfg.catch_panics = enabled;
        self
    }

    /// Adds listeners registered with `on` when the emitter is built.
    ///
    /// Entries are applied in the order they were added.
    pub fn with_listeners(mut self, event: impl Into<EventType>, listeners: Vec<Listener>) -> Self {
        self.initial.push((event.into(), listeners));
        self
    }

    /// Builds the emitter and registers the initial listeners.
    ///
    /// Meta-event listeners given earlier in the list observe later
    /// registrations, the same as calling `on` by hand.
    pub fn build(self) -> Result<Emitter, EmitterError> {
        let emitter = Emitter::with_config(self.cfg);
        emitter.on_map(self.initial)?;
        Ok(emitter)
    }
}

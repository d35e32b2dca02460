//! Emitter core: registry, dispatch and lifecycle.
//!
//! The only public types from this module are [`Emitter`] (with its builder,
//! weak handle, snapshot and deferred-emission future) and [`Config`].
//!
//! Internal modules:
//! - [`registry`]: type → listener(s) storage with single/many slots;
//! - [`emitter`]: shared handle, registry operations, `clear`/`destroy`;
//! - [`dispatch`]: `emit`/`trigger`, namespace levels, error redirection;
//! - [`subscribe`]: `on`/`once`/`many`/`until`/`first`/`at`/`off`;
//! - [`tick`]: deferred emission on the tokio runtime;
//! - [`snapshot`]: serializable state (`toJSON` form).

mod builder;
mod config;
mod dispatch;
mod emitter;
mod registry;
mod snapshot;
mod subscribe;
mod tick;

pub use builder::EmitterBuilder;
pub use config::{default_max_listeners, set_default_max_listeners, Config};
pub use emitter::{Emitter, WeakEmitter};
pub use snapshot::Snapshot;
pub use tick::Tick;

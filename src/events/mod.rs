//! Event keys and emission arguments.
//!
//! This module groups the **data model** of one emission: which type it is
//! addressed to and what it carries.
//!
//! ## Contents
//! - [`EventType`], [`WILDCARD`] registry keys and namespace decomposition
//! - [`Args`], [`Arg`] type-erased positional arguments
//! - reserved names: [`ERROR`] and the meta-events [`ON`], [`OFF`],
//!   [`MAX_LISTENERS`], [`DESTROY`]
//!
//! ## Meta-event payloads
//! ```text
//! ":on"           (EventType, Listener)   before a listener is added
//! ":off"          (EventType, Listener)   after a listener is removed
//! ":maxListeners" (EventType, Listener)   first time a type exceeds the threshold
//! ":destroy"      ()                      before the instance becomes inert
//! "error"         (ListenerError)         per listener failure
//! ```

mod args;
mod event_type;

pub use args::{Arg, Args};
pub use event_type::{EventType, Levels, DESTROY, ERROR, MAX_LISTENERS, OFF, ON, WILDCARD};

//! # Listener abstractions.
//!
//! This module provides the listener-related types:
//! - [`Listener`] - shared, identity-carrying callback handle
//! - [`IntoInvocation`] - what a listener closure may return
//! - [`Lifetime`] - how long a registration stays active (persistent, `n` times, until `true`)

mod lifetime;
mod listener;

pub use lifetime::Lifetime;
pub use listener::{IntoInvocation, Invocation, Listener, ListenerId};

//! # Mixin: putting the emitter API onto other types.
//!
//! Two flavours:
//! - [`Evented`]: static. Implement `emitter()` and the common operations
//!   come for free as trait methods.
//! - [`Mixin`]: dynamic. A [`Selection`] picks operations from the fixed
//!   [`Operation`] table (optionally under new names) and [`Mixin::call`]
//!   invokes them with positional [`Args`](crate::Args).

mod evented;
mod mixin;
mod operation;

pub use evented::Evented;
pub use mixin::{Mixin, Reply, Selection};
pub use operation::Operation;

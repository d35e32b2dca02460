//! # Emission arguments.
//!
//! [`Args`] is the positional argument list handed to every listener of one
//! emission. Values are type-erased (`Arc<dyn Any + Send + Sync>`), so a
//! single emitter can carry heterogeneous payloads; listeners read them back
//! with [`Args::get`].
//!
//! Cloning an [`Args`] only bumps reference counts.
//!
//! ## Example
//! ```rust
//! use nsemitter::args;
//!
//! let a = args!(1_i32, "two", 3.0_f64);
//! assert_eq!(a.len(), 3);
//! assert_eq!(a.get::<i32>(0), Some(&1));
//! assert_eq!(a.get::<&str>(1), Some(&"two"));
//! assert_eq!(a.get::<i32>(2), None); // wrong type
//! ```

use std::any::Any;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::error::{EmitterError, ListenerError};

/// One type-erased argument.
pub type Arg = Arc<dyn Any + Send + Sync>;

/// Positional arguments of one emission.
#[derive(Clone, Default)]
pub struct Args {
    values: Vec<Arg>,
}

impl Args {
    /// Creates an empty argument list.
    #[must_use]
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Appends a value (builder style).
    #[must_use]
    pub fn with<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.push(value);
        self
    }

    /// Appends a value.
    pub fn push<T: Any + Send + Sync>(&mut self, value: T) {
        self.values.push(Arc::new(value));
    }

    /// Appends an already type-erased value.
    pub fn push_arg(&mut self, value: Arg) {
        self.values.push(value);
    }

    /// Returns argument `index` if it exists and has type `T`.
    pub fn get<T: Any>(&self, index: usize) -> Option<&T> {
        self.values.get(index)?.downcast_ref::<T>()
    }

    /// Returns the type-erased argument at `index`.
    pub fn arg(&self, index: usize) -> Option<&Arg> {
        self.values.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arg> {
        self.values.iter()
    }

    /// The first argument, when it is an error value.
    ///
    /// Recognized: [`ListenerError`], [`EmitterError`] and
    /// `Arc<dyn Error + Send + Sync>`. Other types, including `Box<dyn Error>`
    /// which cannot be shared, are not treated as errors.
    pub(crate) fn leading_error(&self) -> Option<ListenerError> {
        let first = self.values.first()?;
        if let Some(err) = first.downcast_ref::<ListenerError>() {
            return Some(err.clone());
        }
        if let Some(err) = first.downcast_ref::<EmitterError>() {
            return Some(err.clone().into());
        }
        first
            .downcast_ref::<Arc<dyn Error + Send + Sync>>()
            .map(|err| ListenerError::from(Arc::clone(err)))
    }
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Args").field("len", &self.values.len()).finish()
    }
}

impl FromIterator<Arg> for Args {
    fn from_iter<I: IntoIterator<Item = Arg>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Arg>> for Args {
    fn from(values: Vec<Arg>) -> Self {
        Self { values }
    }
}

/// Builds an [`Args`] list from heterogeneous values.
///
/// `args!()` is an empty list; `args!(a, b, c)` stores each value in order.
#[macro_export]
macro_rules! args {
    () => {
        $crate::Args::new()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Args::new()$(.with($value))+
    };
}

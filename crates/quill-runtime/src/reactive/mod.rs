#![forbid(unsafe_code)]

//! Reactive cells for binding editor state to a UI.
//!
//! Everything here is single-threaded (`Rc`-based) and notifies
//! synchronously. See [`observable`] for the semantics.

pub mod observable;

pub use observable::{Observable, ReadSignal, Subscription};

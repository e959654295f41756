//! Opaque handle registry for long-lived native objects.
//!
//! Callers on the other side of a call boundary hold plain 64-bit handles and
//! never own the objects behind them. The [`HandleRegistry`] owns every
//! object, hands out never-reused handle values, and resolves them back to
//! shared references that stay valid for as long as the caller uses them,
//! even if the handle is released concurrently.

mod error;
mod handle;
mod registry;

pub use error::RegistryError;
pub use handle::{Handle, RawHandle};
pub use registry::{AnyObject, HandleRegistry};

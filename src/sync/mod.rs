//! Sync module.
//!
//! This module contains the header cache synchronizer: the refresh
//! policy deciding whether a run proceeds, the patch computation
//! reconciling a cached snapshot against a live one, and the builder
//! orchestrating the whole run for one folder.

pub mod error;
pub mod refresh;
pub mod sync;

pub use self::error::*;
pub use self::refresh::*;
pub use self::sync::*;

//! # Task abstractions and specifications.
//!
//! This module provides the registration-side types:
//! - [`Work`] - trait for the unit of work run at each occurrence
//! - [`WorkFn`] - function-based work implementation
//! - [`WorkRef`] - shared reference to work (`Arc<dyn Work>`)
//! - [`TaskSpec`] - specification bundling name, rule and work

mod spec;
mod work;

pub use spec::TaskSpec;
pub use work::{Work, WorkFn, WorkRef};

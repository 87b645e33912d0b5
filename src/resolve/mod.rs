//! Object name resolution for skytools.
//!
//! Turns names like "M31" or "Vega" into coordinates via the CDS Sesame
//! service, a local cache, and a small built-in catalog for offline use.

pub mod cache;
pub mod providers;
pub mod resolver;
pub mod types;

pub use providers::{builtin_object_list, ObjectInfo};
pub use resolver::TargetResolver;
pub use types::{ResolveError, ResolvedTarget, TargetSource};

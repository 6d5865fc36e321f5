//! Visitors plugged into the walkers
//!
//! - [`member`]: the per-node purification pipeline run by the member walker
//! - [`parent`]: the visitor run on every merged level of the ancestor walk

pub mod member;
pub mod parent;

pub use member::{purify_pipeline, PURIFY};
pub use parent::apply_to;

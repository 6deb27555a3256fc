//! Validator eligibility filtering and identity resolution.
//!
//! Decoded storage entries are first shaped into typed tables ([`shape`]),
//! then the [`Pipeline`] filters validators against the [`Criteria`],
//! resolves their display names and addresses, and orders them by commission.
//!
//! Nothing in this crate performs I/O.

pub mod eligibility;
pub mod identity;
pub mod shape;

mod pipeline;
pub use pipeline::{EnrichedValidator, Pipeline, PipelineError, Selection, SelectionStats, Tables};

pub use eligibility::is_eligible;
pub use identity::{resolve_display_name, IdentityResolver};
pub use shape::{ShapeError, StorageTable};

pub use stakepick_core_types::Criteria;

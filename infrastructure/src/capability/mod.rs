//! Execution capability adapters

mod dry_run;

pub use dry_run::{DryRunCapability, DryRunSubmission};

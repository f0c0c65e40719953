//! Application configuration
//!
//! Policies the use cases run under. These are application-layer concerns,
//! built from the file configuration by the infrastructure layer.

pub mod execution_options;
pub mod retry_policy;

pub use execution_options::ExecutionOptions;
pub use retry_policy::RetryPolicy;

//! Policy configuration loading.
//!
//! The policy controls the retry ceiling, which labels count as retries,
//! which accounts are the CI operator, and which authors the runner handles.
//! It is read from an optional TOML file and validated once at startup.

mod error;
mod file;
mod policy;

pub use error::ConfigError;
pub use file::{
    PolicyFile, DEFAULT_MAX_RETRIES, DEFAULT_OPERATOR_LABEL, DEFAULT_RETRY_LABEL,
    DEFAULT_RETRY_MARKER,
};
pub use policy::Policy;

use std::path::Path;
use tracing::info;

/// Loads the policy from an optional file, applying a retry-ceiling override.
///
/// With no file, defaults are used. The override wins over the file.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read or the resulting
/// policy is invalid.
pub fn load_policy(
    path: Option<&Path>,
    max_retries_override: Option<u32>,
) -> Result<Policy, ConfigError> {
    let (mut file, origin) = match path {
        Some(path) => (PolicyFile::load(path)?, path.display().to_string()),
        None => (PolicyFile::default(), "default policy".to_string()),
    };

    if let Some(max_retries) = max_retries_override {
        file.max_retries = Some(max_retries);
    }

    let policy = file.into_policy(&origin)?;
    info!(
        origin = %origin,
        max_retries = policy.max_retries(),
        retry_label = %policy.retry_label(),
        operator = %policy.operator().label(),
        "Loaded policy"
    );
    Ok(policy)
}

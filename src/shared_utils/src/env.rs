use std::{fmt::Display, str::FromStr};

use thiserror::Error;

/// Errors raised while reading configuration from the process environment.
#[derive(Debug, Error)]
pub enum EnvVarError {
    /// The variable is set but its value could not be parsed.
    #[error("Invalid value for environment variable {name}: {message}")]
    Invalid { name: String, message: String },
}

/// Reads an optional environment variable.
///
/// Unset, non-unicode and blank values are all treated as absent.
pub fn get_env_var_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Reads and parses an optional environment variable.
///
/// Returns `Ok(None)` when the variable is absent and an
/// [`EnvVarError::Invalid`] when it is present but does not parse as `T`.
pub fn parse_env_var<T>(name: &str) -> Result<Option<T>, EnvVarError>
where
    T: FromStr,
    T::Err: Display,
{
    match get_env_var_opt(name) {
        None => Ok(None),
        Some(raw) => raw.parse::<T>().map(Some).map_err(|e| EnvVarError::Invalid {
            name: name.to_string(),
            message: format!("{raw:?}: {e}"),
        }),
    }
}

//! Environment variable expansion for configuration strings.
//!
//! Only the braced `${VAR}` form is recognized, with `${VAR:-default}`
//! supplying a fallback for unset variables. Bare `$VAR` is left alone.

use crate::ConfigError;

/// Error carried out of the variable lookup when `VAR` is unset.
struct Unset {
    name: String,
}

/// Expand `${VAR}` references in `value`.
///
/// `field` names the configuration field for error messages. The input is
/// returned unchanged when it contains no `${` sequence.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    // Fast path: nothing to expand
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |name| -> Result<Option<String>, Unset> {
        match std::env::var(name) {
            Ok(val) => Ok(Some(val)),
            Err(_) => Err(Unset {
                name: name.to_owned(),
            }),
        }
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} is not set", e.cause.name),
    })
}

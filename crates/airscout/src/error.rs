//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use airscout_config::ConfigError;
use airscout_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    /// `iw` ran but the scan reported a non-zero status.
    pub const SCAN_FAILED: i32 = 10;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Scanning ─────────────────────────────────────────────────────
    #[error("Scan failed with status {code}: {message}")]
    #[diagnostic(
        code(airscout::scan_failed),
        help(
            "Status 156 means the interface is down, 240 that it stayed busy,\n\
             and 255 that the scan needs root (or CAP_NET_ADMIN)."
        )
    )]
    ScanFailed { code: i32, message: String },

    #[error("Could not run `{program}`: {reason}")]
    #[diagnostic(
        code(airscout::tool_missing),
        help(
            "Install the wireless tools package or point the config at the binary:\n\
             [scan] iw_path / iwconfig_path, or AIRSCOUT_SCAN__IW_PATH"
        )
    )]
    ToolUnavailable { program: String, reason: String },

    #[error("No wireless interface selected")]
    #[diagnostic(
        code(airscout::no_interface),
        help(
            "Pass --interface (-i), or set `interface` in the active profile.\n\
             Run: airscout interfaces"
        )
    )]
    NoInterface,

    // ── Input ────────────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(airscout::validation))]
    Validation { field: String, reason: String },

    #[error("Could not read {path}")]
    #[diagnostic(code(airscout::read_failed))]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scan document: {0}")]
    #[diagnostic(
        code(airscout::json),
        help("Expected the output of `airscout scan -o json`.")
    )]
    Json(#[from] serde_json::Error),

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(airscout::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: airscout config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(airscout::config))]
    Config(Box<ConfigError>),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ScanFailed { .. } => exit_code::SCAN_FAILED,
            Self::ToolUnavailable { .. } | Self::ReadFailed { .. } => exit_code::NOT_FOUND,
            Self::NoInterface | Self::Validation { .. } | Self::ProfileNotFound { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Spawn { program, reason } => Self::ToolUnavailable { program, reason },
            CoreError::InvalidInput { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::Json(e) => Self::Json(e),
            CoreError::Io(e) => Self::Io(e),
        }
    }
}

/// Comma separated profile names for help text, or "(none)".
fn list_profiles(names: &[String]) -> String {
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::UnknownProfile { profile, available } => Self::ProfileNotFound {
                name: profile,
                available: list_profiles(&available),
            },
            other => Self::Config(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_failures_have_their_own_exit_code() {
        let err = CliError::ScanFailed {
            code: 255,
            message: "denied".into(),
        };
        assert_eq!(err.exit_code(), exit_code::SCAN_FAILED);
    }

    #[test]
    fn spawn_errors_map_to_tool_unavailable() {
        let err: CliError = CoreError::Spawn {
            program: "iw".into(),
            reason: "No such file or directory (os error 2)".into(),
        }
        .into();
        assert!(matches!(err, CliError::ToolUnavailable { .. }));
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
    }

    #[test]
    fn config_validation_is_a_usage_error() {
        let err: CliError = ConfigError::Validation {
            field: "scan.max_attempts".into(),
            reason: "must be at least 1".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn unknown_profile_lists_the_defined_ones() {
        let err: CliError = ConfigError::UnknownProfile {
            profile: "attic".into(),
            available: vec!["lab".into(), "roof".into()],
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert!(matches!(
            &err,
            CliError::ProfileNotFound { name, available } if name == "attic" && available == "lab, roof"
        ));

        let err: CliError = ConfigError::UnknownProfile {
            profile: "attic".into(),
            available: Vec::new(),
        }
        .into();
        assert!(matches!(
            &err,
            CliError::ProfileNotFound { available, .. } if available == "(none)"
        ));
    }
}

//! CLI error types for structured error handling.
//!
//! Errors map to specific exit codes so scripts can tell a missing session
//! apart from a wrong key.

use std::fmt;

use notecrypt_core::NotecryptError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (session, input file)
    NotFound { message: String, hint: String },

    /// Envelope could not be authenticated with the active key
    AuthFailed {
        message: String,
        hint: Option<String>,
    },

    /// Invalid user input
    InvalidInput(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => {
                write!(f, "{}\n{}", message, hint)
            }
            CliError::AuthFailed { message, hint } => {
                if let Some(h) = hint {
                    write!(f, "{}\n{}", message, h)
                } else {
                    write!(f, "{}", message)
                }
            }
            CliError::InvalidInput(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an AuthFailed error with message and hint.
    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// The error every command reports when no session key is loaded.
    pub fn no_session() -> Self {
        CliError::not_found(
            "No active session",
            "Hint: Run `notecrypt login --account <name>` first.",
        )
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
        }
    }
}

/// Exit code for an error raised by the crypto core.
fn core_exit_code(err: &NotecryptError) -> i32 {
    match err {
        NotecryptError::NoActiveKey => exit_codes::NOT_FOUND,
        NotecryptError::Decryption(_) => exit_codes::AUTH_FAILED,
        NotecryptError::UnsupportedFormat { .. } => exit_codes::UNSUPPORTED_FORMAT,
        NotecryptError::KeyDerivation(_)
        | NotecryptError::PayloadTooLarge { .. }
        | NotecryptError::UnsupportedMedia(_)
        | NotecryptError::Json { .. } => exit_codes::INVALID_INPUT,
        NotecryptError::Encryption(_) | NotecryptError::SessionStore(_) => exit_codes::GENERAL,
    }
}

/// Resolve the exit code for any error surfaced from a command.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(cli) = err.downcast_ref::<CliError>() {
        return cli.exit_code();
    }
    if let Some(core) = err.downcast_ref::<NotecryptError>() {
        return core_exit_code(core);
    }
    exit_codes::GENERAL
}

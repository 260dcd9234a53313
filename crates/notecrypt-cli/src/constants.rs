//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells, and clap usage errors)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// General failure not covered by a more specific code.
    pub const GENERAL: i32 = 1;

    /// Resource not found (no active session, missing input file).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Decryption failed (wrong key or corrupted envelope).
    pub const AUTH_FAILED: i32 = 5;

    /// Envelope carries a format version this build does not understand.
    pub const UNSUPPORTED_FORMAT: i32 = 6;
}

/// Environment variable holding the account password for non-interactive use.
pub const PASSWORD_ENV: &str = "NOTECRYPT_PASSWORD";

pub mod attach;
pub mod notes;
pub mod session;

use notecrypt_core::NotecryptError;

use crate::errors::CliError;

/// Attach a recovery hint to authentication failures from `open`.
pub(crate) fn open_error(err: NotecryptError) -> anyhow::Error {
    if err.is_decryption_failure() {
        CliError::auth_failed_with_hint(
            err.to_string(),
            "Hint: Log in with the account and password the envelope was sealed under.",
        )
        .into()
    } else {
        err.into()
    }
}

use std::io::{self, IsTerminal, Read};
use std::path::Path;

use dialoguer::Password;
use zeroize::Zeroizing;

use crate::constants::PASSWORD_ENV;
use crate::errors::CliError;

/// Prompt for the account password, or read it from `NOTECRYPT_PASSWORD`.
pub fn prompt_password(interactive: bool) -> anyhow::Result<Zeroizing<String>> {
    if let Ok(value) = std::env::var(PASSWORD_ENV) {
        if !value.trim().is_empty() {
            return Ok(Zeroizing::new(value));
        }
    }
    if !interactive || !io::stdin().is_terminal() {
        return Err(CliError::invalid_input(format!(
            "No password provided and no TTY available. Set {}.",
            PASSWORD_ENV
        ))
        .into());
    }
    Password::new()
        .with_prompt("Password")
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Use the argument if given, otherwise read all of stdin.
///
/// A single trailing newline from stdin is dropped so `echo text | notecrypt seal`
/// seals `text`.
pub fn read_input(arg: Option<String>, what: &str) -> anyhow::Result<String> {
    if let Some(value) = arg {
        return Ok(value);
    }
    if io::stdin().is_terminal() {
        return Err(CliError::invalid_input(format!(
            "No {} provided; pass it as an argument or pipe it via stdin",
            what
        ))
        .into());
    }
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
    Ok(strip_trailing_newline(buffer))
}

fn strip_trailing_newline(mut value: String) -> String {
    if value.ends_with('\n') {
        value.pop();
        if value.ends_with('\r') {
            value.pop();
        }
    }
    value
}

/// Guess a MIME type from a file extension for the media kinds attachments accept.
pub fn infer_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        _ => return None,
    };
    Some(mime)
}

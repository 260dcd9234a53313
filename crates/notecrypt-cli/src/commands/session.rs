use serde_json::json;

use notecrypt_core::crypto::AccountSecret;
use notecrypt_core::{KeyManager, KeyState};

use crate::app::AppContext;
use crate::cli::{LoginArgs, StatusArgs};
use crate::helpers::prompt_password;
use crate::session::FileSessionStore;
use crate::ui::{badge, kv, Badge, Spinner};

pub fn handle_login(ctx: &AppContext, args: &LoginArgs) -> anyhow::Result<()> {
    let mut manager = ctx.manager();
    let password = prompt_password(!args.no_input)?;

    let secret = match AccountSecret::new(password.as_str(), args.account.as_str()) {
        Ok(secret) => secret,
        Err(err) => return Err(abandon_login(&mut manager, err.into())),
    };
    drop(password);

    let spinner = Spinner::start(&ctx.ui, "Deriving key");
    let worker = std::thread::spawn(move || secret.derive_key());
    let derived = worker
        .join()
        .map_err(|_| anyhow::anyhow!("Key derivation thread panicked"));
    spinner.finish();

    let key = match derived {
        Ok(Ok(key)) => key,
        Ok(Err(err)) => return Err(abandon_login(&mut manager, err.into())),
        Err(err) => return Err(abandon_login(&mut manager, err)),
    };
    manager.install(args.account.as_str(), key)?;

    if !ctx.ui.quiet {
        println!(
            "{}",
            badge(&ctx.ui, Badge::Ok, &format!("Logged in as {}", args.account))
        );
    }
    Ok(())
}

/// Drop any stored session after a failed login and hand back `err`.
fn abandon_login(manager: &mut KeyManager<FileSessionStore>, err: anyhow::Error) -> anyhow::Error {
    if let Err(clear_err) = manager.clear() {
        tracing::warn!(error = %clear_err, "failed to clear session after login error");
    }
    err
}

pub fn handle_logout(ctx: &AppContext) -> anyhow::Result<()> {
    let mut manager = ctx.manager();
    let had_session = manager.restore_from_session()?;
    manager.clear()?;

    if !ctx.ui.quiet {
        let message = if had_session {
            "Logged out; session key discarded"
        } else {
            "No active session"
        };
        println!("{}", badge(&ctx.ui, Badge::Ok, message));
    }
    Ok(())
}

pub fn handle_status(ctx: &AppContext, args: &StatusArgs) -> anyhow::Result<()> {
    let mut manager = ctx.manager();
    manager.restore_from_session()?;

    let state = manager.state();
    let stored_at = manager.store().stored_at();
    let expires_at = manager.store().expires_at();

    if args.json {
        let state_name = match state {
            KeyState::NoKey => "no_key",
            KeyState::KeyReady => "key_ready",
        };
        let value = json!({
            "state": state_name,
            "account": manager.account_identifier(),
            "session_path": manager.store().path().display().to_string(),
            "stored_at": stored_at.map(|t| t.to_rfc3339()),
            "ttl_seconds": manager.store().ttl().map(|ttl| ttl.num_seconds()),
            "expires_at": expires_at.map(|t| t.to_rfc3339()),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match (state, manager.account_identifier()) {
        (KeyState::KeyReady, Some(account)) => {
            println!("{}", badge(&ctx.ui, Badge::Ok, "Session key ready"));
            println!("{}", kv(&ctx.ui, "Account", account));
            if let Some(at) = expires_at {
                println!("{}", kv(&ctx.ui, "Expires", &at.to_rfc3339()));
            }
        }
        _ => {
            println!("{}", badge(&ctx.ui, Badge::Warn, "No active session"));
        }
    }
    Ok(())
}

//! Notecrypt CLI - client-side note encryption for zero-knowledge storage
//!
//! Thin command-line front end over `notecrypt-core`: derives the account key
//! at login, keeps it in a session file, and seals or opens notes and
//! attachments with it.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod session;
mod ui;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::app::AppContext;
use crate::cli::{AttachCommands, Cli, Commands};
use crate::commands::{attach, notes, session as session_cmd};
use crate::errors::exit_code_for;
use crate::ui::{print_error, UiContext};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let ui = UiContext::from_env(cli.quiet);

    if let Err(e) = run(&cli, ui) {
        let error_msg = format!("{}", e);
        let (message, hint) = split_hint(&error_msg);
        print_error(&ui, message, hint);
        std::process::exit(exit_code_for(&e));
    }
}

/// Log to stderr; `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

/// Split a trailing "Hint:" line off an error message.
fn split_hint(error: &str) -> (&str, Option<&str>) {
    match error.find("\nHint:") {
        Some(idx) => (&error[..idx], Some(&error[idx + 1..])),
        None => (error, None),
    }
}

fn run(cli: &Cli, ui: UiContext) -> anyhow::Result<()> {
    if let Commands::Completions(args) = &cli.command {
        let mut cmd = Cli::command();
        generate(args.shell, &mut cmd, "notecrypt", &mut std::io::stdout());
        return Ok(());
    }

    let ctx = AppContext::new(cli, ui)?;
    match &cli.command {
        Commands::Login(args) => session_cmd::handle_login(&ctx, args),
        Commands::Logout => session_cmd::handle_logout(&ctx),
        Commands::Status(args) => session_cmd::handle_status(&ctx, args),
        Commands::Seal(args) => notes::handle_seal(&ctx, args),
        Commands::Open(args) => notes::handle_open(&ctx, args),
        Commands::Attach { command } => match command {
            AttachCommands::Seal(args) => attach::handle_attach_seal(&ctx, args),
            AttachCommands::Open(args) => attach::handle_attach_open(&ctx, args),
        },
        Commands::Completions(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_hint() {
        let (message, hint) = split_hint("No active session\nHint: Run `notecrypt login`.");
        assert_eq!(message, "No active session");
        assert_eq!(hint, Some("Hint: Run `notecrypt login`."));

        assert_eq!(split_hint("plain"), ("plain", None));
    }

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }
}

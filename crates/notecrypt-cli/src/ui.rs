//! Terminal output: status badges and a spinner for key derivation.

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

/// Terminal capabilities resolved once per invocation.
#[derive(Debug, Clone, Copy)]
pub struct UiContext {
    /// Whether color output is enabled
    pub color: bool,
    /// Whether spinners may animate on stderr
    pub animate: bool,
    pub quiet: bool,
}

impl UiContext {
    pub fn from_env(quiet: bool) -> Self {
        let term_is_dumb = std::env::var("TERM").map(|v| v == "dumb").unwrap_or(false);
        let no_color_env = std::env::var("NO_COLOR").is_ok();
        let stdout_tty = std::io::stdout().is_terminal();
        let stderr_tty = std::io::stderr().is_terminal();

        Self {
            color: stdout_tty && !no_color_env && !term_is_dumb,
            animate: stderr_tty && !term_is_dumb && !quiet,
            quiet,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Ok,
    Warn,
    Err,
}

impl Badge {
    pub fn text(&self) -> &'static str {
        match self {
            Self::Ok => "[OK]",
            Self::Warn => "[WARN]",
            Self::Err => "[ERR]",
        }
    }
}

/// Render a badge followed by a message.
pub fn badge(ctx: &UiContext, kind: Badge, message: &str) -> String {
    let text = kind.text();
    let colored = if ctx.color {
        match kind {
            Badge::Ok => text.green().to_string(),
            Badge::Warn => text.yellow().to_string(),
            Badge::Err => text.red().to_string(),
        }
    } else {
        text.to_string()
    };
    format!("{} {}", colored, message)
}

/// Render a `key: value` line with a dimmed key.
pub fn kv(ctx: &UiContext, key: &str, value: &str) -> String {
    let label = format!("{}:", key);
    if ctx.color {
        format!("{} {}", label.dimmed(), value.bold())
    } else {
        format!("{} {}", label, value)
    }
}

/// Print an error and optional hint to stderr.
pub fn print_error(ctx: &UiContext, message: &str, hint: Option<&str>) {
    eprintln!("{}", badge(ctx, Badge::Err, message));
    if let Some(h) = hint {
        if ctx.color {
            eprintln!("{}", h.dimmed());
        } else {
            eprintln!("{}", h);
        }
    }
}

/// Spinner shown on stderr while a slow operation runs.
pub struct Spinner {
    bar: Option<ProgressBar>,
}

impl Spinner {
    pub fn start(ctx: &UiContext, message: &str) -> Self {
        if !ctx.animate {
            return Self { bar: None };
        }
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}...") {
            bar.set_style(style.tick_strings(&["|", "/", "-", "\\", ""]));
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar: Some(bar) }
    }

    pub fn finish(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

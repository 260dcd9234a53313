use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use clap_complete::Shell;

use notecrypt_core::VERSION;

/// Notecrypt - client-side encryption for zero-knowledge note storage
#[derive(Parser)]
#[command(name = "notecrypt")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file
    #[arg(long, global = true, env = "NOTECRYPT_CONFIG")]
    pub config: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments for the `login` command
#[derive(Args)]
pub struct LoginArgs {
    /// Account identifier (username) the key is derived for
    #[arg(long, env = "NOTECRYPT_ACCOUNT")]
    pub account: String,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `status` command
#[derive(Args)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `seal` command
#[derive(Args)]
pub struct SealArgs {
    /// Text to seal (read from stdin when omitted)
    #[arg(long)]
    pub text: Option<String>,
}

/// Arguments for the `open` command
#[derive(Args)]
pub struct OpenArgs {
    /// Envelope to open (read from stdin when omitted)
    #[arg(value_name = "ENVELOPE")]
    pub envelope: Option<String>,
}

/// Arguments for `attach seal`
#[derive(Args)]
pub struct AttachSealArgs {
    /// Image or video file to seal
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// MIME type (inferred from the file extension when omitted)
    #[arg(long)]
    pub mime: Option<String>,

    /// Write the sealed record here instead of stdout
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

/// Arguments for `attach open`
#[derive(Args)]
pub struct AttachOpenArgs {
    /// Sealed attachment record (JSON)
    #[arg(value_name = "RECORD")]
    pub record: PathBuf,

    /// Destination file (defaults to the recorded file name)
    #[arg(long, short)]
    pub out: Option<PathBuf>,

    /// Overwrite the destination if it already exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Subcommand)]
pub enum AttachCommands {
    /// Seal an image or video file
    Seal(AttachSealArgs),

    /// Restore the original file from a sealed record
    Open(AttachOpenArgs),
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Derive the account key and start a session
    Login(LoginArgs),

    /// End the session and discard the key
    Logout,

    /// Show whether a session key is active
    Status(StatusArgs),

    /// Seal text into an envelope
    Seal(SealArgs),

    /// Open an envelope
    Open(OpenArgs),

    /// Seal or open attachments
    Attach {
        #[command(subcommand)]
        command: AttachCommands,
    },

    /// Generate shell completions
    Completions(CompletionsArgs),
}

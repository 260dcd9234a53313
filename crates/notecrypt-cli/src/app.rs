//! Per-invocation context shared by command handlers.

use notecrypt_core::KeyManager;

use crate::cli::Cli;
use crate::config::{load_config, NotecryptConfig};
use crate::errors::CliError;
use crate::session::FileSessionStore;
use crate::ui::UiContext;

pub struct AppContext {
    pub config: NotecryptConfig,
    pub ui: UiContext,
}

impl AppContext {
    pub fn new(cli: &Cli, ui: UiContext) -> anyhow::Result<Self> {
        let config = load_config(cli)?;
        Ok(Self { config, ui })
    }

    /// A manager in `NoKey` bound to the session file.
    pub fn manager(&self) -> KeyManager<FileSessionStore> {
        KeyManager::new(FileSessionStore::from_config(&self.config))
    }

    /// A manager restored from the session file, or a not-found error.
    pub fn active_manager(&self) -> anyhow::Result<KeyManager<FileSessionStore>> {
        let mut manager = self.manager();
        if !manager.restore_from_session()? {
            return Err(CliError::no_session().into());
        }
        Ok(manager)
    }
}

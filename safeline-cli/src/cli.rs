//! CLI definition and argument parsing for safeline-cli.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use safeline::{LogSmsDispatcher, SafelineRuntime};

use crate::console::ConsoleFeedback;

#[derive(Parser, Debug)]
#[command(name = "safeline", author, version, about = "Safeline SOS CLI")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage emergency contacts
    Contacts(crate::commands::contacts::ContactsArgs),

    /// Hold-to-confirm SOS trigger (dry-run dispatch)
    Sos(crate::commands::sos::SosArgs),
}

// ============================================================================
// GLOBAL FLAGS
// ============================================================================

#[derive(Args, Debug, Clone)]
pub struct GlobalFlags {
    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Safeline home directory
    #[arg(long, global = true, env = "SAFELINE_HOME")]
    pub home: Option<PathBuf>,
}

impl GlobalFlags {
    pub fn create_runtime(&self) -> anyhow::Result<SafelineRuntime> {
        let home_dir = self.home.clone().unwrap_or_else(|| {
            let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            path.push(".safeline");
            path
        });

        // Load configuration from file, then construct with console-backed
        // feedback and the dry-run SMS dispatcher.
        let options = crate::config::load_config(&home_dir);

        SafelineRuntime::new(
            options,
            Arc::new(ConsoleFeedback),
            Arc::new(LogSmsDispatcher),
        )
        .map_err(Into::into)
    }
}

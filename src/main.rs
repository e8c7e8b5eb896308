//! palantir-chat CLI - manage the chat room file from the shell.

use clap::{Parser, Subcommand};
use palantir_chat::{cli, config};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Get the version string.
///
/// - Release builds (on a git tag): "0.1.0"
/// - Development builds: "0.1.0-dev (abc1234)"
fn version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("PALANTIR_CHAT_GIT_HASH");
    const IS_RELEASE: &str = env!("PALANTIR_CHAT_IS_RELEASE");

    static VERSION_STRING: std::sync::OnceLock<String> = std::sync::OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" {
            VERSION.to_string()
        } else {
            format!("{VERSION}-dev ({GIT_HASH})")
        }
    })
}

#[derive(Parser)]
#[command(name = "palantir-chat")]
#[command(author, version = version(), about = "Flat-JSON chat room store", long_about = None)]
struct Cli {
    /// Config file (defaults to the user config directory).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the chat file if it does not exist.
    Init,

    /// List chat rooms.
    List,

    /// Create a chat room.
    New {
        /// Chat ID. A random UUID is used when omitted.
        chat_id: Option<String>,

        /// User creating the chat, recorded as a participant.
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Show participants and messages of a chat room.
    Show {
        /// Chat ID.
        chat_id: String,
    },

    /// Append a message to a chat room.
    Send {
        /// Chat ID.
        chat_id: String,

        /// Sender name.
        sender: String,

        /// Message text.
        content: String,
    },

    /// Delete every chat room with this ID.
    Delete {
        /// Chat ID.
        chat_id: String,
    },

    /// Write a backup of all chat rooms.
    Export {
        /// Backup format: json or txt.
        #[arg(short, long, default_value = "json")]
        format: String,

        /// File name inside the backup directory. Defaults to a timestamped name.
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Append chat rooms from a JSON backup.
    Import {
        /// Backup file.
        path: PathBuf,
    },

    /// List backup files, newest first.
    Backups,
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "palantir_chat=debug"
    } else {
        "palantir_chat=warn"
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match config::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("palantir-chat: error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Init => cli::init::run(&config),
        Commands::List => cli::list::run(&config),
        Commands::New { chat_id, user } => {
            cli::new::run(&config, chat_id.as_deref(), user.as_deref())
        }
        Commands::Show { chat_id } => cli::show::run(&config, &chat_id),
        Commands::Send {
            chat_id,
            sender,
            content,
        } => cli::send::run(&config, &chat_id, &sender, &content),
        Commands::Delete { chat_id } => cli::delete::run(&config, &chat_id),
        Commands::Export { format, name } => {
            cli::backup::export(&config, &format, name.as_deref())
        }
        Commands::Import { path } => cli::backup::import(&config, &path),
        Commands::Backups => cli::backup::list(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("palantir-chat: error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub mod init;
pub mod migrate;
pub mod serve;
pub mod user;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mediavault")]
#[command(version)]
#[command(about = "A self-hosted media gallery with role-based folders", long_about = None)]
pub struct Cli {
    #[arg(short, long, default_value = "mediavault.toml", env = "MEDIAVAULT_CONFIG")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a config file and data directories
    Init {
        #[arg(default_value = ".")]
        path: PathBuf,
        #[arg(long)]
        title: Option<String>,
    },
    /// Run the HTTP server
    Serve {
        /// Overrides server.host from the config file
        #[arg(short = 'H', long)]
        host: Option<String>,
        /// Overrides server.port from the config file
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Apply pending database migrations
    Migrate {
        #[command(subcommand)]
        command: Option<MigrateCommand>,
    },
    /// Manage accounts
    User {
        #[command(subcommand)]
        command: UserCommand,
    },
}

#[derive(Subcommand)]
pub enum MigrateCommand {
    /// List migrations and whether they were applied
    Status,
}

#[derive(Subcommand)]
pub enum UserCommand {
    Add {
        #[arg(long)]
        username: String,
        #[arg(long, default_value = "viewer")]
        role: String,
        #[arg(long)]
        password: Option<String>,
    },
    List,
    Remove {
        username: String,
    },
    Passwd {
        username: String,
    },
}

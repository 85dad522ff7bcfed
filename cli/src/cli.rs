use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line client for Mini Tweeter
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the config file (defaults to ~/.config/mini-tweeter/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Base address of the Mini Tweeter API
    #[arg(long, env = "TWEETER_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Directory the session is persisted in
    #[arg(long, global = true)]
    pub storage_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, default_value_t = false, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Create a new account
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Log out and forget the stored session
    Logout,

    /// Show the profile of the logged-in user
    Whoami,

    /// Print the stored access token
    Token,

    /// Update profile fields of the logged-in user
    Profile {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Prompt for a new password
        #[arg(long, default_value_t = false)]
        change_password: bool,
    },
}

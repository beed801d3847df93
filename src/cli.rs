//! CLI argument parsing via clap.

use clap::{Parser, Subcommand};

/// Command-line client for the cheers backend.
#[derive(Debug, Parser)]
#[command(name = "cheers", version)]
pub struct Args {
    /// Path to config file (default: ./cheers.toml or ~/.config/cheers/cheers.toml).
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,

    /// Override API base URL (beats `CHEERS_API_URL` and config files).
    #[arg(long = "base-url", global = true)]
    pub base_url: Option<String>,

    /// Bearer token. Falls back to `CHEERS_TOKEN`.
    #[arg(long = "token", global = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the signed-in user's profile.
    Me,
    /// Fetch the profile, creating it if the backend has none yet.
    Signup {
        username: String,
        #[arg(long = "display-name")]
        display_name: Option<String>,
    },
    /// Search users by username.
    Search { query: String },
    /// Toggle one item on the wish list.
    Wishlist { item_id: String },
    /// Show the rotating QR secret and its countdown.
    Qr {
        /// Stop after this many seconds (runs until Ctrl-C when omitted).
        #[arg(long = "seconds")]
        seconds: Option<u64>,
    },
}

pub use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vfs")]
#[command(about = "Drive an in-memory virtual file system from session scripts")]
pub struct Args {
    /// Path to the vfs config directory (defaults to ~/.vfs)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: crate::Command,
}

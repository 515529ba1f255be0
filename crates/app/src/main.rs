// CLI modules
mod args;
mod logging;
mod op;
mod ops;
mod state;

// Session scripts driving the in-memory file system
mod session;

use args::Args;
use clap::{Parser, Subcommand};
use op::Op;
use ops::{Init, Run, Version};
use state::AppState;

command_enum! {
    (Init, Init),
    (Run, Run),
    (Version, Version),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // A broken config is reported by the command itself; logging just falls back
    let level = AppState::load_config(args.config_path.clone())
        .map(|config| config.level())
        .unwrap_or(tracing::Level::INFO);
    let guard = logging::init_logging(level);

    let ctx = op::OpContext::new(args.config_path);

    match args.command.execute(&ctx).await {
        Ok(output) => {
            println!("{}", output);
            drop(guard);
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            drop(guard);
            std::process::exit(1);
        }
    }
}

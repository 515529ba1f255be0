use clap::Args;

use crate::state::{AppConfig, AppState};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Default log level written to the config (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Name given to the root folder of every new file system
    #[arg(long)]
    pub root_name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] crate::state::StateError),

    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),
}

#[async_trait::async_trait]
impl crate::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        if self.log_level.parse::<tracing::Level>().is_err() {
            return Err(InitError::InvalidLogLevel(self.log_level.clone()));
        }

        let mut config = AppConfig {
            log_level: self.log_level.clone(),
            ..AppConfig::default()
        };
        if let Some(root_name) = &self.root_name {
            config.manager.root_name = root_name.clone();
        }

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        let output = format!(
            "Initialized vfs directory at: {}\n\
             - Config: {}\n\
             - Log level: {}\n\
             - Root folder name: {}",
            state.vfs_dir.display(),
            state.config_path.display(),
            state.config.log_level,
            state.config.manager.root_name,
        );

        Ok(output)
    }
}

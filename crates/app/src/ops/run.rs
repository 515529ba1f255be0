use std::path::{Path, PathBuf};

use clap::Args;
use common::fs::FileSystemManager;

use crate::session::{parse_script, ScriptError, Session, SessionError};
use crate::state::AppState;

#[derive(Args, Debug, Clone)]
pub struct Run {
    /// Session script to execute, one command per line
    pub script: PathBuf,

    /// Print each event as a JSON object instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("failed to read script {path}: {source}")]
    ReadScript {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    State(#[from] crate::state::StateError),

    #[error("parse error at {0}")]
    Parse(#[from] ScriptError),

    #[error("line {line} ({command}) failed: {source}")]
    Step {
        line: usize,
        command: &'static str,
        source: SessionError,
    },

    #[error("failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}

#[async_trait::async_trait]
impl crate::op::Op for Run {
    type Error = RunError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let source = tokio::fs::read_to_string(&self.script)
            .await
            .map_err(|source| RunError::ReadScript {
                path: self.script.clone(),
                source,
            })?;
        let lines = parse_script(&source)?;

        let config = AppState::load_config(ctx.config_path.clone())?;
        let fs = FileSystemManager::new(config.manager);
        let base_dir = self
            .script
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let mut session = Session::new(fs, base_dir);

        tracing::info!(script = %self.script.display(), commands = lines.len(), "running session");

        let mut output = Vec::with_capacity(lines.len());
        for line in &lines {
            let event = session
                .execute(&line.command)
                .await
                .map_err(|source| RunError::Step {
                    line: line.line,
                    command: line.command.keyword(),
                    source,
                })?;
            output.push(if self.json {
                serde_json::to_string(&event)?
            } else {
                event.to_string()
            });
        }

        Ok(output.join("\n"))
    }
}

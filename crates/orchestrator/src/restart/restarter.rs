#![forbid(unsafe_code)]

use crate::error::Error;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

/// What the service manager said about one restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestartOutput {
    pub success: bool,
    /// Exit code, absent when the command was killed by a signal.
    pub code: Option<i32>,
    /// Standard output followed by standard error.
    pub output: String,
}

#[async_trait]
pub trait Restarter: Send + Sync {
    /// Restart one unit and wait for the service manager to finish.
    async fn restart(&self, unit: &str) -> std::io::Result<RestartOutput>;
}

/// Restarts units by running an external command with the unit name as its
/// last argument.
#[derive(Debug, Clone)]
pub struct CommandRestarter {
    program: String,
    args: Vec<String>,
}

impl CommandRestarter {
    pub fn new(config: &config::Restart) -> Result<Self, Error> {
        let (program, args) = config
            .command
            .split_first()
            .ok_or(Error::EmptyRestartCommand)?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

#[async_trait]
impl Restarter for CommandRestarter {
    async fn restart(&self, unit: &str) -> std::io::Result<RestartOutput> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(unit)
            .stdin(Stdio::null())
            .output()
            .await?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(RestartOutput {
            success: output.status.success(),
            code: output.status.code(),
            output: text.trim_end().to_owned(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read procfs: {0}")]
    Procfs(#[from] procfs::ProcError),

    #[error("Invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Restart command is empty")]
    EmptyRestartCommand,
}

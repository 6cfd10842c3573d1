use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{file}:{line}:{column}: syntax error: {message}")]
    Syntax {
        file: String,
        line: usize,
        column: usize,
        message: String,
    },
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("analysis of {file} failed: {message}")]
    Tree { file: String, message: String },
    #[error("extraction was cancelled")]
    Cancelled,
}

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("workspace root {path} is not a directory")]
    InvalidRoot { path: String },
    #[error("workspace glob failed: {0}")]
    Glob(String),
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Run directory '{path}' already exists, refusing to overwrite another run")]
    RunDirectoryExists { path: String },
    #[error("Output directory '{path}' is a file")]
    NotADirectory { path: String },
}

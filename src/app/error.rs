use thiserror::Error;

use crate::error::AssetError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Cli(String),
    #[error(transparent)]
    Load(#[from] AssetError),
}

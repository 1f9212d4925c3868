pub mod customer;

use std::{error::Error, fmt::Debug};

use thiserror::Error;

use self::customer::CustomerError;

pub trait Entity: Debug + Clone {
    type Id: Copy + Eq + Debug;

    const ENTITY_NAME: &'static str;

    fn id(&self) -> Self::Id;
}

type BoxError = Box<dyn Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum DataAccessError {
    #[error("Database connection error: {0}")]
    ConnectionError(BoxError),
    #[error("Database query error: {0}")]
    QueryError(BoxError),
    #[error("Data read error: {0}")]
    ReadError(BoxError),
    #[error("Data write error: {0}")]
    WriteError(BoxError),
    #[error("Validation error: {0}")]
    ValidationError(#[from] CustomerError),
}

impl DataAccessError {
    /// ストアに到達できない場合
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::ConnectionError(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }
}

pub mod memory;
pub mod mongo;

use mongodb::error::ErrorKind;

use crate::domain::DataAccessError;

pub use self::memory::*;
pub use self::mongo::*;

impl From<mongodb::error::Error> for DataAccessError {
    fn from(value: mongodb::error::Error) -> Self {
        match value.kind.as_ref() {
            ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::DnsResolve { .. }
            | ErrorKind::ConnectionPoolCleared { .. }
            | ErrorKind::Authentication { .. } => Self::ConnectionError(Box::new(value)),
            ErrorKind::Write(_) | ErrorKind::BulkWrite(_) => Self::WriteError(Box::new(value)),
            ErrorKind::BsonDeserialization(_) => Self::ReadError(Box::new(value)),
            _ => Self::QueryError(Box::new(value)),
        }
    }
}

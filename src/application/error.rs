use derive_more::{Display, From};

use crate::domain::{DomainError, RepositoryError};

#[derive(Debug, Display, From)]
pub enum ServiceError {
    #[display(fmt = "{}", _0)]
    Validation(DomainError),
    #[display(fmt = "{}", _0)]
    #[from(ignore)]
    BadRequest(String),
    #[display(fmt = "{}", _0)]
    #[from(ignore)]
    NotFound(String),
    #[display(fmt = "{}", _0)]
    #[from(ignore)]
    Conflict(String),
    #[display(fmt = "{}", _0)]
    Repository(RepositoryError),
    #[display(fmt = "{}", _0)]
    #[from(ignore)]
    Internal(String),
}

impl std::error::Error for ServiceError {}

pub type ServiceResult<T> = Result<T, ServiceError>;

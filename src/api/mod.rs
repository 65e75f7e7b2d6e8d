pub mod attendance;
pub mod error;
pub mod health;
pub mod initialize;
pub mod users;

pub use error::ApiError;

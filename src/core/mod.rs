pub mod error;
pub mod pagination;
pub mod sanitize;

pub use error::{AppError, Result};

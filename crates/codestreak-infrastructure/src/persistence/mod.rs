pub mod repositories;

mod database;
mod error_mapper;
mod repository_base;

pub use database::Database;
pub use error_mapper::{RepositoryErrorMapper, ResultExt};
pub use repository_base::SqliteRepositoryBase;

pub mod bootstrap;
pub mod error;
pub mod router;
pub mod routes;
pub mod state;

pub use bootstrap::{assemble_app_state, build_app_state, ExternalAdapters};
pub use error::{ApiError, ApiResult};
pub use router::build_app_router;
pub use state::AppState;

pub mod http_api;

pub use http_api::{create_router, AppState, SiteServices};

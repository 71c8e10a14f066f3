pub mod media_import_service;
pub mod page_presenter;
pub mod page_request_handler;
pub mod seed;
pub mod site;
pub mod suggest_service;

pub use page_request_handler::{PageRequestHandler, PageResponse};
pub use site::BonsaiSite;

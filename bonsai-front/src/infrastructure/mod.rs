//! Infrastructure layer - storage and media adapters.

pub mod media_handlers;
pub mod persistence;

pub use media_handlers::{MediaHandlerRegistry, PhotoMediaHandler};
pub use persistence::SledPageRepository;

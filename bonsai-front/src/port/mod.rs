//! Port layer - Abstract interfaces for infrastructure dependencies
//!
//! This module defines traits that abstract away infrastructure concerns,
//! allowing the application layer to remain independent of specific implementations.

pub mod media_handler;
pub mod page_presenter;
pub mod page_repository;

pub use media_handler::{MediaError, MediaHandler};
pub use page_presenter::{PagePresenter, PresenterError, PresenterOutcome};
pub use page_repository::PageRepository;

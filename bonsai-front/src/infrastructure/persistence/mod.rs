//! Persistence implementations for data storage.
//!
//! This module provides persistent storage implementations using sled.

pub mod sled_page_repository;

pub use sled_page_repository::SledPageRepository;

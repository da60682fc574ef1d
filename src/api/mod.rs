//! REST client for the article backend.

mod client;
mod types;

pub use client::{ApiClient, ApiError};
pub use types::{Article, Category, Headline};

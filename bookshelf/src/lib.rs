//! A validated CRUD service over a single collection of books.
//!
//! Requests flow through three layers:
//!
//! - [`http`] - axum routes and the mapping from outcomes to status codes
//! - [`service`] - the record service: list, get, create, update, delete
//! - [`validate`] - payload validation for creates and partial updates
//!
//! Storage is provided by `bookshelf-core` backends, selected at startup through
//! [`config`] and opened by [`backend`].
//!
//! # Example
//!
//! ```ignore
//! use bookshelf::{backend::open_store, config::Config, http, service::BookService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let service = BookService::new(open_store(&config.store).await?);
//!
//!     let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.server.port)).await?;
//!     axum::serve(listener, http::router(service)).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod book;
pub mod config;
pub mod error;
pub mod http;
pub mod service;
pub mod telemetry;
pub mod validate;

//! Blog service core
//!
//! Domain logic for a server-rendered blogging site: posts grouped into
//! communities, comment threads, a follow graph, and paginated reverse
//! chronological feeds with a short-TTL page cache in front of the home
//! listing. The embedding web stack owns routing, sessions, and template
//! rendering; this crate owns everything between the request handler and
//! Postgres/Redis.

pub mod config;
pub mod domain;
pub mod error;
pub mod pagination;
pub mod repository;
pub mod services;

pub use config::Config;
pub use domain::models::{Comment, Follow, Group, Post, User};
pub use domain::viewer::Viewer;
pub use error::{AppError, Result};

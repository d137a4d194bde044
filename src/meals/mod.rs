mod dto;
mod handlers;
mod repo;
mod repo_types;
pub mod services;

pub use handlers::router;

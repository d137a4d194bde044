pub mod dto;
mod handlers;
mod repo;
mod repo_types;

pub use handlers::router;

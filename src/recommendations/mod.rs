mod handlers;
mod repo;

pub use handlers::router;

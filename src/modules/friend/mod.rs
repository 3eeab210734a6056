pub mod error;
pub mod handle;
pub mod model;
pub mod repository;
#[cfg(test)]
pub mod repository_memory;
pub mod repository_pg;
pub mod route;
pub mod schema;
pub mod service;

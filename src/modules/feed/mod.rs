pub mod handle;
pub mod model;
pub mod projector;
pub mod route;

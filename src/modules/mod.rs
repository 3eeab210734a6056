pub mod feed;
pub mod friend;
pub mod user;

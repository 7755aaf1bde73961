pub mod auth;
pub mod compose;
pub mod error;
pub mod feed;
pub mod pagination;
pub mod repos;
pub mod sequence;

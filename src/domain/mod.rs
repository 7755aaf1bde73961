pub mod entities;
pub mod error;
pub mod identity;
pub mod posts;

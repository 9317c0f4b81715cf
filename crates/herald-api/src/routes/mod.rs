pub mod health;
pub mod articles;
pub mod sessions;
pub mod analytics;

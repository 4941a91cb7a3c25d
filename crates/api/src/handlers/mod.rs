pub mod admin;
pub mod auth;
pub mod events;
pub mod notifications;
pub mod reviews;
pub mod users;

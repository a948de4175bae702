pub mod asset;
pub mod background_theme;
pub mod catalog;
pub mod client;
pub mod content;
pub mod custom_theme;
pub mod guestbook;
pub mod memory;
pub mod rsvp;
pub mod schema;
pub mod sqlx_repo;
pub mod unified_theme;

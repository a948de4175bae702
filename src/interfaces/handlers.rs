pub mod assets;
pub mod background_themes;
pub mod catalog;
pub mod clients;
pub mod content;
pub mod custom_themes;
pub mod guests;
pub mod home;
pub mod invitation;
pub mod json_error;
pub mod system;
pub mod themes;
pub mod unified_themes;

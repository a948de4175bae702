pub mod assets;
pub mod background_themes;
pub mod catalog;
pub mod clients;
pub mod composer;
pub mod content;
pub mod custom_themes;
pub mod extractors;
pub mod guests;
pub mod invitation;
pub mod unified_themes;

pub mod asset;
pub mod background_theme;
pub mod catalog;
pub mod client;
pub mod color_theme;
pub mod composed_theme;
pub mod content;
pub mod guestbook;
pub mod option_fields;
pub mod ornament;
pub mod response;
pub mod rsvp;
pub mod section;
pub mod unified_theme;
pub mod validation;

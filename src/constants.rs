use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Built-in theme every unresolved theme reference falls back to.
pub const ORIGINAL_THEME_ID: &str = "original";

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

pub const FONT_HEADING: &str = "Playfair Display";
pub const FONT_BODY: &str = "Poppins";
pub const FONT_SCRIPT: &str = "Great Vibes";

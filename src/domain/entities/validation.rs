use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

static CSS_COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(#[0-9a-fA-F]{3,8}|(rgb|rgba|hsl|hsla)\([0-9.,%\s/]+\)|[a-zA-Z]{3,20})$")
        .unwrap_or_else(|e| panic!("invalid css color pattern: {e}"))
});

static IDENTIFIER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9_-]*$")
        .unwrap_or_else(|e| panic!("invalid identifier pattern: {e}"))
});

pub fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}

/// Hex, rgb()/rgba(), hsl()/hsla() or a named color.
pub fn validate_css_color(value: &str) -> Result<(), ValidationError> {
    if CSS_COLOR_RE.is_match(value.trim()) {
        Ok(())
    } else {
        Err(new_validation_error("invalid_color", "Must be a valid CSS color"))
    }
}

/// Lowercase ids such as `sage_garden` or `client-42`.
pub fn validate_identifier(value: &str) -> Result<(), ValidationError> {
    if IDENTIFIER_RE.is_match(value) {
        Ok(())
    } else {
        Err(new_validation_error(
            "invalid_identifier",
            "Use lowercase letters, digits, '-' or '_'",
        ))
    }
}

pub fn validate_http_url(value: &str) -> Result<(), ValidationError> {
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(new_validation_error("invalid_url", "Must be an http(s) URL")),
    }
}

/// An http(s) URL or a path served by the frontend, like `/music/song.mp3`.
pub fn validate_url_or_path(value: &str) -> Result<(), ValidationError> {
    if value.starts_with('/') && !value.starts_with("//") {
        return Ok(());
    }
    validate_http_url(value)
        .map_err(|_| new_validation_error("invalid_location", "Must be an http(s) URL or an absolute path"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_css_colors() {
        for color in ["#8B7355", "#fff", "rgba(0, 0, 0, 0.1)", "hsl(30, 20%, 50%)", "white"] {
            assert!(validate_css_color(color).is_ok(), "{color}");
        }
        assert!(validate_css_color("url(javascript:alert(1))").is_err());
    }

    #[test]
    fn identifiers_are_lowercase_slugs() {
        assert!(validate_identifier("sage_garden").is_ok());
        assert!(validate_identifier("Sage Garden").is_err());
        assert!(validate_identifier("-leading").is_err());
    }

    #[test]
    fn url_or_path() {
        assert!(validate_url_or_path("/music/canon.mp3").is_ok());
        assert!(validate_url_or_path("https://cdn.example.com/a.mp3").is_ok());
        assert!(validate_url_or_path("//evil.example.com").is_err());
        assert!(validate_url_or_path("ftp://example.com/a.mp3").is_err());
    }
}

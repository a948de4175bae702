use base64::{engine::general_purpose::STANDARD, Engine};
use derive_more::Display;

pub const MB: usize = 1024 * 1024;

/// Upper bounds for base64 images, checked before anything reaches storage.
pub const MAX_BACKGROUND_IMAGE_BYTES: usize = 15 * MB;
pub const MAX_ORNAMENT_IMAGE_BYTES: usize = 5 * MB;
pub const MAX_CATALOG_IMAGE_BYTES: usize = 5 * MB;
pub const MAX_BANK_LOGO_BYTES: usize = 2 * MB;

#[derive(Debug, Display, PartialEq)]
pub enum ImageDataError {
    #[display("Image data is empty")]
    Empty,

    #[display("Image data is not valid base64")]
    InvalidEncoding,

    #[display("Unsupported image type: {_0}")]
    UnsupportedType(String),

    #[display("Image is too large ({actual} bytes, limit is {limit} bytes)")]
    TooLarge { limit: usize, actual: usize },
}

#[derive(Debug)]
pub struct DecodedImage {
    pub mime_type: String,
    pub size: usize,
}

/// Checks a `data:image/...;base64,` URL (or bare base64) against a byte limit
/// and sniffs the decoded bytes to make sure they are an image.
pub fn inspect_image_data(input: &str, max_bytes: usize) -> Result<DecodedImage, ImageDataError> {
    let payload = strip_data_url_prefix(input.trim());
    if payload.is_empty() {
        return Err(ImageDataError::Empty);
    }

    // Reject on the encoded length first so huge payloads are never decoded.
    let estimated = payload.len() / 4 * 3;
    if estimated > max_bytes + 3 {
        return Err(ImageDataError::TooLarge { limit: max_bytes, actual: estimated });
    }

    let bytes = STANDARD
        .decode(payload)
        .map_err(|_| ImageDataError::InvalidEncoding)?;

    if bytes.len() > max_bytes {
        return Err(ImageDataError::TooLarge { limit: max_bytes, actual: bytes.len() });
    }

    let mime_type = match infer::get(&bytes) {
        Some(kind) if matches!(kind.matcher_type(), infer::MatcherType::Image) => kind.mime_type().to_string(),
        Some(kind) => return Err(ImageDataError::UnsupportedType(kind.mime_type().to_string())),
        None if looks_like_svg(&bytes) => "image/svg+xml".to_string(),
        None => return Err(ImageDataError::UnsupportedType("unknown".to_string())),
    };

    Ok(DecodedImage { mime_type, size: bytes.len() })
}

/// Accepts either an http(s) URL / absolute asset path or image data.
pub fn inspect_image_reference(input: &str, max_bytes: usize) -> Result<(), ImageDataError> {
    let trimmed = input.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") || trimmed.starts_with('/') {
        return Ok(());
    }
    inspect_image_data(trimmed, max_bytes).map(|_| ())
}

fn strip_data_url_prefix(input: &str) -> &str {
    match input.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map(|(_, data)| data).unwrap_or(""),
        None => input,
    }
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(256)]);
    head.contains("<svg")
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 transparent PNG
    const PNG_1X1: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    #[test]
    fn accepts_png_data_url() {
        let input = format!("data:image/png;base64,{}", PNG_1X1);
        let decoded = inspect_image_data(&input, MAX_ORNAMENT_IMAGE_BYTES).unwrap();
        assert_eq!(decoded.mime_type, "image/png");
    }

    #[test]
    fn rejects_images_over_the_limit_before_decoding() {
        let oversized = "A".repeat(MAX_BACKGROUND_IMAGE_BYTES / 3 * 4 + 400);
        let err = inspect_image_data(&oversized, MAX_BACKGROUND_IMAGE_BYTES).unwrap_err();
        assert!(matches!(err, ImageDataError::TooLarge { .. }));
    }

    #[test]
    fn rejects_non_image_payloads() {
        let pdf = STANDARD.encode(b"%PDF-1.4 fake document body");
        let err = inspect_image_data(&pdf, MB).unwrap_err();
        assert_eq!(err, ImageDataError::UnsupportedType("application/pdf".into()));
    }

    #[test]
    fn urls_are_accepted_as_references() {
        assert!(inspect_image_reference("https://cdn.example.com/rose.png", MB).is_ok());
        assert!(inspect_image_reference("/images/themes/rose.png", MB).is_ok());
        assert_eq!(inspect_image_reference("", MB), Err(ImageDataError::Empty));
    }
}

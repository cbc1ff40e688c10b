//! MIME utilities for image payloads

const SUPPORTED_IMAGE_MIME: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Lowercase the essence of a MIME type, drop parameters, and fold `image/jpg` into `image/jpeg`.
#[must_use]
pub fn canonicalize_mime(mime: &str) -> String {
    let main = mime
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    match main.as_str() {
        "image/jpg" => "image/jpeg".to_string(),
        other => other.to_string(),
    }
}

/// Returns whether Discord accepts this MIME type for avatars.
#[must_use]
pub fn is_supported_image_mime(mime: &str) -> bool {
    let canon = canonicalize_mime(mime);
    SUPPORTED_IMAGE_MIME.contains(&canon.as_str())
}

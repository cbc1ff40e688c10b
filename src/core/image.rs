use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::DiscordError;
use crate::utils::mime::{canonicalize_mime, is_supported_image_mime};

/// Image payload in Discord's data URI form: `data:image/png;base64,...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageData(String);

impl ImageData {
    /// # Errors
    ///
    /// Returns an error if the MIME type is not one Discord accepts for avatars.
    pub fn from_bytes(mime: &str, bytes: &[u8]) -> Result<Self, DiscordError> {
        let mime = canonicalize_mime(mime);
        if !is_supported_image_mime(&mime) {
            return Err(DiscordError::ValidationError(format!(
                "unsupported image type: {mime}"
            )));
        }
        if bytes.is_empty() {
            return Err(DiscordError::ValidationError(
                "image data is empty".to_string(),
            ));
        }

        Ok(Self(format!("data:{mime};base64,{}", STANDARD.encode(bytes))))
    }

    /// Read an image from disk, guessing the MIME type from its extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or has an unsupported type.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DiscordError> {
        let path = path.as_ref();
        let mime = mime_guess::from_path(path)
            .first()
            .ok_or_else(|| {
                DiscordError::ValidationError(format!(
                    "cannot determine image type of {}",
                    path.display()
                ))
            })?;
        let bytes = std::fs::read(path).map_err(|e| {
            DiscordError::GeneralError(format!("failed to read {}: {e}", path.display()))
        })?;

        Self::from_bytes(mime.essence_str(), &bytes)
    }

    /// Wrap an existing data URI after checking its shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a base64 image data URI.
    pub fn from_data_uri(uri: impl Into<String>) -> Result<Self, DiscordError> {
        let uri = uri.into();
        let (header, payload) = uri
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(','))
            .ok_or_else(|| DiscordError::ValidationError("not a data URI".to_string()))?;
        let mime = header.strip_suffix(";base64").ok_or_else(|| {
            DiscordError::ValidationError("data URI is not base64 encoded".to_string())
        })?;
        if !is_supported_image_mime(mime) {
            return Err(DiscordError::ValidationError(format!(
                "unsupported image type: {mime}"
            )));
        }
        STANDARD
            .decode(payload)
            .map_err(|e| DiscordError::ValidationError(format!("invalid base64: {e}")))?;

        Ok(Self(uri))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn mime(&self) -> &str {
        self.0
            .strip_prefix("data:")
            .and_then(|rest| rest.split(';').next())
            .unwrap_or("")
    }
}

//! Image ingestion.
//!
//! Validates a user-supplied file and turns it into the base64 payload,
//! MIME type and preview data URL the rest of the pipeline works with.

use std::path::Path;

use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LreError, LreResult};

/// An accepted image, held only for the current analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    /// Base64 payload (no data URL prefix).
    pub data: String,
    pub mime_type: String,
    /// `data:<mime>;base64,<payload>`, used as the preview `src`.
    pub preview_url: String,
}

impl UploadedImage {
    /// Accept raw bytes with their declared MIME type.
    ///
    /// The payload and MIME type are derived back from the generated data URL,
    /// so what goes onward is exactly what the preview shows.
    pub fn from_bytes(bytes: &[u8], mime_type: &str) -> LreResult<Self> {
        let mime_type = mime_type.trim();
        if !is_image_mime(mime_type) {
            return Err(LreError::NotAnImage(mime_type.to_string()));
        }

        let preview_url = to_data_url(bytes, mime_type);
        let image = Self::from_data_url(&preview_url)?;
        debug!(size = bytes.len(), mime_type = %image.mime_type, "Image accepted");
        Ok(image)
    }

    /// Accept an existing data URL.
    pub fn from_data_url(url: &str) -> LreResult<Self> {
        let (mime_type, data) = parse_data_url(url)?;
        if !is_image_mime(mime_type) {
            return Err(LreError::NotAnImage(mime_type.to_string()));
        }
        Ok(Self {
            data: data.to_string(),
            mime_type: mime_type.to_string(),
            preview_url: url.to_string(),
        })
    }

    /// Read an image from disk, deriving its MIME type from the extension.
    pub async fn from_path(path: &Path) -> LreResult<Self> {
        let mime_type = media_type_from_path(path)?;
        let bytes = tokio::fs::read(path).await?;
        Self::from_bytes(&bytes, mime_type)
    }

    /// Decode the payload back into raw bytes.
    pub fn decode(&self) -> LreResult<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.data)
            .map_err(|_| LreError::InvalidDataUrl)
    }
}

/// Whether a MIME type names an image.
pub fn is_image_mime(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

/// Encode bytes as a base64 data URL.
pub fn to_data_url(bytes: &[u8], mime_type: &str) -> String {
    let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", mime_type, b64)
}

/// Split a data URL into `(mime_type, payload)`.
///
/// Accepts the `data:(.+);base64,(.+)` shape only: both parts must be
/// non-empty.
pub fn parse_data_url(url: &str) -> LreResult<(&str, &str)> {
    let rest = url.strip_prefix("data:").ok_or(LreError::InvalidDataUrl)?;
    let (mime_type, payload) = rest
        .split_once(";base64,")
        .ok_or(LreError::InvalidDataUrl)?;

    if mime_type.is_empty() || payload.is_empty() {
        return Err(LreError::InvalidDataUrl);
    }
    Ok((mime_type, payload))
}

/// Detect the media type from a file extension.
pub fn media_type_from_path(path: &Path) -> LreResult<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        "heic" => "image/heic",
        _ => return Err(LreError::UnsupportedExtension(path.display().to_string())),
    };
    Ok(mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    #[test]
    fn test_rejects_non_image_mime() {
        let err = UploadedImage::from_bytes(b"%PDF-1.7", "application/pdf").unwrap_err();
        assert!(matches!(err, LreError::NotAnImage(ref m) if m == "application/pdf"));
        assert!(err.is_invalid_input());

        assert!(UploadedImage::from_bytes(b"hello", "text/plain").is_err());
        assert!(UploadedImage::from_bytes(b"hello", "").is_err());
    }

    #[test]
    fn test_payload_matches_data_url() {
        let image = UploadedImage::from_bytes(PNG_HEADER, "image/png").unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert!(image.preview_url.starts_with("data:image/png;base64,"));

        let (mime, payload) = parse_data_url(&image.preview_url).unwrap();
        assert_eq!(mime, image.mime_type);
        assert_eq!(payload, image.data);
        assert_eq!(image.decode().unwrap(), PNG_HEADER);
    }

    #[test]
    fn test_any_image_subtype_is_accepted() {
        let image = UploadedImage::from_bytes(b"<svg/>", "image/svg+xml").unwrap();
        assert_eq!(image.mime_type, "image/svg+xml");
        assert_eq!(image.decode().unwrap(), b"<svg/>");
    }

    #[test]
    fn test_parse_data_url_rejects_bad_shapes() {
        assert!(parse_data_url("image/png;base64,AAAA").is_err());
        assert!(parse_data_url("data:image/png,AAAA").is_err());
        assert!(parse_data_url("data:;base64,AAAA").is_err());
        assert!(parse_data_url("data:image/png;base64,").is_err());
    }

    #[test]
    fn test_from_data_url_rejects_non_image() {
        let url = to_data_url(b"{}", "application/json");
        assert!(matches!(
            UploadedImage::from_data_url(&url),
            Err(LreError::NotAnImage(_))
        ));
    }

    #[test]
    fn test_media_type_from_path() {
        assert_eq!(media_type_from_path(Path::new("a/sample.PNG")).unwrap(), "image/png");
        assert_eq!(media_type_from_path(Path::new("photo.jpeg")).unwrap(), "image/jpeg");
        assert_eq!(media_type_from_path(Path::new("banner.webp")).unwrap(), "image/webp");
        assert!(media_type_from_path(Path::new("notes.txt")).is_err());
        assert!(media_type_from_path(Path::new("noext")).is_err());
    }

    #[tokio::test]
    async fn test_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.png");
        std::fs::write(&path, PNG_HEADER).unwrap();

        let image = UploadedImage::from_path(&path).await.unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.decode().unwrap(), PNG_HEADER);
    }
}

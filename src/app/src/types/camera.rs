use base64::prelude::*;
use serde::{Deserialize, Serialize};

/// A still frame from the rover camera, embedded as a data URI.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CameraImage {
    pub mime: String,
    pub data_uri: String,
    pub size_bytes: usize,
}

impl CameraImage {
    /// Decode a raw response body into a displayable image.
    ///
    /// The format is sniffed from the leading bytes; bodies that are empty or
    /// not one of the supported image formats are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, String> {
        if bytes.is_empty() {
            return Err("image body is empty".to_string());
        }

        let mime = sniff_mime(bytes).ok_or_else(|| "unsupported image format".to_string())?;

        Ok(Self {
            mime: mime.to_string(),
            data_uri: format!("data:{mime};base64,{}", BASE64_STANDARD.encode(bytes)),
            size_bytes: bytes.len(),
        })
    }

    /// File extension matching the image format.
    pub fn extension(&self) -> &'static str {
        match self.mime.as_str() {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/bmp" => "bmp",
            "image/webp" => "webp",
            _ => "bin",
        }
    }

    /// Recover the original image bytes from the data URI.
    pub fn to_bytes(&self) -> Result<Vec<u8>, String> {
        let (_, encoded) = self
            .data_uri
            .split_once(";base64,")
            .ok_or_else(|| "data uri is not base64 encoded".to_string())?;

        BASE64_STANDARD
            .decode(encoded)
            .map_err(|e| format!("invalid base64 in data uri: {e}"))
    }
}

fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some("image/png"),
        [b'G', b'I', b'F', b'8', ..] => Some("image/gif"),
        [b'B', b'M', s0, s1, s2, s3, ..] if bmp_size_matches([*s0, *s1, *s2, *s3], bytes.len()) => {
            Some("image/bmp")
        }
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        _ => None,
    }
}

// BMP has only a two-byte magic, so the header's file size must match the body
fn bmp_size_matches(size: [u8; 4], len: usize) -> bool {
    usize::try_from(u32::from_le_bytes(size)).is_ok_and(|size| size == len)
}

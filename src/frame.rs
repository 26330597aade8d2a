//! Transport-encoded frame decoding.
//!
//! Browser clients send `canvas.toDataURL('image/jpeg')` strings. Only the
//! container is checked here; pixel decoding belongs to the detector.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(JPEG_MAGIC) {
            Some(ImageFormat::Jpeg)
        } else if bytes.starts_with(PNG_MAGIC) {
            Some(ImageFormat::Png)
        } else {
            None
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("frame is empty")]
    Empty,
    #[error("malformed data url")]
    MalformedDataUrl,
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(String),
    #[error("unsupported image format (expected jpeg or png)")]
    UnsupportedFormat,
    #[error("frame too large: {size} bytes exceeds limit of {limit}")]
    TooLarge { size: usize, limit: usize },
}

/// Longest base64 text a frame of `max_bytes` can encode to (padded).
/// Saturates instead of overflowing for huge limits.
pub fn encoded_len_limit(max_bytes: usize) -> usize {
    max_bytes.div_ceil(3).saturating_mul(4)
}

#[derive(Debug, Clone)]
pub struct Frame {
    bytes: Vec<u8>,
    format: ImageFormat,
}

impl Frame {
    /// Parses `data:<mime>;base64,<payload>` or a bare base64 payload.
    pub fn from_data_url(raw: &str, max_bytes: usize) -> Result<Self, FrameError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(FrameError::Empty);
        }

        let payload = match raw.strip_prefix("data:") {
            Some(rest) => {
                let (header, payload) = rest.split_once(',').ok_or(FrameError::MalformedDataUrl)?;
                if !header.ends_with(";base64") {
                    return Err(FrameError::MalformedDataUrl);
                }
                payload
            }
            None => raw,
        };
        if payload.is_empty() {
            return Err(FrameError::Empty);
        }

        // 解码前按编码长度估算，避免为超大负载分配内存
        let estimated = payload.len() / 4 * 3;
        if estimated > max_bytes.saturating_add(3) {
            return Err(FrameError::TooLarge {
                size: estimated,
                limit: max_bytes,
            });
        }

        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| FrameError::InvalidBase64(e.to_string()))?;
        if bytes.len() > max_bytes {
            return Err(FrameError::TooLarge {
                size: bytes.len(),
                limit: max_bytes,
            });
        }

        let format = ImageFormat::sniff(&bytes).ok_or(FrameError::UnsupportedFormat)?;
        Ok(Self { bytes, format })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

//! `data:` URL encoding and decoding

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tiny_skia::Pixmap;

use crate::CanvasError;

/// Build a base64 `data:` URL
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Decode a base64 `data:image/png` URL into a pixmap
pub fn decode_png_data_url(data_url: &str) -> Result<Pixmap, CanvasError> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| CanvasError::InvalidDataUrl("not a data: URL".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| CanvasError::InvalidDataUrl("missing ','".to_string()))?;

    let mut segments = header.split(';').map(str::trim);
    let mime = segments.next().unwrap_or_default();
    if !mime.eq_ignore_ascii_case("image/png") {
        return Err(CanvasError::InvalidDataUrl(format!("unexpected media type {:?}", mime)));
    }
    if !segments.any(|s| s.eq_ignore_ascii_case("base64")) {
        return Err(CanvasError::InvalidDataUrl("payload is not base64".to_string()));
    }

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| CanvasError::InvalidDataUrl(e.to_string()))?;
    Pixmap::decode_png(&bytes).map_err(|e| CanvasError::Decode(e.to_string()))
}

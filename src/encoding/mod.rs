//! Request encoders for the rendering services
//!
//! - [`direct_base64`]: standard base64 of the UTF-8 text, used as a URL path segment
//! - [`compressed_base64url`]: zlib-deflated text in URL-safe base64 without padding
//! - [`json_chart_body`]: JSON body for POST-based services

use std::io::Write;

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde::Serialize;

use crate::types::RenderKey;

/// Standard base64 (with `+`, `/` and `=` padding), no compression
pub fn direct_base64(key: &RenderKey) -> String {
    STANDARD.encode(key.as_bytes())
}

/// DEFLATE the text, then base64 with `+`→`-`, `/`→`_` and the padding stripped
pub fn compressed_base64url(key: &RenderKey) -> std::io::Result<String> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(key.as_bytes())?;
    let compressed = encoder.finish()?;
    Ok(URL_SAFE_NO_PAD.encode(compressed))
}

/// Payload accepted by the chart service. Field order is the wire order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRequest<'a> {
    pub chart: &'a str,
    pub format: &'a str,
    pub width: u32,
    pub height: u32,
    pub device_pixel_ratio: u32,
}

/// JSON body with the diagram text as the `chart` string.
///
/// serde_json escapes quotes, backslashes and every control character.
pub fn json_chart_body(key: &RenderKey) -> serde_json::Result<String> {
    serde_json::to_string(&ChartRequest {
        chart: key.as_str(),
        format: "png",
        width: 1920,
        height: 1440,
        device_pixel_ratio: 2,
    })
}

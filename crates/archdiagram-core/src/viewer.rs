//! Viewer links for generated diagrams
//!
//! The diagram text is zlib-compressed at level 9 and encoded as padded
//! base64url, then appended to the viewer's base URL. This approximates the
//! mermaid.live `pako:` fragment (which wraps a JSON state object) so links are
//! best effort.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;

pub const DEFAULT_VIEWER_BASE_URL: &str = "https://mermaid.live/edit#pako:";

/// Compress and encode diagram markup for a URL fragment
pub fn encode_diagram(markup: &str) -> std::io::Result<String> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(markup.as_bytes())?;
    let compressed = encoder.finish()?;
    Ok(URL_SAFE.encode(compressed))
}

/// Build the full viewer link for `markup`
pub fn view_url(base_url: &str, markup: &str) -> std::io::Result<String> {
    Ok(format!("{}{}", base_url, encode_diagram(markup)?))
}

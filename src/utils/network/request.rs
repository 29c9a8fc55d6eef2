use std::io::{Error, Read};
use std::time::Instant;

use flate2::read::{GzDecoder, ZlibDecoder};
use log::warn;
use reqwest::header::CONTENT_ENCODING;

use crate::iptv_probe_error::{create_iptv_probe_error_result, str_to_io_error, IptvProbeError, IptvProbeErrorKind};
use crate::utils::debug_if_enabled;
use crate::utils::step_measure::format_duration;

pub const ENCODING_GZIP: &str = "gzip";
pub const ENCODING_DEFLATE: &str = "deflate";

const USER_AGENT: &str = concat!("iptv-probe/", env!("CARGO_PKG_VERSION"));

pub fn create_client() -> Result<reqwest::Client, IptvProbeError> {
    match reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build() {
        Ok(client) => Ok(client),
        Err(err) => create_iptv_probe_error_result!(IptvProbeErrorKind::Notify, "cant create http client: {}", err),
    }
}

pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0] == 0x1F && bytes[1] == 0x8B
}

pub fn is_deflate(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0] == 0x78 && matches!(bytes[1], 0x01 | 0x5E | 0x9C | 0xDA)
}

/// Decodes gzip and zlib bodies, detected by magic bytes or the content encoding header.
/// Undecodable bytes end up as replacement characters.
fn decode_text(bytes: &[u8], encoding: Option<String>) -> String {
    let encoding = if is_gzip(bytes) {
        Some(ENCODING_GZIP.to_string())
    } else if is_deflate(bytes) {
        Some(ENCODING_DEFLATE.to_string())
    } else {
        encoding
    };

    let mut decode_buffer = Vec::new();
    let decoded = match encoding.as_deref() {
        Some(ENCODING_GZIP) => GzDecoder::new(bytes).read_to_end(&mut decode_buffer).map(|_| ENCODING_GZIP),
        Some(ENCODING_DEFLATE) => ZlibDecoder::new(bytes).read_to_end(&mut decode_buffer).map(|_| ENCODING_DEFLATE),
        _ => return String::from_utf8_lossy(bytes).into_owned(),
    };
    match decoded {
        Ok(_) => String::from_utf8_lossy(&decode_buffer).into_owned(),
        Err(err) => {
            warn!("failed to decode {} content, using raw body: {err}", encoding.as_deref().unwrap_or_default());
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

/// Fetches a text resource with the client's default timeout.
/// Only transport failures are errors, the body of a non-success response is returned as well.
pub async fn get_remote_text(client: &reqwest::Client, url: &str) -> Result<String, Error> {
    let start_time = Instant::now();
    let response = client.get(url).send().await
        .map_err(|err| str_to_io_error(&format!("Request failed {url} {err}")))?;
    let status = response.status();
    if !status.is_success() {
        warn!("Request {url} answered with status {status}, using the body anyway");
    }
    let encoding = response.headers().get(CONTENT_ENCODING)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string);
    let bytes = response.bytes().await
        .map_err(|err| str_to_io_error(&format!("failed to read response {url} {err}")))?;
    let text = decode_text(&bytes, encoding);
    debug_if_enabled!("Request took:{} {}", format_duration(start_time.elapsed()), url);
    Ok(text)
}

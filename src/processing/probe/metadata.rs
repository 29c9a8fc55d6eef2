use std::process::Stdio;
use std::time::Duration;

use log::warn;
use serde::Deserialize;
use tokio::process::Command;

use crate::iptv_probe_error::{info_err, IptvProbeError};
use crate::model::probe::StreamMetadata;
use crate::utils::debug_if_enabled;
use crate::utils::step_measure::format_duration;

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    r_frame_rate: Option<String>,
}

/// Parses an ffprobe rational like `25/1` or `30000/1001`.
/// A zero denominator or anything unparsable gives 0.
#[allow(clippy::cast_precision_loss)]
pub fn parse_frame_rate(expr: &str) -> f64 {
    let expr = expr.trim();
    let rate = match expr.split_once('/') {
        Some((num, den)) => match (num.trim().parse::<i64>(), den.trim().parse::<i64>()) {
            (Ok(_), Ok(0)) | (Err(_), _) | (_, Err(_)) => 0.0,
            (Ok(num), Ok(den)) => num as f64 / den as f64,
        },
        None => expr.parse::<f64>().unwrap_or(0.0),
    };
    if rate.is_finite() { rate } else { 0.0 }
}

pub fn parse_ffprobe_output(stdout: &[u8]) -> Result<StreamMetadata, IptvProbeError> {
    let output: FfprobeOutput = serde_json::from_slice(stdout)
        .map_err(|err| info_err!("Failed to parse ffprobe output: {err}"))?;
    let Some(stream) = output.streams.first() else {
        return Err(info_err!("ffprobe reported no stream"));
    };
    Ok(StreamMetadata {
        width: stream.width.unwrap_or(0),
        height: stream.height.unwrap_or(0),
        frame_rate: stream.r_frame_rate.as_deref().map_or(0.0, parse_frame_rate),
    })
}

/// Queries resolution and frame rate of a stream with ffprobe.
#[derive(Debug, Clone)]
pub struct MetadataProber {
    ffprobe: String,
    timeout: Duration,
}

impl MetadataProber {
    pub fn new(ffprobe: &str, timeout: Duration) -> Self {
        Self {
            ffprobe: ffprobe.to_string(),
            timeout,
        }
    }

    async fn run(&self, url: &str) -> Result<StreamMetadata, IptvProbeError> {
        let mut command = Command::new(&self.ffprobe);
        command.args(["-print_format", "json", "-show_format", "-show_streams", "-v", "quiet"])
            .arg(url)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => return Err(info_err!("Failed to run {}: {err}", self.ffprobe)),
            Err(_) => return Err(info_err!("ffprobe timed out after {} for {url}", format_duration(self.timeout))),
        };
        if !output.status.success() {
            return Err(info_err!("ffprobe failed for {url} with {}", output.status));
        }
        parse_ffprobe_output(&output.stdout)
    }

    /// Every failure yields zeroed metadata.
    pub async fn probe(&self, url: &str) -> StreamMetadata {
        match self.run(url).await {
            Ok(metadata) => {
                debug_if_enabled!("ffprobe {} => {}", url, metadata);
                metadata
            }
            Err(err) => {
                warn!("{}", err.message);
                StreamMetadata::default()
            }
        }
    }
}

/// Writes an executable shell script standing in for ffprobe, returns its path.
#[cfg(all(test, unix))]
pub(crate) fn write_fake_ffprobe(dir: &std::path::Path, name: &str, body: &str) -> String {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    // children forked by parallel tests hold the write handle until they exec (ETXTBSY)
    std::thread::sleep(Duration::from_millis(100));
    path.to_string_lossy().to_string()
}

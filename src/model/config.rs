use std::path::PathBuf;
use std::time::Duration;

use path_clean::PathClean;

use crate::iptv_probe_error::{create_iptv_probe_error_result, IptvProbeError, IptvProbeErrorKind};
use crate::model::config_log::LogConfig;
use crate::utils::constants::{DEFAULT_FFPROBE, FFPROBE_PATH_ENV};
use crate::utils::default_utils::{default_as_false, default_genre, default_header_label, default_input_file,
                                  default_marker, default_output_file, default_remote_url, default_timeout_secs,
                                  default_total_budget_secs, default_workers, default_working_dir};

/// Timeouts of a single domain probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeBudget {
    /// Manifest request, covers the whole transfer.
    pub request_timeout: Duration,
    /// A single segment fetch, covers the whole transfer.
    pub segment_timeout: Duration,
    /// Wall time across all segment fetches of one probe.
    pub total_budget: Duration,
}

impl Default for ProbeBudget {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(default_timeout_secs()),
            segment_timeout: Duration::from_secs(default_timeout_secs()),
            total_budget: Duration::from_secs(default_total_budget_secs()),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigProbe {
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub segment_timeout_secs: u64,
    #[serde(default = "default_total_budget_secs")]
    pub total_budget_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub ffprobe_timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ffprobe_path: Option<String>,
}

impl Default for ConfigProbe {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_timeout_secs(),
            segment_timeout_secs: default_timeout_secs(),
            total_budget_secs: default_total_budget_secs(),
            ffprobe_timeout_secs: default_timeout_secs(),
            ffprobe_path: None,
        }
    }
}

impl ConfigProbe {
    fn prepare(&mut self) -> Result<(), IptvProbeError> {
        if self.request_timeout_secs == 0 || self.segment_timeout_secs == 0
            || self.total_budget_secs == 0 || self.ffprobe_timeout_secs == 0 {
            return create_iptv_probe_error_result!(IptvProbeErrorKind::Info, "probe timeouts must be greater than 0");
        }
        let ffprobe = self.ffprobe_path.as_deref().map(str::trim).filter(|p| !p.is_empty())
            .map(ToString::to_string)
            .or_else(|| std::env::var(FFPROBE_PATH_ENV).ok().filter(|p| !p.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_FFPROBE.to_string());
        self.ffprobe_path = Some(ffprobe);
        Ok(())
    }

    pub const fn budget(&self) -> ProbeBudget {
        ProbeBudget {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            segment_timeout: Duration::from_secs(self.segment_timeout_secs),
            total_budget: Duration::from_secs(self.total_budget_secs),
        }
    }

    pub const fn ffprobe_timeout(&self) -> Duration {
        Duration::from_secs(self.ffprobe_timeout_secs)
    }

    pub fn ffprobe(&self) -> &str {
        self.ffprobe_path.as_deref().unwrap_or(DEFAULT_FFPROBE)
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_working_dir")]
    pub working_dir: String,
    #[serde(default = "default_input_file")]
    pub input: String,
    #[serde(default = "default_output_file")]
    pub output: String,
    /// An empty value disables the remote playlist section.
    #[serde(default = "default_remote_url")]
    pub remote_url: String,
    #[serde(default = "default_marker")]
    pub marker: String,
    #[serde(default = "default_as_false")]
    pub exclude_multicast: bool,
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_header_label")]
    pub header_label: String,
    #[serde(default = "default_genre")]
    pub genre: String,
    #[serde(default)]
    pub probe: ConfigProbe,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<LogConfig>,
    #[serde(skip)]
    pub t_input_path: PathBuf,
    #[serde(skip)]
    pub t_output_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            working_dir: default_working_dir(),
            input: default_input_file(),
            output: default_output_file(),
            remote_url: default_remote_url(),
            marker: default_marker(),
            exclude_multicast: false,
            workers: default_workers(),
            header_label: default_header_label(),
            genre: default_genre(),
            probe: ConfigProbe::default(),
            log: None,
            t_input_path: PathBuf::new(),
            t_output_path: PathBuf::new(),
        }
    }
}

fn resolve_path(working_dir: &str, file: &str) -> PathBuf {
    let path = PathBuf::from(file);
    if path.is_relative() {
        PathBuf::from(working_dir).join(path).clean()
    } else {
        path.clean()
    }
}

impl Config {
    pub fn prepare(&mut self) -> Result<(), IptvProbeError> {
        if self.working_dir.trim().is_empty() {
            self.working_dir = default_working_dir();
        }
        if self.input.trim().is_empty() {
            return create_iptv_probe_error_result!(IptvProbeErrorKind::Info, "input file not configured");
        }
        if self.output.trim().is_empty() {
            return create_iptv_probe_error_result!(IptvProbeErrorKind::Info, "output file not configured");
        }
        if self.marker.is_empty() {
            return create_iptv_probe_error_result!(IptvProbeErrorKind::Info, "marker must not be empty");
        }
        if self.workers == 0 {
            return create_iptv_probe_error_result!(IptvProbeErrorKind::Info, "workers must be greater than 0");
        }
        self.remote_url = self.remote_url.trim().to_string();
        self.probe.prepare()?;
        self.t_input_path = resolve_path(&self.working_dir, self.input.trim());
        self.t_output_path = resolve_path(&self.working_dir, self.output.trim());
        Ok(())
    }

    pub fn log_level(&self) -> Option<&str> {
        self.log.as_ref().and_then(|log| log.log_level.as_deref())
    }
}

use std::path::Path;

use log::info;

use crate::iptv_probe_error::{notify_err, IptvProbeError};
use crate::model::probe::ProbeOutcome;
use crate::model::stats::ProbeStats;
use crate::utils::constants::{FIELD_SEPARATOR, REMOTE_HEADER_LINES};
use crate::utils::file::file_utils::write_lines;

/// Turns passing probe outcomes into playlist blocks, in the order the outcomes arrive.
#[derive(Debug)]
pub struct ReportAssembler {
    label: String,
    genre: String,
    lines: Vec<String>,
    stats: ProbeStats,
}

impl ReportAssembler {
    pub fn new(label: &str, genre: &str) -> Self {
        Self {
            label: label.to_string(),
            genre: genre.to_string(),
            lines: Vec::new(),
            stats: ProbeStats::default(),
        }
    }

    pub fn header_line(&self, throughput_kbps: f64) -> String {
        format!("{}{throughput_kbps:.2}{FIELD_SEPARATOR}#{}#", self.label, self.genre)
    }

    pub fn add(&mut self, outcome: ProbeOutcome) {
        let Some(result) = &outcome.result else {
            self.stats.skipped += 1;
            return;
        };
        if !result.passed {
            self.stats.failed += 1;
            return;
        }
        self.stats.passed += 1;
        let header = self.header_line(result.throughput_kbps);
        info!("Domain {} passed, adding {} channels", result.domain, outcome.group.links.len());
        self.lines.push(header);
        self.lines.extend(outcome.group.links.iter().map(ToString::to_string));
    }

    pub fn finish(self) -> (Vec<String>, ProbeStats) {
        let mut stats = self.stats;
        stats.lines = self.lines.len();
        (self.lines, stats)
    }
}

/// The remote playlist prefixed by its two fixed header lines.
pub fn remote_section(text: &str) -> String {
    let mut section = REMOTE_HEADER_LINES.join("\n");
    section.push('\n');
    section.push_str(text);
    section
}

/// Writes the fallback block, the optional remote section and the probe lines,
/// each terminated by a newline.
pub fn write_report(path: &Path, fallback: &str, remote: Option<&str>, lines: &[String]) -> Result<(), IptvProbeError> {
    let sections = std::iter::once(fallback.to_string())
        .chain(remote.map(remote_section))
        .chain(lines.iter().cloned());
    write_lines(path, sections)
        .map_err(|err| notify_err!("Failed to write output file {}: {err}", path.display()))
}

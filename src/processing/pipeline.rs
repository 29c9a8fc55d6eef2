use std::sync::Arc;

use log::{info, warn};

use crate::iptv_probe_error::{notify_err, IptvProbeError};
use crate::model::config::Config;
use crate::model::stats::ProbeStats;
use crate::processing::grouper::{group_by_domain, GroupOptions};
use crate::processing::parser::playlist::parse_playlist;
use crate::processing::probe::{probe_domain, MetadataProber, ProbeContext};
use crate::processing::report::{write_report, ReportAssembler};
use crate::processing::scheduler::{collect_outcomes, spawn_probes};
use crate::utils::constants::FALLBACK_PLAYLIST;
use crate::utils::file::file_utils::read_text_file;
use crate::utils::network::request::get_remote_text;
use crate::utils::step_measure::{format_duration, StepMeasure};

async fn fetch_remote(client: &reqwest::Client, url: &str) -> Result<Option<String>, IptvProbeError> {
    if url.is_empty() {
        info!("No remote playlist configured");
        return Ok(None);
    }
    match get_remote_text(client, url).await {
        Ok(text) => Ok(Some(text)),
        Err(err) => Err(notify_err!("Failed to fetch remote playlist {url}: {err}")),
    }
}

/// Reads the input playlist, probes one candidate per domain and writes the output playlist.
/// `cfg` has to be prepared.
pub async fn run(cfg: &Config, client: reqwest::Client) -> Result<ProbeStats, IptvProbeError> {
    let mut step = StepMeasure::new("Reading input");
    let content = read_text_file(&cfg.t_input_path)
        .map_err(|err| notify_err!("Failed to read input file {}: {err}", cfg.t_input_path.display()))?;

    step.tick("Grouping channels");
    let links = parse_playlist(&content);
    info!("Found {} channels in {}", links.len(), cfg.t_input_path.display());
    let grouped = group_by_domain(links, &GroupOptions {
        marker: &cfg.marker,
        exclude_multicast: cfg.exclude_multicast,
    });
    if grouped.dropped > 0 {
        warn!("Dropped {} channels without a valid url", grouped.dropped);
    }
    info!("Probing {} domains with {} workers, {} domains without {} channel",
          grouped.groups.len(), cfg.workers, grouped.skipped.len(), cfg.marker);

    step.tick("Probing domains");
    let scheduled = grouped.groups.len();
    let ctx = Arc::new(ProbeContext::new(
        client.clone(),
        cfg.probe.budget(),
        MetadataProber::new(cfg.probe.ffprobe(), cfg.probe.ffprobe_timeout()),
    ));
    let rx = spawn_probes(grouped.groups, cfg.workers, move |group| probe_domain(Arc::clone(&ctx), group));
    let mut report = ReportAssembler::new(&cfg.header_label, &cfg.genre);
    for outcome in collect_outcomes(rx).await {
        report.add(outcome);
    }

    step.tick("Fetching remote playlist");
    let remote = fetch_remote(&client, &cfg.remote_url).await?;

    step.tick("Writing output");
    let (lines, mut stats) = report.finish();
    write_report(&cfg.t_output_path, FALLBACK_PLAYLIST, remote.as_deref(), &lines)?;
    let (phases, total) = step.finish();

    stats.groups = scheduled;
    stats.skipped += grouped.skipped.len();
    if stats.missing() > 0 {
        warn!("{} domain probes did not report back", stats.missing());
    }
    info!("Probe stats: {stats}");
    let slowest = phases.iter().max_by_key(|(_, elapsed)| *elapsed);
    if let Some((phase, elapsed)) = slowest {
        info!("Finished in {}, {phase} took {}", format_duration(total), format_duration(*elapsed));
    }
    Ok(stats)
}

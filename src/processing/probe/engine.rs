use std::sync::Arc;

use log::info;
use rand::seq::IndexedRandom;

use crate::model::config::ProbeBudget;
use crate::model::playlist::{ChannelLink, DomainGroup};
use crate::model::probe::{ProbeOutcome, ProbeResult};
use crate::processing::probe::metadata::MetadataProber;
use crate::processing::probe::throughput::measure_throughput;

/// Everything a probe needs, shared by all probe tasks.
#[derive(Debug, Clone)]
pub struct ProbeContext {
    pub client: reqwest::Client,
    pub budget: ProbeBudget,
    pub metadata: MetadataProber,
}

impl ProbeContext {
    pub fn new(client: reqwest::Client, budget: ProbeBudget, metadata: MetadataProber) -> Self {
        Self {
            client,
            budget,
            metadata,
        }
    }
}

pub fn select_candidate(candidates: &[ChannelLink]) -> Option<&ChannelLink> {
    candidates.choose(&mut rand::rng())
}

/// Probes one randomly chosen candidate of the group, download speed and ffprobe run side by side.
/// Never fails: network and ffprobe problems end up as zero measurements.
pub async fn probe_domain(ctx: Arc<ProbeContext>, group: DomainGroup) -> ProbeOutcome {
    let Some(selected) = select_candidate(&group.candidates).cloned() else {
        info!("Domain {} has no candidate channel, skipping", group.domain);
        return ProbeOutcome::skipped(group);
    };

    let (throughput, metadata) = tokio::join!(
        measure_throughput(&ctx.client, &selected.url, &ctx.budget),
        ctx.metadata.probe(&selected.url),
    );
    let result = ProbeResult::new(&group.domain, selected, throughput, metadata);

    if result.passed {
        info!("Channel {} on domain {} downloads with {:.2} KB/s", result.selected.url, result.domain, result.throughput_kbps);
    } else {
        info!("Channel {} on domain {} failed the speed test with {:.2} KB/s", result.selected.url, result.domain, result.throughput_kbps);
    }
    info!("Resolution {}x{}, frame rate {}", result.metadata.width, result.metadata.height, result.metadata.frame_rate);

    ProbeOutcome::probed(group, result)
}

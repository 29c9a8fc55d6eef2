use std::fmt::{Display, Formatter};
use crate::model::playlist::{ChannelLink, DomainGroup};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StreamMetadata {
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
}

impl Display for StreamMetadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{} @ {} fps", self.width, self.height, self.frame_rate)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub domain: String,
    pub selected: ChannelLink,
    /// KB/s, zero when the measurement failed
    pub throughput_kbps: f64,
    pub metadata: StreamMetadata,
    pub passed: bool,
}

impl ProbeResult {
    pub fn new(domain: &str, selected: ChannelLink, throughput_kbps: f64, metadata: StreamMetadata) -> Self {
        Self {
            domain: domain.to_string(),
            selected,
            throughput_kbps,
            metadata,
            passed: throughput_kbps > 0.0,
        }
    }
}

/// One per scheduled group. `result` is `None` when the group was skipped.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub group: DomainGroup,
    pub result: Option<ProbeResult>,
}

impl ProbeOutcome {
    pub const fn skipped(group: DomainGroup) -> Self {
        Self { group, result: None }
    }

    pub const fn probed(group: DomainGroup, result: ProbeResult) -> Self {
        Self { group, result: Some(result) }
    }

    /// A zero-throughput result for a probe that never completed.
    /// Groups without a candidate stay skipped.
    pub fn failed(group: DomainGroup) -> Self {
        match group.candidates.first().cloned() {
            Some(selected) => {
                let result = ProbeResult::new(&group.domain, selected, 0.0, StreamMetadata::default());
                Self::probed(group, result)
            }
            None => Self::skipped(group),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::playlist::{ChannelLink, DomainGroup};
    use crate::model::probe::ProbeOutcome;

    #[test]
    fn test_failed_outcome() {
        let mut group = DomainGroup::new("1.2.3.4");
        let link = ChannelLink::new("CCTV1", "http://1.2.3.4/1.m3u8");
        group.candidates.push(link.clone());
        group.links.push(link.clone());

        let outcome = ProbeOutcome::failed(group);
        let result = outcome.result.unwrap();
        assert!(!result.passed);
        assert_eq!(result.selected, link);
        assert_eq!(result.domain, "1.2.3.4");

        assert!(ProbeOutcome::failed(DomainGroup::new("5.6.7.8")).result.is_none());
    }
}

use std::collections::HashMap;
use log::info;
use crate::model::playlist::{ChannelLink, DomainGroup};
use crate::utils::constants::CONSTANTS;

#[derive(Debug, Clone)]
pub struct GroupOptions<'a> {
    /// Case-sensitive token a channel name must contain to be probed.
    pub marker: &'a str,
    pub exclude_multicast: bool,
}

#[derive(Debug, Default)]
pub struct GroupedLinks {
    /// Groups with at least one candidate, in discovery order.
    pub groups: Vec<DomainGroup>,
    /// Domains without any candidate.
    pub skipped: Vec<DomainGroup>,
    /// Links whose url has no `scheme://host/` part.
    pub dropped: usize,
}

pub fn extract_domain(url: &str) -> Option<&str> {
    CONSTANTS.re_domain.captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|domain| !domain.is_empty())
}

pub fn is_multicast_url(url: &str) -> bool {
    CONSTANTS.re_multicast.is_match(url)
}

fn is_candidate(link: &ChannelLink, options: &GroupOptions) -> bool {
    link.name.contains(options.marker) && !(options.exclude_multicast && is_multicast_url(&link.url))
}

pub fn group_by_domain(links: Vec<ChannelLink>, options: &GroupOptions) -> GroupedLinks {
    let mut grouped = GroupedLinks::default();
    let mut domain_index: HashMap<String, usize> = HashMap::new();
    let mut all_groups: Vec<DomainGroup> = Vec::new();

    for link in links {
        let Some(domain) = extract_domain(&link.url) else {
            info!("Cant extract domain from {}, skipping", link.url);
            grouped.dropped += 1;
            continue;
        };
        let idx = match domain_index.get(domain) {
            Some(idx) => *idx,
            None => {
                domain_index.insert(domain.to_string(), all_groups.len());
                all_groups.push(DomainGroup::new(domain));
                all_groups.len() - 1
            }
        };
        let group = &mut all_groups[idx];
        if is_candidate(&link, options) {
            group.candidates.push(link.clone());
        }
        group.links.push(link);
    }

    for group in all_groups {
        if group.has_candidates() {
            grouped.groups.push(group);
        } else {
            info!("Domain {} has no {} channel, skipping", group.domain, options.marker);
            grouped.skipped.push(group);
        }
    }
    grouped
}

use std::fmt::{Display, Formatter};
use crate::utils::constants::FIELD_SEPARATOR;

// Txt playlist format as used by DIYP/TVBox players:
//   <group label>,#genre#
//   <channel name>,<url>

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelLink {
    pub name: String,
    pub url: String,
}

impl ChannelLink {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            url: url.trim().to_string(),
        }
    }
}

impl Display for ChannelLink {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{FIELD_SEPARATOR}{}", self.name, self.url)
    }
}

/// All links served by one host, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainGroup {
    pub domain: String,
    /// Links eligible for probing, a subsequence of `links`.
    pub candidates: Vec<ChannelLink>,
    pub links: Vec<ChannelLink>,
}

impl DomainGroup {
    pub fn new(domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
            candidates: Vec::new(),
            links: Vec::new(),
        }
    }

    pub fn has_candidates(&self) -> bool {
        !self.candidates.is_empty()
    }
}

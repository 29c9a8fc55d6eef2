use log::trace;
use crate::model::playlist::ChannelLink;
use crate::utils::constants::FIELD_SEPARATOR;

/// Parses `name,url` lines. Lines without a separator (blank lines, bare titles) are skipped,
/// the split happens at the first separator so urls may contain commas.
pub fn parse_playlist(content: &str) -> Vec<ChannelLink> {
    content.lines()
        .filter_map(|line| {
            if line.trim().is_empty() {
                return None;
            }
            match line.split_once(FIELD_SEPARATOR) {
                Some((name, url)) => Some(ChannelLink::new(name, url)),
                None => {
                    trace!("skipping line without separator: {line}");
                    None
                }
            }
        })
        .collect()
}

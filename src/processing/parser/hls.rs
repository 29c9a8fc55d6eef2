use crate::utils::constants::HLS_COMMENT_PREFIX;

/// Media entries of a manifest: every non-empty line that is not a tag or comment.
pub fn segment_entries(content: &str) -> Vec<&str> {
    content.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(HLS_COMMENT_PREFIX))
        .collect()
}

/// Resolves a manifest entry against the manifest url.
///
/// * absolute entries (`http…`) are returned unchanged
/// * `/path` entries are resolved against `scheme://host`, not against a parent directory of
///   the manifest, which breaks for manifests close to the root
/// * anything else is resolved against the manifest's directory
pub fn resolve_segment_url(manifest_url: &str, entry: &str) -> String {
    if entry.starts_with("http") {
        return entry.to_string();
    }
    if entry.starts_with('/') {
        // "scheme:", "", "host", "path..."
        let parts = manifest_url.splitn(4, '/').collect::<Vec<&str>>();
        if parts.len() < 3 {
            return entry.to_string();
        }
        format!("{}/{}/{}{entry}", parts[0], parts[1], parts[2])
    } else {
        let origin_len = manifest_url.find("://").map_or(0, |pos| pos + 3);
        match manifest_url[origin_len..].rfind('/') {
            Some(pos) => format!("{}/{entry}", &manifest_url[..origin_len + pos]),
            None => format!("{manifest_url}/{entry}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::processing::parser::hls::{resolve_segment_url, segment_entries};

    const MANIFEST: &str = "#EXTM3U\n#EXT-X-VERSION:3\n#EXT-X-TARGETDURATION:10\n\
        #EXTINF:10.0,\n1001_1-20240601.ts\n#EXTINF:10.0,\n  /hls/1001_1-20240602.ts  \n\n\
        #EXTINF:10.0,\nhttp://cdn.example.org/1001_1-20240603.ts\n";

    #[test]
    fn test_segment_entries() {
        assert_eq!(segment_entries(MANIFEST), vec![
            "1001_1-20240601.ts",
            "/hls/1001_1-20240602.ts",
            "http://cdn.example.org/1001_1-20240603.ts",
        ]);
        assert!(segment_entries("#EXTM3U\n#EXT-X-ENDLIST\n\n").is_empty());
    }

    #[test]
    fn test_resolve_absolute() {
        let tests = [
            ("http://1.2.3.4:8080/live/index.m3u8", "http://cdn.example.org/a.ts"),
            ("http://1.2.3.4:8080/live/index.m3u8", "https://cdn.example.org/b/c.ts?token=1"),
        ];
        for (manifest, entry) in &tests {
            assert_eq!(resolve_segment_url(manifest, entry), *entry);
        }
    }

    #[test]
    fn test_resolve_same_directory() {
        let tests = [
            ("http://1.2.3.4:8080/tsfile/live/1001_1.m3u8", "1001_1-1.ts", "http://1.2.3.4:8080/tsfile/live/1001_1-1.ts"),
            ("http://1.2.3.4:8080/tsfile/live/1001_1.m3u8", "sub/1001_1-1.ts", "http://1.2.3.4:8080/tsfile/live/sub/1001_1-1.ts"),
            ("http://1.2.3.4/index.m3u8", "seg.ts", "http://1.2.3.4/seg.ts"),
            ("http://1.2.3.4", "seg.ts", "http://1.2.3.4/seg.ts"),
        ];
        for (manifest, entry, expect) in &tests {
            assert_eq!(resolve_segment_url(manifest, entry), *expect);
        }
    }

    #[test]
    fn test_resolve_root_relative() {
        let tests = [
            ("http://1.2.3.4:8080/tsfile/live/1001_1.m3u8", "/hls/seg.ts", "http://1.2.3.4:8080/hls/seg.ts"),
            ("https://host.example.org/a/b/c/index.m3u8", "/seg.ts", "https://host.example.org/seg.ts"),
            ("http://1.2.3.4", "/seg.ts", "http://1.2.3.4/seg.ts"),
        ];
        for (manifest, entry, expect) in &tests {
            assert_eq!(resolve_segment_url(manifest, entry), *expect);
        }
    }
}

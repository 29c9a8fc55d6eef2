use regex::Regex;
use std::sync::LazyLock;

pub const CONFIG_FILE: &str = "config.yml";
pub const DEFAULT_INPUT_FILE: &str = "iptv.txt";
pub const DEFAULT_OUTPUT_FILE: &str = "qgdf.txt";
pub const DEFAULT_REMOTE_URL: &str = "https://raw.githubusercontent.com/mlzlzj/iptv/main/iptv_list.txt";
pub const DEFAULT_MARKER: &str = "CCTV";
pub const DEFAULT_HEADER_LABEL: &str = "秒换台";
pub const DEFAULT_GENRE: &str = "genre";
pub const DEFAULT_FFPROBE: &str = "ffprobe";
pub const FFPROBE_PATH_ENV: &str = "FFPROBE_PATH";

pub const FIELD_SEPARATOR: char = ',';
pub const HLS_COMMENT_PREFIX: char = '#';

pub const REMOTE_HEADER_LINES: [&str; 2] = [
    "以下央视卫视可切换线路,#genre#",
    "双击ok键切换,https://cdn2.yzzy-online.com/20220326/2242_a8d593bc/index.m3u8",
];

pub static FALLBACK_PLAYLIST: &str = include_str!("../../resources/fallback_playlist.txt");

pub struct Constants {
    pub re_domain: Regex,
    pub re_multicast: Regex,
    pub re_env_var: Regex,
}

pub static CONSTANTS: LazyLock<Constants> = LazyLock::new(||
    Constants {
        re_domain: Regex::new(r"https?://([^/]+)/").unwrap(),
        re_multicast: Regex::new(r"(?i)udp|rtp").unwrap(),
        re_env_var: Regex::new(r"\$\{env:(?P<var>[a-zA-Z_][a-zA-Z0-9_]*)}").unwrap(),
    }
);

use std::env;
use std::path::PathBuf;

use log::{debug, warn};

use crate::iptv_probe_error::{create_iptv_probe_error_result, IptvProbeError, IptvProbeErrorKind};
use crate::model::config::Config;
use crate::utils::constants::{CONFIG_FILE, CONSTANTS};
use crate::utils::file::file_utils::{path_exists, read_text_file};

/// Reads the yaml config. A missing default config file falls back to the built-in defaults,
/// a missing explicitly given file is an error. The returned config is not prepared yet.
pub fn read_config(config_file: Option<&str>) -> Result<Config, IptvProbeError> {
    let explicit = config_file.is_some();
    let path = PathBuf::from(config_file.unwrap_or(CONFIG_FILE));
    if !path_exists(&path) {
        if explicit {
            return create_iptv_probe_error_result!(IptvProbeErrorKind::Notify, "cant find config file: {}", path.display());
        }
        debug!("no config file {} found, using defaults", path.display());
        return Ok(Config::default());
    }
    match read_text_file(&path) {
        Ok(content) => parse_config(&content),
        Err(err) => {
            warn!("cant read config file {}", path.display());
            create_iptv_probe_error_result!(IptvProbeErrorKind::Notify, "cant read config file: {}", err)
        }
    }
}

pub fn parse_config(content: &str) -> Result<Config, IptvProbeError> {
    match serde_yaml::from_str::<Config>(&resolve_env_var(content)) {
        Ok(cfg) => Ok(cfg),
        Err(err) => create_iptv_probe_error_result!(IptvProbeErrorKind::Notify, "cant read config file: {}", err),
    }
}

pub fn resolve_env_var(value: &str) -> String {
    CONSTANTS.re_env_var.replace_all(value, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_else(|_| format!("${{env:{var_name}}}"))
    }).to_string()
}

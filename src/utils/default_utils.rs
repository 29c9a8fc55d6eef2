use crate::utils::constants::{DEFAULT_GENRE, DEFAULT_HEADER_LABEL, DEFAULT_INPUT_FILE, DEFAULT_MARKER, DEFAULT_OUTPUT_FILE, DEFAULT_REMOTE_URL};

pub(crate) fn default_as_false() -> bool { false }

pub(crate) fn default_working_dir() -> String { String::from(".") }

pub(crate) fn default_input_file() -> String { String::from(DEFAULT_INPUT_FILE) }

pub(crate) fn default_output_file() -> String { String::from(DEFAULT_OUTPUT_FILE) }

pub(crate) fn default_remote_url() -> String { String::from(DEFAULT_REMOTE_URL) }

pub(crate) fn default_marker() -> String { String::from(DEFAULT_MARKER) }

pub(crate) fn default_header_label() -> String { String::from(DEFAULT_HEADER_LABEL) }

pub(crate) fn default_genre() -> String { String::from(DEFAULT_GENRE) }

pub(crate) fn default_workers() -> usize { 10 }

pub(crate) fn default_timeout_secs() -> u64 { 15 }

pub(crate) fn default_total_budget_secs() -> u64 { 30 }

use std::error::Error;
use std::fmt::{Display, Formatter, Result};

#[macro_export]
macro_rules! info_err {
    ($($arg:tt)*) => {
        $crate::iptv_probe_error::IptvProbeError::new($crate::iptv_probe_error::IptvProbeErrorKind::Info, format!($($arg)*))
    }
}

#[macro_export]
macro_rules! notify_err {
    ($($arg:tt)*) => {
        $crate::iptv_probe_error::IptvProbeError::new($crate::iptv_probe_error::IptvProbeErrorKind::Notify, format!($($arg)*))
    }
}

#[macro_export]
macro_rules! create_iptv_probe_error_result {
     ($kind: expr, $($arg:tt)*) => {
        Err($crate::iptv_probe_error::IptvProbeError::new($kind, format!($($arg)*)))
    }
}

pub use info_err;
pub use notify_err;
pub use create_iptv_probe_error_result;

/// `Info` errors are reported and the run goes on, `Notify` errors end the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IptvProbeErrorKind {
    Info,
    Notify,
}

#[derive(Debug)]
pub struct IptvProbeError {
    pub kind: IptvProbeErrorKind,
    pub message: String,
}

impl IptvProbeError {
    pub const fn new(kind: IptvProbeErrorKind, message: String) -> Self {
        Self {
            kind,
            message,
        }
    }

    pub const fn is_fatal(&self) -> bool {
        matches!(self.kind, IptvProbeErrorKind::Notify)
    }
}

impl Display for IptvProbeError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "IptvProbe error: {}", self.message)
    }
}

impl Error for IptvProbeError {}

pub fn str_to_io_error(err: &str) -> std::io::Error {
    std::io::Error::other(err)
}

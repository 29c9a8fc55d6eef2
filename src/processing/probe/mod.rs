pub mod engine;
pub mod metadata;
pub mod throughput;

pub use self::engine::{probe_domain, ProbeContext};
pub use self::metadata::MetadataProber;

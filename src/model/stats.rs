use std::fmt::Display;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeStats {
    /// groups handed to the scheduler
    pub groups: usize,
    /// groups without candidates, never probed
    pub skipped: usize,
    pub passed: usize,
    pub failed: usize,
    /// lines written for passing groups, headers included
    pub lines: usize,
}

impl ProbeStats {
    /// Scheduled groups that never reported back.
    pub const fn missing(&self) -> usize {
        self.groups.saturating_sub(self.passed + self.failed)
    }
}

impl Display for ProbeStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format_args!("{{\"groups\": {}, \"skipped\": {}, \"passed\": {}, \"failed\": {}, \"lines\": {}}}",
                                     self.groups, self.skipped, self.passed, self.failed, self.lines))
    }
}

use std::time::{Duration, Instant};

use crate::utils::debug_if_enabled;

/// `250ms`, `2.005s`, `1m01.042s`
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();
    match secs {
        0 => format!("{millis}ms"),
        1..=59 => format!("{secs}.{millis:03}s"),
        _ => format!("{}m{:02}.{millis:03}s", secs / 60, secs % 60),
    }
}

/// Records the phases of a run. Every finished phase is logged at debug level,
/// `finish` hands back all of them together with the total run time.
pub struct StepMeasure {
    phase: String,
    phase_start: Instant,
    run_start: Instant,
    phases: Vec<(String, Duration)>,
}

impl StepMeasure {
    pub fn new(phase: &str) -> Self {
        let now = Instant::now();
        Self {
            phase: phase.to_string(),
            phase_start: now,
            run_start: now,
            phases: Vec::new(),
        }
    }

    /// Closes the running phase and starts `phase`.
    pub fn tick(&mut self, phase: &str) {
        self.close_phase();
        self.phase = phase.to_string();
        self.phase_start = Instant::now();
    }

    fn close_phase(&mut self) {
        if self.phase.is_empty() {
            return;
        }
        let elapsed = self.phase_start.elapsed();
        debug_if_enabled!("{} took {}", self.phase, format_duration(elapsed));
        self.phases.push((std::mem::take(&mut self.phase), elapsed));
    }

    pub fn finish(mut self) -> (Vec<(String, Duration)>, Duration) {
        self.close_phase();
        (std::mem::take(&mut self.phases), self.run_start.elapsed())
    }
}

impl Drop for StepMeasure {
    fn drop(&mut self) {
        self.close_phase();
    }
}

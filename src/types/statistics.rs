//! Loader statistics
//!
//! Counters collected while turning raw dataset files into typed records.
//! Malformed input is skipped, never fatal, so these counters are the only
//! place the skipped lines remain visible.

use std::time::{Duration, Instant};

/// Common timing information for all statistics
#[derive(Debug, Clone)]
pub struct TimingInfo {
    pub start_time: Instant,
    pub processing_duration: Duration,
}

impl Default for TimingInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingInfo {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            processing_duration: Duration::default(),
        }
    }

    pub fn finish(&mut self) {
        self.processing_duration = self.start_time.elapsed();
    }

    pub fn elapsed(&self) -> Duration {
        if self.processing_duration.is_zero() {
            self.start_time.elapsed()
        } else {
            self.processing_duration
        }
    }
}

/// Dataset load statistics
#[derive(Debug, Clone, Default)]
pub struct LoadStats {
    /// Raw records seen (lines for TSV, array elements for JSON)
    pub total_records: usize,
    /// Records kept after parsing and filtering
    pub records_loaded: usize,
    /// Records dropped because they could not be parsed or were inconsistent
    pub malformed_records: usize,
    /// Records dropped by the date window
    pub outside_window: usize,
    pub timing: TimingInfo,
}

impl LoadStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error_rate(&self) -> f64 {
        crate::utils::math::safe_percentage(self.malformed_records, self.total_records)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} records, {} loaded, {} malformed ({:.1}%), {} outside window, {:.2}s",
            self.total_records,
            self.records_loaded,
            self.malformed_records,
            self.error_rate(),
            self.outside_window,
            self.timing.elapsed().as_secs_f64()
        )
    }
}

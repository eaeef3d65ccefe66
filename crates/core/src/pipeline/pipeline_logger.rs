use std::collections::HashMap;
use std::time::Instant;

/// Observer for the live capture loop.
///
/// Keeps the session free of any particular output mechanism: the CLI
/// aggregates and prints a summary, the GUI discards everything.
pub trait PipelineLogger {
    /// Called once per tick; `captured` is false when the camera had no frame.
    fn tick(&mut self, captured: bool);

    /// Record how long a named stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. faces in the current frame).
    fn metric(&mut self, name: &str, value: f64);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn tick(&mut self, _captured: bool) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
}

/// Aggregates per-stage timings and metrics, logs a status line every
/// `throttle_ticks` ticks and a summary when the loop ends.
pub struct LogPipelineLogger {
    throttle_ticks: usize,
    timings: HashMap<String, Vec<f64>>,
    metrics: HashMap<String, Vec<f64>>,
    start_time: Instant,
    ticks: usize,
    skipped: usize,
}

impl LogPipelineLogger {
    pub fn new(throttle_ticks: usize) -> Self {
        Self {
            throttle_ticks: throttle_ticks.max(1),
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            ticks: 0,
            skipped: 0,
        }
    }

    /// Returns the formatted summary, or `None` before the first tick.
    pub fn summary_string(&self) -> Option<String> {
        if self.ticks == 0 {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let captured = self.ticks - self.skipped;
        let mut lines = vec![format!(
            "Live summary ({} ticks, {captured} frames, {} skipped, {:.1}s):",
            self.ticks,
            self.skipped,
            elapsed_ms / 1000.0
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            lines.push(format!(
                "  {stage:10}: avg {:6.1}ms  max {:6.1}ms",
                average(durations),
                durations.iter().cloned().fold(0.0, f64::max),
            ));
        }

        let mut names: Vec<_> = self.metrics.keys().collect();
        names.sort();
        for name in names {
            lines.push(format!("  {name}: avg {:.1}", average(&self.metrics[name])));
        }

        if captured > 0 && elapsed_ms > 0.0 {
            let fps = captured as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {fps:.1} fps"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn metrics_for(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(|v| v.as_slice())
    }
}

impl Default for LogPipelineLogger {
    fn default() -> Self {
        Self::new(300)
    }
}

impl PipelineLogger for LogPipelineLogger {
    fn tick(&mut self, captured: bool) {
        self.ticks += 1;
        if !captured {
            self.skipped += 1;
        }
        if self.ticks % self.throttle_ticks == 0 {
            log::info!("Live: {} ticks, {} skipped", self.ticks, self.skipped);
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics
            .entry(name.to_string())
            .or_default()
            .push(value);
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullPipelineLogger;
        logger.tick(true);
        logger.timing("detect", 5.0);
        logger.metric("faces", 3.0);
        logger.summary();
    }

    #[test]
    fn test_timing_records_values() {
        let mut logger = LogPipelineLogger::new(10);
        logger.timing("detect", 20.0);
        logger.timing("detect", 30.0);
        logger.timing("capture", 5.0);

        assert_eq!(logger.timings_for("detect").unwrap(), &[20.0, 30.0]);
        assert_eq!(logger.timings_for("capture").unwrap(), &[5.0]);
        assert!(logger.timings_for("annotate").is_none());
    }

    #[test]
    fn test_metric_average_in_summary() {
        let mut logger = LogPipelineLogger::new(10);
        logger.tick(true);
        logger.metric("faces", 1.0);
        logger.metric("faces", 2.0);

        assert_relative_eq!(average(logger.metrics_for("faces").unwrap()), 1.5);
        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("faces: avg 1.5"));
    }

    #[test]
    fn test_summary_counts_skipped_ticks() {
        let mut logger = LogPipelineLogger::new(10);
        logger.tick(true);
        logger.tick(false);
        logger.tick(true);
        logger.timing("detect", 10.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("3 ticks, 2 frames, 1 skipped"));
        assert!(summary.contains("detect"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        assert!(LogPipelineLogger::new(10).summary_string().is_none());
    }

    #[test]
    fn test_zero_throttle_is_clamped() {
        let mut logger = LogPipelineLogger::new(0);
        logger.tick(true);
        assert_eq!(logger.throttle_ticks, 1);
    }
}

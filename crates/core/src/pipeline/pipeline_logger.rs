use std::collections::HashMap;
use std::time::Instant;

/// Cross-cutting observer for pipeline runs.
///
/// Keeps the orchestration code free of any particular output mechanism:
/// the CLI logs through the `log` facade, tests usually pass the null
/// implementation.
pub trait PipelineLogger: Send {
    /// Frame-level progress.
    fn progress(&mut self, current: usize, total: usize);

    /// Wall time one pipeline stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// A point-in-time metric (face count, mask coverage, blend weight).
    fn metric(&mut self, name: &str, value: f64);

    /// Human-readable status line.
    fn info(&mut self, message: &str);

    /// End-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards every event. For tests and embedders with their own reporting.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Logger for CLI runs: throttled progress plus an end-of-run summary of
/// per-stage timings and averaged metrics.
pub struct StdoutPipelineLogger {
    throttle_frames: usize,
    timings: HashMap<String, Vec<f64>>,
    metrics: HashMap<String, Vec<f64>>,
    started: Instant,
    total_frames: usize,
}

impl StdoutPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: HashMap::new(),
            metrics: HashMap::new(),
            started: Instant::now(),
            total_frames: 0,
        }
    }

    /// The formatted summary, or `None` when nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_s = self.started.elapsed().as_secs_f64();
        let mut lines = vec![format!(
            "Retouch summary ({} frames, {elapsed_s:.1}s):",
            self.total_frames
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = total_ms / durations.len().max(1) as f64;
            lines.push(format!(
                "  {stage:12}: avg {avg_ms:6.1}ms  total {total_ms:7.0}ms"
            ));
        }

        let mut names: Vec<_> = self.metrics.keys().collect();
        names.sort();
        for name in names {
            let values = &self.metrics[name];
            let avg = values.iter().sum::<f64>() / values.len().max(1) as f64;
            lines.push(format!("  {name}: avg {avg:.3}"));
        }

        if self.total_frames > 0 && elapsed_s > 0.0 {
            lines.push(format!(
                "  Throughput: {:.1} fps",
                self.total_frames as f64 / elapsed_s
            ));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(Vec::as_slice)
    }

    pub fn metrics_for(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(Vec::as_slice)
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        // Once a second at a typical 30 fps.
        Self::new(30)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.total_frames = total;
        if total > 0 && (current % self.throttle_frames == 0 || current == total) {
            let pct = current as f64 / total as f64 * 100.0;
            log::info!("Retouching: {current}/{total} frames ({pct:.1}%)");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics.entry(name.to_string()).or_default().push(value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_logger_is_noop() {
        let mut logger = NullPipelineLogger;
        logger.progress(1, 10);
        logger.timing("retouch", 5.0);
        logger.metric("faces", 1.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_timing_accumulates_per_stage() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.timing("retouch", 20.0);
        logger.timing("retouch", 30.0);
        logger.timing("write", 5.0);

        assert_eq!(logger.timings_for("retouch").unwrap().len(), 2);
        assert_eq!(logger.timings_for("write").unwrap().len(), 1);
        assert!(logger.timings_for("decode").is_none());
    }

    #[test]
    fn test_metric_accumulates() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.metric("faces", 1.0);
        logger.metric("faces", 3.0);
        let values = logger.metrics_for("faces").unwrap();
        assert_eq!(values, &[1.0, 3.0]);
    }

    #[test]
    fn test_summary_lists_stages_and_metrics() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.progress(5, 5);
        logger.timing("retouch", 12.0);
        logger.metric("mask_coverage", 0.25);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("retouch"));
        assert!(summary.contains("mask_coverage"));
        assert!(summary.contains("5 frames"));
        assert!(summary.contains("fps"));
    }

    #[test]
    fn test_empty_summary_is_none() {
        assert!(StdoutPipelineLogger::new(10).summary_string().is_none());
    }

    #[test]
    fn test_throttle_floor_is_one() {
        let logger = StdoutPipelineLogger::new(0);
        assert_eq!(logger.throttle_frames, 1);
    }
}

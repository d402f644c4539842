use std::collections::HashMap;
use std::time::Instant;

use crate::recognition::domain::recognition_outcome::RecognitionOutcome;

/// Observer for recognition-loop events.
pub trait CycleLogger {
    /// Record how long a named stage took in one cycle.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// A cycle reached a decision.
    fn outcome(&mut self, cycle: usize, outcome: &RecognitionOutcome, score: Option<f32>);

    /// A cycle was abandoned at `stage`.
    fn abandoned(&mut self, cycle: usize, stage: &str, reason: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

pub struct NullCycleLogger;

impl CycleLogger for NullCycleLogger {
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn outcome(&mut self, _cycle: usize, _outcome: &RecognitionOutcome, _score: Option<f32>) {}
    fn abandoned(&mut self, _cycle: usize, _stage: &str, _reason: &str) {}
}

/// Logs each decision and keeps per-stage timings and outcome counts for
/// a summary when the loop stops.
pub struct StatsCycleLogger {
    timings: HashMap<String, Vec<f64>>,
    identified: HashMap<String, usize>,
    unknown: usize,
    abandoned: HashMap<String, usize>,
    start_time: Instant,
}

impl StatsCycleLogger {
    pub fn new() -> Self {
        Self {
            timings: HashMap::new(),
            identified: HashMap::new(),
            unknown: 0,
            abandoned: HashMap::new(),
            start_time: Instant::now(),
        }
    }

    fn cycles(&self) -> usize {
        self.identified.values().sum::<usize>()
            + self.unknown
            + self.abandoned.values().sum::<usize>()
    }

    /// Returns the formatted summary string, or `None` if no cycle ran.
    pub fn summary_string(&self) -> Option<String> {
        let cycles = self.cycles();
        if cycles == 0 {
            return None;
        }

        let elapsed_s = self.start_time.elapsed().as_secs_f64();
        let mut lines = vec![format!(
            "Recognition summary ({cycles} cycles, {elapsed_s:.1}s total):"
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let avg_ms = durations.iter().sum::<f64>() / durations.len() as f64;
            let max_ms = durations.iter().cloned().fold(0.0, f64::max);
            lines.push(format!("  {stage:10}: avg {avg_ms:7.1}ms  max {max_ms:7.1}ms"));
        }

        let mut people: Vec<_> = self.identified.iter().collect();
        people.sort();
        for (name, count) in people {
            lines.push(format!("  identified {name}: {count}"));
        }
        lines.push(format!("  unknown: {}", self.unknown));

        let mut stages: Vec<_> = self.abandoned.iter().collect();
        stages.sort();
        for (stage, count) in stages {
            lines.push(format!("  abandoned at {stage}: {count}"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn identified_count(&self, name: &str) -> usize {
        self.identified.get(name).copied().unwrap_or(0)
    }

    pub fn unknown_count(&self) -> usize {
        self.unknown
    }

    pub fn abandoned_count(&self, stage: &str) -> usize {
        self.abandoned.get(stage).copied().unwrap_or(0)
    }
}

impl Default for StatsCycleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleLogger for StatsCycleLogger {
    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn outcome(&mut self, cycle: usize, outcome: &RecognitionOutcome, score: Option<f32>) {
        let score = score.map_or_else(|| "n/a".to_string(), |s| format!("{s:.3}"));
        match outcome {
            RecognitionOutcome::Identified(name) => {
                *self.identified.entry(name.clone()).or_default() += 1;
                log::info!("Cycle {cycle}: identified {name} (score {score})");
            }
            RecognitionOutcome::Unknown => {
                self.unknown += 1;
                log::info!("Cycle {cycle}: nobody recognized (top score {score})");
            }
        }
    }

    fn abandoned(&mut self, cycle: usize, stage: &str, reason: &str) {
        *self.abandoned.entry(stage.to_string()).or_default() += 1;
        log::warn!("Cycle {cycle} abandoned at {stage}: {reason}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

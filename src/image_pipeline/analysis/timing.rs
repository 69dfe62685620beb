use std::fmt;
use std::time::{Duration, Instant};

use tracing::{info, info_span, Span};

/// The stages of one analysis call, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Decode,
    Preprocess,
    Segment,
    Refine,
    Metrics,
    Render,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Decode,
        Stage::Preprocess,
        Stage::Segment,
        Stage::Refine,
        Stage::Metrics,
        Stage::Render,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Decode => "decode",
            Stage::Preprocess => "preprocess",
            Stage::Segment => "segment",
            Stage::Refine => "refine",
            Stage::Metrics => "metrics",
            Stage::Render => "render",
        }
    }

    // span names must be literals
    fn span(self) -> Span {
        match self {
            Stage::Decode => info_span!("decode"),
            Stage::Preprocess => info_span!("preprocess"),
            Stage::Segment => info_span!("segment"),
            Stage::Refine => info_span!("refine"),
            Stage::Metrics => info_span!("metrics"),
            Stage::Render => info_span!("render"),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wall-clock time spent in each stage of one call.
#[derive(Debug, Default)]
pub struct PipelineTimings {
    stages: Vec<(Stage, Duration)>,
}

impl PipelineTimings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` inside the stage's span and records how long it took.
    pub fn measure<T>(&mut self, stage: Stage, f: impl FnOnce() -> T) -> T {
        let _span = stage.span().entered();
        let start = Instant::now();
        let output = f();
        self.record(stage, start.elapsed());
        output
    }

    pub fn record(&mut self, stage: Stage, duration: Duration) {
        self.stages.push((stage, duration));
    }

    /// Time spent in `stage`, or `None` if the call never reached it.
    pub fn get(&self, stage: Stage) -> Option<Duration> {
        self.stages
            .iter()
            .filter(|(s, _)| *s == stage)
            .map(|(_, d)| *d)
            .reduce(|a, b| a + b)
    }

    pub fn stages(&self) -> &[(Stage, Duration)] {
        &self.stages
    }

    pub fn total(&self) -> Duration {
        self.stages.iter().map(|(_, d)| *d).sum()
    }

    pub fn log_summary(&self) {
        let total = self.total().as_secs_f64();
        for (stage, duration) in &self.stages {
            let share_pct = if total > 0.0 {
                duration.as_secs_f64() / total * 100.0
            } else {
                0.0
            };
            info!(
                %stage,
                ms = duration.as_secs_f64() * 1000.0,
                share_pct,
                "Stage timing"
            );
        }
        info!(ms = total * 1000.0, "Analysis total");
    }
}

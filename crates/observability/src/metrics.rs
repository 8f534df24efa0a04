//! Inclination series metrics
//!
//! Summaries over extracted readings, published to the metrics recorder and
//! printed by the CLI.

use contracts::InclinationReading;
use metrics::{counter, gauge, histogram};

/// Publish the readings of one decode cycle
pub fn record_readings(readings: &[InclinationReading]) {
    for reading in readings {
        histogram!("rxp_roll_degrees").record(reading.roll);
        histogram!("rxp_pitch_degrees").record(reading.pitch);
    }
    if let Some(last) = readings.last() {
        gauge!("rxp_decode_clock_seconds").set(last.time);
    }
}

/// Record a completed extraction
pub fn record_extraction(source: &str, readings: usize, elapsed_ms: f64) {
    counter!("rxp_extractions_total", "source" => source.to_string()).increment(1);
    histogram!("rxp_extraction_duration_ms").record(elapsed_ms);
    gauge!("rxp_last_extraction_readings").set(readings as f64);
}

/// Series aggregator
///
/// Folds readings in stream order into running statistics.
#[derive(Debug, Clone, Default)]
pub struct SeriesAggregator {
    /// Readings seen
    pub total: u64,
    /// Readings whose time is below the previous one
    pub time_regressions: u64,
    /// Roll statistics (degrees)
    pub roll: RunningStats,
    /// Pitch statistics (degrees)
    pub pitch: RunningStats,
    /// Spacing between consecutive readings (seconds)
    pub interval: RunningStats,
    first_time: Option<f64>,
    last_time: Option<f64>,
}

impl SeriesAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one reading
    pub fn update(&mut self, reading: &InclinationReading) {
        self.total += 1;
        self.roll.push(reading.roll);
        self.pitch.push(reading.pitch);

        if let Some(previous) = self.last_time {
            if reading.time < previous {
                self.time_regressions += 1;
            } else {
                self.interval.push(reading.time - previous);
            }
        }
        self.first_time.get_or_insert(reading.time);
        self.last_time = Some(reading.time);
    }

    /// Fold a batch
    pub fn extend<'a>(&mut self, readings: impl IntoIterator<Item = &'a InclinationReading>) {
        for reading in readings {
            self.update(reading);
        }
    }

    /// Seconds between the first and last reading
    pub fn time_span(&self) -> f64 {
        match (self.first_time, self.last_time) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    /// Snapshot
    pub fn summary(&self) -> SeriesSummary {
        SeriesSummary {
            total: self.total,
            time_regressions: self.time_regressions,
            first_time: self.first_time,
            last_time: self.last_time,
            time_span: self.time_span(),
            roll: StatsSummary::from(&self.roll),
            pitch: StatsSummary::from(&self.pitch),
            interval: StatsSummary::from(&self.interval),
        }
    }
}

/// Series summary
#[derive(Debug, Clone, Default)]
pub struct SeriesSummary {
    pub total: u64,
    pub time_regressions: u64,
    pub first_time: Option<f64>,
    pub last_time: Option<f64>,
    pub time_span: f64,
    pub roll: StatsSummary,
    pub pitch: StatsSummary,
    pub interval: StatsSummary,
}

impl std::fmt::Display for SeriesSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Inclination Series ===")?;
        writeln!(f, "Readings: {}", self.total)?;
        match (self.first_time, self.last_time) {
            (Some(first), Some(last)) => writeln!(
                f,
                "Time: {first:.4} .. {last:.4} s (span {:.4} s)",
                self.time_span
            )?,
            _ => writeln!(f, "Time: N/A")?,
        }
        if self.time_regressions > 0 {
            writeln!(f, "Time regressions: {}", self.time_regressions)?;
        }
        writeln!(f, "Roll (deg): {}", self.roll)?;
        writeln!(f, "Pitch (deg): {}", self.pitch)?;
        writeln!(f, "Interval (s): {}", self.interval)?;
        Ok(())
    }
}

/// Stats summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

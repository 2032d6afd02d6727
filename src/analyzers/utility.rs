use crate::analyzers::types::ScoreAverage;
use crate::config::SENTINEL;

/// Parses a score answer. Empty, sentinel, non-numeric and non-finite
/// answers yield `None`.
pub fn parse_score(raw: Option<&str>) -> Option<f64> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() || trimmed == SENTINEL {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Rounds the exact binary value of `value` to `precision` decimal places.
///
/// Exact ties go to even. Most decimal halves like 1.05 are not exact ties in
/// binary and round by their true value.
pub fn round_to(value: f64, precision: u32) -> f64 {
    format!("{:.*}", precision as usize, value)
        .parse()
        .unwrap_or(value)
}

/// Running sum over the answers that parse.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreAccumulator {
    total: f64,
    count: usize,
}

impl ScoreAccumulator {
    /// Adds one answer; unparsable answers are skipped.
    pub fn push(&mut self, raw: Option<&str>) {
        if let Some(v) = parse_score(raw) {
            self.total += v;
            self.count += 1;
        }
    }

    pub fn finish(&self, precision: u32) -> ScoreAverage {
        ScoreAverage {
            value: (self.count > 0).then(|| round_to(self.total / self.count as f64, precision)),
            count: self.count,
        }
    }
}

/// Averages the parsable answers in `values`.
pub fn average<'a, I>(values: I, precision: u32) -> ScoreAverage
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut acc = ScoreAccumulator::default();
    for v in values {
        acc.push(v);
    }
    acc.finish(precision)
}

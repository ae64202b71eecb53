/// Summary statistics over a set of outcome samples in `[0.0, 1.0]`.
///
/// Used by the strategy miner to score pattern windows (mean outcome plus
/// a consistency bonus derived from variance) and by the engine's
/// diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutcomeStats {
    /// The smallest sample.
    pub min: f32,
    /// The largest sample.
    pub max: f32,
    /// Arithmetic mean of the samples.
    pub mean: f32,
    /// Population variance of the samples.
    pub variance: f32,
    /// Population standard deviation of the samples.
    pub std_dev: f32,
}

impl OutcomeStats {
    /// Computes statistics over the given samples.
    ///
    /// Returns `None` for an empty sample set.
    ///
    /// # Examples
    ///
    /// ```
    /// # use duelmind_stats::descriptive::OutcomeStats;
    /// let stats = OutcomeStats::new([0.2, 0.4, 0.6]).unwrap();
    /// assert_eq!(stats.min, 0.2);
    /// assert_eq!(stats.max, 0.6);
    /// assert!((stats.mean - 0.4).abs() < 1e-6);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(samples: I) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let samples = samples.into_iter().collect::<Vec<_>>();
        if samples.is_empty() {
            return None;
        }

        let n = samples.len() as f32;
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut sum = 0.0;
        for &sample in &samples {
            min = min.min(sample);
            max = max.max(sample);
            sum += sample;
        }
        let mean = sum / n;
        let variance = samples.iter().map(|s| (s - mean).powi(2)).sum::<f32>() / n;

        Some(Self {
            min,
            max,
            mean,
            variance,
            std_dev: variance.sqrt(),
        })
    }

    /// Consistency bonus for a sample set: `max(0, cap - variance)`.
    ///
    /// A tight cluster of outcomes earns up to `cap`; scattered outcomes
    /// earn nothing.
    #[must_use]
    pub fn consistency_bonus(&self, cap: f32) -> f32 {
        (cap - self.variance).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_none() {
        assert!(OutcomeStats::new([]).is_none());
    }

    #[test]
    fn test_single_sample() {
        let stats = OutcomeStats::new([0.7]).unwrap();
        assert_eq!(stats.min, 0.7);
        assert_eq!(stats.max, 0.7);
        assert_eq!(stats.mean, 0.7);
        assert_eq!(stats.variance, 0.0);
    }

    #[test]
    fn test_variance_of_spread_samples() {
        let stats = OutcomeStats::new([0.0, 1.0]).unwrap();
        assert_eq!(stats.mean, 0.5);
        assert_eq!(stats.variance, 0.25);
        assert_eq!(stats.std_dev, 0.5);
    }

    #[test]
    fn test_consistency_bonus_caps_at_zero() {
        let scattered = OutcomeStats::new([0.0, 1.0]).unwrap();
        assert_eq!(scattered.consistency_bonus(0.2), 0.0);

        let tight = OutcomeStats::new([0.5, 0.5, 0.5]).unwrap();
        assert_eq!(tight.consistency_bonus(0.2), 0.2);
    }
}

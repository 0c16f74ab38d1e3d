use crate::error::AggregationError;

///
/// SamplingContext
///
/// Probability a random sampler used when collecting partition results.
/// Final doc counts are scaled up by its inverse.
///

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplingContext {
    probability: f64,
}

impl SamplingContext {
    /// Build a sampling context; `probability` must lie in `(0, 1]`.
    pub fn new(probability: f64) -> Result<Self, AggregationError> {
        if !(probability > 0.0 && probability <= 1.0) {
            return Err(AggregationError::InvalidSamplingProbability { probability });
        }

        Ok(Self { probability })
    }

    /// Context for unsampled collection; scaling is the identity.
    #[must_use]
    pub const fn unsampled() -> Self {
        Self { probability: 1.0 }
    }

    #[must_use]
    pub const fn probability(self) -> f64 {
        self.probability
    }

    #[must_use]
    pub const fn is_sampled(self) -> bool {
        self.probability < 1.0
    }

    /// Scale one sampled count up to an estimate over all documents.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn scale_up(self, count: u64) -> u64 {
        if !self.is_sampled() {
            return count;
        }

        // float-to-int `as` saturates at u64::MAX
        (count as f64 * (1.0 / self.probability)).round() as u64
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_outside_unit_interval_is_rejected() {
        for probability in [0.0, -0.5, 1.5, f64::NAN] {
            assert!(
                SamplingContext::new(probability).is_err(),
                "probability {probability} should be rejected",
            );
        }
    }

    #[test]
    fn scale_up_rounds_to_nearest() {
        let sampling = SamplingContext::new(0.3).expect("valid probability");

        assert_eq!(sampling.scale_up(0), 0);
        assert_eq!(sampling.scale_up(3), 10);
        assert_eq!(sampling.scale_up(1), 3);
    }

    #[test]
    fn sampling_state_is_const_evaluable() {
        const UNSAMPLED: SamplingContext = SamplingContext::unsampled();
        const IS_SAMPLED: bool = UNSAMPLED.is_sampled();

        assert!(!IS_SAMPLED);
        assert!(SamplingContext::new(0.5).expect("valid probability").is_sampled());
    }

    #[test]
    fn unsampled_scaling_is_identity() {
        let sampling = SamplingContext::unsampled();

        assert!(!sampling.is_sampled());
        assert_eq!(sampling.scale_up(u64::MAX), u64::MAX);
    }
}

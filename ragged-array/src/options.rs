use ragged_error::{RaggedResult, ragged_bail};
use serde::{Deserialize, Serialize};

/// The default multiplier applied to the flat buffer length when it overflows.
pub const DEFAULT_GROWTH_FACTOR: usize = 2;

/// Tuning knobs for a [`RaggedArray`](crate::RaggedArray).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaggedOptions {
    /// Multiplier applied to the physical length of `flattened_data` each time a write would
    /// overflow it.
    growth_factor: usize,
}

impl Default for RaggedOptions {
    fn default() -> Self {
        Self {
            growth_factor: DEFAULT_GROWTH_FACTOR,
        }
    }
}

impl RaggedOptions {
    /// Sets the growth factor. Factors below 2 would not amortize and are rejected.
    pub fn with_growth_factor(mut self, growth_factor: usize) -> RaggedResult<Self> {
        if growth_factor < 2 {
            ragged_bail!("growth factor must be at least 2, got {}", growth_factor);
        }
        self.growth_factor = growth_factor;
        Ok(self)
    }

    pub fn growth_factor(&self) -> usize {
        self.growth_factor
    }

    /// The physical length to grow to so that at least `required` elements fit.
    pub(crate) fn grown_len(&self, current: usize, required: usize) -> usize {
        let factor = self.growth_factor.max(DEFAULT_GROWTH_FACTOR);
        let mut len = current.max(1);
        while len < required {
            len = len.saturating_mul(factor);
        }
        len
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(2, 4, 5, 8)]
    #[case(2, 4, 4, 4)]
    #[case(2, 0, 3, 4)]
    #[case(3, 2, 7, 18)]
    fn grows_geometrically(
        #[case] factor: usize,
        #[case] current: usize,
        #[case] required: usize,
        #[case] expected: usize,
    ) {
        let options = RaggedOptions::default()
            .with_growth_factor(factor)
            .unwrap();
        assert_eq!(options.grown_len(current, required), expected);
    }

    #[test]
    fn rejects_non_amortizing_factor() {
        assert!(RaggedOptions::default().with_growth_factor(1).is_err());
    }

    #[test]
    fn deserialize_with_defaults() {
        let options: RaggedOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options.growth_factor(), DEFAULT_GROWTH_FACTOR);
        let options: RaggedOptions = serde_json::from_str(r#"{"growth_factor": 4}"#).unwrap();
        assert_eq!(options.growth_factor(), 4);
    }
}

//! Strategy configuration trait.

use crate::error::StrategyError;

/// Configuration trait for strategies.
pub trait StrategyConfig: Send + Sync + Clone + 'static {
    /// Validate the configuration.
    fn validate(&self) -> Result<(), StrategyError>;

    /// Reject a reward:risk ratio that cannot place a target beyond entry.
    fn check_rr_ratio(rr_ratio: f64) -> Result<(), StrategyError> {
        if !(rr_ratio.is_finite() && rr_ratio > 0.0) {
            return Err(StrategyError::InvalidConfig(format!(
                "rr_ratio must be positive, got {}",
                rr_ratio
            )));
        }
        Ok(())
    }

    /// Reject a zero-length period.
    fn check_period(name: &str, period: usize) -> Result<(), StrategyError> {
        if period == 0 {
            return Err(StrategyError::InvalidConfig(format!(
                "{} must be greater than 0",
                name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct TestConfig {
        period: usize,
        rr_ratio: f64,
    }

    impl StrategyConfig for TestConfig {
        fn validate(&self) -> Result<(), StrategyError> {
            Self::check_period("period", self.period)?;
            Self::check_rr_ratio(self.rr_ratio)
        }
    }

    #[test]
    fn test_config_checks() {
        assert!(TestConfig { period: 14, rr_ratio: 2.0 }.validate().is_ok());
        assert!(TestConfig { period: 0, rr_ratio: 2.0 }.validate().is_err());
        assert!(TestConfig { period: 14, rr_ratio: 0.0 }.validate().is_err());
        assert!(TestConfig { period: 14, rr_ratio: f64::NAN }.validate().is_err());
    }
}

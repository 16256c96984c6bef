use crate::error::{FeeError, Result};

/// Computes the arithmetic mean of a slice of values.
///
/// Returns [`FeeError::EmptyAggregateInput`] for empty input instead of
/// dividing by zero.
pub fn mean(values: &[f64], what: &str) -> Result<f64> {
    if values.is_empty() {
        return Err(FeeError::EmptyAggregateInput {
            what: what.to_string(),
        });
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Computes `Σ(value * weight) / Σ(weight)` over `items`.
///
/// Fails when there are no items or the weights sum to zero.
pub fn weighted_mean<T>(
    items: &[T],
    what: &str,
    value: impl Fn(&T) -> f64,
    weight: impl Fn(&T) -> f64,
) -> Result<f64> {
    let mut weighted_total = 0.0;
    let mut weight_sum = 0.0;

    for item in items {
        let w = weight(item);
        weighted_total += value(item) * w;
        weight_sum += w;
    }

    if weight_sum == 0.0 {
        return Err(FeeError::EmptyAggregateInput {
            what: what.to_string(),
        });
    }
    Ok(weighted_total / weight_sum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty_is_error() {
        let err = mean(&[], "fees").unwrap_err();
        assert!(matches!(err, FeeError::EmptyAggregateInput { .. }));
    }

    #[test]
    fn test_mean_normal_values() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 6.0], "fees").unwrap(), 3.0);
        assert_eq!(mean(&[42.0], "fees").unwrap(), 42.0);
    }

    #[test]
    fn test_weighted_mean() {
        let items = [(100.0, 2.0), (200.0, 3.0)];
        let m = weighted_mean(&items, "fees", |i| i.0, |i| i.1).unwrap();
        assert_eq!(m, 160.0);
    }

    #[test]
    fn test_weighted_mean_zero_weight_is_error() {
        let items = [(100.0, 0.0), (200.0, 0.0)];
        assert!(weighted_mean(&items, "fees", |i| i.0, |i| i.1).is_err());

        let empty: [(f64, f64); 0] = [];
        assert!(weighted_mean(&empty, "fees", |i| i.0, |i| i.1).is_err());
    }
}

//! Benefit-vector normalization into signed target fractions.

use rust_decimal::Decimal;

/// Scales a raw benefit vector so its absolute values sum to 1.
///
/// Signs are preserved: a negative benefit becomes a short allocation.
/// The all-zero vector passes through unchanged rather than dividing by
/// zero — it means "hold nothing."
#[must_use]
pub fn normalize_weights(benefits: &[Decimal]) -> Vec<Decimal> {
    let mut total: Decimal = benefits.iter().map(|b| b.abs()).sum();
    if total == Decimal::ZERO {
        total = Decimal::ONE;
    }
    benefits.iter().map(|b| *b / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn abs_sum(weights: &[Decimal]) -> Decimal {
        weights.iter().map(|w| w.abs()).sum()
    }

    #[test]
    fn absolute_values_sum_to_one() {
        let weights = normalize_weights(&[dec!(1), dec!(-2), dec!(3)]);
        assert_eq!(weights[0], dec!(1) / dec!(6));
        assert_eq!(weights[1], dec!(-2) / dec!(6));
        assert_eq!(weights[2], dec!(3) / dec!(6));
        assert!((abs_sum(&weights) - Decimal::ONE).abs() < Decimal::new(1, 20));
    }

    #[test]
    fn all_zero_vector_passes_through() {
        let zeros = vec![Decimal::ZERO; 3];
        assert_eq!(normalize_weights(&zeros), zeros);
    }

    #[test]
    fn already_normalized_vector_is_unchanged() {
        // Re-normalizing after a stop-loss zeroes one slot must be stable.
        let weights = normalize_weights(&[dec!(0.25), Decimal::ZERO, dec!(-0.75)]);
        assert_eq!(weights, vec![dec!(0.25), Decimal::ZERO, dec!(-0.75)]);
    }

    #[test]
    fn model_output_vector_normalizes() {
        let weights = normalize_weights(&[dec!(0.17164788), dec!(-0.64025986), dec!(-0.18809232)]);
        assert!((abs_sum(&weights) - Decimal::ONE).abs() < Decimal::new(1, 20));
        assert!(weights[0] > Decimal::ZERO);
        assert!(weights[1] < Decimal::ZERO);
    }
}

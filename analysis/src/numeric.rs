/// `numerator / denominator`, or 0 when the quotient is undefined.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !numerator.is_finite() || !denominator.is_finite() {
        return 0.0;
    }
    numerator / denominator
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_quotients_are_zero() {
        assert_eq!(0.0, ratio(0.0, 0.0));
        assert_eq!(0.0, ratio(5.0, 0.0));
        assert_eq!(0.0, ratio(f64::NAN, 2.0));
        assert_eq!(2.5, ratio(5.0, 2.0));
    }
}

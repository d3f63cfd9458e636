//! Static month-of-year demand factors.

use chrono::Month;

/// Multiplicative demand factor per calendar month, January first.
pub const STANDARD_FACTORS: [f64; 12] = [
    0.85, 0.90, 1.05, 1.10, 1.15, 1.20, 1.25, 1.15, 1.05, 0.95, 0.90, 0.85,
];

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalIndex {
    factors: [f64; 12],
}

impl Default for SeasonalIndex {
    fn default() -> Self {
        Self {
            factors: STANDARD_FACTORS,
        }
    }
}

impl SeasonalIndex {
    pub fn new(factors: [f64; 12]) -> Self {
        Self { factors }
    }

    /// Factor for a 1-based month. Anything outside 1..=12 maps to 1.0.
    pub fn factor(&self, month: u32) -> f64 {
        match month {
            1..=12 => self.factors[(month - 1) as usize],
            _ => 1.0,
        }
    }

    /// 1-based month with the highest factor (earliest on ties).
    pub fn peak_month(&self) -> u32 {
        let mut peak = 0;
        for (i, factor) in self.factors.iter().enumerate() {
            if *factor > self.factors[peak] {
                peak = i;
            }
        }
        peak as u32 + 1
    }
}

/// The month `offset + 1` months after `reference_month` (both 1-based),
/// wrapping around the year.
pub fn target_month(reference_month: u32, offset: usize) -> u32 {
    ((reference_month as usize + offset) % 12) as u32 + 1
}

/// English name for a 1-based month.
pub fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_lookup() {
        let index = SeasonalIndex::default();
        assert_eq!(index.factor(1), 0.85);
        assert_eq!(index.factor(7), 1.25);
        assert_eq!(index.factor(12), 0.85);
        assert_eq!(index.factor(0), 1.0);
        assert_eq!(index.factor(13), 1.0);
    }

    #[test]
    fn test_peak_month() {
        assert_eq!(SeasonalIndex::default().peak_month(), 7);
        assert_eq!(SeasonalIndex::new([1.0; 12]).peak_month(), 1);
    }

    #[test]
    fn test_target_month_wraps() {
        assert_eq!(target_month(3, 0), 4);
        assert_eq!(target_month(11, 0), 12);
        assert_eq!(target_month(12, 0), 1);
        assert_eq!(target_month(12, 13), 2);
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(0), "Unknown");
    }
}

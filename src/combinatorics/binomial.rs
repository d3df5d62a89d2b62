//! Binomial coefficients.

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};
use std::collections::HashMap;

/// Bits kept when converting a big ratio to `f64`.
const RATIO_BITS: u64 = 1000;

/// Binomial coefficient `C(n, r)` as a floating-point approximation.
///
/// Computed multiplicatively, so it stays accurate (about `1e-14` relative
/// error) for `n` in the hundreds where factorials would overflow.
/// Returns `0.0` when `r < 0` or `r > n`.
///
/// # Examples
///
/// ```
/// use u_fieldprob::combinatorics::ncr;
///
/// assert_eq!(ncr(4, 2), 6.0);
/// assert_eq!(ncr(3, 5), 0.0);
/// ```
pub fn ncr(n: i64, r: i64) -> f64 {
    if r < 0 || r > n {
        return 0.0;
    }
    if r == 0 || r == n {
        return 1.0;
    }
    let r = r.min(n - r);
    let mut value = 1.0;
    for i in 0..r {
        value = value * (n - i) as f64 / (r - i) as f64;
    }
    value
}

/// Exact binomial coefficient `C(n, r)`.
///
/// Returns zero when `r < 0` or `r > n`, one when `r` is `0` or `n`.
pub fn ncr_big(n: i64, r: i64) -> BigUint {
    if r < 0 || r > n {
        return BigUint::zero();
    }
    if r == 0 || r == n {
        return BigUint::one();
    }
    // Pascal's triangle is symmetric
    let r = r.min(n - r) as u64;
    let n = n as u64;
    let mut value = BigUint::one();
    for i in 0..r {
        // exact: the running value is C(n, i + 1) after the division
        value = value * (n - i) / (i + 1);
    }
    value
}

/// Hypergeometric combination count.
///
/// With `total` elements of which `active` are active, counts the ways to
/// have exactly `drawn_active` active elements among `drawn` specific
/// elements: `C(drawn, drawn_active) * C(total - drawn, active - drawn_active)`.
/// This does not divide by `C(total, active)`.
pub fn nnkk(total: i64, active: i64, drawn: i64, drawn_active: i64) -> f64 {
    ncr(drawn, drawn_active) * ncr(total - drawn, active - drawn_active)
}

/// Probability of exactly `drawn_active` active elements among `drawn`
/// specific elements, when `active` of `total` elements are active.
///
/// This is [`nnkk`] divided by `C(total, active)`. When `C(total, active)`
/// leaves the `f64` range the ratio is taken in log space, so the result
/// stays finite for any `total`. Returns `0.0` for impossible counts.
///
/// # Examples
///
/// ```
/// use u_fieldprob::combinatorics::hypergeometric;
///
/// // 2 of 6 fields active, 2 drawn: C(2,1) * C(4,1) / C(6,2)
/// assert!((hypergeometric(6, 2, 2, 1) - 8.0 / 15.0).abs() < 1e-12);
/// ```
pub fn hypergeometric(total: i64, active: i64, drawn: i64, drawn_active: i64) -> f64 {
    let rest = active - drawn_active;
    if active < 0
        || active > total
        || drawn < 0
        || drawn > total
        || drawn_active < 0
        || drawn_active > drawn
        || rest < 0
        || rest > total - drawn
    {
        return 0.0;
    }
    let whole = ncr(total, active);
    if whole < f64::MAX / 4.0 {
        return nnkk(total, active, drawn, drawn_active) / whole;
    }
    (ln_ncr(drawn, drawn_active) + ln_ncr(total - drawn, rest) - ln_ncr(total, active)).exp()
}

/// `ln C(n, r)` for `0 <= r <= n`.
fn ln_ncr(n: i64, r: i64) -> f64 {
    let r = r.min(n - r);
    (0..r).map(|i| ((n - i) as f64 / (r - i) as f64).ln()).sum()
}

/// Converts `numerator / denominator` to `f64` without overflowing.
///
/// Both operands are scaled down together when they exceed the `f64` range.
/// Returns `NaN` when the denominator is zero; callers guard that case.
pub fn ratio_to_f64(numerator: &BigUint, denominator: &BigUint) -> f64 {
    if denominator.is_zero() {
        return f64::NAN;
    }
    let shift = numerator
        .bits()
        .max(denominator.bits())
        .saturating_sub(RATIO_BITS);
    let num = (numerator >> shift).to_f64().unwrap_or(f64::INFINITY);
    let den = (denominator >> shift).to_f64().unwrap_or(f64::INFINITY);
    num / den
}

/// Memoized rows of exact binomial coefficients.
///
/// Solution weights multiply `C(size, count)` for every group of every
/// solution; the group sizes repeat, so each row `C(n, 0..=n)` is computed
/// once and reused.
#[derive(Debug, Clone, Default)]
pub struct BinomialTable {
    rows: HashMap<usize, Vec<BigUint>>,
}

impl BinomialTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the full row `C(n, 0..=n)`, computing it on first use.
    pub fn row(&mut self, n: usize) -> &[BigUint] {
        self.rows.entry(n).or_insert_with(|| binomial_row(n))
    }

    /// Returns `C(n, r)`, zero when `r > n`.
    pub fn get(&mut self, n: usize, r: usize) -> BigUint {
        if r > n {
            return BigUint::zero();
        }
        self.row(n)[r].clone()
    }

    /// Number of cached rows.
    pub fn cached_rows(&self) -> usize {
        self.rows.len()
    }
}

fn binomial_row(n: usize) -> Vec<BigUint> {
    let mut row = Vec::with_capacity(n + 1);
    let mut value = BigUint::one();
    row.push(value.clone());
    for r in 1..=n {
        value = value * (n - r + 1) / r;
        row.push(value.clone());
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ncr_small() {
        assert!((ncr(4, 2) - 6.0).abs() < 1e-4);
        assert!((ncr(8, 3) - 56.0).abs() < 1e-9);
        assert_eq!(ncr(5, -1), 0.0);
        assert_eq!(ncr(5, 6), 0.0);
        assert_eq!(ncr(0, 0), 1.0);
    }

    #[test]
    fn test_ncr_large() {
        let value = ncr(256, 51);
        assert!(
            (value - 2.034388346356e54).abs() < 1e44,
            "unexpected C(256, 51) = {value}"
        );
    }

    #[test]
    fn test_ncr_big_values() {
        assert_eq!(ncr_big(8, 2), BigUint::from(28u32));
        assert_eq!(ncr_big(8, 6), BigUint::from(28u32));
        assert_eq!(ncr_big(8, 4), BigUint::from(70u32));
        assert_eq!(ncr_big(8, 3), BigUint::from(56u32));
        assert_eq!(ncr_big(7, 3), BigUint::from(35u32));
        assert_eq!(ncr_big(1, -1), BigUint::zero());
        assert_eq!(ncr_big(0, 1), BigUint::zero());
    }

    #[test]
    fn test_ncr_big_edges_are_one() {
        for n in 0..100 {
            assert_eq!(ncr_big(n, 0), BigUint::one(), "C({n}, 0)");
            assert_eq!(ncr_big(n, n), BigUint::one(), "C({n}, {n})");
        }
    }

    #[test]
    fn test_ncr_matches_ncr_big() {
        for n in 0..60 {
            for r in 0..=n {
                let exact = ncr_big(n, r).to_f64().unwrap();
                let approx = ncr(n, r);
                assert!(
                    ((approx - exact) / exact).abs() < 1e-10,
                    "C({n}, {r}): {approx} vs {exact}"
                );
            }
        }
    }

    #[test]
    fn test_nnkk() {
        // 6 fields with 3 active; take 2 of them, none active: C(2,0) * C(4,3)
        assert!((nnkk(6, 3, 2, 0) - 4.0).abs() < 1e-12);
        assert!((nnkk(6, 3, 2, 1) - 12.0).abs() < 1e-12);
        assert!((nnkk(6, 3, 2, 2) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_hypergeometric_small_matches_nnkk() {
        for k in 0..=2 {
            let expected = nnkk(6, 3, 2, k) / ncr(6, 3);
            assert!((hypergeometric(6, 3, 2, k) - expected).abs() < 1e-15);
        }
        assert_eq!(hypergeometric(6, 3, 2, 3), 0.0);
        assert_eq!(hypergeometric(6, 7, 2, 0), 0.0);
    }

    #[test]
    fn test_hypergeometric_beyond_f64_range() {
        assert!(ncr(2000, 1000).is_infinite());
        let whole = ncr_big(2000, 1000);
        let mut sum = 0.0;
        for k in 0..=3 {
            let exact = ratio_to_f64(&(ncr_big(3, k) * ncr_big(1997, 1000 - k)), &whole);
            let value = hypergeometric(2000, 1000, 3, k);
            assert!(value.is_finite());
            assert!(((value - exact) / exact).abs() < 1e-9, "k={k}: {value} vs {exact}");
            sum += value;
        }
        assert!((sum - 1.0).abs() < 1e-9, "sum was {sum}");
    }

    #[test]
    fn test_binomial_table_memoizes_rows() {
        let mut table = BinomialTable::new();
        assert_eq!(table.get(10, 3), BigUint::from(120u32));
        assert_eq!(table.get(10, 7), BigUint::from(120u32));
        assert_eq!(table.get(10, 11), BigUint::zero());
        assert_eq!(table.cached_rows(), 1);
        assert_eq!(table.row(200)[100], ncr_big(200, 100));
        assert_eq!(table.cached_rows(), 2);
    }

    #[test]
    fn test_ratio_to_f64_huge_operands() {
        let den = ncr_big(2000, 1000);
        let num = &den * 3u32;
        let ratio = ratio_to_f64(&num, &den);
        assert!((ratio - 3.0).abs() < 1e-12, "ratio was {ratio}");
        assert!(ratio_to_f64(&num, &BigUint::zero()).is_nan());
    }
}

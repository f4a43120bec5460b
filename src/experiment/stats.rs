//! Statistical primitives for the significance check

/// Two-tailed significance threshold.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// z value covering a 95% confidence interval.
pub const Z_95: f64 = 1.96;

/// Standard normal CDF via the Abramowitz & Stegun 7.1.26 erf approximation.
///
/// Maximum absolute error is about 1.5e-7, well inside what a p < 0.05
/// decision needs, and it stays finite and monotone over the whole range.
#[must_use]
pub fn normal_cdf(x: f64) -> f64 {
    const A1: f64 = 0.254_829_592;
    const A2: f64 = -0.284_496_736;
    const A3: f64 = 1.421_413_741;
    const A4: f64 = -1.453_152_027;
    const A5: f64 = 1.061_405_429;
    const P: f64 = 0.327_591_1;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs() / std::f64::consts::SQRT_2;

    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t * (-x * x).exp();

    0.5 * (1.0 + sign * y)
}

/// Result of a two-proportion z-test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZTest {
    /// z statistic; 0 when the pooled standard error degenerates
    pub z: f64,
    /// Pooled standard error of the difference
    pub se: f64,
    /// Two-tailed p-value
    pub p_value: f64,
}

/// Two-proportion z-test for rates `p1` (over `n1` samples) and `p2` (over
/// `n2` samples).
///
/// Uses the pooled-proportion standard error. A degenerate pool (both rates
/// 0 or both 1, or empty samples) yields `z = 0`, `p = 1`: indistinguishable.
#[must_use]
pub fn two_proportion_z_test(p1: f64, n1: u64, p2: f64, n2: u64) -> ZTest {
    if n1 == 0 || n2 == 0 {
        return ZTest {
            z: 0.0,
            se: 0.0,
            p_value: 1.0,
        };
    }
    #[allow(clippy::cast_precision_loss)]
    let (n1, n2) = (n1 as f64, n2 as f64);

    let pooled = (p1 * n1 + p2 * n2) / (n1 + n2);
    let se = (pooled * (1.0 - pooled) * (1.0 / n1 + 1.0 / n2)).sqrt();
    let z = if se > 0.0 { (p1 - p2) / se } else { 0.0 };
    let p_value = 2.0 * (1.0 - normal_cdf(z.abs()));

    ZTest { z, se, p_value }
}

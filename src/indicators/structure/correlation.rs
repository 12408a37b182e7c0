//! Cross-asset correlation

use crate::indicators::volatility::simple_returns;

/// Minimum overlapping closes per asset
pub const MIN_CORRELATION_CLOSES: usize = 11;

/// Pearson correlation of two equally long series.
/// `None` for fewer than two points or zero variance on either side.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }
    Some(covariance / (var_x * var_y).sqrt())
}

/// Average correlation of equity returns against two other assets' returns,
/// over the overlapping tail of the three close series.
pub fn average_cross_correlation(equities: &[f64], first: &[f64], second: &[f64]) -> Option<f64> {
    let len = equities.len().min(first.len()).min(second.len());
    if len < MIN_CORRELATION_CLOSES {
        return None;
    }
    let tail = |s: &[f64]| simple_returns(&s[s.len() - len..]);
    let eq = tail(equities);
    let a = tail(first);
    let b = tail(second);

    let with_first = pearson(&eq, &a)?;
    let with_second = pearson(&eq, &b)?;
    Some((with_first + with_second) / 2.0)
}

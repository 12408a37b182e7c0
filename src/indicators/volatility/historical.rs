//! Realized (historical) volatility

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
/// Minimum closes before a volatility estimate is trusted
pub const MIN_VOLATILITY_CLOSES: usize = 21;

/// Simple period-over-period returns. Pairs starting at zero are skipped.
pub fn simple_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .filter(|pair| pair[0] != 0.0)
        .map(|pair| (pair[1] - pair[0]) / pair[0])
        .collect()
}

/// Population standard deviation
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some(variance.sqrt())
}

/// Annualized standard deviation of daily returns
pub fn annualized_volatility(closes: &[f64]) -> Option<f64> {
    if closes.len() < MIN_VOLATILITY_CLOSES {
        return None;
    }
    let returns = simple_returns(closes);
    std_dev(&returns).map(|sd| sd * TRADING_DAYS_PER_YEAR.sqrt())
}

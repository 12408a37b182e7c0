//! Range position, volume ratio and period returns

pub const BREADTH_PERIOD: usize = 52;

/// Position of the last close within the trailing `period` high/low range,
/// 0.0 at the low and 1.0 at the high
pub fn range_position(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.is_empty() {
        return None;
    }
    let window = &closes[closes.len().saturating_sub(period)..];
    let high = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let low = window.iter().copied().fold(f64::INFINITY, f64::min);
    let current = *window.last()?;
    if high <= low {
        return None;
    }
    Some((current - low) / (high - low))
}

/// Breadth raw reading over the 52-period window
pub fn breadth_position(closes: &[f64]) -> Option<f64> {
    range_position(closes, BREADTH_PERIOD)
}

/// Last volume over the mean volume of the series
pub fn volume_ratio(volumes: &[f64]) -> Option<f64> {
    let last = *volumes.last()?;
    let average = volumes.iter().sum::<f64>() / volumes.len() as f64;
    if average <= 0.0 {
        return None;
    }
    Some(last / average)
}

/// `(last - first) / first` over the whole series
pub fn period_return(closes: &[f64]) -> Option<f64> {
    let first = *closes.first()?;
    let last = *closes.last()?;
    if first == 0.0 {
        return None;
    }
    Some((last - first) / first)
}

/// Equities return minus long-bond return over the same window
pub fn relative_return(equities: &[f64], bonds: &[f64]) -> Option<f64> {
    Some(period_return(equities)? - period_return(bonds)?)
}

/// Mean period return across regional indices; `None` if any is missing
pub fn average_return(markets: &[&[f64]]) -> Option<f64> {
    if markets.is_empty() {
        return None;
    }
    let returns = markets
        .iter()
        .map(|closes| period_return(closes))
        .collect::<Option<Vec<f64>>>()?;
    Some(returns.iter().sum::<f64>() / returns.len() as f64)
}

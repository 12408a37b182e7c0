//! Price deviation from its simple moving average

pub const MOMENTUM_PERIOD: usize = 125;

pub fn simple_moving_average(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// `(last - SMA(period)) / SMA(period)`
pub fn deviation_from_average(closes: &[f64], period: usize) -> Option<f64> {
    let average = simple_moving_average(closes, period)?;
    relative_deviation(*closes.last()?, average)
}

/// `(value - average) / average`; `None` for a zero average
pub fn relative_deviation(value: f64, average: f64) -> Option<f64> {
    if average == 0.0 {
        return None;
    }
    Some((value - average) / average)
}

/// Momentum raw reading: deviation from the 125-period average
pub fn momentum_deviation(closes: &[f64]) -> Option<f64> {
    deviation_from_average(closes, MOMENTUM_PERIOD)
}

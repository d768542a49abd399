use chrono::{Duration, NaiveDate, NaiveTime};
use scanner_core::{Bar, PriceSnapshot};

const DEFAULT_KEY_LEVEL_COUNT: usize = 5;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Extracts premarket/market statistics and resistance levels from the
/// three bar series of one symbol. Any missing input series nulls only the
/// dependent fields; `snapshot` never fails.
pub struct ChartAnalyzer {
    market_open: NaiveTime,
    open_range_start: NaiveTime,
    open_range_end: NaiveTime,
    premarket_start: NaiveTime,
    key_level_count: usize,
}

impl ChartAnalyzer {
    pub fn new() -> Self {
        Self {
            market_open: NaiveTime::from_hms_opt(9, 30, 0).unwrap_or_default(),
            open_range_start: NaiveTime::from_hms_opt(9, 31, 0).unwrap_or_default(),
            open_range_end: NaiveTime::from_hms_opt(9, 45, 0).unwrap_or_default(),
            premarket_start: NaiveTime::from_hms_opt(4, 0, 0).unwrap_or_default(),
            key_level_count: DEFAULT_KEY_LEVEL_COUNT,
        }
    }

    pub fn with_market_open(mut self, open: NaiveTime) -> Self {
        self.market_open = open;
        self
    }

    /// The bounded clock interval for the opening-range high/low. The
    /// interval may wrap past midnight.
    pub fn with_open_range(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.open_range_start = start;
        self.open_range_end = end;
        self
    }

    pub fn with_key_level_count(mut self, count: usize) -> Self {
        self.key_level_count = count;
        self
    }

    /// Compute the full price snapshot for one symbol from its 1-minute,
    /// 5-minute, and daily bar series (each ordered ascending).
    pub fn snapshot(&self, symbol: &str, m1: &[Bar], m5: &[Bar], d1: &[Bar]) -> PriceSnapshot {
        let last_date = m1.last().map(|b| b.timestamp.date());
        let last_day: Vec<&Bar> = match last_date {
            Some(date) => m1.iter().filter(|b| b.timestamp.date() == date).collect(),
            None => Vec::new(),
        };

        let premarket: Vec<&Bar> = last_day
            .iter()
            .copied()
            .filter(|b| b.timestamp.time() < self.market_open)
            .collect();
        let market: Vec<&Bar> = last_day
            .iter()
            .copied()
            .filter(|b| b.timestamp.time() >= self.market_open)
            .collect();

        let day_high = max_field(&last_day, |b| b.high);
        let day_low = min_field(&market, |b| b.low);
        let day_close = last_day.last().map(|b| round2(b.close));
        let yesterday_close = yesterday_close(d1);

        let high_change_percentage = change_percentage(day_high, yesterday_close);
        let close_change_percentage = change_percentage(day_close, yesterday_close);

        let (market_open_high, market_open_low) = self.open_range(m1, last_date);

        let key_levels = self.key_levels(m5, d1, last_date, day_high);

        PriceSnapshot {
            symbol: symbol.to_string(),
            premarket_high: max_field(&premarket, |b| b.high),
            premarket_low: min_field(&premarket, |b| b.low),
            market_open_high,
            market_open_low,
            day_high,
            day_low,
            day_close,
            yesterday_close,
            high_change_percentage,
            close_change_percentage,
            most_volume_high: most_volume_field(&last_day, |b| b.close >= b.open, |b| b.high),
            most_volume_low: most_volume_field(&market, |b| b.close < b.open, |b| b.low),
            key_levels,
        }
    }

    /// High/low over the opening-range clock interval on the last day.
    /// When the interval wraps midnight, bars on the following calendar
    /// date up to the end time are included.
    fn open_range(&self, m1: &[Bar], last_date: Option<NaiveDate>) -> (Option<f64>, Option<f64>) {
        let last_date = match last_date {
            Some(d) => d,
            None => return (None, None),
        };

        let start = self.open_range_start;
        let end = self.open_range_end;

        let in_range = |b: &&Bar| {
            let date = b.timestamp.date();
            let time = b.timestamp.time();
            if start <= end {
                date == last_date && time >= start && time <= end
            } else {
                (date == last_date && time >= start)
                    || (date == last_date + Duration::days(1) && time <= end)
            }
        };

        let bars: Vec<&Bar> = m1.iter().filter(in_range).collect();
        (max_field(&bars, |b| b.high), min_field(&bars, |b| b.low))
    }

    /// Nearest resistance levels above the day high: daily bars whose
    /// volume exceeds today's session volume and whose high exceeds the
    /// day high contribute their low (if still above the day high) or
    /// their high. Deduplicated, ascending, at most `key_level_count`.
    fn key_levels(
        &self,
        m5: &[Bar],
        d1: &[Bar],
        last_date: Option<NaiveDate>,
        day_high: Option<f64>,
    ) -> Vec<f64> {
        let (last_date, day_high) = match (last_date, day_high) {
            (Some(date), Some(high)) => (date, high),
            _ => return Vec::new(),
        };

        let current_volume: f64 = m5
            .iter()
            .filter(|b| {
                b.timestamp.date() == last_date && b.timestamp.time() >= self.premarket_start
            })
            .map(|b| b.volume)
            .sum();
        tracing::debug!("session volume since premarket open: {}", current_volume);

        let mut levels: Vec<f64> = d1
            .iter()
            .filter(|b| b.volume > current_volume && b.high > day_high)
            .map(|b| {
                if b.low > day_high {
                    round2(b.low)
                } else {
                    round2(b.high)
                }
            })
            .collect();

        levels.sort_by(|a, b| a.total_cmp(b));
        levels.dedup();
        levels.truncate(self.key_level_count);
        levels
    }
}

impl Default for ChartAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn max_field(bars: &[&Bar], field: impl Fn(&Bar) -> f64) -> Option<f64> {
    bars.iter()
        .map(|b| field(b))
        .fold(None, |acc: Option<f64>, v| {
            Some(acc.map_or(v, |a| a.max(v)))
        })
        .map(round2)
}

fn min_field(bars: &[&Bar], field: impl Fn(&Bar) -> f64) -> Option<f64> {
    bars.iter()
        .map(|b| field(b))
        .fold(None, |acc: Option<f64>, v| {
            Some(acc.map_or(v, |a| a.min(v)))
        })
        .map(round2)
}

/// Field of the highest-volume bar among those matching `select`,
/// excluding zero-volume bars. The earliest bar wins a volume tie.
fn most_volume_field(
    bars: &[&Bar],
    select: impl Fn(&Bar) -> bool,
    field: impl Fn(&Bar) -> f64,
) -> Option<f64> {
    let mut best: Option<&Bar> = None;
    for bar in bars.iter().copied() {
        if !select(bar) || bar.volume <= 0.0 {
            continue;
        }
        if best.map_or(true, |b| bar.volume > b.volume) {
            best = Some(bar);
        }
    }
    best.map(|b| round2(field(b)))
}

/// Close of the second-most-recent daily bar; null with fewer than two.
fn yesterday_close(d1: &[Bar]) -> Option<f64> {
    if d1.len() < 2 {
        return None;
    }
    let mut sorted: Vec<&Bar> = d1.iter().collect();
    sorted.sort_by_key(|b| b.timestamp);
    Some(round2(sorted[sorted.len() - 2].close))
}

fn change_percentage(value: Option<f64>, reference: Option<f64>) -> Option<f64> {
    match (value, reference) {
        (Some(v), Some(r)) if r != 0.0 => Some(round2((v - r) / r * 100.0)),
        _ => None,
    }
}

use chrono::NaiveDateTime;
use scanner_core::Bar;

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%m/%d/%Y %H:%M:%S"];

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Parse raw comma-separated bar rows (`datetime,open,high,low,close,volume`).
/// Malformed rows are skipped with a diagnostic, never fatal. An empty
/// volume cell parses as 0. Output is sorted ascending by timestamp.
pub fn parse_bar_rows(text: &str) -> Vec<Bar> {
    let mut bars = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split(',').collect();
        if parts.len() < 6 {
            tracing::warn!("incomplete bar row skipped: {}", line);
            continue;
        }

        let timestamp = match parse_timestamp(parts[0].trim()) {
            Some(ts) => ts,
            None => {
                tracing::warn!("unparsable bar timestamp skipped: {}", parts[0].trim());
                continue;
            }
        };

        let field = |idx: usize| parts[idx].trim().parse::<f64>();
        let volume = {
            let raw = parts[5].trim();
            if raw.is_empty() {
                Ok(0.0)
            } else {
                raw.parse::<f64>()
            }
        };

        match (field(1), field(2), field(3), field(4), volume) {
            (Ok(open), Ok(high), Ok(low), Ok(close), Ok(volume)) => bars.push(Bar {
                timestamp,
                open,
                high,
                low,
                close,
                volume,
            }),
            _ => tracing::warn!("unparsable bar values skipped: {}", line),
        }
    }

    bars.sort_by_key(|b| b.timestamp);
    bars
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_timestamp_formats() {
        let text = "2025-05-07 09:31:00,1.0,1.2,0.9,1.1,5000\n\
                    05/07/2025 09:32:00,1.1,1.3,1.0,1.2,6000";
        let bars = parse_bar_rows(text);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].timestamp.to_string(), "2025-05-07 09:31:00");
        assert_eq!(bars[1].timestamp.to_string(), "2025-05-07 09:32:00");
    }

    #[test]
    fn skips_malformed_rows() {
        let text = "garbage\n\
                    2025-05-07 09:31:00,1.0,1.2\n\
                    not-a-date,1.0,1.2,0.9,1.1,5000\n\
                    2025-05-07 09:31:00,1.0,oops,0.9,1.1,5000\n\
                    2025-05-07 09:31:00,1.0,1.2,0.9,1.1,5000";
        let bars = parse_bar_rows(text);
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].high, 1.2);
    }

    #[test]
    fn empty_volume_cell_parses_as_zero() {
        let bars = parse_bar_rows("2025-05-07 09:31:00,1.0,1.2,0.9,1.1,");
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].volume, 0.0);
    }

    #[test]
    fn output_sorted_ascending() {
        let text = "2025-05-07 09:33:00,1.0,1.2,0.9,1.1,100\n\
                    2025-05-07 09:31:00,1.0,1.2,0.9,1.1,100\n\
                    2025-05-07 09:32:00,1.0,1.2,0.9,1.1,100";
        let bars = parse_bar_rows(text);
        assert!(bars.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }
}

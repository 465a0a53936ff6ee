#![forbid(unsafe_code)]

//! CSS `<time>` list parsing for computed `transition-duration` values.
//!
//! # Failure Modes
//!
//! | Input | Result |
//! |-------|--------|
//! | `""` | zero |
//! | `"auto"`, `"-1s"`, `"1.5"` | item counts as zero |
//! | `"1.2.3s"` | leading number (`1.2s`), like `parseFloat` |
//! | `"0s, 0.3s, 300ms"` | maximum item (`300ms`) |

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

static TIME_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([\d.]+)(s|ms)$").expect("time item pattern is valid")
});

/// Longest prefix of `digits` that reads as a decimal number (one dot at most).
fn leading_number(digits: &str) -> f64 {
    let mut end = 0;
    let mut seen_dot = false;
    for (idx, ch) in digits.char_indices() {
        match ch {
            '0'..='9' => end = idx + 1,
            '.' if !seen_dot => {
                seen_dot = true;
                end = idx + 1;
            }
            _ => break,
        }
    }
    digits[..end].parse::<f64>().unwrap_or(0.0)
}

/// Parse one `<time>` item into milliseconds. Malformed items are `None`.
pub fn parse_time_ms(item: &str) -> Option<f64> {
    let caps = TIME_ITEM.captures(item.trim())?;
    let value = leading_number(&caps[1]);
    let ms = if &caps[2] == "s" { value * 1000.0 } else { value };
    ms.is_finite().then_some(ms)
}

/// Maximum duration in a comma-separated `<time>` list.
///
/// Malformed entries count as zero, so a fully malformed list yields
/// [`Duration::ZERO`].
pub fn parse_max_duration(list: &str) -> Duration {
    let max_ms = list
        .split(',')
        .filter_map(parse_time_ms)
        .fold(0.0_f64, f64::max);
    Duration::from_nanos((max_ms * 1_000_000.0).round() as u64)
}

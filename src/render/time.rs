//! Time display helpers

/// Convert a 24-hour "HH:MM" string to "H:MM AM/PM".
///
/// Hours 0 and 12 both display as 12. Malformed input is not rejected: a part
/// that does not parse shows as `NaN` and the suffix falls back to `AM`.
pub fn format_time_12h(time: &str) -> String {
    let mut parts = time.trim().splitn(2, ':');
    let hour = parts.next().and_then(|h| h.trim().parse::<u32>().ok());
    let minute = parts.next().and_then(|m| {
        // Tolerate a trailing seconds field ("08:30:00")
        m.split(':').next().and_then(|m| m.trim().parse::<u32>().ok())
    });

    let (hour_display, suffix) = match hour {
        Some(h) => {
            let suffix = if h % 24 >= 12 { "PM" } else { "AM" };
            let h12 = match h % 12 {
                0 => 12,
                h => h,
            };
            (h12.to_string(), suffix)
        }
        None => ("NaN".to_string(), "AM"),
    };

    let minute_display = minute
        .map(|m| format!("{:02}", m))
        .unwrap_or_else(|| "NaN".to_string());

    format!("{}:{} {}", hour_display, minute_display, suffix)
}

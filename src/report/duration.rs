// ============================================================================
// Duration codec — TestRail elapsed strings <-> seconds
// ============================================================================

/// Parse a TestRail elapsed string ("1h 5m 30s") into seconds.
///
/// Each whitespace token is reduced to its digits; the token contributes
/// those digits as seconds when it contains `s`, minutes when it contains
/// `m`, hours when it contains `h`. A token matching several unit markers
/// contributes to each of them — this mirrors the backend's historical
/// behaviour and is relied on by existing data.
pub fn parse_elapsed(elapsed: Option<&str>) -> u64 {
    let mut total = 0u64;
    let text = elapsed.unwrap_or("");
    for token in text.split_whitespace() {
        let digits: String = token.chars().filter(|c| c.is_ascii_digit()).collect();
        let number: u64 = digits.parse().unwrap_or(0);
        if token.contains('s') {
            total += number;
        }
        if token.contains('m') {
            total += number * 60;
        }
        if token.contains('h') {
            total += number * 3600;
        }
    }
    total
}

/// Submission-side formatter: `None` for zero (the field is simply left
/// off the result), otherwise all three components: "1h 0m 30s".
pub fn format_elapsed(total_seconds: u64) -> Option<String> {
    if total_seconds == 0 {
        return None;
    }
    let hours = total_seconds / 3600;
    let remaining = total_seconds - hours * 3600;
    let minutes = remaining / 60;
    let seconds = remaining - minutes * 60;
    Some(format!("{}h {}m {}s", hours, minutes, seconds))
}

/// Reporting-side formatter for table cells: only the non-zero components,
/// space-joined in h/m/s order; zero renders as the literal "0s".
pub fn format_timespan(total_seconds: u64) -> String {
    if total_seconds == 0 {
        return "0s".to_string();
    }
    let hours = total_seconds / 3600;
    let remaining = total_seconds - hours * 3600;
    let minutes = remaining / 60;
    let seconds = remaining - minutes * 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 {
        parts.push(format!("{}m", minutes));
    }
    if seconds > 0 {
        parts.push(format!("{}s", seconds));
    }
    parts.join(" ")
}

/// Round to two decimals and render the way the report expects:
/// whole values keep one decimal ("25.0"), others drop a trailing zero.
pub fn format_rounded(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if (rounded - rounded.trunc()).abs() < 1e-9 {
        format!("{:.1}", rounded)
    } else {
        let text = format!("{:.2}", rounded);
        match text.strip_suffix('0') {
            Some(stripped) => stripped.to_string(),
            None => text,
        }
    }
}

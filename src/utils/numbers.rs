/// Format a number with the given significant-digit precision, never in
/// scientific notation, trailing zeros stripped. Used for `mostly_pct` in
/// prescriptive templates (precision 5).
pub fn num_to_str(value: f64, precision: u32) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (precision as i32 - 1 - magnitude).max(0) as usize;
    let mut formatted = format!("{:.*}", decimals, value);
    if formatted.contains('.') {
        while formatted.ends_with('0') {
            formatted.pop();
        }
        if formatted.ends_with('.') {
            formatted.pop();
        }
    }
    formatted
}

/// Compact count display for report tables.
pub fn format_numbers(n: usize) -> String {
    match n {
        n if n > 1_000_000_000 => format!("{:0.1}B", n as f64 / 1_000_000_000.0),
        n if n > 1_000_000 => format!("{:0.1}M", n as f64 / 1_000_000.0),
        n if n > 1_000 => format!("{:0.1}K", n as f64 / 1_000.0),
        _ => n.to_string(),
    }
}

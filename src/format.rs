pub const BANNER_WIDTH: usize = 60;

pub fn banner() -> String {
    "=".repeat(BANNER_WIDTH)
}

/// Formats `value` with `,` between every group of three digits.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Percentages always keep a fractional part: `10` prints as `10.0`.
/// Very large values use Rust's exponent form, `1e20` rather than `1e+20`.
pub fn format_percent(value: f64) -> String {
    format!("{value:?}")
}

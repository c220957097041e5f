//! Human-readable byte sizes with binary prefixes

const UNITS: [&str; 8] = ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei", "Zi"];

/// Format a byte count, e.g. `1536 -> "1.5KiB"`
pub fn format_size(bytes: u64) -> String {
    format_size_with_suffix(bytes as f64, "B")
}

/// Format a quantity with binary prefixes up to `Yi`
///
/// The value is divided by 1024 until it drops below 1024 in magnitude;
/// anything past `Zi` is reported in `Yi` whatever its size.
pub fn format_size_with_suffix(mut num: f64, suffix: &str) -> String {
    for unit in UNITS {
        if num.abs() < 1024.0 {
            return format!("{num:3.1}{unit}{suffix}");
        }
        num /= 1024.0;
    }
    format!("{num:.1}Yi{suffix}")
}

//! Human-readable formatting utilities for system metrics.
//!
//! All functions are pure and easy to test in isolation.

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const GIB: u64 = 1024 * MIB;
const TIB: u64 = 1024 * GIB;

/// Format a byte count as a human-readable string using binary units.
///
/// Returns values like `"1.2 GiB"`, `"384 MiB"`, `"0 B"`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes >= TIB {
        format!("{:.1} TiB", bytes as f64 / TIB as f64)
    } else if bytes >= GIB {
        format!("{:.1} GiB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Format a percentage value for display.
///
/// Returns `"--%"` for NaN values, otherwise formats as `"45.2%"`.
pub fn format_percent(value: f32) -> String {
    if value.is_nan() {
        "--%".into()
    } else {
        format!("{:.1}%", value)
    }
}

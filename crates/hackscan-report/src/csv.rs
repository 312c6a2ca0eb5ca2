//! Minimal CSV encoding for the judge-facing tables.
//!
//! Write-only, RFC-4180 quoting for fields that contain delimiters,
//! quotes, or newlines (commit subjects routinely do).

/// Quote a field when it needs it; pass it through otherwise.
pub(crate) fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Join already-escaped fields into one CSV line.
pub(crate) fn line(fields: &[String]) -> String {
    let escaped: Vec<String> = fields.iter().map(|f| escape(f)).collect();
    escaped.join(",")
}

/// Render an optional minutes value: two decimals, or empty for absent —
/// never coerced to 0.
pub(crate) fn minutes(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}

/// Encode a boolean flag as `0`/`1`.
pub(crate) fn bit(value: bool) -> String {
    if value { "1".into() } else { "0".into() }
}

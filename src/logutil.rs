//! Log hygiene: player-supplied strings are escaped before logging so a
//! creative name cannot break the single-line log format.

/// Escape a string for single-line logging. Newlines, carriage returns,
/// tabs and backslashes become their two-character escapes, other control
/// characters become `\xNN`, and long values are truncated with an
/// ellipsis.
pub fn escape_log(s: &str) -> String {
    const MAX_PREVIEW: usize = 120;
    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW) + 4);
    for (seen, ch) in s.chars().enumerate() {
        if seen >= MAX_PREVIEW {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write;
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

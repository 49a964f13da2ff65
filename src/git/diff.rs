use similar::TextDiff;

pub const DEV_NULL: &str = "/dev/null";

/// Appends the zero-context unified diff of one file to `out`.
///
/// Nothing is written when the two sides are identical.
pub fn write_file_diff(out: &mut String, old_path: &str, new_path: &str, old: &str, new: &str) {
    let diff = TextDiff::from_lines(old, new);
    let rendered = diff
        .unified_diff()
        .context_radius(0)
        .header(old_path, new_path)
        .to_string();
    out.push_str(&rendered);
}

pub fn is_binary(data: &[u8]) -> bool {
    data.iter().take(8192).any(|&b| b == 0)
}

//! Hive-style partition directory naming.

/// Directory name used for an empty partition value.
pub const DEFAULT_PARTITION_NAME: &str = "__HIVE_DEFAULT_PARTITION__";

fn needs_escaping(c: char) -> bool {
    c.is_control()
        || matches!(
            c,
            '"' | '#' | '%' | '\'' | '*' | '/' | ':' | '=' | '?' | '\\' | '{' | '}' | '[' | ']'
                | '^'
        )
}

/// Escape a partition value so it is safe as a single path component.
///
/// Reserved characters are written as `%XX` (upper-case hex of each UTF-8
/// byte). An empty value maps to [`DEFAULT_PARTITION_NAME`].
pub fn escape_partition_value(value: &str) -> String {
    if value.is_empty() {
        return DEFAULT_PARTITION_NAME.to_string();
    }

    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if needs_escaping(c) {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                escaped.push_str(&format!("%{byte:02X}"));
            }
        } else {
            escaped.push(c);
        }
    }
    escaped
}

/// Directory name for one partition: `<column>=<escaped value>`.
pub fn partition_dir_name(column: &str, value: &str) -> String {
    format!("{}={}", column, escape_partition_value(value))
}

//! Small helpers for logging and URL handling.

/// Truncate a string for logging purposes.
///
/// Strings longer than `max` characters are cut at a character boundary and
/// suffixed with `"…(+N bytes)"`, where `N` counts the omitted bytes.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// The site part of a URL used for exclusion checks.
///
/// Strips the scheme (`https://`, `http://`, ...), then a leading `www.`,
/// then keeps everything up to the first `/`.
///
/// ```ignore
/// assert_eq!(site_domain("https://www.wsj.com/x/y"), "wsj.com");
/// assert_eq!(site_domain("https://finance.yahoo.com/news"), "finance.yahoo.com");
/// ```
pub fn site_domain(url: &str) -> &str {
    let rest = match url.find("://") {
        Some(i) => &url[i + 3..],
        None => url,
    };
    let rest = rest.strip_prefix("www.").unwrap_or(rest);
    rest.split('/').next().unwrap_or(rest)
}

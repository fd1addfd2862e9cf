// Target URL resolution and encoding

/// Characters `encodeURI` leaves untouched besides ASCII alphanumerics
const URI_SAFE: &str = "-_.!~*'();/?:@&=+$,#";

/// True for `http://` and `https://` URLs
pub fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Resolve a web action URL against the default target URI
///
/// Relative URLs get the base prefixed, with exactly one slash between the
/// two. Absolute URLs, an empty URL, and a missing or empty base leave the
/// URL unchanged. Resolving an absolute URL is always a no-op.
///
/// # Example
/// ```
/// use volley_core::application::target::resolve_target;
///
/// assert_eq!(resolve_target("/login", Some("http://x.test/")), "http://x.test/login");
/// assert_eq!(resolve_target("https://y.test/a", Some("http://x.test")), "https://y.test/a");
/// ```
pub fn resolve_target(url: &str, default_base: Option<&str>) -> String {
    let base = match default_base {
        Some(base) if !base.is_empty() => base,
        _ => return url.to_string(),
    };

    if url.is_empty() || is_absolute(url) {
        return url.to_string();
    }

    let base = base.strip_suffix('/').unwrap_or(base);
    if url.starts_with('/') {
        format!("{}{}", base, url)
    } else {
        format!("{}/{}", base, url)
    }
}

/// Percent-encode a full URL the way `encodeURI` does
///
/// Reserved and unreserved URI characters are kept, everything else
/// (spaces, quotes, `%`, non-ASCII) is encoded as UTF-8 bytes.
pub fn encode_uri(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    let mut buf = [0u8; 4];
    for ch in url.chars() {
        if ch.is_ascii_alphanumeric() || URI_SAFE.contains(ch) {
            out.push(ch);
        } else {
            out.push_str(&urlencoding::encode(ch.encode_utf8(&mut buf)));
        }
    }
    out
}

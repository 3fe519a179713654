// src/core/sanitize.rs

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Identifier form of a page URL: query string and fragment removed.
/// `https://site/page?ref=ads` and `https://site/page` are the same page.
pub fn canonicalize_url(href: &str) -> String {
    let href = href.trim();
    let cut = href.find(['?', '#']).unwrap_or(href.len());
    href[..cut].to_string()
}

/// Drop a trailing site suffix from a page title ("Acme | Facebook" → "Acme").
pub fn strip_title_suffix(title: &str, suffix: &str) -> String {
    let t = title.trim();
    t.strip_suffix(suffix.trim_start())
        .or_else(|| t.strip_suffix(suffix))
        .unwrap_or(t)
        .trim()
        .to_string()
}

/// Cut to at most `max` characters (not bytes).
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

/// Percent-encode a search keyword for the discovery query string.
pub fn encode_query(keyword: &str) -> String {
    urlencoding::encode(keyword.trim()).into_owned()
}

use regex::Regex;
use std::sync::OnceLock;

/// Optional scheme, optional subdomain, dotted hostname with a 2+ letter TLD,
/// optional path/query. Best-effort heuristic, not a URL parser: unusual TLDs
/// and punctuation glued to a URL will be missed or over-matched. `\w` is
/// Unicode-aware, so non-ASCII hostnames (e.g. `пример.com`) match as well.
const LINK_PATTERN: &str = r"(https?://)?([\w-]+\.)?[\w-]+\.[a-z]{2,}(/[^\s]*)?";

fn link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(LINK_PATTERN).expect("link pattern compiles"))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum LinkToken {
    Text(String),
    /// `label` is the literal matched text; `href` is the normalized target.
    Link { href: String, label: String },
}

/// Scheme-less matches are normalized to absolute https URLs.
///
/// Leaving the literal text as the target would make the browser resolve it
/// as a path relative to the app, which is never what a note like
/// `example.com` means.
pub(crate) fn normalize_href(matched: &str) -> String {
    if matched.starts_with("http://") || matched.starts_with("https://") {
        matched.to_string()
    } else {
        format!("https://{matched}")
    }
}

/// Split plain text into text runs and URL-like matches.
///
/// Rules:
/// - Matches never span whitespace.
/// - The visible label is always the literal matched text.
/// - Adjacent non-matching text is preserved verbatim, including newlines.
pub(crate) fn tokenize_links(input: &str) -> Vec<LinkToken> {
    let mut out: Vec<LinkToken> = Vec::new();
    let mut last = 0;

    for m in link_regex().find_iter(input) {
        if m.start() > last {
            out.push(LinkToken::Text(input[last..m.start()].to_string()));
        }
        out.push(LinkToken::Link {
            href: normalize_href(m.as_str()),
            label: m.as_str().to_string(),
        });
        last = m.end();
    }

    if last < input.len() {
        out.push(LinkToken::Text(input[last..].to_string()));
    }

    out
}

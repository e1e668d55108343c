// src/news/mod.rs
pub mod newsapi;
pub mod types;

pub use newsapi::NewsApiClient;
pub use types::{Article, NewsSource};

use once_cell::sync::OnceCell;
use regex::Regex;

/// Clean a raw article title for scoring: decode HTML entities, strip tags,
/// straighten curly quotes and collapse whitespace. Punctuation is kept since
/// `!`/`?` carry sentiment emphasis.
pub fn clean_title(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").expect("valid tag regex"));
    out = re_tags.replace_all(&out, "").to_string();

    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"));
    re_ws.replace_all(&out, " ").trim().to_string()
}

/// The text that gets scored for an article; a missing title scores as empty text.
pub fn headline_of(article: &Article) -> String {
    article.title.as_deref().map(clean_title).unwrap_or_default()
}

/// Headlines in article order, one per article.
pub fn headlines(articles: &[Article]) -> Vec<String> {
    articles.iter().map(headline_of).collect()
}

/// Short, non-reversible tag for an API key so logs can tell keys apart
/// without carrying the secret.
pub fn key_fingerprint(api_key: &str) -> String {
    use sha2::{Digest, Sha256};
    use std::fmt::Write as _;

    let digest = Sha256::digest(api_key.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

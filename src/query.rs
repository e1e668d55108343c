//! Ticker → news search query.

/// Strip an exchange/share-class suffix so the news search matches the company
/// (`"BRK.B"` searches for `"BRK"`). Everything from the first `.` on is dropped.
pub fn format_query(ticker: &str) -> &str {
    match ticker.split_once('.') {
        Some((base, _)) => base,
        None => ticker,
    }
}

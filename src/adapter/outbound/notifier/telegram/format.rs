//! Caption formatting for Telegram listing alerts.

use crate::domain::money::{fixed, grouped_whole};
use crate::domain::Listing;

/// Longest item name rendered in a caption.
const MAX_NAME_CHARS: usize = 120;

/// Format the HTML caption for a listing alert.
///
/// ```text
/// 🆕 <b>Rock #1</b>
/// 💰 1.50000000 BTC
/// 💵 $90000.00
/// ===============
/// <price text>
/// 💹 1 BTC = $60,000
/// ```
pub fn format_caption(listing: &Listing, price_text: &str) -> String {
    let name = truncate(listing.name(), MAX_NAME_CHARS);

    format!(
        "🆕 <b>{}</b>\n\
        💰 {} BTC\n\
        💵 ${}\n\
        ===============\n\
        {}\n\
        💹 1 BTC = ${}",
        escape_html(&name),
        fixed(listing.price_btc(), 8),
        fixed(listing.price_usd(), 2),
        escape_html(price_text),
        grouped_whole(listing.btc_usd_rate()),
    )
}

/// Truncate a string with ellipsis (Unicode-safe).
pub fn truncate(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

/// Escape the characters Telegram's HTML parse mode treats as markup.
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }

    result
}

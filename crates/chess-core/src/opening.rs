//! Opening identifiers taken from Chess.com's `ECOUrl` header.

use std::sync::LazyLock;

use regex::Regex;

static OPENING_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https://www\.chess\.com/openings/(.+)").unwrap());

/// Running token length at which a display name wraps.
const WRAP_WIDTH: usize = 14;

/// Extract the opening slug from an opening URL, e.g.
/// `https://www.chess.com/openings/Sicilian-Defense-2.Nf3` → `Sicilian-Defense-2.Nf3`.
pub fn opening_slug(url: &str) -> Option<&str> {
    OPENING_URL_RE
        .captures(url)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim())
        .filter(|slug| !slug.is_empty())
}

/// Format a slug for chart labels: tokens keep their hyphens, and a line
/// break goes before the token that brings the running length to 14 or more.
/// The counter restarts after each break.
pub fn prettify_opening(slug: &str) -> String {
    let mut out = String::with_capacity(slug.len() + 4);
    let mut running = 0;

    for token in slug.split('-') {
        running += token.len();
        if running >= WRAP_WIDTH {
            running = 0;
            if !out.is_empty() {
                out.push('\n');
            }
        }
        out.push_str(token);
        out.push('-');
    }

    let trimmed = out.trim_end_matches('-').len();
    out.truncate(trimmed);
    out
}

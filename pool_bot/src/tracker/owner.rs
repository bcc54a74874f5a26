//! Owner mention parsing.

use regex::Regex;
use std::sync::LazyLock;

static MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<@!?(?P<id>\d+)>").expect("valid mention pattern"));

/// Identity id of the first user mentioned in `text`.
///
/// Accepts both `<@id>` and the nickname form `<@!id>`.
pub fn mentioned_owner(text: &str) -> Option<String> {
    MENTION
        .captures(text)
        .and_then(|captures| captures.name("id"))
        .map(|id| id.as_str().to_string())
}

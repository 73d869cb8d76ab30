//! Strip markdown decoration from AI output so the point extractor sees plain text.

use regex::Regex;
use std::sync::LazyLock;

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]\n]+)\]\([^)\n]*\)").unwrap());

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[ \t]*#{1,6}[ \t]+").unwrap());

static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*([^\n]+?)\*\*").unwrap());

static UNDERLINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:__([^\n]+?)__|<u>([^\n]*?)</u>)").unwrap()
});

// The opener must hug its text, so a `* ` list bullet never pairs with a later `*`.
static STAR_ITALIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^\s*](?:[^*\n]*?[^\s*])?)\*").unwrap());

// `_x_` only when the underscores are not inside a word (snake_case survives).
static UNDERSCORE_ITALIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[^\w])_([^_\n]+)_([^\w]|$)").unwrap());

/// Remove bold, italic, underline and heading markers; rewrite `[text](url)` to `text`.
pub fn clean_markdown(raw: &str) -> String {
    let s = LINK_RE.replace_all(raw, "$1");
    let s = HEADING_RE.replace_all(&s, "");
    let s = BOLD_RE.replace_all(&s, "$1");
    let s = UNDERLINE_RE.replace_all(&s, "$1$2");
    let s = STAR_ITALIC_RE.replace_all(&s, "$1");
    let s = UNDERSCORE_ITALIC_RE.replace_all(&s, "$1$2$3");
    s.into_owned()
}

/// Same as [`clean_markdown`] for an optional field; absent degrades to empty.
pub fn clean_optional(raw: Option<&str>) -> String {
    raw.map(clean_markdown).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_emphasis() {
        assert_eq!(clean_markdown("**Call** the *client* now"), "Call the client now");
        assert_eq!(clean_markdown("__Read__ <u>carefully</u>"), "Read carefully");
        assert_eq!(clean_markdown("an _important_ note"), "an important note");
    }

    #[test]
    fn test_star_bullet_next_to_emphasis() {
        assert_eq!(clean_markdown("* Buy *fresh* milk"), "* Buy fresh milk");
        assert_eq!(clean_markdown("*a* and *b*"), "a and b");
        assert_eq!(clean_markdown("2 * 3 * 4"), "2 * 3 * 4");
    }

    #[test]
    fn test_keeps_snake_case() {
        assert_eq!(clean_markdown("rename user_id to owner_id"), "rename user_id to owner_id");
    }

    #[test]
    fn test_headings_and_links() {
        let raw = "## Plan\n### Steps\n1. Read [the docs](https://example.com/docs)\n#hashtag stays";
        assert_eq!(clean_markdown(raw), "Plan\nSteps\n1. Read the docs\n#hashtag stays");
    }

    #[test]
    fn test_seven_hashes_is_not_a_heading() {
        assert_eq!(clean_markdown("####### deep"), "####### deep");
    }

    #[test]
    fn test_absent_input() {
        assert_eq!(clean_optional(None), "");
    }
}

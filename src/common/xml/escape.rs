use crate::common::{Error, Result};
use aho_corasick::{AhoCorasick, MatchKind};
use once_cell::sync::Lazy;

// Static initialization: automaton is built only once, thread-safe
static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'"])
        .expect("Failed to build XML escaper")
});

// Use LeftmostLongest to ensure longer entities are matched first (e.g., &amp; instead of &lt;)
static XML_UNESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostLongest)
        .build(["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
        .expect("Failed to build XML unescaper")
});

/// Escape XML special characters.
///
/// # Examples
///
/// ```
/// use docx_compose::common::xml::escape_xml;
/// assert_eq!(escape_xml("a & b"), "a &amp; b");
/// assert_eq!(escape_xml("TOC \\o \"1-3\""), "TOC \\o &quot;1-3&quot;");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    XML_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
}

/// Unescape the five predefined XML entities.
///
/// Numeric character references and unknown entities are left unchanged;
/// style names and relationship targets never need them.
///
/// # Examples
///
/// ```
/// use docx_compose::common::xml::unescape_xml;
/// assert_eq!(unescape_xml("&lt;a &amp; b&gt;"), "<a & b>");
/// assert_eq!(unescape_xml("&amp;lt;"), "&lt;");
/// assert_eq!(unescape_xml("&invalid;"), "&invalid;");
/// ```
#[inline]
pub fn unescape_xml(s: &str) -> String {
    XML_UNESCAPER.replace_all(s, &["&", "<", ">", "\"", "'"])
}

/// Whether `c` may appear in XML 1.0 character data.
#[inline]
pub fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..)
}

/// Fail with [`Error::Xml`] on the first character XML 1.0 does not allow.
pub fn check_xml_text(s: &str) -> Result<()> {
    match s.chars().find(|c| !is_xml_char(*c)) {
        Some(c) => Err(Error::Xml(format!(
            "character U+{:04X} is not allowed in XML text",
            c as u32
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_chars() {
        assert!(check_xml_text("tab\tline\nreturn\r é \u{1F600}").is_ok());
        for bad in ["bad\u{1}char", "\u{0}", "\u{B}", "\u{FFFE}", "\u{FFFF}"] {
            assert!(matches!(check_xml_text(bad), Err(Error::Xml(_))), "{bad:?}");
        }
        let err = check_xml_text("x\u{1}").unwrap_err();
        assert!(err.to_string().contains("U+0001"));
    }
}

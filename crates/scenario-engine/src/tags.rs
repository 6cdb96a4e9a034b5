//! Display-name tags
//!
//! A generated scenario is named `"<base> <Tag> <value><suffix>"`. Applying
//! the same modifier again must replace its tag rather than stack a second
//! one, so this module can detect, strip and rewrite tags.
//!
//! Tag detection is a loose heuristic kept for compatibility with names
//! produced by earlier releases: a tag is a space, the tag text as a whole
//! word, another space, then anything up to a capitalized word or the end.
//! Names containing the tag text as an ordinary word can be mis-truncated.

use crate::catalog::{ModifierKey, TagTexts, ValueSuffix};
use regex::Regex;
use std::ops::Range;

/// Render one tag, e.g. `"Size 150%"` or `"Dur 45s"`
#[must_use]
pub fn format_tag(tag_text: &str, suffix: ValueSuffix, value: u32) -> String {
    match suffix {
        ValueSuffix::Seconds => format!("{tag_text} {value}s"),
        ValueSuffix::Percent => format!("{tag_text} {value}%"),
    }
}

/// Truncate `name` before the first tag of each tag text, in order
///
/// Each tag text works on the result of the previous one. The result is
/// trimmed.
#[must_use]
pub fn strip_known_tags<'a>(name: &str, tag_texts: impl IntoIterator<Item = &'a str>) -> String {
    let mut base = name;
    for tag in tag_texts {
        // The tag extends lazily to the next capitalized word or the end of
        // the name; either always exists, so only the start matters.
        let Ok(pattern) = Regex::new(&format!(r" \b{}\b ", regex::escape(tag))) else {
            continue;
        };
        if let Some(found) = pattern.find(base) {
            base = &base[..found.start()];
        }
    }
    base.trim().to_string()
}

/// Byte range of an existing `"<tag_text> <digits><suffix>"` tag in `name`
#[must_use]
pub fn find_tag(name: &str, tag_text: &str, suffix: ValueSuffix) -> Option<Range<usize>> {
    let pattern = format!(
        r" (\b{}\b \d+{})",
        regex::escape(tag_text),
        regex::escape(suffix.as_str())
    );
    let captures = Regex::new(&pattern).ok()?.captures(name)?;
    captures.get(1).map(|m| m.range())
}

/// Name of the variant produced by applying `key` at `value` to `current`
///
/// An existing tag for the same modifier is re-valued in place. Otherwise the
/// new tag is appended, after stripping known tags when the bare tag text
/// already appears as a word in the name.
#[must_use]
pub fn derive_name(current: &str, key: ModifierKey, value: u32, tags: &TagTexts) -> String {
    let current = current.trim();
    let tag_text = tags.get(key);
    let suffix = key.definition().suffix;
    let new_tag = format_tag(tag_text, suffix, value);

    if let Some(range) = find_tag(current, tag_text, suffix) {
        let mut renamed = current.to_string();
        renamed.replace_range(range, &new_tag);
        return renamed;
    }

    if current.contains(&format!(" {tag_text} ")) {
        let base = strip_known_tags(current, tags.iter());
        format!("{base} {new_tag}")
    } else {
        format!("{current} {new_tag}")
    }
}

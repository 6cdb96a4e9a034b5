//! Section tracking shared by the parser and the mutator
//!
//! A scenario file is a flat list of lines. The only structure is the most
//! recent `[Header]` seen, plus the `name=` of the character profile being
//! read. Both are carried in a [`SectionState`] value that is threaded
//! through a fold over the lines.

/// Header that opens a character profile section (compared case-insensitively)
pub const CHARACTER_PROFILE_HEADER: &str = "[character profile]";

/// Section the current line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    /// Before any header; implicit global scope
    #[default]
    Preamble,
    /// Inside `[Character Profile]`
    CharacterProfile,
    /// Inside any other section
    Other,
}

/// One classified source line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Trimmed content starts with `[`
    Header(&'a str),
    /// `key=value`, both sides trimmed
    Entry {
        /// Text before the first `=`
        key: &'a str,
        /// Text after the first `=`
        value: &'a str,
    },
    /// Anything else, copied through untouched
    Other,
}

impl<'a> Line<'a> {
    /// Classify a raw line (terminator included or not)
    #[must_use]
    pub fn classify(raw: &'a str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with('[') {
            return Self::Header(trimmed);
        }
        match raw.split_once('=') {
            Some((key, value)) => Self::Entry {
                key: key.trim(),
                value: value.trim(),
            },
            None => Self::Other,
        }
    }
}

/// Explicit state of the section machine
///
/// `Preamble` is initial. Any `[character profile]` header enters
/// `CharacterProfile` and clears the profile name; any other header enters
/// `Other`. There is no terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SectionState {
    section: Section,
    profile: Option<String>,
}

impl SectionState {
    /// Initial state
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current section
    #[inline]
    #[must_use]
    pub fn section(&self) -> Section {
        self.section
    }

    /// True before the first header
    #[inline]
    #[must_use]
    pub fn in_preamble(&self) -> bool {
        self.section == Section::Preamble
    }

    /// Name of the character profile being read, if inside a named one
    #[inline]
    #[must_use]
    pub fn profile(&self) -> Option<&str> {
        match self.section {
            Section::CharacterProfile => self.profile.as_deref(),
            _ => None,
        }
    }

    /// Transition on one classified line
    #[must_use]
    pub fn advance(mut self, line: &Line<'_>) -> Self {
        match *line {
            Line::Header(header) => {
                self.section = if header.eq_ignore_ascii_case(CHARACTER_PROFILE_HEADER) {
                    Section::CharacterProfile
                } else {
                    Section::Other
                };
                self.profile = None;
            }
            Line::Entry { key, value }
                if self.section == Section::CharacterProfile
                    && key.eq_ignore_ascii_case("name") =>
            {
                self.profile = Some(value.to_string());
            }
            Line::Entry { .. } | Line::Other => {}
        }
        self
    }
}

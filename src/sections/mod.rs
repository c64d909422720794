//! Tagged-section wire format
//!
//! The composer and the parser talk through one text blob made of four
//! sections, each introduced by a bracketed tag on its own line:
//!
//! ```text
//! blob    := section*
//! section := "[" TAG "]" body
//! TAG     := "WEATHER" | "PLACES" | "REVIEWS" | "TRANSPORT"
//! body    := any text up to the next tag or end of input
//! ```
//!
//! The blob travels through an agent that may rewrite it, so the parser
//! only trusts the tags. Everything inside a body is decoded best-effort.

use regex::Regex;
use std::fmt::Display;
use std::sync::LazyLock;

pub mod compose;
pub mod parse;

pub use compose::compose;
pub use parse::{ParsedResponse, TransportEntry, parse_response};

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[(WEATHER|PLACES|REVIEWS|TRANSPORT)\]").expect("tag pattern is valid")
});

/// Section tags in protocol order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionTag {
    Weather,
    Places,
    Reviews,
    Transport,
}

impl SectionTag {
    pub const ALL: [SectionTag; 4] = [
        SectionTag::Weather,
        SectionTag::Places,
        SectionTag::Reviews,
        SectionTag::Transport,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SectionTag::Weather => "WEATHER",
            SectionTag::Places => "PLACES",
            SectionTag::Reviews => "REVIEWS",
            SectionTag::Transport => "TRANSPORT",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.name().eq_ignore_ascii_case(name))
    }
}

impl Display for SectionTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.name())
    }
}

/// Trimmed section bodies; `None` when the tag is absent from the blob
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawSections<'a> {
    pub weather: Option<&'a str>,
    pub places: Option<&'a str>,
    pub reviews: Option<&'a str>,
    pub transport: Option<&'a str>,
}

impl<'a> RawSections<'a> {
    #[must_use]
    pub fn get(&self, tag: SectionTag) -> Option<&'a str> {
        match tag {
            SectionTag::Weather => self.weather,
            SectionTag::Places => self.places,
            SectionTag::Reviews => self.reviews,
            SectionTag::Transport => self.transport,
        }
    }

    fn slot(&mut self, tag: SectionTag) -> &mut Option<&'a str> {
        match tag {
            SectionTag::Weather => &mut self.weather,
            SectionTag::Places => &mut self.places,
            SectionTag::Reviews => &mut self.reviews,
            SectionTag::Transport => &mut self.transport,
        }
    }
}

/// Cut the blob at every known tag. Each section runs from its first tag to
/// the next tag occurrence of any kind, or to the end of the text, so
/// reordered or missing sections do not disturb the others.
#[must_use]
pub fn split_sections(blob: &str) -> RawSections<'_> {
    let markers: Vec<(SectionTag, usize, usize)> = TAG_RE
        .captures_iter(blob)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let tag = SectionTag::from_name(caps.get(1)?.as_str())?;
            Some((tag, whole.start(), whole.end()))
        })
        .collect();

    let mut sections = RawSections::default();
    for (i, (tag, _, body_start)) in markers.iter().enumerate() {
        let slot = sections.slot(*tag);
        if slot.is_some() {
            continue;
        }
        let body_end = markers
            .get(i + 1)
            .map_or(blob.len(), |(_, next_start, _)| *next_start);
        *slot = Some(blob[*body_start..body_end].trim());
    }
    sections
}

//! Helpers to measure text and to collect the characters a document uses.

use std::collections::BTreeMap;
use unicode_segmentation::UnicodeSegmentation;

/// Split text into grapheme clusters, i.e. user-perceived characters.
///
/// An emoji with a skin tone modifier or a sequence of emoji joined with
/// zero-width joiners is a single cluster.
pub fn graphemes(text: &str) -> impl Iterator<Item = &str> + '_ {
    text.graphemes(true)
}

/// The width of a grapheme cluster, which is the width of its first
/// character. Modifiers and joiners don't add to it.
///
/// Returns 0 for an empty cluster or a character without a width.
pub fn cluster_width(cluster: &str, widths: &BTreeMap<u32, u16>) -> u16 {
    cluster
        .chars()
        .next()
        .and_then(|c| widths.get(&(c as u32)).copied())
        .unwrap_or(0)
}

/// The width of a text, as the sum of the widths of its grapheme clusters.
pub fn text_width(text: &str, widths: &BTreeMap<u32, u16>) -> u32 {
    graphemes(text).map(|cluster| u32::from(cluster_width(cluster, widths))).sum()
}

/// Whether a character is in one of the common emoji blocks.
pub fn is_emoji(c: char) -> bool {
    matches!(c, '\u{1F300}'..='\u{1F9FF}' | '\u{2600}'..='\u{26FF}' | '\u{2700}'..='\u{27BF}')
}

/// Collects the characters used in a document.
///
/// Each character is its own CID, so the resulting map can be passed to
/// [`subset`](crate::subset) directly.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct UsedRunes {
    map: BTreeMap<u32, u32>,
}

impl UsedRunes {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a single character. The null character is ignored, since
    /// CID 0 is reserved.
    pub fn add(&mut self, c: char) {
        let cp = c as u32;
        if cp != 0 {
            self.map.insert(cp, cp);
        }
    }

    /// Record all characters of a text.
    pub fn add_text(&mut self, text: &str) {
        text.chars().for_each(|c| self.add(c));
    }

    /// The highest CID in use, or 0 if there is none.
    pub fn last_cid(&self) -> u32 {
        self.map.keys().next_back().copied().unwrap_or(0)
    }

    /// The CID to Unicode map.
    pub fn as_map(&self) -> &BTreeMap<u32, u32> {
        &self.map
    }

    /// Whether no character was recorded.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

use crate::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};

/// A remapper that allows to assign a new ordering to a subset of glyphs.
/// For example, let's say that we want to subset a font that only contains the
/// glyphs 4, 9 and 16. In this case, the remapper yields the following
/// glyph IDs:
/// 0 -> 0 (The .notdef glyph will always be included)
/// 4 -> 1
/// 9 -> 2
/// 16 -> 3
/// This is necessary because a font needs to have a contiguous sequence of
/// glyph IDs that start from 0, so we cannot just reuse the old ones, but we
/// need to define a mapping.
#[derive(Debug, Clone)]
pub(crate) struct GlyphRemapper {
    /// Maps old glyph IDs to new ones.
    forward: BTreeMap<u16, u16>,
    /// The old glyph ID of each new one.
    backward: Vec<u16>,
}

impl GlyphRemapper {
    /// Create a new instance of a glyph remapper.
    pub(crate) fn new() -> Self {
        let mut remapper = Self { forward: BTreeMap::new(), backward: vec![] };
        // .notdef is always a part of a subset.
        remapper.forward.insert(0, 0);
        remapper.backward.push(0);
        remapper
    }

    /// Create a remapper from an existing set of glyphs. The mapping is
    /// monotonically increasing.
    pub(crate) fn new_from_glyphs(glyphs: &BTreeSet<u16>) -> Result<Self> {
        let mut map = Self::new();
        for &glyph in glyphs {
            map.remap(glyph)?;
        }
        Ok(map)
    }

    /// Get the number of gids that have been remapped.
    pub(crate) fn num_gids(&self) -> u16 {
        // Can't overflow, `remap` refuses a 65537th glyph.
        self.backward.len() as u16
    }

    /// Remap a glyph ID, or return the existing mapping if the
    /// glyph ID has already been remapped before.
    pub(crate) fn remap(&mut self, old: u16) -> Result<u16> {
        if let Some(&new) = self.forward.get(&old) {
            return Ok(new);
        }

        let new = u16::try_from(self.backward.len()).map_err(|_| Error::OverflowError)?;
        self.forward.insert(old, new);
        self.backward.push(old);
        Ok(new)
    }

    /// Get the mapping of a glyph ID, if it has been remapped before.
    pub(crate) fn get(&self, old: u16) -> Option<u16> {
        self.forward.get(&old).copied()
    }

    /// Return an iterator that yields the old glyphs in the order of their
    /// new glyph IDs.
    pub(crate) fn remapped_gids(&self) -> impl Iterator<Item = u16> + '_ {
        self.backward.iter().copied()
    }
}

//! The `cmap` table maps characters to glyphs.
//!
//! For reading, we only look at the Unicode subtables in format 4 (BMP) and
//! format 12 (full Unicode). Both are decoded into a [`CharMap`], which keeps
//! the mapping as a list of ranges so that fonts covering large blocks don't
//! blow up in memory.
//!
//! For writing, the subset always gets a single format 12 subtable.

mod subtable12;
mod subtable4;

use self::subtable12::Subtable12;
use self::subtable4::Subtable4;
use crate::read::{Readable, Reader};
use crate::write::{Writeable, Writer};
use crate::{Context, Error, Face, Result, Tag};
use std::collections::BTreeMap;

#[derive(Debug, Copy, Clone)]
struct EncodingRecord {
    platform_id: u16,
    encoding_id: u16,
    subtable_offset: u32,
}

impl EncodingRecord {
    fn is_unicode(&self) -> bool {
        self.platform_id == 0
            || (self.platform_id == 3 && [1, 10].contains(&self.encoding_id))
    }
}

impl Readable<'_> for EncodingRecord {
    const SIZE: usize = 8;

    fn read(r: &mut Reader) -> Option<Self> {
        let platform_id = r.read::<u16>()?;
        let encoding_id = r.read::<u16>()?;
        let subtable_offset = r.read::<u32>()?;

        Some(EncodingRecord { platform_id, encoding_id, subtable_offset })
    }
}

impl Writeable for EncodingRecord {
    fn write(&self, w: &mut Writer) {
        w.write::<u16>(self.platform_id);
        w.write::<u16>(self.encoding_id);
        w.write::<u32>(self.subtable_offset);
    }
}

/// One of the supported Unicode subtables.
#[derive(Debug)]
pub(crate) enum Subtable<'a> {
    Format4(Subtable4<'a>),
    Format12(Subtable12),
}

impl Subtable<'_> {
    /// Decode the full character map of the subtable.
    pub(crate) fn char_map(&self) -> Result<CharMap> {
        match self {
            Self::Format4(subtable) => subtable.char_map(),
            Self::Format12(subtable) => Ok(subtable.char_map()),
        }
    }
}

/// Find the preferred Unicode subtable of a `cmap` table.
///
/// The first format 12 subtable wins right away. Otherwise, the first format
/// 4 subtable is used.
pub(crate) fn find_subtable(cmap: &[u8]) -> Result<Subtable<'_>> {
    let mut r = Reader::new(cmap);
    r.read::<u16>().ok_or(Error::InvalidCmap)?; // version
    let num_tables = r.read::<u16>().ok_or(Error::InvalidCmap)?;
    let records = r.read_array16::<EncodingRecord>(num_tables).ok_or(Error::InvalidCmap)?;

    let mut format4 = None;
    for record in records {
        if !record.is_unicode() {
            continue;
        }

        let offset = record.subtable_offset as usize;
        match u16::read_at(cmap, offset) {
            Some(12) => {
                log::debug!(
                    "using format 12 cmap subtable ({}, {})",
                    record.platform_id,
                    record.encoding_id
                );
                let data = cmap.get(offset..).ok_or(Error::InvalidCmap)?;
                return Ok(Subtable::Format12(Subtable12::parse(data)?));
            }
            Some(4) if format4.is_none() => format4 = Some(record),
            _ => {}
        }
    }

    let record = format4.ok_or(Error::MissingUnicodeCmap)?;
    log::debug!(
        "using format 4 cmap subtable ({}, {})",
        record.platform_id,
        record.encoding_id
    );
    let data = cmap.get(record.subtable_offset as usize..).ok_or(Error::InvalidCmap)?;
    Ok(Subtable::Format4(Subtable4::parse(data)?))
}

/// Read the character map of a face.
pub(crate) fn parse(face: &Face) -> Result<CharMap> {
    let cmap = face.table(Tag::CMAP).ok_or(Error::MissingUnicodeCmap)?;
    find_subtable(cmap)?.char_map()
}

/// Write a `cmap` table with a single format 12 subtable for the new glyphs.
pub(crate) fn subset(ctx: &mut Context) -> Result<()> {
    let groups = build_groups(&ctx.char_glyphs);

    let mut sub_cmap = Writer::new();
    sub_cmap.write::<u16>(0); // version
    sub_cmap.write::<u16>(1); // number of subtables
    sub_cmap.write(EncodingRecord {
        platform_id: 3,
        encoding_id: 10,
        subtable_offset: 12,
    });
    sub_cmap.extend(&format12_subtable(&groups));

    ctx.push(Tag::CMAP, sub_cmap.finish());
    Ok(())
}

/// A run of consecutive characters mapped to consecutive glyphs.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct CmapGroup {
    /// The first character of the run.
    pub start_char: u32,
    /// The last character of the run (inclusive).
    pub end_char: u32,
    /// The glyph of `start_char`.
    pub start_glyph: u32,
}

impl CmapGroup {
    /// The glyph of `end_char`.
    fn end_glyph(&self) -> u32 {
        self.start_glyph + (self.end_char - self.start_char)
    }

    fn contains(&self, c: u32) -> bool {
        (self.start_char..=self.end_char).contains(&c)
    }
}

impl Readable<'_> for CmapGroup {
    const SIZE: usize = 12;

    fn read(r: &mut Reader) -> Option<Self> {
        Some(Self {
            start_char: r.read::<u32>()?,
            end_char: r.read::<u32>()?,
            start_glyph: r.read::<u32>()?,
        })
    }
}

impl Writeable for CmapGroup {
    fn write(&self, w: &mut Writer) {
        w.write::<u32>(self.start_char);
        w.write::<u32>(self.end_char);
        w.write::<u32>(self.start_glyph);
    }
}

/// Build the minimal list of groups for a character to glyph mapping.
///
/// A character continues the current group if both its code and its glyph
/// follow the previous ones.
pub fn build_groups(map: &BTreeMap<u32, u32>) -> Vec<CmapGroup> {
    group_pairs(map.iter().map(|(&c, &g)| (c, g)))
}

/// Group pairs that are sorted by character and free of duplicates.
fn group_pairs(pairs: impl IntoIterator<Item = (u32, u32)>) -> Vec<CmapGroup> {
    let mut groups: Vec<CmapGroup> = vec![];
    for (c, g) in pairs {
        if let Some(last) = groups.last_mut() {
            if last.end_char.checked_add(1) == Some(c)
                && last.end_glyph().checked_add(1) == Some(g)
            {
                last.end_char = c;
                continue;
            }
        }

        groups.push(CmapGroup { start_char: c, end_char: c, start_glyph: g });
    }
    groups
}

/// The 16-byte header of a format 12 subtable with `num_groups` groups.
pub fn format12_header(num_groups: u32) -> [u8; 16] {
    let mut w = Writer::with_capacity(16);
    write_format12_header(&mut w, num_groups);

    let mut header = [0; 16];
    header.copy_from_slice(&w.finish());
    header
}

fn write_format12_header(w: &mut Writer, num_groups: u32) {
    w.write::<u16>(12); // format
    w.write::<u16>(0); // reserved
    w.write::<u32>(16 + 12 * num_groups); // length
    w.write::<u32>(0); // language
    w.write::<u32>(num_groups);
}

/// A complete format 12 subtable with the given groups.
pub fn format12_subtable(groups: &[CmapGroup]) -> Vec<u8> {
    let mut w = Writer::with_capacity(16 + 12 * groups.len());
    write_format12_header(&mut w, groups.len() as u32);
    for group in groups {
        w.write(group);
    }
    w.finish()
}

/// A decoded character to glyph mapping.
///
/// Characters that map to the `.notdef` glyph are not part of the map.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct CharMap {
    /// Sorted, non-overlapping and minimal.
    groups: Vec<CmapGroup>,
}

impl CharMap {
    /// Create a map from arbitrary groups, as found in a font file.
    ///
    /// Overlapping ranges are resolved in favor of the group that starts
    /// first, and glyph IDs that don't fit into 16 bits are dropped.
    pub(crate) fn from_groups(mut raw: Vec<CmapGroup>) -> Self {
        raw.sort_by_key(|group| group.start_char);

        let mut groups: Vec<CmapGroup> = Vec::with_capacity(raw.len());
        for mut group in raw {
            if group.start_char > group.end_char || group.start_glyph > 0xFFFF {
                log::warn!("skipping invalid cmap group {:?}", group);
                continue;
            }

            let max_len = 0xFFFF - group.start_glyph;
            if group.end_char - group.start_char > max_len {
                log::warn!("truncating cmap group {:?} to 16-bit glyph IDs", group);
                group.end_char = group.start_char + max_len;
            }

            if let Some(prev) = groups.last() {
                if group.start_char <= prev.end_char {
                    log::warn!("cmap group {:?} overlaps the previous one", group);
                    if group.end_char <= prev.end_char {
                        continue;
                    }

                    let skip = prev.end_char + 1 - group.start_char;
                    group.start_char += skip;
                    group.start_glyph += skip;
                }
            }

            if group.start_glyph == 0 {
                if group.start_char == group.end_char {
                    continue;
                }
                group.start_char += 1;
                group.start_glyph = 1;
            }

            if let Some(prev) = groups.last_mut() {
                if prev.end_char + 1 == group.start_char
                    && prev.end_glyph() + 1 == group.start_glyph
                {
                    prev.end_char = group.end_char;
                    continue;
                }
            }

            groups.push(group);
        }

        Self { groups }
    }

    /// Create a map from a sorted mapping. Entries with glyph 0 are dropped.
    pub(crate) fn from_map(map: &BTreeMap<u32, u16>) -> Self {
        let pairs = map.iter().filter(|&(_, &g)| g != 0).map(|(&c, &g)| (c, u32::from(g)));
        Self { groups: group_pairs(pairs) }
    }

    /// The glyph that a character maps to.
    pub fn glyph_index(&self, c: u32) -> Option<u16> {
        let index = self
            .groups
            .binary_search_by(|group| {
                use std::cmp::Ordering;

                if group.start_char > c {
                    Ordering::Greater
                } else if group.end_char < c {
                    Ordering::Less
                } else {
                    Ordering::Equal
                }
            })
            .ok()?;

        let group = self.groups.get(index)?;
        debug_assert!(group.contains(c));
        u16::try_from(group.start_glyph + (c - group.start_char)).ok()
    }

    /// Iterate over all `(char, glyph)` pairs, sorted by character.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u16)> + '_ {
        self.groups.iter().flat_map(|group| {
            (group.start_char..=group.end_char)
                .map(move |c| (c, (group.start_glyph + (c - group.start_char)) as u16))
        })
    }

    /// The reverse mapping: all characters that map to each glyph.
    pub fn glyph_chars(&self) -> BTreeMap<u16, Vec<u32>> {
        let mut map: BTreeMap<u16, Vec<u32>> = BTreeMap::new();
        for (c, g) in self.iter() {
            map.entry(g).or_default().push(c);
        }
        map
    }

    /// The groups this map consists of.
    pub fn groups(&self) -> &[CmapGroup] {
        &self.groups
    }

    /// The number of mapped characters.
    pub fn len(&self) -> usize {
        self.groups
            .iter()
            .map(|group| (group.end_char - group.start_char) as usize + 1)
            .sum()
    }

    /// Whether no character is mapped.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

//! The `glyf` table contains the main description of the glyphs. In order to
//! subset it, there are 4 things we need to do:
//! 1. We need to form the glyph closure. Glyphs can reference other glyphs, meaning that
//!    if a user for example requests the glyph 1, and this glyph references the glyph 2, then
//!    we need to include both of them in our subset.
//! 2. We need to remove glyph descriptions that are not needed for the subset, and reorder
//!    the existing glyph descriptions to match the order defined by the remapper.
//! 3. For component glyphs, we need to rewrite their description so that they reference
//!    the new glyph ID of the glyphs they reference.
//! 4. We need to write a new `loca` table, in whichever format fits the new offsets.

use crate::read::{Readable, Reader};
use crate::write::Writer;
use crate::{head, Context, Error, Face, Result, Tag};
use rustc_hash::FxHashSet;
use std::collections::BTreeSet;

/// Flags of a component record in a composite glyph.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct ComponentFlags(pub u16);

impl ComponentFlags {
    pub const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
    pub const WE_HAVE_A_SCALE: u16 = 0x0008;
    pub const MORE_COMPONENTS: u16 = 0x0020;
    pub const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
    pub const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;

    fn contains(self, flag: u16) -> bool {
        self.0 & flag != 0
    }

    /// The size of the two arguments.
    fn args_len(self) -> usize {
        if self.contains(Self::ARG_1_AND_2_ARE_WORDS) {
            4
        } else {
            2
        }
    }

    /// The size of the transformation data after the arguments.
    fn transform_len(self) -> usize {
        if self.contains(Self::WE_HAVE_A_SCALE) {
            2
        } else if self.contains(Self::WE_HAVE_AN_X_AND_Y_SCALE) {
            4
        } else if self.contains(Self::WE_HAVE_A_TWO_BY_TWO) {
            8
        } else {
            0
        }
    }
}

impl Readable<'_> for ComponentFlags {
    const SIZE: usize = 2;

    fn read(r: &mut Reader) -> Option<Self> {
        r.read::<u16>().map(Self)
    }
}

/// Find the component references of a glyph, as pairs of the byte offset
/// of the referenced glyph ID and the glyph ID itself.
///
/// Simple and empty glyphs have no components.
fn components(data: &[u8]) -> Option<Vec<(usize, u16)>> {
    if data.is_empty() {
        return Some(vec![]);
    }

    let mut r = Reader::new(data);
    let num_contours = r.read::<i16>()?;
    if num_contours >= 0 {
        return Some(vec![]);
    }

    r.skip_bytes(8)?; // bounding box

    let mut refs = vec![];
    loop {
        let flags = r.read::<ComponentFlags>()?;
        let offset = r.offset();
        refs.push((offset, r.read::<u16>()?));
        r.skip_bytes(flags.args_len() + flags.transform_len())?;

        if !flags.contains(ComponentFlags::MORE_COMPONENTS) {
            break;
        }
    }

    Some(refs)
}

/// Parse the offsets of a `loca` table.
///
/// Yields `num_glyphs + 1` offsets, which are ascending and within `glyf_len`.
pub(crate) fn parse_loca(
    loca: &[u8],
    format: i16,
    num_glyphs: u16,
    glyf_len: usize,
) -> Option<Vec<u32>> {
    let count = usize::from(num_glyphs) + 1;
    let mut r = Reader::new(loca);
    let offsets = match format {
        0 => r
            .read_vector::<u16>(count)?
            .into_iter()
            .map(|offset| u32::from(offset) * 2)
            .collect(),
        1 => r.read_vector::<u32>(count)?,
        _ => return None,
    };

    let ascending = offsets.windows(2).all(|w| w[0] <= w[1]);
    let in_bounds = offsets.last().is_some_and(|&last| last as usize <= glyf_len);
    (ascending && in_bounds).then_some(offsets)
}

/// A `glyf` table together with its `loca` offsets.
pub(crate) struct Table<'a> {
    glyf: &'a [u8],
    offsets: Vec<u32>,
}

impl<'a> Table<'a> {
    pub(crate) fn parse(face: &Face<'a>, num_glyphs: u16) -> Result<Self> {
        let format = head::Head::parse(face)?.index_to_loc_format;
        let loca = face.expect_table(Tag::LOCA)?;
        let glyf = face.expect_table(Tag::GLYF)?;
        let offsets =
            parse_loca(loca, format, num_glyphs, glyf.len()).ok_or(Error::MalformedFont)?;
        Ok(Self { glyf, offsets })
    }

    fn num_glyphs(&self) -> u16 {
        (self.offsets.len() - 1) as u16
    }

    /// The data of a glyph. Empty for glyphs without an outline.
    pub(crate) fn glyph_data(&self, glyph: u16) -> Option<&'a [u8]> {
        let index = usize::from(glyph);
        let start = *self.offsets.get(index)? as usize;
        let end = *self.offsets.get(index + 1)? as usize;
        self.glyf.get(start..end)
    }

    /// The component references of a glyph, rejecting glyph IDs that don't
    /// exist in the font.
    fn components(&self, glyph: u16) -> Result<Vec<(usize, u16)>> {
        let data = self.glyph_data(glyph).ok_or(Error::MalformedFont)?;
        let refs = components(data).ok_or(Error::MalformedFont)?;
        if refs.iter().any(|&(_, component)| component >= self.num_glyphs()) {
            return Err(Error::MalformedFont);
        }
        Ok(refs)
    }

    /// Extend a set of glyphs with all glyphs they transitively reference
    /// as components. The `.notdef` glyph is always part of the result.
    pub(crate) fn closure(&self, glyphs: BTreeSet<u16>) -> Result<BTreeSet<u16>> {
        let mut visited = FxHashSet::default();
        let mut work: Vec<u16> = std::iter::once(0).chain(glyphs).collect();

        while let Some(glyph) = work.pop() {
            if glyph >= self.num_glyphs() {
                return Err(Error::MalformedFont);
            }

            if !visited.insert(glyph) {
                continue;
            }

            for (_, component) in self.components(glyph)? {
                if !visited.contains(&component) {
                    work.push(component);
                }
            }
        }

        log::debug!("glyph closure has {} glyphs", visited.len());
        Ok(visited.into_iter().collect())
    }
}

pub(crate) fn subset(ctx: &mut Context) -> Result<()> {
    let entries = subset_glyf_entries(ctx)?;

    let total: usize = entries.iter().map(Vec::len).sum();
    ctx.long_loca = ((total + 1) >> 1) > 0xFFFF;

    let mut sub_glyf = Writer::with_capacity(total);
    let mut sub_loca = Writer::new();

    let mut write_offset = |offset: usize| {
        if ctx.long_loca {
            sub_loca.write::<u32>(offset as u32);
        } else {
            sub_loca.write::<u16>((offset / 2) as u16);
        }
    };

    for entry in &entries {
        write_offset(sub_glyf.len());
        sub_glyf.extend(entry);
    }

    // Write the final offset.
    write_offset(sub_glyf.len());

    ctx.push(Tag::LOCA, sub_loca.finish());
    ctx.push(Tag::GLYF, sub_glyf.finish());

    Ok(())
}

/// The new glyph descriptions in new glyph ID order, each padded to 4 bytes.
fn subset_glyf_entries(ctx: &Context) -> Result<Vec<Vec<u8>>> {
    let mut entries = Vec::with_capacity(usize::from(ctx.mapper.num_gids()));

    for old_gid in ctx.mapper.remapped_gids() {
        let data = ctx.glyf.glyph_data(old_gid).ok_or(Error::MalformedFont)?;
        let mut entry = data.to_vec();

        for (offset, component) in ctx.glyf.components(old_gid)? {
            let new_component = ctx.mapper.get(component).ok_or(Error::MalformedFont)?;
            entry[offset..offset + 2].copy_from_slice(&new_component.to_be_bytes());
        }

        while entry.len() % 4 != 0 {
            entry.push(0);
        }

        entries.push(entry);
    }

    Ok(entries)
}

use super::CharMap;
use crate::read::{LazyArray16, Readable, Reader};
use crate::{Error, Result};
use std::collections::BTreeMap;

/// A format 4 subtable: segment mapping to delta values, BMP only.
#[derive(Debug)]
pub(crate) struct Subtable4<'a> {
    /// The subtable's bytes, cut to its declared length.
    data: &'a [u8],
    end_codes: LazyArray16<'a, u16>,
    start_codes: LazyArray16<'a, u16>,
    id_deltas: LazyArray16<'a, i16>,
    id_range_offsets: LazyArray16<'a, u16>,
    /// Where the `idRangeOffset` array starts within `data`.
    id_range_offsets_pos: usize,
}

impl<'a> Subtable4<'a> {
    /// Parse a subtable that starts at the beginning of `data`.
    pub(crate) fn parse(data: &'a [u8]) -> Result<Self> {
        let mut r = Reader::new(data);
        let format = r.read::<u16>().ok_or(Error::InvalidCmap)?;
        let length = r.read::<u16>().ok_or(Error::InvalidCmap)?;
        if format != 4 {
            return Err(Error::InvalidCmap);
        }

        // Some fonts declare a length larger than what's actually there, so
        // stick to the available data in that case.
        let data = data.get(..usize::from(length)).unwrap_or(data);
        let mut r = Reader::new_at(data, 4);

        r.skip::<u16>().ok_or(Error::InvalidCmap)?; // language
        let seg_count_x2 = r.read::<u16>().ok_or(Error::InvalidCmap)?;
        if seg_count_x2 < 2 || seg_count_x2 % 2 != 0 {
            return Err(Error::InvalidCmap);
        }

        let seg_count = seg_count_x2 / 2;
        r.skip_bytes(6).ok_or(Error::InvalidCmap)?; // search range + entry selector + range shift
        let end_codes = r.read_array16::<u16>(seg_count).ok_or(Error::InvalidCmap)?;
        r.skip::<u16>().ok_or(Error::InvalidCmap)?; // reserved pad
        let start_codes = r.read_array16::<u16>(seg_count).ok_or(Error::InvalidCmap)?;
        let id_deltas = r.read_array16::<i16>(seg_count).ok_or(Error::InvalidCmap)?;
        let id_range_offsets_pos = r.offset();
        let id_range_offsets =
            r.read_array16::<u16>(seg_count).ok_or(Error::InvalidCmap)?;

        Ok(Self {
            data,
            end_codes,
            start_codes,
            id_deltas,
            id_range_offsets,
            id_range_offsets_pos,
        })
    }

    /// The glyph of `c` in segment `i`. Returns 0 if unmapped.
    fn glyph(&self, i: u16, c: u16, start: u16, delta: i16, id_range_offset: u16) -> u16 {
        if id_range_offset == 0 {
            return c.wrapping_add(delta as u16);
        }

        let pos = self.id_range_offsets_pos
            + 2 * usize::from(i)
            + usize::from(id_range_offset)
            + 2 * usize::from(c - start);

        match u16::read_at(self.data, pos) {
            // Out of bounds or explicitly missing.
            None | Some(0) => 0,
            Some(raw) => raw.wrapping_add(delta as u16),
        }
    }

    /// Decode all segments.
    pub(crate) fn char_map(&self) -> Result<CharMap> {
        let mut map = BTreeMap::new();

        for i in 0..self.end_codes.len() {
            let segment = (
                self.start_codes.get(i),
                self.end_codes.get(i),
                self.id_deltas.get(i),
                self.id_range_offsets.get(i),
            );

            let (Some(start), Some(end), Some(delta), Some(id_range_offset)) = segment
            else {
                return Err(Error::InvalidCmap);
            };

            // The final segment only exists to terminate the search.
            if start == 0xFFFF && end == 0xFFFF {
                continue;
            }

            if start > end {
                log::warn!("skipping cmap segment with start {start:#X} after end {end:#X}");
                continue;
            }

            for c in start..=end {
                let glyph = self.glyph(i, c, start, delta, id_range_offset);
                if glyph != 0 {
                    // With overlapping segments, the first one wins.
                    map.entry(u32::from(c)).or_insert(glyph);
                }
            }
        }

        Ok(CharMap::from_map(&map))
    }
}

//! The `head` table mostly contains information that can be reused from the
//! old table, except for the `loca` format, which depends on the size of the
//! glyph data. The checksum will be recalculated in the very end.

use crate::read::{Readable, Reader};
use crate::{Context, Error, Face, Result, Tag};

/// The fields of the `head` table we care about.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct Head {
    pub units_per_em: u16,
    /// `xMin`, `yMin`, `xMax`, `yMax` in font units.
    pub bbox: [i16; 4],
    pub index_to_loc_format: i16,
    pub glyph_data_format: i16,
}

impl Head {
    pub(crate) fn parse(face: &Face) -> Result<Self> {
        let data = face.expect_table(Tag::HEAD)?;
        let head = Self::read_at(data, 0).ok_or(Error::MalformedFont)?;

        if head.units_per_em == 0 {
            return Err(Error::MalformedFont);
        }

        if head.glyph_data_format != 0 {
            log::warn!("unexpected glyph data format {}", head.glyph_data_format);
        }

        Ok(head)
    }
}

impl Readable<'_> for Head {
    const SIZE: usize = 54;

    fn read(r: &mut Reader) -> Option<Self> {
        r.skip_bytes(18)?; // version, revision, checksum adjustment, magic, flags
        let units_per_em = r.read::<u16>()?;
        r.skip_bytes(16)?; // created + modified
        let bbox = [r.read::<i16>()?, r.read::<i16>()?, r.read::<i16>()?, r.read::<i16>()?];
        r.skip_bytes(6)?; // mac style, lowest rec ppem, font direction hint
        let index_to_loc_format = r.read::<i16>()?;
        let glyph_data_format = r.read::<i16>()?;

        Some(Self { units_per_em, bbox, index_to_loc_format, glyph_data_format })
    }
}

pub(crate) fn subset(ctx: &mut Context) -> Result<()> {
    let mut head = ctx.expect_table(Tag::HEAD)?.to_vec();
    let index_to_loc = head.get_mut(50..52).ok_or(Error::MalformedFont)?;
    index_to_loc[0] = 0;
    index_to_loc[1] = ctx.long_loca as u8;
    ctx.push(Tag::HEAD, head);
    Ok(())
}

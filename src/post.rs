//! Subset the `post` table. The `post` table contains name information for glyphs
//! needed for some PostScript printers. The glyph names don't matter for PDF
//! embedding, so the subset always gets a version 3 table, which has no names at
//! all. The rest of the header is kept.

use crate::read::{Fixed, Readable, Reader};
use crate::write::Writer;
use crate::{Context, Error, Face, Result, Tag};

/// The fields of the `post` table we care about.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct Post {
    /// In degrees, counter-clockwise from the vertical.
    pub italic_angle: Fixed,
    pub underline_position: i16,
    pub underline_thickness: i16,
    pub is_fixed_pitch: bool,
}

impl Post {
    /// Parse the table, if the font has one.
    pub(crate) fn parse(face: &Face) -> Result<Option<Self>> {
        match face.table(Tag::POST) {
            Some(data) => Self::read_at(data, 0).map(Some).ok_or(Error::MalformedFont),
            None => Ok(None),
        }
    }
}

impl Readable<'_> for Post {
    const SIZE: usize = 16;

    fn read(r: &mut Reader) -> Option<Self> {
        r.skip::<u32>()?; // version
        let italic_angle = r.read::<Fixed>()?;
        let underline_position = r.read::<i16>()?;
        let underline_thickness = r.read::<i16>()?;
        let is_fixed_pitch = r.read::<u32>()? != 0;

        Some(Self {
            italic_angle,
            underline_position,
            underline_thickness,
            is_fixed_pitch,
        })
    }
}

pub(crate) fn subset(ctx: &mut Context) -> Result<()> {
    let post = ctx.expect_table(Tag::POST)?;
    let header = post.get(4..32).ok_or(Error::MalformedFont)?;

    let mut sub_post = Writer::with_capacity(32);
    sub_post.write::<u32>(0x00030000);
    sub_post.extend(header);

    ctx.push(Tag::POST, sub_post.finish());
    Ok(())
}

use crate::read::Readable;
use crate::write::Writer;
use crate::{Context, Error, Face, Result, Tag};

/// The horizontal metrics of all glyphs.
pub(crate) struct Hmtx<'a> {
    data: &'a [u8],
    num_h_metrics: u16,
}

impl<'a> Hmtx<'a> {
    pub(crate) fn parse(face: &Face<'a>, num_h_metrics: u16) -> Result<Self> {
        let data = face.expect_table(Tag::HMTX)?;
        if num_h_metrics == 0 || data.len() < 4 * usize::from(num_h_metrics) {
            return Err(Error::MalformedFont);
        }
        Ok(Self { data, num_h_metrics })
    }

    /// The advance width and left side bearing of a glyph.
    ///
    /// Glyphs after the last long metric share its advance width. Their
    /// side bearing is 0 if the font omits it.
    pub(crate) fn metrics(&self, glyph: u16) -> Option<(u16, i16)> {
        let nhm = self.num_h_metrics;
        if glyph < nhm {
            let offset = 4 * usize::from(glyph);
            let advance = u16::read_at(self.data, offset)?;
            let lsb = i16::read_at(self.data, offset + 2)?;
            return Some((advance, lsb));
        }

        let advance = u16::read_at(self.data, 4 * usize::from(nhm - 1))?;
        let offset = 4 * usize::from(nhm) + 2 * usize::from(glyph - nhm);
        let lsb = i16::read_at(self.data, offset).unwrap_or(0);
        Some((advance, lsb))
    }

    pub(crate) fn advance(&self, glyph: u16) -> Option<u16> {
        self.metrics(glyph).map(|(advance, _)| advance)
    }
}

/// Write one long metric record per glyph of the subset, in new glyph order.
pub(crate) fn subset(ctx: &mut Context) -> Result<()> {
    let hmtx = Hmtx::parse(&ctx.face, ctx.num_h_metrics)?;

    let mut sub_hmtx = Writer::with_capacity(4 * usize::from(ctx.mapper.num_gids()));
    for old_gid in ctx.mapper.remapped_gids() {
        let (advance, lsb) = hmtx.metrics(old_gid).ok_or(Error::MalformedFont)?;
        sub_hmtx.write::<u16>(advance);
        sub_hmtx.write::<i16>(lsb);
    }

    ctx.push(Tag::HMTX, sub_hmtx.finish());
    Ok(())
}

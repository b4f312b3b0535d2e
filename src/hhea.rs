use crate::read::{Readable, Reader};
use crate::{Context, Error, Face, Result, Tag};

/// The fields of the `hhea` table we care about.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct Hhea {
    pub ascender: i16,
    pub descender: i16,
    pub num_h_metrics: u16,
}

impl Hhea {
    pub(crate) fn parse(face: &Face) -> Result<Self> {
        let data = face.expect_table(Tag::HHEA)?;
        let hhea = Self::read_at(data, 0).ok_or(Error::MalformedFont)?;
        if hhea.num_h_metrics == 0 {
            return Err(Error::MalformedFont);
        }
        Ok(hhea)
    }
}

impl Readable<'_> for Hhea {
    const SIZE: usize = 36;

    fn read(r: &mut Reader) -> Option<Self> {
        r.skip::<u32>()?; // version
        let ascender = r.read::<i16>()?;
        let descender = r.read::<i16>()?;
        r.skip_bytes(24)?;
        let metric_data_format = r.read::<i16>()?;
        let num_h_metrics = r.read::<u16>()?;

        if metric_data_format != 0 {
            log::warn!("unexpected metric data format {metric_data_format}");
        }

        Some(Self { ascender, descender, num_h_metrics })
    }
}

pub(crate) fn num_h_metrics(face: &Face) -> Result<u16> {
    Hhea::parse(face).map(|hhea| hhea.num_h_metrics)
}

/// Every glyph of the subset gets a full horizontal metric record.
pub(crate) fn subset(ctx: &mut Context) -> Result<()> {
    let mut hhea = ctx.expect_table(Tag::HHEA)?.to_vec();
    let num_h_metrics = hhea.get_mut(34..36).ok_or(Error::MalformedFont)?;
    num_h_metrics.copy_from_slice(&ctx.mapper.num_gids().to_be_bytes());
    ctx.push(Tag::HHEA, hhea);
    Ok(())
}

use crate::read::Reader;
use crate::write::Writer;
use crate::{Context, Error, Face, Result, Tag};

pub(crate) fn num_glyphs(face: &Face) -> Result<u16> {
    let maxp = face.expect_table(Tag::MAXP)?;
    let mut r = Reader::new_at(maxp, 4);
    r.read::<u16>().ok_or(Error::MalformedFont)
}

pub(crate) fn subset(ctx: &mut Context) -> Result<()> {
    let maxp = ctx.expect_table(Tag::MAXP)?;
    let mut r = Reader::new(maxp);
    let version = r.read::<u32>().ok_or(Error::MalformedFont)?;
    r.read::<u16>().ok_or(Error::MalformedFont)?; // num glyphs

    let mut sub_maxp = Writer::new();
    sub_maxp.write::<u32>(version);
    sub_maxp.write::<u16>(ctx.mapper.num_gids());

    // The maximum values of version 1.0 are still valid upper bounds for the
    // subset.
    if version == 0x00010000 {
        sub_maxp.extend(r.tail().ok_or(Error::MalformedFont)?);
    }

    ctx.push(Tag::MAXP, sub_maxp.finish());
    Ok(())
}

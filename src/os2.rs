use crate::read::{Readable, Reader};
use crate::{Error, Face, Result, Tag};

/// The fields of the `OS/2` table we care about.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct Os2 {
    pub weight_class: u16,
    pub fs_type: u16,
    pub typo_ascender: i16,
    pub typo_descender: i16,
    /// Only available from version 2 on.
    pub cap_height: Option<i16>,
}

impl Os2 {
    /// Parse the table, if the font has one.
    pub(crate) fn parse(face: &Face) -> Result<Option<Self>> {
        match face.table(Tag::OS2) {
            Some(data) => Self::read_at(data, 0).map(Some).ok_or(Error::MalformedFont),
            None => Ok(None),
        }
    }

    /// Whether the license forbids embedding: either restricted license
    /// embedding, or bitmap-only or no-subsetting embedding.
    pub(crate) fn is_restricted(&self) -> bool {
        self.fs_type == 0x0002 || self.fs_type & 0x0300 != 0
    }
}

impl Readable<'_> for Os2 {
    const SIZE: usize = 72;

    fn read(r: &mut Reader) -> Option<Self> {
        let start = r.offset();
        let version = r.read::<u16>()?;
        r.skip::<i16>()?; // average char width
        let weight_class = r.read::<u16>()?;
        r.skip::<u16>()?; // width class
        let fs_type = r.read::<u16>()?;

        r.jump(start + 68);
        let typo_ascender = r.read::<i16>()?;
        let typo_descender = r.read::<i16>()?;

        let cap_height = if version > 1 {
            r.jump(start + 88);
            r.read::<i16>()
        } else {
            None
        };

        Some(Self {
            weight_class,
            fs_type,
            typo_ascender,
            typo_descender,
            cap_height,
        })
    }
}

/// Fail if the font's license does not allow embedding it.
pub(crate) fn check_embedding(face: &Face) -> Result<()> {
    match Os2::parse(face)? {
        Some(os2) if os2.is_restricted() => Err(Error::RestrictedLicense),
        _ => Ok(()),
    }
}

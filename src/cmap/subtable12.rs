use super::{CharMap, CmapGroup};
use crate::read::Reader;
use crate::{Error, Result};

/// A format 12 subtable: segmented coverage.
#[derive(Debug)]
pub(crate) struct Subtable12 {
    groups: Vec<CmapGroup>,
}

impl Subtable12 {
    /// Parse a subtable that starts at the beginning of `data`.
    ///
    /// Fails if the header is inconsistent with the number of groups.
    pub(crate) fn parse(data: &[u8]) -> Result<Self> {
        let mut r = Reader::new(data);
        let format = r.read::<u16>().ok_or(Error::InvalidCmap)?;
        r.read::<u16>().ok_or(Error::InvalidCmap)?; // reserved
        let length = r.read::<u32>().ok_or(Error::InvalidCmap)?;
        r.read::<u32>().ok_or(Error::InvalidCmap)?; // language
        let num_groups = r.read::<u32>().ok_or(Error::InvalidCmap)?;

        if format != 12 || u64::from(length) != 16 + 12 * u64::from(num_groups) {
            return Err(Error::InvalidCmap);
        }

        let groups = r
            .read_vector::<CmapGroup>(num_groups as usize)
            .ok_or(Error::InvalidCmap)?;

        Ok(Self { groups })
    }

    pub(crate) fn char_map(&self) -> CharMap {
        CharMap::from_groups(self.groups.clone())
    }
}

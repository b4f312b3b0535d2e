//! The `name` table holds human-readable strings about the font. It is
//! copied into the subset unchanged, we only read a few names for the font
//! descriptor.

use crate::read::{Readable, Reader};

struct NameRecord {
    platform_id: u16,
    encoding_id: u16,
    language_id: u16,
    name_id: u16,
    length: u16,
    string_offset: u16,
}

impl NameRecord {
    fn is_windows_english(&self) -> bool {
        self.platform_id == 3 && self.encoding_id == 1 && self.language_id == 0x409
    }

    fn is_mac_roman(&self) -> bool {
        self.platform_id == 1 && self.encoding_id == 0 && self.language_id == 0
    }
}

impl Readable<'_> for NameRecord {
    const SIZE: usize = u16::SIZE * 6;

    fn read(r: &mut Reader<'_>) -> Option<Self> {
        let platform_id = r.read::<u16>()?;
        let encoding_id = r.read::<u16>()?;
        let language_id = r.read::<u16>()?;
        let name_id = r.read::<u16>()?;
        let length = r.read::<u16>()?;
        let string_offset = r.read::<u16>()?;

        Some(Self {
            platform_id,
            encoding_id,
            language_id,
            name_id,
            length,
            string_offset,
        })
    }
}

/// The names of a font.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct FontNames {
    /// Name ID 1.
    pub family: Option<String>,
    /// Name ID 2, e.g. "Bold Italic".
    pub subfamily: Option<String>,
    /// Name ID 3.
    pub unique_id: Option<String>,
    /// Name ID 4.
    pub full_name: Option<String>,
    /// Name ID 6.
    pub postscript_name: Option<String>,
}

impl FontNames {
    /// Read the names from a `name` table.
    ///
    /// Only Windows Unicode English and Macintosh Roman records are
    /// considered. The first record for each name wins.
    pub(crate) fn parse(data: &[u8]) -> Option<Self> {
        let mut r = Reader::new(data);
        r.read::<u16>()?; // version
        let count = r.read::<u16>()?;
        let storage_offset = r.read::<u16>()?;
        let records = r.read_array16::<NameRecord>(count)?;
        let storage = data.get(usize::from(storage_offset)..)?;

        let mut names = Self::default();
        for record in records {
            if names.is_complete() {
                break;
            }

            let slot = match names.slot(record.name_id) {
                Some(slot) if slot.is_none() => slot,
                _ => continue,
            };

            let start = usize::from(record.string_offset);
            let Some(bytes) = storage.get(start..start + usize::from(record.length)) else {
                log::warn!("name record {} is out of bounds", record.name_id);
                continue;
            };

            if record.is_windows_english() {
                *slot = decode_utf16_be(bytes);
                if slot.is_none() {
                    log::warn!("name record {} is not valid UTF-16", record.name_id);
                }
            } else if record.is_mac_roman() {
                *slot = Some(decode_mac_roman(bytes));
            }
        }

        Some(names)
    }

    fn slot(&mut self, name_id: u16) -> Option<&mut Option<String>> {
        match name_id {
            1 => Some(&mut self.family),
            2 => Some(&mut self.subfamily),
            3 => Some(&mut self.unique_id),
            4 => Some(&mut self.full_name),
            6 => Some(&mut self.postscript_name),
            _ => None,
        }
    }

    fn is_complete(&self) -> bool {
        self.family.is_some()
            && self.subfamily.is_some()
            && self.unique_id.is_some()
            && self.full_name.is_some()
            && self.postscript_name.is_some()
    }
}

fn decode_utf16_be(bytes: &[u8]) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }

    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();

    String::from_utf16(&units).ok()
}

/// The upper half of the Mac OS Roman character set.
const MAC_ROMAN: &str = "ÄÅÇÉÑÖÜáàâäãåçéèêëíìîïñóòôöõúùûü†°¢£§•¶ß®©™´¨≠ÆØ∞±≤≥¥µ∂∑∏π∫ªºΩæø¿¡¬√ƒ≈∆«»…\u{A0}ÀÃÕŒœ–—“”‘’÷◊ÿŸ⁄€‹›ﬁﬂ‡·‚„‰ÂÊÁËÈÍÎÏÌÓÔ\u{F8FF}ÒÚÛÙıˆ˜¯˘˙˚¸˝˛ˇ";

fn decode_mac_roman(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0..=0x7F => char::from(b),
            _ => MAC_ROMAN.chars().nth(usize::from(b - 0x80)).unwrap_or('\u{FFFD}'),
        })
        .collect()
}

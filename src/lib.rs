/*!
Subsets TrueType fonts for embedding into PDF files.

Given the raw bytes of a `.ttf` file and the set of characters a document
actually draws, this crate produces a reduced font that only contains the
glyphs for those characters (plus everything they reference), together with
the lookup tables a PDF writer needs to embed it as a CID font:

- the subset font itself, with compacted glyph IDs and a single Format 12
  `cmap` subtable,
- a `CID → glyph ID` map for the `CIDToGIDMap` stream,
- a `ToUnicode` CMap so that viewers can extract and search the text,
- the highest CID in use, to size the width arrays.

# Example
```no_run
use std::collections::BTreeMap;
use fontcut::{subset, Profile};

# fn main() -> Result<(), Box<dyn std::error::Error>> {
let data = std::fs::read("DejaVuSans.ttf")?;

// CIDs are chosen by the caller. Here, every character is its own CID.
let mut used = BTreeMap::new();
for c in "Hello 😀".chars() {
    used.insert(c as u32, c as u32);
}

let sub = subset(&data, &used, Profile::pdf())?;
std::fs::write("target/DejaVuSans-Subset.ttf", &sub.data)?;
println!("{}", sub.to_unicode);
# Ok(())
# }
```

Font metrics for layout and for the PDF font descriptor are available
through [`FontInfo`].
*/

#![deny(unsafe_code)]
#![deny(missing_docs)]

mod cmap;
mod glyf;
mod head;
mod hhea;
mod hmtx;
mod info;
mod maxp;
mod name;
mod os2;
mod post;
mod read;
mod remapper;
pub mod text;
mod to_unicode;
pub mod utf16;
mod write;

pub use crate::cmap::{build_groups, format12_header, format12_subtable, CharMap, CmapGroup};
pub use crate::info::FontInfo;
pub use crate::name::FontNames;
pub use crate::to_unicode::to_unicode_cmap;

use crate::read::{Readable, Reader};
use crate::remapper::GlyphRemapper;
use crate::write::{Writeable, Writer};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Debug, Display, Formatter};

/// Options that control which optional data is kept in a subset.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Profile {
    /// Keep the TrueType hinting tables (`cvt `, `fpgm`, `prep` and `gasp`).
    ///
    /// They are copied as-is, without any subsetting.
    pub hinting: bool,
}

impl Profile {
    /// The profile for embedding a font in a PDF file.
    pub fn pdf() -> Self {
        Self { hinting: true }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::pdf()
    }
}

/// The result of subsetting a font.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Subset {
    /// The subset font file.
    pub data: Vec<u8>,
    /// Maps each CID whose character is covered by the font to its glyph ID
    /// in the subset font. CID 0 never appears here.
    pub cid_to_gid: BTreeMap<u32, u16>,
    /// A `ToUnicode` CMap for all CIDs (except 0) that were requested.
    pub to_unicode: String,
    /// The highest CID that was requested, or 0 if there were none.
    pub last_cid: u32,
}

/// Subset a TrueType font to the characters of a document.
///
/// - The `data` must be a TrueType font (not a collection, not CFF-based).
/// - `used_runes` maps each CID used in the document to the Unicode
///   codepoint it stands for. CID 0 is reserved for the `.notdef` glyph
///   and is ignored.
///
/// The operation is all-or-nothing: if anything about the font is
/// malformed or unsupported, an error is returned and no output is
/// produced.
pub fn subset(
    data: &[u8],
    used_runes: &BTreeMap<u32, u32>,
    profile: Profile,
) -> Result<Subset> {
    let face = parse(data)?;
    os2::check_embedding(&face)?;

    let num_glyphs = maxp::num_glyphs(&face)?;
    let num_h_metrics = hhea::num_h_metrics(&face)?;
    let glyf = glyf::Table::parse(&face, num_glyphs)?;
    let char_map = cmap::parse(&face)?;

    // Old glyph IDs of every requested character.
    let mut rune_glyphs = BTreeMap::new();
    for (&cid, &rune) in used_runes {
        if cid == 0 {
            continue;
        }

        match char_map.glyph_index(rune) {
            Some(glyph) if glyph < num_glyphs => {
                rune_glyphs.insert(rune, glyph);
            }
            Some(glyph) => log::warn!("{rune:#X} maps to nonexistent glyph {glyph}"),
            None => {}
        }
    }

    let requested: BTreeSet<u16> = rune_glyphs.values().copied().collect();
    let closure = glyf.closure(requested)?;
    let mapper = GlyphRemapper::new_from_glyphs(&closure)?;

    log::debug!(
        "subsetting {} runes to {} of {} glyphs",
        used_runes.len(),
        mapper.num_gids(),
        num_glyphs
    );

    let mut ctx = Context {
        face,
        num_glyphs,
        num_h_metrics,
        glyf,
        mapper,
        char_glyphs: BTreeMap::new(),
        profile,
        tables: vec![],
        long_loca: false,
    };

    for (&rune, &old) in &rune_glyphs {
        if let Some(new) = ctx.mapper.get(old) {
            ctx.char_glyphs.insert(rune, u32::from(new));
        }
    }

    let mut cid_to_gid = BTreeMap::new();
    let mut cid_to_unicode = BTreeMap::new();
    for (&cid, &rune) in used_runes {
        if cid == 0 {
            continue;
        }

        cid_to_unicode.insert(cid, rune);
        if let Some(&new) = ctx.char_glyphs.get(&rune) {
            cid_to_gid.insert(cid, new as u16);
        }
    }

    // The glyf table must be processed first, since it decides the loca
    // format that the head table records.
    ctx.process(Tag::GLYF)?;
    if ctx.profile.hinting {
        ctx.process(Tag::CVT)?; // won't be subsetted.
        ctx.process(Tag::FPGM)?; // won't be subsetted.
        ctx.process(Tag::PREP)?; // won't be subsetted.
        ctx.process(Tag::GASP)?; // won't be subsetted.
    }

    ctx.process(Tag::CMAP)?;
    ctx.process(Tag::HEAD)?;
    ctx.process(Tag::HHEA)?;
    ctx.process(Tag::HMTX)?;
    ctx.process(Tag::MAXP)?;
    ctx.process(Tag::NAME)?;
    ctx.process(Tag::OS2)?;
    ctx.process(Tag::POST)?;

    let last_cid = cid_to_unicode.keys().next_back().copied().unwrap_or(0);

    Ok(Subset {
        data: construct(ctx),
        cid_to_gid,
        to_unicode: to_unicode_cmap(&cid_to_unicode),
        last_cid,
    })
}

/// Subset a font to the characters of `text`.
///
/// Each character is used as its own CID. This is mostly useful to produce
/// small standalone fonts, e.g. for tests or previews.
pub fn cut_font(data: &[u8], text: &str) -> Result<Vec<u8>> {
    let used_runes = text.chars().map(|c| (c as u32, c as u32)).collect();
    subset(data, &used_runes, Profile::pdf()).map(|sub| sub.data)
}

/// Parse the table directory of a font.
fn parse(data: &[u8]) -> Result<Face<'_>> {
    let mut r = Reader::new(data);
    match r.read::<u32>().ok_or(Error::MalformedFont)? {
        0x00010000 | 0x74727565 => {}
        0x4F54544F => return Err(Error::CffNotSupported),
        0x74746366 => return Err(Error::CollectionNotSupported),
        _ => return Err(Error::UnknownKind),
    }

    // Read number of table records, skip the binary search hints.
    let count = r.read::<u16>().ok_or(Error::MalformedFont)?;
    r.skip_bytes(6).ok_or(Error::MalformedFont)?;

    let mut records = r
        .read_vector::<TableRecord>(usize::from(count))
        .ok_or(Error::MalformedFont)?;

    // Records should already be sorted, but not all fonts get this right.
    records.sort_by_key(|record| record.tag);

    Ok(Face { data, records })
}

/// Construct a brand new font.
fn construct(mut ctx: Context) -> Vec<u8> {
    let mut w = Writer::new();
    w.write::<u32>(0x00010000);

    // Tables shall be sorted by tag.
    ctx.tables.sort_by_key(|&(tag, _)| tag);

    // Write table directory.
    let count = ctx.tables.len() as u16;
    let entry_selector = (u16::BITS - 1).saturating_sub(count.leading_zeros()) as u16;
    let search_range = (1u16 << entry_selector) * 16;
    let range_shift = count * 16 - search_range;
    w.write(count);
    w.write(search_range);
    w.write(entry_selector);
    w.write(range_shift);

    // This variable will hold the offset to the checksum adjustment field
    // in the head table, which we'll have to write in the end (after
    // checksumming the whole font).
    let mut checksum_adjustment_offset = None;

    // Write table records.
    let mut offset = 12 + ctx.tables.len() * 16;
    for (tag, data) in &mut ctx.tables {
        if *tag == Tag::HEAD {
            // Zero out checksum field in head table.
            data.to_mut()[8..12].fill(0);
            checksum_adjustment_offset = Some(offset + 8);
        }

        let len = data.len();
        w.write(TableRecord {
            tag: *tag,
            checksum: checksum(data),
            offset: offset as u32,
            length: len as u32,
        });

        log::debug!("writing {} table, {} bytes", tag, len);

        // Increase offset, plus padding zeros to align to 4 bytes.
        offset += len;
        while offset % 4 != 0 {
            offset += 1;
        }
    }

    // Write tables.
    for (_, data) in &ctx.tables {
        // Write data plus padding zeros to align to 4 bytes.
        w.extend(data);
        w.align(4);
    }

    // Write checksum adjustment field in head table.
    let mut data = w.finish();
    if let Some(i) = checksum_adjustment_offset {
        let sum = checksum(&data);
        let val = 0xB1B0AFBA_u32.wrapping_sub(sum);
        data[i..i + 4].copy_from_slice(&val.to_be_bytes());
    }

    data
}

/// Calculate a checksum over the sliced data as a sum of u32s. If the data
/// length is not a multiple of four, it is treated as if padded with zero to a
/// length that is a multiple of four.
fn checksum(data: &[u8]) -> u32 {
    let mut sum = 0u32;
    for chunk in data.chunks(4) {
        let mut bytes = [0; 4];
        bytes[..chunk.len()].copy_from_slice(chunk);
        sum = sum.wrapping_add(u32::from_be_bytes(bytes));
    }
    sum
}

/// Subsetting context.
struct Context<'a> {
    /// Original face.
    face: Face<'a>,
    /// The number of glyphs in the original face.
    num_glyphs: u16,
    /// The number of long horizontal metrics in the original face.
    num_h_metrics: u16,
    /// The original glyph outlines.
    glyf: glyf::Table<'a>,
    /// Maps old glyph IDs to their new, compacted ones.
    mapper: GlyphRemapper,
    /// Maps each requested character to its new glyph ID.
    char_glyphs: BTreeMap<u32, u32>,
    /// Subsetting options.
    profile: Profile,
    /// Subsetted tables.
    tables: Vec<(Tag, Cow<'a, [u8]>)>,
    /// Whether the long loca format was chosen.
    long_loca: bool,
}

impl<'a> Context<'a> {
    /// Expect a table.
    fn expect_table(&self, tag: Tag) -> Result<&'a [u8]> {
        self.face.table(tag).ok_or(Error::MissingTable(tag))
    }

    /// Process a table.
    fn process(&mut self, tag: Tag) -> Result<()> {
        let data = match self.face.table(tag) {
            Some(data) => data,
            None => return Ok(()),
        };

        match tag {
            Tag::GLYF => glyf::subset(self)?,
            Tag::CMAP => cmap::subset(self)?,
            Tag::HEAD => head::subset(self)?,
            Tag::HHEA => hhea::subset(self)?,
            Tag::HMTX => hmtx::subset(self)?,
            Tag::MAXP => maxp::subset(self)?,
            Tag::POST => post::subset(self)?,
            _ => self.push(tag, data),
        }

        Ok(())
    }

    /// Push a subsetted table.
    fn push(&mut self, tag: Tag, table: impl Into<Cow<'a, [u8]>>) {
        debug_assert!(
            !self.tables.iter().any(|&(prev, _)| prev == tag),
            "duplicate {tag} table"
        );
        self.tables.push((tag, table.into()));
    }
}

/// A font face with TrueType tables.
struct Face<'a> {
    data: &'a [u8],
    records: Vec<TableRecord>,
}

impl<'a> Face<'a> {
    fn table(&self, tag: Tag) -> Option<&'a [u8]> {
        let i = self.records.binary_search_by(|record| record.tag.cmp(&tag)).ok()?;
        let record = self.records.get(i)?;
        let start = record.offset as usize;
        let end = start.checked_add(record.length as usize)?;
        self.data.get(start..end)
    }

    fn expect_table(&self, tag: Tag) -> Result<&'a [u8]> {
        self.table(tag).ok_or(Error::MissingTable(tag))
    }
}

/// A 4-byte OpenType tag.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Tag(pub [u8; 4]);

impl Tag {
    const CMAP: Self = Self(*b"cmap");
    const HEAD: Self = Self(*b"head");
    const HHEA: Self = Self(*b"hhea");
    const HMTX: Self = Self(*b"hmtx");
    const MAXP: Self = Self(*b"maxp");
    const NAME: Self = Self(*b"name");
    const OS2: Self = Self(*b"OS/2");
    const POST: Self = Self(*b"post");

    const GLYF: Self = Self(*b"glyf");
    const LOCA: Self = Self(*b"loca");
    const PREP: Self = Self(*b"prep");
    const FPGM: Self = Self(*b"fpgm");
    const CVT: Self = Self(*b"cvt ");
    const GASP: Self = Self(*b"gasp");
}

impl Readable<'_> for Tag {
    const SIZE: usize = 4;

    fn read(r: &mut Reader) -> Option<Self> {
        r.read::<[u8; 4]>().map(Self)
    }
}

impl Writeable for Tag {
    fn write(&self, w: &mut Writer) {
        w.extend(&self.0)
    }
}

impl Debug for Tag {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Tag({self})")
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.pad(std::str::from_utf8(&self.0).unwrap_or("..."))
    }
}

/// Locates a table in the font file.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct TableRecord {
    tag: Tag,
    checksum: u32,
    offset: u32,
    length: u32,
}

impl Readable<'_> for TableRecord {
    const SIZE: usize = 16;

    fn read(r: &mut Reader) -> Option<Self> {
        Some(TableRecord {
            tag: r.read::<Tag>()?,
            checksum: r.read::<u32>()?,
            offset: r.read::<u32>()?,
            length: r.read::<u32>()?,
        })
    }
}

impl Writeable for TableRecord {
    fn write(&self, w: &mut Writer) {
        w.write::<Tag>(self.tag);
        w.write::<u32>(self.checksum);
        w.write::<u32>(self.offset);
        w.write::<u32>(self.length);
    }
}

/// The result type for everything.
pub type Result<T> = std::result::Result<T, Error>;

/// Parsing or subsetting failed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Error {
    /// The file is not a TrueType font.
    UnknownKind,
    /// The font has CFF outlines (`OTTO`), which are not supported.
    CffNotSupported,
    /// The file is a font collection (`ttcf`), which is not supported.
    CollectionNotSupported,
    /// The font's license does not allow embedding it.
    RestrictedLicense,
    /// The font has no Unicode `cmap` subtable in format 4 or 12.
    MissingUnicodeCmap,
    /// The font's Unicode `cmap` subtable is malformed.
    InvalidCmap,
    /// A table that is needed is missing.
    MissingTable(Tag),
    /// The font is malformed, e.g. an offset points outside of the data.
    MalformedFont,
    /// The subset would exceed a limit of the font format.
    OverflowError,
}

impl Error {
    /// Whether this error was caused by broken font data, as opposed to a
    /// valid font that cannot be used.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedFont | Self::InvalidCmap | Self::MissingTable(_))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::UnknownKind => f.pad("not a TrueType font"),
            Self::CffNotSupported => f.pad("fonts with CFF outlines are not supported"),
            Self::CollectionNotSupported => f.pad("font collections are not supported"),
            Self::RestrictedLicense => f.pad("font license does not allow embedding"),
            Self::MissingUnicodeCmap => f.pad("font has no unicode cmap"),
            Self::InvalidCmap => f.pad("invalid cmap subtable"),
            Self::MissingTable(tag) => write!(f, "missing {tag} table"),
            Self::MalformedFont => f.pad("malformed font"),
            Self::OverflowError => f.pad("subset exceeds font format limits"),
        }
    }
}

impl std::error::Error for Error {}

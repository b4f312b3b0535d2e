use std::collections::BTreeMap;

use fontcut::{cut_font, subset, Error, FontInfo, Profile};
use ttf_parser::{GlyphId, OutlineBuilder};

const NOTDEF: u16 = 0;
const A: u16 = 1;
const B: u16 = 2;
/// A composite of `A` and `B`.
const C: u16 = 3;
const SPACE: u16 = 4;
const GRINNING: u16 = 5;
const UNUSED: u16 = 6;
/// A composite of `C`.
const D: u16 = 7;

/// The characters of the test font and their glyphs.
const CHARS: &[(char, u16)] =
    &[(' ', SPACE), ('A', A), ('B', B), ('C', C), ('D', D), ('😀', GRINNING)];

const ADVANCES: [u16; 6] = [500, 600, 650, 700, 250, 1000];

/// Builds a small TrueType font in memory.
#[derive(Clone)]
struct TestFont {
    units_per_em: u16,
    fs_type: u16,
    /// Add a format 12 subtable, which is the only one mapping the emoji.
    format12: bool,
    /// Add a `prep` table.
    prep: bool,
    os2: bool,
    italic: bool,
    /// Blow up some glyphs with instructions to force the long loca format.
    big_glyphs: bool,
    space_advance: u16,
    sfnt_version: u32,
}

impl Default for TestFont {
    fn default() -> Self {
        Self {
            units_per_em: 1000,
            fs_type: 0,
            format12: true,
            prep: false,
            os2: true,
            italic: false,
            big_glyphs: false,
            space_advance: 250,
            sfnt_version: 0x00010000,
        }
    }
}

fn simple_glyph(width: i16, height: i16, instructions: u16) -> Vec<u8> {
    let mut d = vec![];
    d.extend(1i16.to_be_bytes());
    for v in [0i16, 0, width, height] {
        d.extend(v.to_be_bytes());
    }
    d.extend(2u16.to_be_bytes()); // end point of the contour
    d.extend(instructions.to_be_bytes());
    d.extend(std::iter::repeat(0).take(usize::from(instructions)));
    d.extend([1, 1, 1]); // on curve, long coordinates
    for v in [0i16, width, -(width / 2)] {
        d.extend(v.to_be_bytes());
    }
    for v in [0i16, 0, height] {
        d.extend(v.to_be_bytes());
    }
    d
}

fn composite_glyph(components: &[(u16, i16)]) -> Vec<u8> {
    let mut d = vec![];
    d.extend((-1i16).to_be_bytes());
    for v in [0i16, 0, 1000, 700] {
        d.extend(v.to_be_bytes());
    }
    for (i, &(glyph, dx)) in components.iter().enumerate() {
        // Word arguments, which are offsets.
        let mut flags = 0x0001 | 0x0002;
        if i + 1 < components.len() {
            flags |= 0x0020;
        }
        d.extend(u16::to_be_bytes(flags));
        d.extend(glyph.to_be_bytes());
        d.extend(dx.to_be_bytes());
        d.extend(0i16.to_be_bytes());
    }
    d
}

fn u16s(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}

impl TestFont {
    fn glyphs(&self) -> Vec<Vec<u8>> {
        let big = if self.big_glyphs { 65000 } else { 0 };
        vec![
            simple_glyph(400, 700, 0),
            simple_glyph(500, 700, big),
            simple_glyph(550, 700, big),
            composite_glyph(&[(A, 0), (B, 600)]),
            vec![],
            simple_glyph(900, 900, big),
            simple_glyph(300, 300, 0),
            composite_glyph(&[(C, 50)]),
        ]
    }

    fn cmap(&self) -> Vec<u8> {
        let bmp: Vec<_> = CHARS.iter().filter(|(c, _)| (*c as u32) <= 0xFFFF).collect();

        let mut f4 = vec![];
        let seg_count = bmp.len() as u16 + 1;
        f4.extend(u16s(&[4, 16 + 8 * seg_count, 0, 2 * seg_count, 0, 0, 0]));
        for (c, _) in &bmp {
            f4.extend((*c as u16).to_be_bytes());
        }
        f4.extend(u16s(&[0xFFFF, 0]));
        for (c, _) in &bmp {
            f4.extend((*c as u16).to_be_bytes());
        }
        f4.extend(u16s(&[0xFFFF]));
        for (c, g) in &bmp {
            f4.extend(g.wrapping_sub(*c as u16).to_be_bytes());
        }
        f4.extend(1u16.to_be_bytes());
        f4.extend(vec![0; 2 * usize::from(seg_count)]);

        let mut f12 = vec![];
        f12.extend(u16s(&[12, 0]));
        f12.extend((16 + 12 * CHARS.len() as u32).to_be_bytes());
        f12.extend(0u32.to_be_bytes());
        f12.extend((CHARS.len() as u32).to_be_bytes());
        for &(c, g) in CHARS {
            f12.extend((c as u32).to_be_bytes());
            f12.extend((c as u32).to_be_bytes());
            f12.extend(u32::from(g).to_be_bytes());
        }

        let mut cmap = vec![];
        if self.format12 {
            cmap.extend(u16s(&[0, 2, 3, 1]));
            cmap.extend(20u32.to_be_bytes());
            cmap.extend(u16s(&[3, 10]));
            cmap.extend((20 + f4.len() as u32).to_be_bytes());
            cmap.extend(f4);
            cmap.extend(f12);
        } else {
            cmap.extend(u16s(&[0, 1, 3, 1]));
            cmap.extend(12u32.to_be_bytes());
            cmap.extend(f4);
        }
        cmap
    }

    fn build(&self) -> Vec<u8> {
        let glyphs = self.glyphs();
        let num_glyphs = glyphs.len() as u16;

        let mut glyf = vec![];
        let mut offsets = vec![];
        for glyph in &glyphs {
            offsets.push(glyf.len() as u32);
            glyf.extend(glyph);
            if glyf.len() % 2 != 0 {
                glyf.push(0);
            }
        }
        offsets.push(glyf.len() as u32);

        let long_loca = glyf.len() > 0x1FFFE;
        let loca: Vec<u8> = if long_loca {
            offsets.iter().flat_map(|o| o.to_be_bytes()).collect()
        } else {
            offsets.iter().flat_map(|&o| ((o / 2) as u16).to_be_bytes()).collect()
        };

        let mut head = vec![];
        head.extend(0x00010000u32.to_be_bytes());
        head.extend(0x00010000u32.to_be_bytes());
        head.extend(0u32.to_be_bytes());
        head.extend(0x5F0F3CF5u32.to_be_bytes());
        head.extend(u16s(&[0, self.units_per_em]));
        head.extend([0; 16]);
        for v in [0i16, -200, 1000, 800] {
            head.extend(v.to_be_bytes());
        }
        head.extend(u16s(&[0, 8, 2, long_loca as u16, 0]));

        let num_h_metrics = ADVANCES.len() as u16;
        let mut hhea = vec![];
        hhea.extend(0x00010000u32.to_be_bytes());
        for v in [800i16, -200, 0] {
            hhea.extend(v.to_be_bytes());
        }
        hhea.extend(u16s(&[1000, 0, 0, 1000, 1, 0, 0, 0, 0, 0, 0, 0]));
        hhea.extend(num_h_metrics.to_be_bytes());
        assert_eq!(hhea.len(), 36);

        let mut hmtx = vec![];
        for (i, &advance) in ADVANCES.iter().enumerate() {
            let advance = if i == usize::from(SPACE) { self.space_advance } else { advance };
            hmtx.extend(advance.to_be_bytes());
            hmtx.extend((i as i16).to_be_bytes());
        }
        hmtx.extend(u16s(&[10, 20]));

        let mut maxp = vec![];
        maxp.extend(0x00010000u32.to_be_bytes());
        maxp.extend(num_glyphs.to_be_bytes());
        maxp.extend(u16s(&[3, 1, 6, 2, 2, 0, 0, 0, 0, 0, 0, 2, 2]));

        let mut os2 = vec![0; 96];
        os2[0..2].copy_from_slice(&4u16.to_be_bytes());
        os2[4..6].copy_from_slice(&400u16.to_be_bytes());
        os2[6..8].copy_from_slice(&5u16.to_be_bytes());
        os2[8..10].copy_from_slice(&self.fs_type.to_be_bytes());
        os2[68..70].copy_from_slice(&780i16.to_be_bytes());
        os2[70..72].copy_from_slice(&(-220i16).to_be_bytes());
        os2[88..90].copy_from_slice(&700i16.to_be_bytes());

        let mut post = vec![];
        post.extend(0x00020000u32.to_be_bytes());
        let italic_angle: u32 = if self.italic { 0xFFF40000 } else { 0 };
        post.extend(italic_angle.to_be_bytes());
        for v in [-100i16, 50] {
            post.extend(v.to_be_bytes());
        }
        post.extend(u32::from(self.italic).to_be_bytes());
        post.extend([0; 16]);
        post.extend(num_glyphs.to_be_bytes());
        post.extend(vec![0; 2 * usize::from(num_glyphs)]);

        let family: Vec<u8> = "Test".encode_utf16().flat_map(u16::to_be_bytes).collect();
        let mut name = u16s(&[0, 1, 18, 3, 1, 0x409, 1, family.len() as u16, 0]);
        name.extend(family);

        let mut tables: Vec<(&[u8; 4], Vec<u8>)> = vec![
            (b"head", head),
            (b"hhea", hhea),
            (b"maxp", maxp),
            (b"hmtx", hmtx),
            (b"cmap", self.cmap()),
            (b"loca", loca),
            (b"glyf", glyf),
            (b"post", post),
            (b"name", name),
        ];
        if self.os2 {
            tables.push((b"OS/2", os2));
        }
        if self.prep {
            tables.push((b"prep", vec![0xB0, 0x01]));
        }

        // Tables are intentionally not sorted.
        let mut data = vec![];
        data.extend(self.sfnt_version.to_be_bytes());
        data.extend(u16s(&[tables.len() as u16, 0, 0, 0]));

        let mut offset = 12 + 16 * tables.len();
        for (tag, table) in &tables {
            data.extend(*tag);
            data.extend(0u32.to_be_bytes());
            data.extend((offset as u32).to_be_bytes());
            data.extend((table.len() as u32).to_be_bytes());
            offset += (table.len() + 3) / 4 * 4;
        }

        for (_, table) in &tables {
            data.extend(table);
            while data.len() % 4 != 0 {
                data.push(0);
            }
        }

        data
    }
}

/// Records outlines as a string, so they can be compared.
#[derive(Default)]
struct Recorder(String);

impl OutlineBuilder for Recorder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0 += &format!("M{x},{y} ");
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0 += &format!("L{x},{y} ");
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.0 += &format!("Q{x1},{y1},{x},{y} ");
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.0 += &format!("C{x1},{y1},{x2},{y2},{x},{y} ");
    }

    fn close(&mut self) {
        self.0 += "Z ";
    }
}

fn outline(face: &ttf_parser::Face, glyph: GlyphId) -> String {
    let mut recorder = Recorder::default();
    face.outline_glyph(glyph, &mut recorder);
    recorder.0
}

fn identity(text: &str) -> BTreeMap<u32, u32> {
    text.chars().map(|c| (c as u32, c as u32)).collect()
}

/// The table records of a font: tag, checksum, offset, length.
fn directory(data: &[u8]) -> Vec<([u8; 4], u32, usize, usize)> {
    let u32_at = |i: usize| u32::from_be_bytes(data[i..i + 4].try_into().unwrap());
    let count = u16::from_be_bytes([data[4], data[5]]) as usize;
    (0..count)
        .map(|i| {
            let at = 12 + 16 * i;
            let tag = data[at..at + 4].try_into().unwrap();
            (tag, u32_at(at + 4), u32_at(at + 8) as usize, u32_at(at + 12) as usize)
        })
        .collect()
}

fn table<'a>(data: &'a [u8], tag: &[u8; 4]) -> Option<&'a [u8]> {
    directory(data)
        .into_iter()
        .find(|(t, ..)| t == tag)
        .map(|(_, _, offset, len)| &data[offset..offset + len])
}

fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut bytes = [0; 4];
        bytes[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(bytes))
    })
}

/// Checks that the subset renders `text` exactly like the original font.
fn check_same(original: &[u8], subset: &[u8], text: &str) {
    let ttf = ttf_parser::Face::parse(original, 0).unwrap();
    let ttfs = ttf_parser::Face::parse(subset, 0).unwrap();

    for c in text.chars() {
        let id = ttf.glyph_index(c).unwrap();
        let ids = ttfs.glyph_index(c).unwrap();
        macro_rules! same {
            ($method:ident) => {
                assert_eq!(ttf.$method(id), ttfs.$method(ids), "{c}");
            };
        }
        same!(glyph_hor_advance);
        same!(glyph_hor_side_bearing);
        same!(glyph_bounding_box);
        assert_eq!(outline(&ttf, id), outline(&ttfs, ids), "{c}");
    }
}

#[test]
fn subset_renders_like_original() {
    let data = TestFont::default().build();
    let text = "AB D😀";
    let sub = subset(&data, &identity(text), Profile::pdf()).unwrap();
    check_same(&data, &sub.data, text);

    let ttfs = ttf_parser::Face::parse(&sub.data, 0).unwrap();
    // .notdef, A, B, C (through D), space, emoji, D
    assert_eq!(ttfs.number_of_glyphs(), 7);
    assert_eq!(ttfs.glyph_index('C'), None);
    assert_eq!(ttfs.glyph_index('x'), None);
    assert_eq!(ttfs.units_per_em(), 1000);
}

#[test]
fn compacts_glyph_ids() {
    let data = TestFont::default().build();
    let sub = subset(&data, &identity("😀D"), Profile::pdf()).unwrap();

    // Old glyphs 0, 1, 2, 3, 5, 7 become 0..=5 in ascending order.
    assert_eq!(sub.cid_to_gid, BTreeMap::from([(0x44, 5), (0x1F600, 4)]));
    assert_eq!(sub.last_cid, 0x1F600);

    let ttfs = ttf_parser::Face::parse(&sub.data, 0).unwrap();
    assert_eq!(ttfs.number_of_glyphs(), 6);
    assert_eq!(ttfs.glyph_index('D'), Some(GlyphId(5)));
    assert_eq!(ttfs.glyph_index('😀'), Some(GlyphId(4)));

    // The notdef glyph stays first.
    let ttf = ttf_parser::Face::parse(&data, 0).unwrap();
    assert_eq!(outline(&ttf, GlyphId(NOTDEF)), outline(&ttfs, GlyphId(0)));
    assert_eq!(ttfs.glyph_hor_advance(GlyphId(0)), Some(500));
}

#[test]
fn composite_references_are_rewritten() {
    let data = TestFont::default().build();
    let sub = subset(&data, &identity("D"), Profile::pdf()).unwrap();
    check_same(&data, &sub.data, "D");

    let ttfs = ttf_parser::Face::parse(&sub.data, 0).unwrap();
    // .notdef, A, B, C, D
    assert_eq!(ttfs.number_of_glyphs(), 5);
    assert!(!outline(&ttfs, GlyphId(4)).is_empty());
}

#[test]
fn metrics_of_monospace_tail() {
    let data = TestFont::default().build();
    let sub = subset(&data, &identity("D"), Profile::pdf()).unwrap();
    let ttfs = ttf_parser::Face::parse(&sub.data, 0).unwrap();

    // Glyph 7 is beyond the long metrics and shares the last advance.
    let id = ttfs.glyph_index('D').unwrap();
    assert_eq!(ttfs.glyph_hor_advance(id), Some(1000));
    assert_eq!(ttfs.glyph_hor_side_bearing(id), Some(20));

    let hhea = table(&sub.data, b"hhea").unwrap();
    assert_eq!(u16::from_be_bytes([hhea[34], hhea[35]]), 5);
    assert_eq!(table(&sub.data, b"hmtx").unwrap().len(), 20);
}

#[test]
fn checksums() {
    let data = TestFont::default().build();
    let sub = subset(&data, &identity("ABC"), Profile::pdf()).unwrap();

    assert_eq!(checksum(&sub.data), 0xB1B0AFBA);

    for (tag, sum, offset, len) in directory(&sub.data) {
        assert_eq!(offset % 4, 0);
        let mut table = sub.data[offset..offset + len].to_vec();
        if &tag == b"head" {
            table[8..12].fill(0);
        }
        assert_eq!(checksum(&table), sum, "{}", String::from_utf8_lossy(&tag));
    }

    let tags: Vec<_> = directory(&sub.data).into_iter().map(|(tag, ..)| tag).collect();
    let mut sorted = tags.clone();
    sorted.sort();
    assert_eq!(tags, sorted);

    // 10 tables: binary search hints for 8.
    assert_eq!(&sub.data[4..12], &[0, 10, 0, 128, 0, 3, 0, 32]);
}

#[test]
fn deterministic() {
    let data = TestFont::default().build();
    let used = identity("A😀 D");
    let first = subset(&data, &used, Profile::pdf()).unwrap();
    let second = subset(&data, &used, Profile::pdf()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn rewritten_tables() {
    let data = TestFont { prep: true, ..TestFont::default() }.build();
    let sub = subset(&data, &identity("AB"), Profile::pdf()).unwrap();

    let post = table(&sub.data, b"post").unwrap();
    assert_eq!(post.len(), 32);
    assert_eq!(&post[..4], &[0, 3, 0, 0]);

    let maxp = table(&sub.data, b"maxp").unwrap();
    assert_eq!(maxp.len(), 32);
    assert_eq!(&maxp[4..6], &[0, 3]);

    let cmap = table(&sub.data, b"cmap").unwrap();
    // One (3, 10) record, then a format 12 subtable with one group.
    assert_eq!(&cmap[..12], &[0, 0, 0, 1, 0, 3, 0, 10, 0, 0, 0, 12]);
    assert_eq!(&cmap[12..28], &fontcut::format12_header(1));
    assert_eq!(&cmap[28..], &[0, 0, 0, 0x41, 0, 0, 0, 0x42, 0, 0, 0, 1]);

    assert_eq!(table(&sub.data, b"OS/2"), table(&data, b"OS/2"));
    assert_eq!(table(&sub.data, b"name"), table(&data, b"name"));
    assert_eq!(table(&sub.data, b"prep"), Some(&[0xB0, 0x01][..]));

    let head = table(&sub.data, b"head").unwrap();
    assert_eq!(&head[50..52], &[0, 0]);

    let sub = subset(&data, &identity("AB"), Profile { hinting: false }).unwrap();
    assert_eq!(table(&sub.data, b"prep"), None);
}

#[test]
fn long_loca() {
    let data = TestFont { big_glyphs: true, ..TestFont::default() }.build();
    let text = "AB😀";
    let sub = subset(&data, &identity(text), Profile::pdf()).unwrap();
    check_same(&data, &sub.data, text);

    let head = table(&sub.data, b"head").unwrap();
    assert_eq!(&head[50..52], &[0, 1]);
    assert_eq!(table(&sub.data, b"loca").unwrap().len(), 4 * 5);

    // Two big glyphs still fit the short format.
    let sub = subset(&data, &identity("D"), Profile::pdf()).unwrap();
    check_same(&data, &sub.data, "D");
    let head = table(&sub.data, b"head").unwrap();
    assert_eq!(&head[50..52], &[0, 0]);

    let sub = subset(&data, &identity(" "), Profile::pdf()).unwrap();
    let head = table(&sub.data, b"head").unwrap();
    assert_eq!(&head[50..52], &[0, 0]);
}

#[test]
fn format4_only() {
    let data = TestFont { format12: false, ..TestFont::default() }.build();
    let sub = subset(&data, &identity("AC😀"), Profile::pdf()).unwrap();
    check_same(&data, &sub.data, "AC");

    // The emoji is not in the font, but still gets a ToUnicode entry.
    assert_eq!(sub.cid_to_gid.len(), 2);
    assert!(sub.to_unicode.contains("<0001F600> <D83DDE00>"));
    assert_eq!(sub.last_cid, 0x1F600);
}

#[test]
fn custom_cids() {
    let data = TestFont::default().build();
    let used = BTreeMap::from([(0, 0x41), (1, 0x42), (2, 0x1F600), (3, 0x5A)]);
    let sub = subset(&data, &used, Profile::pdf()).unwrap();

    // CID 0 is ignored, so `A` is not part of the subset.
    assert_eq!(sub.cid_to_gid, BTreeMap::from([(1, 1), (2, 2)]));
    assert_eq!(sub.last_cid, 3);
    assert!(sub.to_unicode.contains("<0000> <FFFF>"));
    assert!(sub.to_unicode.contains("3 beginbfchar\n<0001> <0042>\n<0002> <D83DDE00>\n<0003> <005A>\n"));

    let ttfs = ttf_parser::Face::parse(&sub.data, 0).unwrap();
    assert_eq!(ttfs.glyph_index('A'), None);
    assert_eq!(ttfs.number_of_glyphs(), 3);
}

#[test]
fn empty_subset() {
    let data = TestFont::default().build();
    let sub = subset(&data, &BTreeMap::new(), Profile::pdf()).unwrap();
    assert!(sub.cid_to_gid.is_empty());
    assert_eq!(sub.last_cid, 0);
    assert!(sub.to_unicode.contains("0 beginbfchar\nendbfchar\n"));

    let ttfs = ttf_parser::Face::parse(&sub.data, 0).unwrap();
    assert_eq!(ttfs.number_of_glyphs(), 1);
}

#[test]
fn cut_font_uses_codepoints() {
    let data = TestFont::default().build();
    let sub = cut_font(&data, "BA").unwrap();
    check_same(&data, &sub, "AB");
}

#[test]
fn rejects_unsupported_fonts() {
    let otf = TestFont { sfnt_version: u32::from_be_bytes(*b"OTTO"), ..TestFont::default() };
    assert_eq!(cut_font(&otf.build(), "A"), Err(Error::CffNotSupported));

    let ttc = TestFont { sfnt_version: u32::from_be_bytes(*b"ttcf"), ..TestFont::default() };
    assert_eq!(cut_font(&ttc.build(), "A"), Err(Error::CollectionNotSupported));

    let legacy = TestFont { sfnt_version: u32::from_be_bytes(*b"true"), ..TestFont::default() };
    assert!(cut_font(&legacy.build(), "A").is_ok());

    for fs_type in [0x0002, 0x0100, 0x0200] {
        let data = TestFont { fs_type, ..TestFont::default() }.build();
        assert_eq!(cut_font(&data, "A"), Err(Error::RestrictedLicense));
        assert_eq!(FontInfo::parse(&data).err(), Some(Error::RestrictedLicense));
    }

    let data = TestFont { fs_type: 0x0008, ..TestFont::default() }.build();
    assert!(cut_font(&data, "A").is_ok());
}

#[test]
fn rejects_malformed_fonts() {
    let data = TestFont::default().build();

    for len in [0, 11, 40, data.len() / 2] {
        let err = cut_font(&data[..len], "A").unwrap_err();
        assert!(err.is_malformed(), "{len}: {err}");
    }

    // Break the cmap by claiming one more format 12 group.
    let mut broken = data.clone();
    let cmap = directory(&data).into_iter().find(|(t, ..)| t == b"cmap").unwrap().2;
    let f12 = cmap + 20 + TestFont::default().cmap().len() - 20 - (16 + 12 * CHARS.len());
    broken[f12 + 15] += 1;
    assert_eq!(cut_font(&broken, "A"), Err(Error::InvalidCmap));
}

#[test]
fn font_info() {
    let data = TestFont::default().build();
    let info = FontInfo::parse(&data).unwrap();

    assert_eq!(info.names.family.as_deref(), Some("Test"));
    assert_eq!(info.units_per_em, 1000);
    assert_eq!(info.bbox, [0, -200, 1000, 800]);
    assert_eq!(info.ascent, 800);
    assert_eq!(info.descent, -200);
    assert_eq!(info.cap_height, 700);
    assert_eq!(info.weight, 400);
    assert_eq!(info.stem_v, 87);
    assert_eq!(info.italic_angle, 0.0);
    assert_eq!(info.underline_position, -100.0);
    assert_eq!(info.underline_thickness, 50.0);
    assert_eq!(info.flags, FontInfo::FLAG_NON_SYMBOLIC);
    assert_eq!(info.default_width, 500);

    assert_eq!(info.width('A'), 600);
    assert_eq!(info.width(' '), 250);
    assert_eq!(info.width('D'), 1000);
    assert_eq!(info.width('x'), 500);
    assert!(info.has_glyph('😀'));
    assert!(!info.has_glyph('x'));
    assert_eq!(info.glyph_index('C'), Some(C));
    assert_eq!(info.glyph_index(char::from_u32(0x1F600).unwrap()), Some(GRINNING));
    assert_eq!(info.char_widths.len(), CHARS.len());
    assert_eq!(info.last_char(), Some(0x1F600));

    let reverse = info.char_map().glyph_chars();
    assert_eq!(reverse[&A], vec![0x41]);
    assert!(!reverse.contains_key(&UNUSED));

    assert_eq!(fontcut::text::text_width("AB", &info.char_widths), 1250);
}

#[test]
fn font_info_scaling_and_fallbacks() {
    let data = TestFont {
        units_per_em: 2000,
        os2: false,
        italic: true,
        ..TestFont::default()
    }
    .build();
    let info = FontInfo::parse(&data).unwrap();

    assert_eq!(info.bbox, [0, -100, 500, 400]);
    assert_eq!(info.ascent, 400);
    assert_eq!(info.cap_height, 400);
    assert_eq!(info.weight, 500);
    assert_eq!(info.stem_v, 109);
    assert_eq!(info.italic_angle, -12.0);
    assert_eq!(info.underline_position, -50.0);
    assert_eq!(
        info.flags,
        FontInfo::FLAG_NON_SYMBOLIC | FontInfo::FLAG_FIXED_PITCH | FontInfo::FLAG_ITALIC
    );
    assert_eq!(info.width('A'), 300);
    assert_eq!(info.default_width, 250);
}

#[test]
fn font_info_zero_width_is_still_mapped() {
    let data = TestFont { space_advance: 0, ..TestFont::default() }.build();
    let info = FontInfo::parse(&data).unwrap();

    assert!(info.has_glyph(' '));
    assert_eq!(info.char_widths.get(&0x20), Some(&0));
    assert_eq!(info.width(' '), 0);
    assert_eq!(fontcut::text::text_width("A A", &info.char_widths), 1200);

    // Unmapped characters are absent and fall back to the default width.
    assert!(!info.has_glyph('x'));
    assert_eq!(info.char_widths.get(&('x' as u32)), None);
    assert_eq!(info.width('x'), 500);
}

#[test]
fn font_info_stem_width() {
    let with_os2 = FontInfo::parse(&TestFont::default().build()).unwrap();
    let without_os2 = TestFont { os2: false, ..TestFont::default() }.build();
    let without_os2 = FontInfo::parse(&without_os2).unwrap();
    assert_eq!((with_os2.stem_v, without_os2.stem_v), (87, 109));
}

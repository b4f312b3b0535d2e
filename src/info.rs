use crate::cmap::{self, CharMap};
use crate::head::Head;
use crate::hhea::Hhea;
use crate::hmtx::Hmtx;
use crate::name::FontNames;
use crate::os2::Os2;
use crate::post::Post;
use crate::{maxp, parse, Error, Result, Tag};
use std::collections::BTreeMap;

/// Metrics and metadata of a TrueType font, as needed for layout and for
/// the font descriptor of a PDF file.
///
/// All metrics are scaled to a 1000-unit em square.
#[derive(Debug, Clone)]
pub struct FontInfo {
    /// The font's names.
    pub names: FontNames,
    /// The font's design units per em.
    pub units_per_em: u16,
    /// The bounding box of all glyphs: `[x_min, y_min, x_max, y_max]`.
    pub bbox: [i32; 4],
    /// The typographic ascent.
    pub ascent: i32,
    /// The typographic descent, usually negative.
    pub descent: i32,
    /// The height of capital letters.
    pub cap_height: i32,
    /// The weight class, from 100 (thin) to 900 (black).
    pub weight: u16,
    /// An estimate of the vertical stem width.
    pub stem_v: i32,
    /// The italic angle in degrees, counter-clockwise from the vertical.
    pub italic_angle: f32,
    /// The position of the underline.
    pub underline_position: f32,
    /// The thickness of the underline.
    pub underline_thickness: f32,
    /// PDF font descriptor flags.
    pub flags: u32,
    /// The advance width of the `.notdef` glyph.
    pub default_width: u16,
    /// The advance width of every character the font maps to a glyph.
    ///
    /// A mapped character whose glyph has no advance is present with width 0.
    pub char_widths: BTreeMap<u32, u16>,
    char_map: CharMap,
}

impl FontInfo {
    /// The font has a fixed pitch.
    pub const FLAG_FIXED_PITCH: u32 = 1;
    /// The font uses characters outside of the standard Latin set.
    pub const FLAG_NON_SYMBOLIC: u32 = 4;
    /// The font is italic.
    pub const FLAG_ITALIC: u32 = 64;
    /// Bold glyphs should be painted bold even at small sizes.
    pub const FLAG_FORCE_BOLD: u32 = 262144;

    /// Read the metrics of a TrueType font.
    ///
    /// Fails for the same fonts as [`subset`](crate::subset) does, including
    /// fonts whose license forbids embedding.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let face = parse(data)?;

        let names = match face.table(Tag::NAME) {
            Some(data) => FontNames::parse(data).unwrap_or_else(|| {
                log::warn!("failed to read name table");
                FontNames::default()
            }),
            None => FontNames::default(),
        };

        let head = Head::parse(&face)?;
        let hhea = Hhea::parse(&face)?;
        let os2 = Os2::parse(&face)?;
        if os2.is_some_and(|os2| os2.is_restricted()) {
            return Err(Error::RestrictedLicense);
        }

        let post = Post::parse(&face)?;
        let char_map = cmap::parse(&face)?;
        let num_glyphs = maxp::num_glyphs(&face)?;
        let hmtx = Hmtx::parse(&face, hhea.num_h_metrics)?;

        let k = 1000.0 / f64::from(head.units_per_em);
        let scale = |v: i16| (f64::from(v) * k) as i32;
        let scale_width = |v: u16| {
            // Advances this large are bogus.
            if v >= 0x8000 {
                0
            } else {
                (f64::from(v) * k).round() as u16
            }
        };

        let bbox = head.bbox.map(scale);

        let (mut ascent, mut descent) = (scale(hhea.ascender), scale(hhea.descender));
        match os2 {
            Some(os2) => {
                if ascent == 0 {
                    ascent = scale(os2.typo_ascender);
                }
                if descent == 0 {
                    descent = scale(os2.typo_descender);
                }
            }
            None => {
                if ascent == 0 {
                    ascent = bbox[3];
                }
                if descent == 0 {
                    descent = bbox[1];
                }
            }
        }

        let cap_height = os2.and_then(|os2| os2.cap_height).map_or(ascent, scale);
        let weight = os2.map_or(500, |os2| os2.weight_class);
        let stem_v = estimate_stem_v(weight);

        let italic_angle = post.map_or(0.0, |post| post.italic_angle.0);
        let underline_position = post.map_or(0.0, |post| post.underline_position as f32 * k as f32);
        let underline_thickness = post.map_or(0.0, |post| post.underline_thickness as f32 * k as f32);

        let mut flags = Self::FLAG_NON_SYMBOLIC;
        if post.is_some_and(|post| post.is_fixed_pitch) {
            flags |= Self::FLAG_FIXED_PITCH;
        }
        if italic_angle != 0.0 {
            flags |= Self::FLAG_ITALIC;
        }
        if weight >= 600 {
            flags |= Self::FLAG_FORCE_BOLD;
        }

        let default_width = scale_width(hmtx.advance(0).ok_or(Error::MalformedFont)?);

        let mut char_widths = BTreeMap::new();
        for (c, glyph) in char_map.iter() {
            if c == 0 || c == 0xFFFF || glyph >= num_glyphs {
                continue;
            }

            let advance = hmtx.advance(glyph).ok_or(Error::MalformedFont)?;
            char_widths.insert(c, scale_width(advance));
        }

        log::debug!(
            "read font {:?} with {} glyphs and {} mapped characters",
            names.postscript_name,
            num_glyphs,
            char_widths.len()
        );

        Ok(Self {
            names,
            units_per_em: head.units_per_em,
            bbox,
            ascent,
            descent,
            cap_height,
            weight,
            stem_v,
            italic_angle,
            underline_position,
            underline_thickness,
            flags,
            default_width,
            char_widths,
            char_map,
        })
    }

    /// The glyph a character maps to in the original font.
    pub fn glyph_index(&self, c: char) -> Option<u16> {
        self.char_map.glyph_index(c as u32)
    }

    /// Whether the font has a glyph for a character.
    pub fn has_glyph(&self, c: char) -> bool {
        self.char_widths.contains_key(&(c as u32))
    }

    /// The advance width of a character, or the default width if the font
    /// has no glyph for it.
    pub fn width(&self, c: char) -> u16 {
        self.char_widths.get(&(c as u32)).copied().unwrap_or(self.default_width)
    }

    /// The font's character map.
    pub fn char_map(&self) -> &CharMap {
        &self.char_map
    }

    /// The highest mapped character.
    pub fn last_char(&self) -> Option<u32> {
        self.char_widths.keys().next_back().copied()
    }
}

/// Estimate the vertical stem width from the weight class. The square is
/// truncated only at the end.
fn estimate_stem_v(weight: u16) -> i32 {
    50 + (f64::from(weight) / 65.0).powi(2) as i32
}

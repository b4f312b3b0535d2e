use crate::utf16::surrogate_pair;
use std::collections::BTreeMap;
use std::fmt::Write;

const PROLOGUE: &str = "\
/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo
<</Registry (Adobe)
/Ordering (UCS)
/Supplement 0
>> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
";

const EPILOGUE: &str = "\
endcmap
CMapName currentdict /CMap defineresource pop
end
end";

/// The maximum number of entries in one `bfchar` block.
const BLOCK_SIZE: usize = 100;

/// Generate a `ToUnicode` CMap that maps CIDs to Unicode codepoints.
///
/// CIDs are written with two bytes, or with four bytes if any CID exceeds
/// `0xFFFF`. Codepoints outside the Basic Multilingual Plane are written as
/// surrogate pairs. CID 0 is never mapped.
pub fn to_unicode_cmap(cid_to_unicode: &BTreeMap<u32, u32>) -> String {
    let entries: Vec<(u32, u32)> = cid_to_unicode
        .iter()
        .filter(|&(&cid, _)| cid != 0)
        .map(|(&cid, &unicode)| (cid, unicode))
        .collect();

    let wide = entries.last().is_some_and(|&(cid, _)| cid > 0xFFFF);

    let mut cmap = String::with_capacity(PROLOGUE.len() + EPILOGUE.len() + 24 * entries.len());
    cmap.push_str(PROLOGUE);
    cmap.push_str("1 begincodespacerange\n");
    cmap.push_str(if wide { "<00000000> <0010FFFF>\n" } else { "<0000> <FFFF>\n" });
    cmap.push_str("endcodespacerange\n");

    if entries.is_empty() {
        cmap.push_str("0 beginbfchar\nendbfchar\n");
    }

    for block in entries.chunks(BLOCK_SIZE) {
        // Writing into a string can't fail.
        let _ = writeln!(cmap, "{} beginbfchar", block.len());
        for &(cid, unicode) in block {
            cmap.push('<');
            if wide {
                let _ = write!(cmap, "{cid:08X}");
            } else {
                let _ = write!(cmap, "{cid:04X}");
            }
            cmap.push_str("> <");
            write_unicode_hex(&mut cmap, unicode);
            cmap.push_str(">\n");
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str(EPILOGUE);
    cmap
}

fn write_unicode_hex(out: &mut String, cp: u32) {
    let _ = match surrogate_pair(cp) {
        Some((high, low)) => write!(out, "{high:04X}{low:04X}"),
        None if cp <= 0xFFFF => write!(out, "{cp:04X}"),
        None => write!(out, "0000"),
    };
}

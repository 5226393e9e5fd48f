use crate::{
    measure::Measure,
    refs::{ObjectReferences, RefType},
    Pt, Result,
};
use id_arena::Id;
use owned_ttf_parser::{AsFaceRef, GlyphId, OwnedFace};
use pdf_writer::{
    types::{CidFontType, FontFlags, SystemInfo},
    Filter, Finish, Name, Pdf, Ref, Str,
};
use std::collections::BTreeMap;
use std::path::Path;

/// A parsed TrueType / OpenType font.
///
/// Fonts do double duty: they are the [Measure] the fitter wraps text with, and they are
/// embedded in the overlay PDF that [Document::write](crate::Document::write) renders, so
/// what gets measured is exactly what gets drawn.
pub struct Font {
    pub face: OwnedFace,
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        Ok(Font { face })
    }

    /// Read and parse a font file from disk
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Font> {
        Font::load(std::fs::read(path)?)
    }

    fn name_entry(&self, name_id: u16) -> Option<String> {
        self.face
            .as_face_ref()
            .names()
            .into_iter()
            .find(|name| name.name_id == name_id && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    /// The PostScript name of the font, falling back to its full name
    pub fn name(&self) -> Option<String> {
        self.name_entry(owned_ttf_parser::name_id::POST_SCRIPT_NAME)
            .or_else(|| self.name_entry(owned_ttf_parser::name_id::FULL_NAME))
    }

    pub fn family(&self) -> Option<String> {
        self.name_entry(owned_ttf_parser::name_id::FAMILY)
    }

    fn scaling(&self, size: Pt) -> Pt {
        size / self.face.as_face_ref().units_per_em() as f32
    }

    /// Distance from the baseline to the top of the font at the given size
    pub fn ascent(&self, size: Pt) -> Pt {
        self.scaling(size) * self.face.as_face_ref().ascender() as f32
    }

    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.face.as_face_ref().glyph_index(ch).map(|i| i.0)
    }

    pub fn replacement_glyph_id(&self) -> Option<u16> {
        self.glyph_id('\u{FFFD}')
    }

    /// The glyph that will be drawn for `ch`: its own glyph if the font has one,
    /// otherwise the replacement character, otherwise `?`, otherwise `.notdef`
    pub fn glyph_for(&self, ch: char) -> u16 {
        self.glyph_id(ch)
            .or_else(|| self.replacement_glyph_id())
            .or_else(|| self.glyph_id('?'))
            .unwrap_or(0)
    }

    fn advance(&self, gid: u16) -> u16 {
        self.face
            .as_face_ref()
            .glyph_hor_advance(GlyphId(gid))
            .unwrap_or_default()
    }

    /// Width of the glyph in PDF glyph space (thousandths of an em)
    fn pdf_width(&self, gid: u16) -> f32 {
        self.advance(gid) as f32 * 1000.0 / self.face.as_face_ref().units_per_em() as f32
    }

    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        id: Id<Font>,
        used: &BTreeMap<u16, char>,
        writer: &mut Pdf,
    ) {
        let index = id.index();
        let base_font = self.name().unwrap_or_else(|| format!("F{index}"));
        let base_font = base_font.replace(' ', "");

        let font_ref = refs.gen(RefType::Font(index));
        let cid_ref = refs.gen(RefType::CidFont(index));
        let descriptor_ref = refs.gen(RefType::FontDescriptor(index));
        let data_ref = refs.gen(RefType::FontData(index));
        let to_unicode_ref = refs.gen(RefType::ToUnicode(index));

        writer
            .type0_font(font_ref)
            .base_font(Name(base_font.as_bytes()))
            .encoding_predefined(Name(b"Identity-H"))
            .descendant_font(cid_ref)
            .to_unicode(to_unicode_ref);

        let mut cid_font = writer.cid_font(cid_ref);
        cid_font.subtype(CidFontType::Type2);
        cid_font.base_font(Name(base_font.as_bytes()));
        cid_font.system_info(SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"Identity"),
            supplement: 0,
        });
        cid_font.font_descriptor(descriptor_ref);
        cid_font.default_width(self.pdf_width(0));
        cid_font.cid_to_gid_map_predefined(Name(b"Identity"));

        // only the glyphs that are actually drawn get an entry, in runs of consecutive ids
        let mut widths = cid_font.widths();
        let mut run_start: Option<u16> = None;
        let mut run: Vec<f32> = Vec::new();
        for &gid in used.keys() {
            match run_start {
                Some(start) if start as usize + run.len() == gid as usize => {}
                Some(start) => {
                    widths.consecutive(start, run.drain(..));
                    run_start = Some(gid);
                }
                None => run_start = Some(gid),
            }
            run.push(self.pdf_width(gid));
        }
        if let Some(start) = run_start {
            widths.consecutive(start, run.drain(..));
        }
        widths.finish();
        cid_font.finish();

        self.write_descriptor(descriptor_ref, data_ref, &base_font, writer);

        let compressed = compress(self.face.as_slice());
        writer
            .stream(data_ref, compressed.as_slice())
            .filter(Filter::FlateDecode)
            .pair(Name(b"Length1"), self.face.as_slice().len() as i32);

        let cmap = to_unicode_cmap(used);
        writer
            .stream(to_unicode_ref, compress(cmap.as_bytes()).as_slice())
            .filter(Filter::FlateDecode);
    }

    fn write_descriptor(&self, id: Ref, data: Ref, base_font: &str, writer: &mut Pdf) {
        let face = self.face.as_face_ref();
        let scaling = 1000.0 / face.units_per_em() as f32;
        let bbox = face.global_bounding_box();

        let mut flags = FontFlags::NON_SYMBOLIC;
        if face.is_monospaced() {
            flags.insert(FontFlags::FIXED_PITCH);
        }
        if face.is_italic() {
            flags.insert(FontFlags::ITALIC);
        }

        let mut descriptor = writer.font_descriptor(id);
        descriptor.name(Name(base_font.as_bytes()));
        if let Some(family) = self.family() {
            descriptor.family(Str(family.as_bytes()));
        }
        descriptor.flags(flags);
        descriptor.bbox(pdf_writer::Rect {
            x1: bbox.x_min as f32 * scaling,
            y1: bbox.y_min as f32 * scaling,
            x2: bbox.x_max as f32 * scaling,
            y2: bbox.y_max as f32 * scaling,
        });
        descriptor.italic_angle(face.italic_angle());
        descriptor.ascent(face.ascender() as f32 * scaling);
        descriptor.descent(face.descender() as f32 * scaling);
        descriptor.cap_height(
            face.capital_height()
                .map(|h| h as f32 * scaling)
                .unwrap_or(face.ascender() as f32 * scaling),
        );
        // not exposed by the font tables, 80 is what most writers use for regular weights
        descriptor.stem_v(80.0);
        descriptor.font_file2(data);
        descriptor.finish();
    }
}

impl Measure for Font {
    fn measure(&self, text: &str, size: Pt) -> Pt {
        let scaling = self.scaling(size);
        text.chars()
            .map(|ch| scaling * self.advance(self.glyph_for(ch)) as f32)
            .sum()
    }
}

pub(crate) fn compress(data: &[u8]) -> Vec<u8> {
    miniz_oxide::deflate::compress_to_vec_zlib(
        data,
        miniz_oxide::deflate::CompressionLevel::DefaultCompression as u8,
    )
}

/// Builds a ToUnicode CMap so text in the overlay can be copied and searched
fn to_unicode_cmap(used: &BTreeMap<u16, char>) -> String {
    let mut map = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n",
    );

    let entries: Vec<(&u16, &char)> = used.iter().collect();
    // a bfchar section holds at most 100 entries
    for block in entries.chunks(100) {
        map.push_str(&format!("{} beginbfchar\n", block.len()));
        for (gid, ch) in block {
            let mut units = [0u16; 2];
            let hex: String = ch
                .encode_utf16(&mut units)
                .iter()
                .map(|u| format!("{u:04X}"))
                .collect();
            map.push_str(&format!("<{gid:04X}> <{hex}>\n"));
        }
        map.push_str("endbfchar\n");
    }

    map.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
    map
}

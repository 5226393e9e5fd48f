use crate::{
    block::BlockManifest,
    colour::{colours, Colour},
    content::render_contents,
    fit::Fitted,
    font::{compress, Font},
    measure::Measure,
    page::{Page, SpanFont, SpanLayout},
    rect::Rect,
    refs::{ObjectReferences, RefType},
    units::Pt,
    ReflowError, Result,
};
use id_arena::{Arena, Id};
use pdf_writer::{Filter, Finish, Name, Pdf, Ref};
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use tracing::debug;

/// Where reflowed text ends up.
///
/// Implementors own the fonts blocks refer to (so the fitter can measure with them) and
/// know how to swap the text in a block's box for its fitted replacement.
pub trait DocumentEditor {
    /// Opaque handle identifying one of the editor's fonts
    type FontId: Copy + std::fmt::Debug;
    type Font: Measure;

    fn font(&self, id: Self::FontId) -> Result<&Self::Font>;

    /// Clears whatever is rendered inside `bbox` on the page and puts `fitted` there
    /// instead, left-aligned, in `font`. Nothing outside `bbox` may change.
    fn replace_block(
        &mut self,
        page_index: usize,
        bbox: Rect,
        fitted: &Fitted,
        font: Self::FontId,
    ) -> Result<()>;
}

/// An overlay document: one page per source page, holding nothing but the replaced
/// blocks. Each block is painted over with [Document::cover] and the new text is drawn
/// on top in [Document::text_colour], so stamping a page of the overlay onto its source
/// page swaps the old text for the new and leaves everything else alone.
///
/// Render it with [Document::write].
pub struct Document {
    pub pages: Vec<Page>,
    pub fonts: Arena<Font>,
    pub cover: Colour,
    pub text_colour: Colour,
}

impl Default for Document {
    fn default() -> Self {
        Document {
            pages: Vec::new(),
            fonts: Arena::new(),
            cover: colours::WHITE,
            text_colour: colours::BLACK,
        }
    }
}

impl Document {
    /// Add a font to the document, returning the id pages and blocks refer to it by
    pub fn add_font(&mut self, font: Font) -> Id<Font> {
        self.fonts.alloc(font)
    }

    /// Add an empty page of the given size to the end of the document, returning its index
    pub fn add_page(&mut self, width: Pt, height: Pt) -> usize {
        self.pages.push(Page::new(width, height));
        self.pages.len() - 1
    }

    /// Creates an empty overlay matching the manifest's pages and loads every font it
    /// names. Returns the font ids by name alongside the document.
    pub fn from_manifest(manifest: &BlockManifest) -> Result<(Document, HashMap<String, Id<Font>>)> {
        let mut document = Document::default();
        let mut font_ids = HashMap::new();
        for (name, path) in manifest.fonts.iter() {
            debug!(font = %name, path = %path.display(), "loading font");
            let id = document.add_font(Font::load_file(path)?);
            font_ids.insert(name.clone(), id);
        }
        for page in manifest.pages.iter() {
            document.add_page(Pt(page.width), Pt(page.height));
        }
        Ok((document, font_ids))
    }

    /// The glyphs drawn with each font, mapped back to the characters they stand for
    fn used_glyphs(&self) -> BTreeMap<usize, BTreeMap<u16, char>> {
        let mut used: BTreeMap<usize, BTreeMap<u16, char>> = BTreeMap::new();
        for span in self.pages.iter().flat_map(Page::spans) {
            let Some(font) = self.fonts.get(span.font.id) else {
                continue;
            };
            let glyphs = used.entry(span.font.id.index()).or_default();
            for ch in span.text.chars() {
                glyphs.entry(font.glyph_for(ch)).or_insert(ch);
            }
        }
        used
    }

    /// Render the overlay as a PDF into `w`. Only fonts that are actually drawn with
    /// get embedded.
    pub fn write<W: Write>(&self, mut w: W) -> Result<()> {
        let mut refs = ObjectReferences::new();
        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();

        let page_refs: Vec<Ref> = (0..self.pages.len())
            .map(|i| refs.gen(RefType::Page(i)))
            .collect();
        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs.iter().copied());

        let used = self.used_glyphs();
        for (id, font) in self.fonts.iter() {
            if let Some(glyphs) = used.get(&id.index()) {
                font.write(&mut refs, id, glyphs, &mut writer);
            }
        }

        for (page_index, page) in self.pages.iter().enumerate() {
            let content_id = refs.gen(RefType::ContentForPage(page_index));

            let mut pdf_page = writer.page(page_refs[page_index]);
            pdf_page.media_box(page.media_box.into());
            pdf_page.parent(page_tree_id);
            pdf_page.contents(content_id);

            let mut resources = pdf_page.resources();
            let mut fonts = resources.fonts();
            for index in used.keys() {
                if let Some(font_ref) = refs.get(RefType::Font(*index)) {
                    fonts.pair(Name(format!("F{index}").as_bytes()), font_ref);
                }
            }
            fonts.finish();
            resources.finish();
            pdf_page.finish();

            let rendered = compress(&render_contents(&page.contents, &self.fonts));
            writer
                .stream(content_id, rendered.as_slice())
                .filter(Filter::FlateDecode);
        }

        writer.catalog(catalog_id).pages(page_tree_id);

        w.write_all(writer.finish().as_slice())?;
        Ok(())
    }
}

impl DocumentEditor for Document {
    type FontId = Id<Font>;
    type Font = Font;

    fn font(&self, id: Id<Font>) -> Result<&Font> {
        self.fonts
            .get(id)
            .ok_or_else(|| ReflowError::FontMissing(format!("#{}", id.index())))
    }

    fn replace_block(
        &mut self,
        page_index: usize,
        bbox: Rect,
        fitted: &Fitted,
        font: Id<Font>,
    ) -> Result<()> {
        let ascent = self.font(font)?.ascent(fitted.font_size);
        let (cover, text_colour) = (self.cover, self.text_colour);
        let page = self
            .pages
            .get_mut(page_index)
            .ok_or(ReflowError::PageMissing(page_index))?;

        page.add_cover(bbox, cover);

        let mut y = bbox.y2 - ascent;
        let mut spans: Vec<SpanLayout> = Vec::with_capacity(fitted.lines.len());
        for line in fitted.lines.iter() {
            if !line.is_empty() {
                spans.push(SpanLayout {
                    text: line.clone(),
                    font: SpanFont {
                        id: font,
                        size: fitted.font_size,
                    },
                    colour: text_colour,
                    coords: (bbox.x1, y),
                });
            }
            y -= fitted.line_height;
        }
        page.add_spans(spans);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::testing::dejavu_sans;
    use crate::page::PageContents;

    fn letter_with_dejavu() -> (Document, Id<Font>) {
        let mut doc = Document::default();
        let font = doc.add_font(dejavu_sans());
        doc.add_page(Pt(612.0), Pt(792.0));
        (doc, font)
    }

    fn fitted(lines: &[&str]) -> Fitted {
        Fitted {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            font_size: Pt(10.0),
            line_height: Pt(12.0),
            overflows: false,
        }
    }

    #[test]
    fn replaced_blocks_are_covered_then_drawn_line_by_line() {
        let (mut doc, font) = letter_with_dejavu();
        let bbox = Rect::new(Pt(72.0), Pt(600.0), Pt(272.0), Pt(700.0));

        doc.replace_block(0, bbox, &fitted(&["Tere", "", "maailm"]), font)
            .expect("page and font exist");

        let contents = &doc.pages[0].contents;
        assert_eq!(contents.len(), 2);
        assert_eq!(
            contents[0],
            PageContents::Cover {
                area: bbox,
                colour: colours::WHITE
            }
        );

        let ascent = doc.fonts[font].ascent(Pt(10.0));
        assert!((ascent.0 - 9.282227).abs() < 1e-4, "{ascent}");
        let first = bbox.y2 - ascent;

        let PageContents::Text(spans) = &contents[1] else {
            panic!("expected text after the cover, got {:?}", contents[1]);
        };
        // the blank line still takes up a line
        let drawn: Vec<(&str, (Pt, Pt))> = spans.iter().map(|s| (s.text.as_str(), s.coords)).collect();
        assert_eq!(
            drawn,
            vec![
                ("Tere", (Pt(72.0), first)),
                ("maailm", (Pt(72.0), first - Pt(12.0) - Pt(12.0))),
            ]
        );
        for span in spans {
            assert_eq!(span.font, SpanFont { id: font, size: Pt(10.0) });
            assert_eq!(span.colour, colours::BLACK);
        }
    }

    #[test]
    fn blank_replacements_only_cover() {
        let (mut doc, font) = letter_with_dejavu();
        let bbox = Rect::new(Pt(10.0), Pt(10.0), Pt(50.0), Pt(30.0));
        doc.replace_block(0, bbox, &fitted(&[""]), font).expect("page and font exist");
        assert_eq!(doc.pages[0].contents.len(), 1);
        assert_eq!(doc.pages[0].spans().count(), 0);
    }

    #[test]
    fn missing_pages_and_fonts_are_errors() {
        let (mut doc, font) = letter_with_dejavu();
        let bbox = Rect::new(Pt(10.0), Pt(10.0), Pt(50.0), Pt(30.0));

        assert!(matches!(
            doc.replace_block(3, bbox, &fitted(&["x"]), font),
            Err(ReflowError::PageMissing(3))
        ));

        let mut elsewhere: Arena<Font> = Arena::new();
        let stray = elsewhere.alloc(dejavu_sans());
        assert!(matches!(
            doc.replace_block(0, bbox, &fitted(&["x"]), stray),
            Err(ReflowError::FontMissing(_))
        ));
        assert!(doc.pages[0].contents.is_empty());
    }

    #[test]
    fn writes_one_page_per_source_page() {
        let mut doc = Document::default();
        doc.add_font(dejavu_sans());
        doc.add_page(Pt(612.0), Pt(792.0));
        doc.add_page(Pt(595.0), Pt(842.0));
        doc.pages[1].add_cover(
            Rect::new(Pt(72.0), Pt(72.0), Pt(200.0), Pt(100.0)),
            colours::WHITE,
        );

        let mut out: Vec<u8> = Vec::new();
        doc.write(&mut out).expect("can write");

        let pdf = String::from_utf8_lossy(&out);
        assert!(pdf.starts_with("%PDF-"));
        assert!(pdf.contains("/Count 2"));
        assert!(pdf.contains("/MediaBox [0 0 612 792]"));
        assert!(pdf.contains("/MediaBox [0 0 595 842]"));
        // the font is loaded but nothing is drawn with it
        assert!(!pdf.contains("/Type0"));
        assert!(!pdf.contains("/FontFile2"));
    }

    #[test]
    fn fonts_that_draw_are_embedded() {
        let (mut doc, font) = letter_with_dejavu();
        let bbox = Rect::new(Pt(72.0), Pt(600.0), Pt(272.0), Pt(700.0));
        doc.replace_block(0, bbox, &fitted(&["Tere, maailm!"]), font)
            .expect("page and font exist");

        let mut out: Vec<u8> = Vec::new();
        doc.write(&mut out).expect("can write");

        let pdf = String::from_utf8_lossy(&out);
        assert!(pdf.contains("/Subtype /Type0"));
        assert!(pdf.contains("/BaseFont /DejaVuSans"));
        assert!(pdf.contains("/Encoding /Identity-H"));
        assert!(pdf.contains("/CIDToGIDMap /Identity"));
        assert!(pdf.contains("/FontFile2"));
        assert!(pdf.contains("/Length1 "));
        assert!(pdf.contains("/ToUnicode"));
        assert!(pdf.contains("/ItalicAngle 0"));
        assert!(pdf.contains("/F0"));
    }
}

//! Turns page contents into PDF content streams.

use crate::font::Font;
use crate::page::{PageContents, SpanLayout};
use id_arena::Arena;
use pdf_writer::{Content, Name, Str};

/// Renders page contents to an (uncompressed) PDF content stream.
pub(crate) fn render_contents(contents: &[PageContents], fonts: &Arena<Font>) -> Vec<u8> {
    let mut content = Content::new();

    for page_content in contents.iter() {
        match page_content {
            PageContents::Cover { area, colour } => {
                content.save_state();
                colour.apply_fill(&mut content);
                content.rect(area.x1.0, area.y1.0, area.width().0, area.height().0);
                content.fill_nonzero();
                content.restore_state();
            }
            PageContents::Text(spans) => render_text_spans(&mut content, spans, fonts),
        }
    }

    content.finish()
}

fn render_text_spans(content: &mut Content, spans: &[SpanLayout], fonts: &Arena<Font>) {
    content.save_state();
    for span in spans.iter() {
        let Some(font) = fonts.get(span.font.id) else {
            continue;
        };

        let glyphs: Vec<u8> = span
            .text
            .chars()
            .flat_map(|ch| font.glyph_for(ch).to_be_bytes())
            .collect();

        span.colour.apply_fill(content);
        content.begin_text();
        content.set_font(
            Name(format!("F{}", span.font.id.index()).as_bytes()),
            span.font.size.0,
        );
        content.next_line(span.coords.0 .0, span.coords.1 .0);
        content.show(Str(&glyphs));
        content.end_text();
    }
    content.restore_state();
}

use crate::colour::Colour;
use crate::font::Font;
use crate::rect::Rect;
use crate::units::Pt;
use id_arena::Id;

/// The font a span of text is set in
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SpanFont {
    pub id: Id<Font>,
    pub size: Pt,
}

/// A single line of text placed at an absolute baseline position
#[derive(Clone, PartialEq, Debug)]
pub struct SpanLayout {
    pub text: String,
    pub font: SpanFont,
    pub colour: Colour,
    /// Where the baseline of the span starts, in PDF user space
    pub coords: (Pt, Pt),
}

#[derive(Clone, PartialEq, Debug)]
pub enum PageContents {
    /// A filled rectangle painted over whatever was rendered there before
    Cover { area: Rect, colour: Colour },
    /// Lines of text, drawn in order
    Text(Vec<SpanLayout>),
}

/// One page of the overlay, the same size as the source page it sits on top of
#[derive(Clone, Debug)]
pub struct Page {
    /// The size of the page
    pub media_box: Rect,
    /// What has been drawn on the page, in painting order
    pub contents: Vec<PageContents>,
}

impl Page {
    pub fn new(width: Pt, height: Pt) -> Page {
        Page {
            media_box: Rect::new(Pt(0.0), Pt(0.0), width, height),
            contents: Vec::default(),
        }
    }

    pub fn add_cover(&mut self, area: Rect, colour: Colour) {
        self.contents.push(PageContents::Cover { area, colour });
    }

    pub fn add_spans(&mut self, spans: Vec<SpanLayout>) {
        if !spans.is_empty() {
            self.contents.push(PageContents::Text(spans));
        }
    }

    pub fn spans(&self) -> impl Iterator<Item = &SpanLayout> {
        self.contents
            .iter()
            .filter_map(|c| match c {
                PageContents::Text(spans) => Some(spans),
                PageContents::Cover { .. } => None,
            })
            .flatten()
    }
}

use crate::units::*;

/// A rectangle in PDF user space, specified by two opposite corners.
///
/// PDF puts the origin at the bottom-left of the page with y growing upwards, so
/// `(x1, y1)` is the lower-left corner and `(x2, y2)` the upper-right one.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rect {
    /// The x-coordinate of the lower-left corner.
    pub x1: Pt,
    /// The y-coordinate of the lower-left corner.
    pub y1: Pt,
    /// The x-coordinate of the upper-right corner.
    pub x2: Pt,
    /// The y-coordinate of the upper-right corner.
    pub y2: Pt,
}

impl Rect {
    pub fn new(x1: Pt, y1: Pt, x2: Pt, y2: Pt) -> Rect {
        Rect { x1, y1, x2, y2 }
    }

    /// Converts a box given in top-left-origin coordinates (as text extractors such as
    /// MuPDF report them) into PDF user space on a page of the given height.
    pub fn from_top_left(x0: f32, y0: f32, x1: f32, y1: f32, page_height: Pt) -> Rect {
        Rect {
            x1: Pt(x0),
            y1: page_height - Pt(y1),
            x2: Pt(x1),
            y2: page_height - Pt(y0),
        }
    }

    pub fn width(&self) -> Pt {
        self.x2 - self.x1
    }

    pub fn height(&self) -> Pt {
        self.y2 - self.y1
    }

    /// A rectangle with no area (or inverted corners) can't hold any text
    pub fn is_degenerate(&self) -> bool {
        !self.width().is_positive() || !self.height().is_positive()
    }
}

impl From<Rect> for pdf_writer::Rect {
    fn from(r: Rect) -> Self {
        pdf_writer::Rect {
            x1: r.x1.into(),
            y1: r.y1.into(),
            x2: r.x2.into(),
            y2: r.y2.into(),
        }
    }
}

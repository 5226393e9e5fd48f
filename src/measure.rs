use crate::units::Pt;
use std::cell::RefCell;
use std::collections::HashMap;

/// Anything that can tell how wide a run of text is when set at a given size.
///
/// The fitting functions treat the implementor as the font itself: callers pick the
/// font, the fitter only ever asks it for widths. Widths are expected to be
/// non-negative and non-decreasing in `size`.
pub trait Measure {
    fn measure(&self, text: &str, size: Pt) -> Pt;
}

impl<M: Measure + ?Sized> Measure for &M {
    fn measure(&self, text: &str, size: Pt) -> Pt {
        (**self).measure(text, size)
    }
}

/// Memoises the widths returned by another [Measure] for as long as it lives.
///
/// The wrapper re-measures the same candidate lines many times over while it searches
/// for a font size, so the fitter keeps one of these around for the duration of a
/// single fit call.
pub struct CachedMeasure<'m, M: Measure + ?Sized> {
    inner: &'m M,
    widths: RefCell<HashMap<(String, u32), Pt>>,
}

impl<'m, M: Measure + ?Sized> CachedMeasure<'m, M> {
    pub fn new(inner: &'m M) -> Self {
        CachedMeasure {
            inner,
            widths: RefCell::new(HashMap::new()),
        }
    }

    /// The number of distinct `(text, size)` pairs measured so far
    pub fn len(&self) -> usize {
        self.widths.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.borrow().is_empty()
    }
}

impl<M: Measure + ?Sized> Measure for CachedMeasure<'_, M> {
    fn measure(&self, text: &str, size: Pt) -> Pt {
        let key = (text.to_string(), size.0.to_bits());
        if let Some(width) = self.widths.borrow().get(&key) {
            return *width;
        }
        let width = self.inner.measure(text, size);
        self.widths.borrow_mut().insert(key, width);
        width
    }
}

//! End-to-end tests for the translate → fit → write-back pipeline.
//!
//! Fonts are stood in for by a fixed-advance metric and the document by an editor that
//! records what it was asked to write, so the whole flow runs without font files or a
//! translation service.

use pdf_reflow::block::{BlockManifest, TextBlock};
use pdf_reflow::fit::{fit_text_to_box, FitOptions, Fitted};
use pdf_reflow::pipeline::{Pipeline, ReflowReport};
use pdf_reflow::translate::{TranslationConfig, Translator};
use pdf_reflow::{DocumentEditor, Measure, Pt, Rect, ReflowError, Result};
use std::cell::RefCell;
use std::collections::HashMap;

// ─── Helpers ────────────────────────────────────────────────────

/// Every character is `advance` em wide
struct Mono {
    advance: f32,
}

impl Measure for Mono {
    fn measure(&self, text: &str, size: Pt) -> Pt {
        size * (text.chars().count() as f32 * self.advance)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Replacement {
    page_index: usize,
    bbox: Rect,
    fitted: Fitted,
    font: usize,
}

struct RecordingEditor {
    fonts: Vec<Mono>,
    pages: usize,
    written: Vec<Replacement>,
}

impl RecordingEditor {
    fn new(pages: usize) -> Self {
        RecordingEditor {
            fonts: vec![Mono { advance: 0.5 }, Mono { advance: 0.6 }],
            pages,
            written: Vec::new(),
        }
    }
}

impl DocumentEditor for RecordingEditor {
    type FontId = usize;
    type Font = Mono;

    fn font(&self, id: usize) -> Result<&Mono> {
        self.fonts
            .get(id)
            .ok_or_else(|| ReflowError::FontMissing(id.to_string()))
    }

    fn replace_block(&mut self, page_index: usize, bbox: Rect, fitted: &Fitted, font: usize) -> Result<()> {
        if page_index >= self.pages {
            return Err(ReflowError::PageMissing(page_index));
        }
        self.written.push(Replacement {
            page_index,
            bbox,
            fitted: fitted.clone(),
            font,
        });
        Ok(())
    }
}

/// Looks translations up in a phrasebook, failing on anything it doesn't know
struct Phrasebook {
    entries: HashMap<&'static str, &'static str>,
    calls: RefCell<usize>,
}

impl Phrasebook {
    fn new(entries: &[(&'static str, &'static str)]) -> Self {
        Phrasebook {
            entries: entries.iter().copied().collect(),
            calls: RefCell::new(0),
        }
    }
}

impl Translator for Phrasebook {
    fn translate_chunk(&self, chunk: &str, _source: Option<&str>, target: &str) -> Result<String> {
        *self.calls.borrow_mut() += 1;
        assert_eq!(target, "et");
        chunk
            .lines()
            .map(|line| {
                self.entries.get(line).map(|t| t.to_string()).ok_or_else(|| ReflowError::Translation {
                    status: 400,
                    message: format!("no translation for `{line}`"),
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(|lines| lines.join("\n"))
    }
}

fn block(page_index: usize, bbox: Rect, text: &str, font: usize, size: f32) -> TextBlock<usize> {
    TextBlock {
        page_index,
        bbox,
        text: text.to_string(),
        font,
        base_font_size: Pt(size),
    }
}

fn rect(x: f32, y: f32, width: f32, height: f32) -> Rect {
    Rect::new(Pt(x), Pt(y), Pt(x + width), Pt(y + height))
}

// ─── Tests ──────────────────────────────────────────────────────

#[test]
fn blocks_are_written_back_in_order_at_their_own_boxes() {
    let translator = Phrasebook::new(&[
        ("Good morning", "Tere hommikust"),
        ("Thank you", "Aitäh"),
        ("See you", "Näeme"),
    ]);
    let config = TranslationConfig::default();
    let blocks = vec![
        block(0, rect(72.0, 700.0, 300.0, 30.0), "Good morning", 0, 12.0),
        block(1, rect(72.0, 500.0, 200.0, 20.0), "Thank you", 1, 10.0),
        block(0, rect(72.0, 600.0, 300.0, 30.0), "See you", 0, 12.0),
    ];

    let mut editor = RecordingEditor::new(2);
    let report = Pipeline::new(&translator, &config)
        .run(&mut editor, &blocks)
        .expect("pipeline runs");

    assert_eq!(
        report,
        ReflowReport {
            blocks: 3,
            shrunk: 0,
            overflowed: 0
        }
    );
    let texts: Vec<String> = editor.written.iter().map(|r| r.fitted.text()).collect();
    assert_eq!(texts, vec!["Tere hommikust", "Aitäh", "Näeme"]);
    for (written, block) in editor.written.iter().zip(blocks.iter()) {
        assert_eq!(written.page_index, block.page_index);
        assert_eq!(written.bbox, block.bbox);
        assert_eq!(written.font, block.font);
        assert_eq!(written.fitted.font_size, block.base_font_size);
    }
}

#[test]
fn each_block_is_fitted_on_its_own() {
    let long = "Pikk tõlge, mis ei mahu kuidagi algsesse kasti ära";
    let translator = Phrasebook::new(&[("Long", long), ("Short", "Lühike")]);
    let config = TranslationConfig::default();
    let small_box = rect(0.0, 0.0, 60.0, 30.0);
    let blocks = vec![
        block(0, small_box, "Long", 0, 12.0),
        block(0, rect(0.0, 100.0, 200.0, 30.0), "Short", 0, 12.0),
    ];

    let mut editor = RecordingEditor::new(1);
    let report = Pipeline::new(&translator, &config)
        .run(&mut editor, &blocks)
        .expect("pipeline runs");

    let expected = fit_text_to_box(long, &Mono { advance: 0.5 }, Pt(12.0), small_box, &FitOptions::default())
        .expect("valid sizes");
    assert!(expected.font_size < Pt(12.0));
    assert_eq!(editor.written[0].fitted, expected);

    // shrinking the first block leaves the second one alone
    assert_eq!(editor.written[1].fitted.font_size, Pt(12.0));
    assert_eq!(report.shrunk, 1);
}

#[test]
fn overflow_at_the_floor_is_reported_not_raised() {
    let paragraph = lipsum::lipsum(200);
    let translated: &'static str = Box::leak(paragraph.into_boxed_str());
    let translator = Phrasebook::new(&[("Everything", translated)]);
    let config = TranslationConfig::default();
    let tiny = rect(0.0, 0.0, 50.0, 10.0);

    let mut editor = RecordingEditor::new(1);
    let report = Pipeline::new(&translator, &config)
        .run(&mut editor, &[block(0, tiny, "Everything", 0, 11.0)])
        .expect("overflow is not an error");

    assert_eq!(report.overflowed, 1);
    let fitted = &editor.written[0].fitted;
    assert_eq!(fitted.font_size, Pt(6.0));
    assert!(fitted.overflows);
}

#[test]
fn custom_floor_is_respected() {
    let translator = Phrasebook::new(&[("Text", "üks kaks kolm neli viis kuus seitse kaheksa")]);
    let config = TranslationConfig::default();
    let options = FitOptions {
        min_font_size: Pt(9.0),
        ..FitOptions::default()
    };

    let mut editor = RecordingEditor::new(1);
    Pipeline::new(&translator, &config)
        .with_fit_options(options)
        .run(&mut editor, &[block(0, rect(0.0, 0.0, 40.0, 10.0), "Text", 0, 12.0)])
        .expect("pipeline runs");

    assert_eq!(editor.written[0].fitted.font_size, Pt(9.0));
}

#[test]
fn translation_failures_stop_the_run() {
    let translator = Phrasebook::new(&[("Known", "Tuntud")]);
    let config = TranslationConfig::default();
    let blocks = vec![
        block(0, rect(0.0, 0.0, 100.0, 20.0), "Known", 0, 10.0),
        block(0, rect(0.0, 50.0, 100.0, 20.0), "Unknown", 0, 10.0),
        block(0, rect(0.0, 90.0, 100.0, 20.0), "Known", 0, 10.0),
    ];

    let mut editor = RecordingEditor::new(1);
    let err = Pipeline::new(&translator, &config)
        .run(&mut editor, &blocks)
        .expect_err("unknown phrase");

    assert!(matches!(err, ReflowError::Translation { status: 400, .. }));
    assert_eq!(editor.written.len(), 1);
}

#[test]
fn missing_pages_and_fonts_are_errors() {
    let translator = Phrasebook::new(&[("Hi", "Tere")]);
    let config = TranslationConfig::default();

    let mut editor = RecordingEditor::new(1);
    let err = Pipeline::new(&translator, &config)
        .run(&mut editor, &[block(3, rect(0.0, 0.0, 100.0, 20.0), "Hi", 0, 10.0)])
        .expect_err("no page 3");
    assert!(matches!(err, ReflowError::PageMissing(3)));

    let err = Pipeline::new(&translator, &config)
        .run(&mut editor, &[block(0, rect(0.0, 0.0, 100.0, 20.0), "Hi", 7, 10.0)])
        .expect_err("no font 7");
    assert!(matches!(err, ReflowError::FontMissing(_)));
}

#[test]
fn long_blocks_are_translated_in_chunks() {
    let translator = Phrasebook::new(&[("one", "üks"), ("two", "kaks"), ("three", "kolm")]);
    let config = TranslationConfig {
        chunk_limit: 8,
        ..TranslationConfig::default()
    };

    let mut editor = RecordingEditor::new(1);
    Pipeline::new(&translator, &config)
        .run(&mut editor, &[block(0, rect(0.0, 0.0, 300.0, 100.0), "one\ntwo\nthree", 0, 10.0)])
        .expect("pipeline runs");

    assert_eq!(*translator.calls.borrow(), 2);
    assert_eq!(editor.written[0].fitted.lines, vec!["üks", "kaks", "kolm"]);
}

#[test]
fn manifest_blocks_flow_through_the_pipeline() {
    let manifest = BlockManifest::from_json(
        r#"{
            "fonts": { "body": "Body.ttf", "heading": "Heading.ttf" },
            "default_font": "body",
            "pages": [
                {
                    "width": 612, "height": 792,
                    "blocks": [
                        { "bbox": [72, 72, 540, 100], "lines": ["Thank you"], "font": "heading", "size": 20 },
                        { "bbox": [72, 110, 540, 140], "lines": ["Good morning"] }
                    ]
                }
            ]
        }"#,
    )
    .expect("valid manifest");
    let font_ids: HashMap<&str, usize> = [("body", 0), ("heading", 1)].into_iter().collect();
    let blocks = manifest
        .blocks(|name| font_ids.get(name).copied())
        .expect("valid blocks");

    let translator = Phrasebook::new(&[("Good morning", "Tere hommikust"), ("Thank you", "Aitäh")]);
    let config = TranslationConfig::default();
    let mut editor = RecordingEditor::new(manifest.pages.len());
    Pipeline::new(&translator, &config)
        .run(&mut editor, &blocks)
        .expect("pipeline runs");

    assert_eq!(editor.written.len(), 2);
    assert_eq!(editor.written[0].fitted.text(), "Aitäh");
    assert_eq!(editor.written[0].font, 1);
    assert_eq!(editor.written[0].bbox, Rect::new(Pt(72.0), Pt(692.0), Pt(540.0), Pt(720.0)));
    assert_eq!(editor.written[1].fitted.text(), "Tere hommikust");
    assert_eq!(editor.written[1].font, 0);
    assert_eq!(editor.written[1].fitted.font_size, Pt(11.0));
}

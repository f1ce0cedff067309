//! Page layout: turns a `ReportData` into positioned text lines, page by page.
//!
//! Coordinates are PDF points with the origin at the bottom-left of a US-letter page.
//! Everything here is pure and CPU-bound; callers run it on the blocking pool.

use crate::render::font_metrics::{measure, wrap_text, FontFace};
use crate::report::ReportData;

pub const PAGE_WIDTH_PT: f32 = 612.0;
pub const PAGE_HEIGHT_PT: f32 = 792.0;
pub const MARGIN_PT: f32 = 72.0;
const TEXT_WIDTH_PT: f32 = PAGE_WIDTH_PT - 2.0 * MARGIN_PT;
const FOOTER_BASELINE_PT: f32 = 40.0;

const TITLE_SIZE: f32 = 20.0;
const SUBTITLE_SIZE: f32 = 12.0;
const HEADING_SIZE: f32 = 14.0;
const SUBHEADING_SIZE: f32 = 11.5;
const BODY_SIZE: f32 = 11.0;
const FOOTER_SIZE: f32 = 9.0;
const LEADING: f32 = 1.35;
const BULLET_INDENT_PT: f32 = 14.0;

/// A single line of text at an absolute position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub face: FontFace,
    pub size: f32,
    pub x: f32,
    pub y: f32,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    pub lines: Vec<TextLine>,
}

/// Paragraph-level structure recovered from LLM-written section text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(String),
    Bullet(String),
    Subheading(String),
}

/// Flattens the light markdown LLMs like to emit into plain blocks.
///
/// Consecutive plain lines join into one paragraph; blank lines end it.
/// `#` headings become subheadings, `-`/`*`/`•` items become bullets, and
/// emphasis markers are dropped.
pub fn flatten_markdown(body: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<String> = Vec::new();

    fn flush(paragraph: &mut Vec<String>, blocks: &mut Vec<Block>) {
        if !paragraph.is_empty() {
            blocks.push(Block::Paragraph(paragraph.join(" ")));
            paragraph.clear();
        }
    }

    for raw in body.lines() {
        let line = strip_emphasis(raw.trim());
        let line = line.trim();

        if line.is_empty() {
            flush(&mut paragraph, &mut blocks);
            continue;
        }

        if line.starts_with('#') {
            flush(&mut paragraph, &mut blocks);
            let heading = line.trim_start_matches('#').trim();
            if !heading.is_empty() {
                blocks.push(Block::Subheading(heading.to_string()));
            }
            continue;
        }

        let bullet = ["- ", "* ", "\u{2022} "]
            .iter()
            .find_map(|marker| line.strip_prefix(marker));
        if let Some(item) = bullet {
            flush(&mut paragraph, &mut blocks);
            let item = item.trim();
            if !item.is_empty() {
                blocks.push(Block::Bullet(item.to_string()));
            }
            continue;
        }

        paragraph.push(line.to_string());
    }

    flush(&mut paragraph, &mut blocks);
    blocks
}

fn strip_emphasis(line: &str) -> String {
    line.replace("**", "").replace("__", "").replace('`', "")
}

/// Cursor that places lines top-down and starts new pages as needed.
struct PageWriter {
    pages: Vec<PageLayout>,
    current: PageLayout,
    y: f32,
}

impl PageWriter {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: PageLayout::default(),
            y: PAGE_HEIGHT_PT - MARGIN_PT,
        }
    }

    fn new_page(&mut self) {
        let page = std::mem::take(&mut self.current);
        self.pages.push(page);
        self.y = PAGE_HEIGHT_PT - MARGIN_PT;
    }

    fn remaining(&self) -> f32 {
        self.y - MARGIN_PT
    }

    fn space(&mut self, points: f32) {
        // Vertical space at the top of a page is swallowed.
        if self.current.lines.is_empty() {
            return;
        }
        self.y -= points;
    }

    /// Ensures `points` of vertical room, breaking the page if needed.
    fn reserve(&mut self, points: f32) {
        if self.remaining() < points && !self.current.lines.is_empty() {
            self.new_page();
        }
    }

    fn line(&mut self, face: FontFace, size: f32, x: f32, text: String) {
        let advance = size * LEADING;
        self.reserve(advance);
        self.y -= size;
        self.current.lines.push(TextLine {
            face,
            size,
            x,
            y: self.y,
            text,
        });
        self.y -= advance - size;
    }

    fn wrapped(&mut self, face: FontFace, size: f32, indent: f32, text: &str) {
        for line in wrap_text(text, face, size, TEXT_WIDTH_PT - indent) {
            self.line(face, size, MARGIN_PT + indent, line);
        }
    }

    fn finish(mut self) -> Vec<PageLayout> {
        if !self.current.lines.is_empty() || self.pages.is_empty() {
            self.new_page();
        }
        self.pages
    }
}

/// Lays out the whole report and stamps `Page n of N` footers.
pub fn layout_report(report: &ReportData) -> Vec<PageLayout> {
    let mut writer = PageWriter::new();

    writer.wrapped(FontFace::Bold, TITLE_SIZE, 0.0, &report.title);
    writer.space(6.0);
    writer.wrapped(
        FontFace::Regular,
        SUBTITLE_SIZE,
        0.0,
        &format!("Prepared for: {}", report.student_name),
    );
    writer.wrapped(
        FontFace::Regular,
        SUBTITLE_SIZE,
        0.0,
        &format!("Career goal: {}", report.career_goal),
    );
    writer.wrapped(
        FontFace::Regular,
        SUBTITLE_SIZE,
        0.0,
        &format!("Date: {}", report.generated_on.format("%B %-d, %Y")),
    );

    for section in &report.sections {
        writer.space(HEADING_SIZE);
        // Keep a heading together with at least two body lines.
        writer.reserve(HEADING_SIZE * LEADING + 2.0 * BODY_SIZE * LEADING);
        writer.wrapped(FontFace::Bold, HEADING_SIZE, 0.0, &section.topic);
        writer.space(2.0);

        for block in flatten_markdown(&section.body) {
            match block {
                Block::Paragraph(text) => {
                    writer.wrapped(FontFace::Regular, BODY_SIZE, 0.0, &text);
                    writer.space(BODY_SIZE * 0.5);
                }
                Block::Subheading(text) => {
                    writer.space(BODY_SIZE * 0.25);
                    writer.reserve(SUBHEADING_SIZE * LEADING + BODY_SIZE * LEADING);
                    writer.wrapped(FontFace::Bold, SUBHEADING_SIZE, 0.0, &text);
                }
                Block::Bullet(text) => {
                    let lines = wrap_text(
                        &text,
                        FontFace::Regular,
                        BODY_SIZE,
                        TEXT_WIDTH_PT - BULLET_INDENT_PT,
                    );
                    for (i, line) in lines.into_iter().enumerate() {
                        if i == 0 {
                            writer.reserve(BODY_SIZE * LEADING);
                            let marker_y = writer.y - BODY_SIZE;
                            writer.current.lines.push(TextLine {
                                face: FontFace::Regular,
                                size: BODY_SIZE,
                                x: MARGIN_PT + 2.0,
                                y: marker_y,
                                text: "-".to_string(),
                            });
                        }
                        writer.line(
                            FontFace::Regular,
                            BODY_SIZE,
                            MARGIN_PT + BULLET_INDENT_PT,
                            line,
                        );
                    }
                }
            }
        }
    }

    let mut pages = writer.finish();
    stamp_footers(&mut pages);
    pages
}

fn stamp_footers(pages: &mut [PageLayout]) {
    let total = pages.len();
    for (i, page) in pages.iter_mut().enumerate() {
        let text = format!("Page {} of {}", i + 1, total);
        let width = measure(&text, FontFace::Regular, FOOTER_SIZE);
        page.lines.push(TextLine {
            face: FontFace::Regular,
            size: FOOTER_SIZE,
            x: (PAGE_WIDTH_PT - width) / 2.0,
            y: FOOTER_BASELINE_PT,
            text,
        });
    }
}

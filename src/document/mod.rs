//! Minimal rich-document writer used for invoices.
//!
//! `DocumentWriter` is the seam: the service only supplies content and
//! layout directives. `PlainTextDocument` renders to UTF-8 text and
//! `DocxDocument` to an Office Open XML package.

mod docx;
mod plain;

pub use docx::*;
pub use plain::*;

use std::io::Write;

use anyhow::Result;

/// Handle to a paragraph inside the document that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParagraphId(usize);

impl ParagraphId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

pub trait DocumentWriter {
    /// Add a heading. Level 0 is the document title.
    fn add_heading(&mut self, text: &str, level: u8);

    fn add_paragraph(&mut self, text: &str) -> ParagraphId;

    fn set_alignment(&mut self, paragraph: ParagraphId, alignment: Alignment);

    fn save(&self, out: &mut dyn Write) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Block {
    Heading { text: String, level: u8 },
    Paragraph { text: String, alignment: Alignment },
}

/// Ordered content shared by the concrete writers.
#[derive(Debug, Clone, Default)]
struct Blocks(Vec<Block>);

impl Blocks {
    fn add_heading(&mut self, text: &str, level: u8) {
        self.0.push(Block::Heading {
            text: text.to_string(),
            level,
        });
    }

    fn add_paragraph(&mut self, text: &str) -> ParagraphId {
        self.0.push(Block::Paragraph {
            text: text.to_string(),
            alignment: Alignment::Left,
        });
        ParagraphId::new(self.0.len() - 1)
    }

    /// Ids that point at a heading or past the end are ignored.
    fn set_alignment(&mut self, paragraph: ParagraphId, alignment: Alignment) {
        if let Some(Block::Paragraph {
            alignment: current, ..
        }) = self.0.get_mut(paragraph.index())
        {
            *current = alignment;
        }
    }

    fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.0.iter()
    }
}

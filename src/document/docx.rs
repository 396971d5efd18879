use std::collections::BTreeSet;
use std::io::{Cursor, Write};

use anyhow::{Context, Result};
use docx_rs::{AlignmentType, Docx, Paragraph, Run, Style, StyleType};

use super::{Alignment, Block, Blocks, DocumentWriter, ParagraphId};

/// Word (.docx) renderer. Level 0 headings use the `Title` style, level n
/// uses `Heading{n}`.
#[derive(Debug, Clone, Default)]
pub struct DocxDocument {
    blocks: Blocks,
}

impl DocxDocument {
    pub fn new() -> Self {
        Self::default()
    }

    fn build(&self) -> Docx {
        let levels: BTreeSet<u8> = self
            .blocks
            .iter()
            .filter_map(|block| match block {
                Block::Heading { level, .. } => Some(*level),
                Block::Paragraph { .. } => None,
            })
            .collect();

        let mut docx = levels
            .into_iter()
            .fold(Docx::new(), |docx, level| docx.add_style(heading_style(level)));

        for block in self.blocks.iter() {
            let paragraph = match block {
                Block::Heading { text, level } => Paragraph::new()
                    .add_run(Run::new().add_text(text))
                    .style(&heading_style_id(*level)),
                Block::Paragraph { text, alignment } => Paragraph::new()
                    .add_run(Run::new().add_text(text))
                    .align(alignment_type(*alignment)),
            };
            docx = docx.add_paragraph(paragraph);
        }
        docx
    }
}

fn heading_style_id(level: u8) -> String {
    if level == 0 {
        "Title".to_string()
    } else {
        format!("Heading{}", level)
    }
}

fn heading_style(level: u8) -> Style {
    let (name, size) = match level {
        0 => ("Title".to_string(), 56),
        1 => ("Heading 1".to_string(), 32),
        n => (format!("Heading {}", n), 26),
    };
    Style::new(heading_style_id(level), StyleType::Paragraph)
        .name(name)
        .size(size)
        .bold()
}

fn alignment_type(alignment: Alignment) -> AlignmentType {
    match alignment {
        Alignment::Left => AlignmentType::Left,
        Alignment::Center => AlignmentType::Center,
        Alignment::Right => AlignmentType::Right,
    }
}

impl DocumentWriter for DocxDocument {
    fn add_heading(&mut self, text: &str, level: u8) {
        self.blocks.add_heading(text, level);
    }

    fn add_paragraph(&mut self, text: &str) -> ParagraphId {
        self.blocks.add_paragraph(text)
    }

    fn set_alignment(&mut self, paragraph: ParagraphId, alignment: Alignment) {
        self.blocks.set_alignment(paragraph, alignment);
    }

    fn save(&self, out: &mut dyn Write) -> Result<()> {
        // The zip writer needs to seek, so pack in memory first
        let mut package = Cursor::new(Vec::new());
        self.build()
            .build()
            .pack(&mut package)
            .context("Failed to pack docx document")?;
        out.write_all(package.get_ref())?;
        out.flush()?;
        Ok(())
    }
}

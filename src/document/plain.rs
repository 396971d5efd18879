use std::io::Write;

use anyhow::Result;

use super::{Alignment, Block, Blocks, DocumentWriter, ParagraphId};

/// Plain-text renderer. Headings are underlined, aligned paragraphs are
/// padded to `width` columns.
#[derive(Debug, Clone)]
pub struct PlainTextDocument {
    blocks: Blocks,
    width: usize,
}

impl Default for PlainTextDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PlainTextDocument {
    pub const DEFAULT_WIDTH: usize = 60;

    pub fn new() -> Self {
        Self::with_width(Self::DEFAULT_WIDTH)
    }

    pub fn with_width(width: usize) -> Self {
        Self {
            blocks: Blocks::default(),
            width,
        }
    }

    fn align(&self, text: &str, alignment: Alignment) -> String {
        let len = text.chars().count();
        let pad = self.width.saturating_sub(len);
        match alignment {
            Alignment::Left => text.to_string(),
            Alignment::Right => format!("{}{}", " ".repeat(pad), text),
            Alignment::Center => format!("{}{}", " ".repeat(pad / 2), text),
        }
    }
}

impl DocumentWriter for PlainTextDocument {
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
        for (index, block) in self.blocks.iter().enumerate() {
            if index > 0 {
                writeln!(out)?;
            }
            match block {
                Block::Heading { text, level } => {
                    let rule = if *level == 0 { '=' } else { '-' };
                    writeln!(out, "{}", text)?;
                    writeln!(out, "{}", rule.to_string().repeat(text.chars().count()))?;
                }
                Block::Paragraph { text, alignment } => {
                    writeln!(out, "{}", self.align(text, *alignment))?;
                }
            }
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(doc: &PlainTextDocument) -> String {
        let mut buf = Vec::new();
        doc.save(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_heading_is_underlined() {
        let mut doc = PlainTextDocument::new();
        doc.add_heading("Title", 0);
        doc.add_heading("Section", 1);
        assert_eq!(render(&doc), "Title\n=====\n\nSection\n-------\n");
    }

    #[test]
    fn test_right_alignment_pads_to_width() {
        let mut doc = PlainTextDocument::with_width(10);
        let id = doc.add_paragraph("abc");
        doc.set_alignment(id, Alignment::Right);
        assert_eq!(render(&doc), "       abc\n");
    }

    #[test]
    fn test_center_and_overflow() {
        let mut doc = PlainTextDocument::with_width(7);
        let centered = doc.add_paragraph("abc");
        doc.set_alignment(centered, Alignment::Center);
        let long = doc.add_paragraph("longer than width");
        doc.set_alignment(long, Alignment::Right);
        assert_eq!(render(&doc), "  abc\n\nlonger than width\n");
    }

    #[test]
    fn test_alignment_ignores_headings() {
        let mut doc = PlainTextDocument::with_width(10);
        doc.add_heading("T", 0);
        doc.set_alignment(ParagraphId::new(0), Alignment::Right);
        assert_eq!(render(&doc), "T\n=\n");
    }
}

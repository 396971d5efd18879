use std::io::Cursor;

use anyhow::Result;

use crate::document::{Alignment, DocumentWriter};
use crate::domain::{Transaction, format_price};

/// Lay out an invoice for `tx`: a title plus user, status and a
/// right-aligned total.
pub fn render_invoice<D: DocumentWriter + ?Sized>(tx: &Transaction, doc: &mut D) {
    doc.add_heading(&format!("Transaction {}: {}", tx.id, tx.kind.title()), 0);
    doc.add_paragraph(&format!("User: {}", tx.user_id));
    doc.add_paragraph(&format!("Status: {}", tx.status));
    let total = doc.add_paragraph(&format!("Total price: {}", format_price(tx.price_cents)));
    doc.set_alignment(total, Alignment::Right);
}

/// Materialize a document into an in-memory stream positioned at its start.
pub fn save_to_stream<D: DocumentWriter + ?Sized>(doc: &D) -> Result<Cursor<Vec<u8>>> {
    let mut buffer = Vec::new();
    doc.save(&mut buffer)?;
    Ok(Cursor::new(buffer))
}

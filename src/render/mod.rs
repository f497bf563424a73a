pub mod export;
pub mod html;

pub use export::export_lines;
pub use html::{document_template, page_template, DocumentTemplate, InvoiceDoc, PageTemplate};

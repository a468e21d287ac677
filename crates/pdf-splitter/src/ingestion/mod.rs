//! Source document ingestion

mod parser;

pub use parser::PdfSource;

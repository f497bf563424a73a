pub mod calculator;
pub mod fetcher;
pub mod money;
pub mod view;
pub mod words;

pub use calculator::calculate;
pub use fetcher::{HttpInvoiceSource, InvoiceSource};
pub use view::{InvoiceView, SearchOutcome, ViewRegistry, ViewState};

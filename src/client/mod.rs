pub mod http;
pub mod invoices;

pub use http::{create_client, parse_base_url};
pub use invoices::{get_invoice, invoice_url};

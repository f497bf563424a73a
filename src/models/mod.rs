pub mod invoice;
pub mod summary;

pub use invoice::{Buyer, InvoiceInfo, InvoiceRecord, LineItem, OrderInfo, ReverseCharge, Seller};
pub use summary::{InvoiceSummary, LineBreakdown, ShippingLine, TaxSplit};

use crate::models::{InvoiceRecord, InvoiceSummary, LineBreakdown, LineItem, ShippingLine, TaxSplit};
use crate::service::words::amount_in_words;
use bigdecimal::{BigDecimal, Zero};

/// 运费固定税率 (百分比)
pub const SHIPPING_TAX_PERCENT: u32 = 9;

fn shipping_tax_rate() -> BigDecimal {
    BigDecimal::from(SHIPPING_TAX_PERCENT) / BigDecimal::from(100)
}

/// 发票计算 (纯函数)
///
/// 逐行计算净额、税额、拆分、行合计及运费行，并累计 subtotal/税额合计/总金额。
/// 运费行的税额和合计只逐行展示，不进入三个累计值。
pub fn calculate(record: &InvoiceRecord) -> InvoiceSummary {
    let same_jurisdiction = record.is_same_jurisdiction();
    let shipping_rate = shipping_tax_rate();

    let mut subtotal = BigDecimal::zero();
    let mut total_tax_amount = BigDecimal::zero();
    let mut total_amount = BigDecimal::zero();
    let mut lines = Vec::with_capacity(record.items.len());

    for (idx, item) in record.items.iter().enumerate() {
        let line = calculate_line(idx + 1, item, same_jurisdiction, &shipping_rate);

        subtotal = &subtotal + &line.net_amount;
        total_tax_amount = &total_tax_amount + &line.tax_amount;
        total_amount = &total_amount + &line.total_amount;

        lines.push(line);
    }

    let amount_in_words = amount_in_words(&total_amount);

    InvoiceSummary {
        same_jurisdiction,
        lines,
        subtotal,
        total_tax_amount,
        total_amount,
        amount_in_words,
    }
}

fn calculate_line(
    sl_no: usize,
    item: &LineItem,
    same_jurisdiction: bool,
    shipping_rate: &BigDecimal,
) -> LineBreakdown {
    let net_amount = &(&item.unit_price * &item.quantity) - &item.discount;
    let tax_amount = &net_amount * &item.tax_rate;
    let tax = TaxSplit::split(&tax_amount, same_jurisdiction);
    let total_amount = &(&net_amount + &tax_amount) + &item.shipping_charges;

    LineBreakdown {
        sl_no,
        description: item.description.clone(),
        unit_price: item.unit_price.clone(),
        quantity: item.quantity.clone(),
        net_amount,
        tax_rate: item.tax_rate.clone(),
        tax_amount,
        tax,
        total_amount,
        shipping: shipping_line(&item.shipping_charges, same_jurisdiction, shipping_rate),
    }
}

fn shipping_line(charges: &BigDecimal, same_jurisdiction: bool, rate: &BigDecimal) -> ShippingLine {
    let tax_amount = charges * rate;
    let total = charges * &(&BigDecimal::from(1) + rate);

    ShippingLine {
        charges: charges.clone(),
        tax: TaxSplit::split(&tax_amount, same_jurisdiction),
        total,
    }
}

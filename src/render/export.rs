use crate::models::InvoiceSummary;
use crate::service::money::to_money_string;
use csv::Writer;

const HEADER: [&str; 15] = [
    "sl_no",
    "description",
    "unit_price",
    "quantity",
    "net_amount",
    "tax_rate",
    "tax_type",
    "cgst",
    "sgst",
    "igst",
    "total_amount",
    "shipping_charges",
    "shipping_cgst_sgst_each",
    "shipping_igst",
    "shipping_total",
];

/// 导出明细计算结果为 CSV (每个明细一行，运费拆在同一行)
pub fn export_lines(summary: &InvoiceSummary) -> Result<Vec<u8>, csv::Error> {
    let mut wtr = Writer::from_writer(Vec::new());
    wtr.write_record(HEADER)?;

    for line in &summary.lines {
        wtr.write_record(&[
            line.sl_no.to_string(),
            line.description.clone(),
            to_money_string(&line.unit_price),
            line.quantity.normalized().to_string(),
            to_money_string(&line.net_amount),
            line.tax_rate.normalized().to_string(),
            line.tax.label().to_string(),
            to_money_string(&line.tax.cgst()),
            to_money_string(&line.tax.sgst()),
            to_money_string(&line.tax.igst()),
            to_money_string(&line.total_amount),
            to_money_string(&line.shipping.charges),
            to_money_string(&line.shipping.tax.cgst()),
            to_money_string(&line.shipping.tax.igst()),
            to_money_string(&line.shipping.total),
        ])?;
    }

    wtr.flush()?;
    wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))
}

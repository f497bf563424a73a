use crate::config::AssetConfig;
use crate::error::FailureKind;
use crate::models::{InvoiceRecord, InvoiceSummary, LineBreakdown, TaxSplit};
use crate::service::calculator::{calculate, SHIPPING_TAX_PERCENT};
use crate::service::money::{format_money, format_rate};
use crate::service::view::{InvoiceView, ViewState};
use askama::Template;

pub const DOCUMENT_TITLE: &str = "Tax Invoice/Bill of Supply/Cash Memo";

/// 查询页面 (`templates/page.html`)
///
/// `auto_refresh` 为真时显示加载提示，并让浏览器每秒刷新一次。
#[derive(Template)]
#[template(path = "page.html")]
pub struct PageTemplate {
    pub title: String,
    pub auto_refresh: bool,
    pub view_id: String,
    pub input: String,
    pub notice: String,
    pub invoice: Option<InvoiceDoc>,
    pub fetched_at: String,
}

/// 单张发票的打印页 (`templates/document.html`)
#[derive(Template)]
#[template(path = "document.html")]
pub struct DocumentTemplate {
    pub title: String,
    pub auto_refresh: bool,
    pub doc: InvoiceDoc,
}

/// 发票主体的展示数据，金额已格式化，多行文本已拆行
#[derive(Debug, Clone)]
pub struct InvoiceDoc {
    pub logo_url: String,
    pub seller_name: String,
    pub seller_address: Vec<String>,
    pub seller_pan: String,
    pub seller_gst: String,
    pub order_number: String,
    pub order_date: String,
    pub buyer_name: String,
    pub buyer_address: Vec<String>,
    pub buyer_state_code: String,
    pub place_of_supply: String,
    pub place_of_delivery: String,
    pub invoice_number: String,
    pub invoice_details: String,
    pub invoice_date: String,
    pub rows: Vec<ItemRow>,
    pub total_tax: String,
    pub total_amount: String,
    pub amount_in_words: String,
    pub signature_image: String,
    pub reverse_charge: String,
}

/// 明细表中的一个商品行及其运费行
#[derive(Debug, Clone)]
pub struct ItemRow {
    pub sl_no: usize,
    pub description: String,
    pub unit_price: String,
    pub quantity: String,
    pub net_amount: String,
    pub tax_rate: String,
    pub tax_lines: Vec<String>,
    pub total_amount: String,
    pub shipping_charges: String,
    pub shipping_rate: String,
    pub shipping_tax_lines: Vec<String>,
    pub shipping_total: String,
}

impl InvoiceDoc {
    pub fn new(record: &InvoiceRecord, summary: &InvoiceSummary, assets: &AssetConfig) -> Self {
        let seller = &record.seller;
        let buyer = &record.buyer;

        Self {
            logo_url: assets.logo_url.clone(),
            seller_name: seller.name.clone(),
            seller_address: split_lines(&seller.address),
            seller_pan: seller.pan.clone(),
            seller_gst: seller.gst.clone(),
            order_number: record.order.number.clone(),
            order_date: record.order.date.clone(),
            buyer_name: buyer.name.clone(),
            buyer_address: split_lines(&buyer.address),
            buyer_state_code: buyer.state_code.clone(),
            place_of_supply: record.place_of_supply.clone(),
            place_of_delivery: record.place_of_delivery.clone(),
            invoice_number: record.invoice.number.clone(),
            invoice_details: record.invoice.details.clone(),
            invoice_date: record.invoice.date.clone(),
            rows: summary.lines.iter().map(ItemRow::new).collect(),
            total_tax: format_money(&summary.total_tax_amount),
            total_amount: format_money(&summary.total_amount),
            amount_in_words: summary.amount_in_words.clone(),
            signature_image: record.signature_image.clone(),
            reverse_charge: record
                .invoice
                .reverse_charge
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        }
    }
}

impl ItemRow {
    fn new(line: &LineBreakdown) -> Self {
        Self {
            sl_no: line.sl_no,
            description: line.description.clone(),
            unit_price: format_money(&line.unit_price),
            quantity: line.quantity.normalized().to_string(),
            net_amount: format_money(&line.net_amount),
            tax_rate: format_rate(&line.tax_rate),
            tax_lines: tax_lines(&line.tax),
            total_amount: format_money(&line.total_amount),
            shipping_charges: format_money(&line.shipping.charges),
            shipping_rate: format!("{}%", SHIPPING_TAX_PERCENT),
            shipping_tax_lines: tax_lines(&line.shipping.tax),
            shipping_total: format_money(&line.shipping.total),
        }
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

/// 税额列：CGST/SGST 两行，或 IGST 一行
pub fn tax_lines(tax: &TaxSplit) -> Vec<String> {
    match tax {
        TaxSplit::CgstSgst(_) => vec![
            format!("CGST: {}", format_money(&tax.cgst())),
            format!("SGST: {}", format_money(&tax.sgst())),
        ],
        TaxSplit::Igst(_) => vec![format!("IGST: {}", format_money(&tax.igst()))],
    }
}

fn failure_notice(kind: FailureKind, order_number: &str) -> String {
    match kind {
        FailureKind::NotFound => format!("No invoice found for order {}", order_number),
        FailureKind::Malformed => format!("Invoice data for order {} could not be read", order_number),
        FailureKind::Upstream | FailureKind::Transport => {
            "Invoice service unavailable, please try again".to_string()
        }
    }
}

/// 查询页面：查询框、失败提示、加载提示、当前发票
pub fn page_template(view_id: &str, view: &InvoiceView, assets: &AssetConfig) -> PageTemplate {
    let state = view.state();

    let notice = match state {
        ViewState::Failed {
            order_number,
            failure,
            ..
        } => failure_notice(failure.kind, order_number),
        _ => String::new(),
    };

    let displayed = state.displayed();
    PageTemplate {
        title: DOCUMENT_TITLE.to_string(),
        auto_refresh: state.is_loading(),
        view_id: view_id.to_string(),
        input: view.input().to_string(),
        notice,
        invoice: displayed
            .map(|loaded| InvoiceDoc::new(&loaded.record, &calculate(&loaded.record), assets)),
        fetched_at: displayed
            .map(|loaded| loaded.fetched_at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_default(),
    }
}

/// 单张发票的独立打印页
pub fn document_template(record: &InvoiceRecord, assets: &AssetConfig) -> DocumentTemplate {
    let summary = calculate(record);
    DocumentTemplate {
        title: format!("{} {}", DOCUMENT_TITLE, record.invoice.number),
        auto_refresh: false,
        doc: InvoiceDoc::new(record, &summary, assets),
    }
}

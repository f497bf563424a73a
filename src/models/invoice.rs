use bigdecimal::BigDecimal;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

/// 金额/税率允许的最大小数位 (绝对值)
const MAX_AMOUNT_SCALE: i64 = 32;
/// 金额整数表示允许的最大位宽
const MAX_AMOUNT_BITS: u64 = 128;

/// 上游发票记录 (GET /api/invoices/{orderNumber} 的响应体)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    pub seller: Seller,
    pub buyer: Buyer,
    pub order: OrderInfo,
    pub invoice: InvoiceInfo,
    pub place_of_supply: String,
    pub place_of_delivery: String,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub signature_image: String,
}

impl InvoiceRecord {
    /// 供货地与交付地一致时按 CGST/SGST 拆分，否则按 IGST
    pub fn is_same_jurisdiction(&self) -> bool {
        self.place_of_supply == self.place_of_delivery
    }
}

/// 销售方
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seller {
    pub name: String,
    pub address: String,
    pub pan: String,
    pub gst: String,
}

/// 购买方
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buyer {
    pub name: String,
    pub address: String,
    pub state_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderInfo {
    pub number: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceInfo {
    pub number: String,
    #[serde(default)]
    pub details: String,
    pub date: String,
    /// 上游缺省时页面留空
    #[serde(default)]
    pub reverse_charge: Option<ReverseCharge>,
}

/// 是否反向征税：上游可能给布尔值，也可能直接给展示文本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReverseCharge {
    Flag(bool),
    Text(String),
}

impl fmt::Display for ReverseCharge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReverseCharge::Flag(true) => f.write_str("Yes"),
            ReverseCharge::Flag(false) => f.write_str("No"),
            ReverseCharge::Text(text) => f.write_str(text),
        }
    }
}

/// 发票明细行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "bounded_amount")]
    pub unit_price: BigDecimal,
    #[serde(deserialize_with = "bounded_amount")]
    pub quantity: BigDecimal,
    #[serde(deserialize_with = "bounded_amount")]
    pub discount: BigDecimal,
    #[serde(deserialize_with = "bounded_amount")]
    pub tax_rate: BigDecimal,   // 小数形式，如 0.18
    #[serde(deserialize_with = "bounded_amount")]
    pub shipping_charges: BigDecimal,
}

/// 拒绝指数或位数离谱的金额 (如 `"1e999999999"`)，避免后续舍入时展开巨大的整数
fn bounded_amount<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = BigDecimal::deserialize(deserializer)?;
    let (digits, scale) = value.as_bigint_and_exponent();
    if scale.abs() > MAX_AMOUNT_SCALE || digits.bits() > MAX_AMOUNT_BITS {
        return Err(de::Error::custom(format!("amount out of range: {}", value)));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "seller": { "name": "Acme Retail", "address": "12 MG Road, Bengaluru", "pan": "AAACA1234A", "gst": "29AAACA1234A1Z5" },
            "buyer": { "name": "R. Iyer", "address": "4 Anna Salai, Chennai", "stateCode": "33" },
            "order": { "number": "403-1234567-1234567", "date": "01.02.2024" },
            "invoice": { "number": "IN-001", "details": "KA-1001", "date": "02.02.2024", "reverseCharge": "No" },
            "placeOfSupply": "TAMIL NADU",
            "placeOfDelivery": "TAMIL NADU",
            "items": [
                { "description": "Kettle", "unitPrice": 100, "quantity": 2, "discount": 10, "taxRate": 0.18, "shippingCharges": 50 }
            ],
            "signatureImage": "https://cdn.example.com/sig.png"
        })
    }

    #[test]
    fn decodes_camel_case_record() {
        let record: InvoiceRecord = serde_json::from_value(sample()).unwrap();
        assert_eq!(record.buyer.state_code, "33");
        assert_eq!(record.items.len(), 1);
        assert_eq!(record.items[0].quantity, BigDecimal::from(2));
        assert_eq!(record.invoice.reverse_charge, Some(ReverseCharge::Text("No".to_string())));
        assert!(record.is_same_jurisdiction());
    }

    #[test]
    fn reverse_charge_accepts_flag() {
        let mut value = sample();
        value["invoice"]["reverseCharge"] = json!(true);
        let record: InvoiceRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record.invoice.reverse_charge, Some(ReverseCharge::Flag(true)));
        assert_eq!(ReverseCharge::Flag(true).to_string(), "Yes");
        assert_eq!(ReverseCharge::Flag(false).to_string(), "No");
    }

    #[test]
    fn missing_items_means_empty_table() {
        let mut value = sample();
        value.as_object_mut().unwrap().remove("items");
        let record: InvoiceRecord = serde_json::from_value(value).unwrap();
        assert!(record.items.is_empty());
    }

    #[test]
    fn missing_seller_is_rejected() {
        let mut value = sample();
        value.as_object_mut().unwrap().remove("seller");
        assert!(serde_json::from_value::<InvoiceRecord>(value).is_err());
    }

    #[test]
    fn missing_reverse_charge_stays_empty() {
        let mut value = sample();
        value["invoice"].as_object_mut().unwrap().remove("reverseCharge");
        let record: InvoiceRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record.invoice.reverse_charge, None);
    }

    #[test]
    fn huge_exponent_amount_is_rejected() {
        let mut value = sample();
        value["items"][0]["unitPrice"] = json!("1e999999999");
        assert!(serde_json::from_value::<InvoiceRecord>(value).is_err());

        let mut value = sample();
        value["items"][0]["discount"] = json!("1e-40");
        assert!(serde_json::from_value::<InvoiceRecord>(value).is_err());
    }

    #[test]
    fn string_amounts_within_range_are_accepted() {
        let mut value = sample();
        value["items"][0]["unitPrice"] = json!("1234.56");
        value["items"][0]["taxRate"] = json!(0.05);
        let record: InvoiceRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record.items[0].unit_price.to_string(), "1234.56");
        assert_eq!(record.items[0].tax_rate, "0.05".parse::<BigDecimal>().unwrap());
    }
}

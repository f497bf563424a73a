use crate::service::money::to_money_string;
use bigdecimal::{BigDecimal, Zero};
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

/// 税额拆分：同一辖区拆成 CGST/SGST 两半，跨辖区整笔计 IGST
#[derive(Debug, Clone, PartialEq)]
pub enum TaxSplit {
    /// 每一半的金额 (CGST 与 SGST 相等)
    CgstSgst(BigDecimal),
    Igst(BigDecimal),
}

impl TaxSplit {
    pub fn split(tax_amount: &BigDecimal, same_jurisdiction: bool) -> Self {
        if same_jurisdiction {
            TaxSplit::CgstSgst(tax_amount.clone() / BigDecimal::from(2))
        } else {
            TaxSplit::Igst(tax_amount.clone())
        }
    }

    pub fn cgst(&self) -> BigDecimal {
        match self {
            TaxSplit::CgstSgst(half) => half.clone(),
            TaxSplit::Igst(_) => BigDecimal::zero(),
        }
    }

    pub fn sgst(&self) -> BigDecimal {
        self.cgst()
    }

    pub fn igst(&self) -> BigDecimal {
        match self {
            TaxSplit::CgstSgst(_) => BigDecimal::zero(),
            TaxSplit::Igst(amount) => amount.clone(),
        }
    }

    pub fn total(&self) -> BigDecimal {
        match self {
            TaxSplit::CgstSgst(half) => half.clone() * BigDecimal::from(2),
            TaxSplit::Igst(amount) => amount.clone(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaxSplit::CgstSgst(_) => "CGST/SGST",
            TaxSplit::Igst(_) => "IGST",
        }
    }
}

impl Serialize for TaxSplit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TaxSplit", 4)?;
        state.serialize_field("type", self.label())?;
        state.serialize_field("cgst", &to_money_string(&self.cgst()))?;
        state.serialize_field("sgst", &to_money_string(&self.sgst()))?;
        state.serialize_field("igst", &to_money_string(&self.igst()))?;
        state.end()
    }
}

/// 明细行对应的运费行 (固定 9% 税率)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShippingLine {
    #[serde(serialize_with = "money")]
    pub charges: BigDecimal,
    pub tax: TaxSplit,
    #[serde(serialize_with = "money")]
    pub total: BigDecimal,
}

/// 单行计算结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineBreakdown {
    pub sl_no: usize,
    pub description: String,
    #[serde(serialize_with = "money")]
    pub unit_price: BigDecimal,
    #[serde(serialize_with = "plain")]
    pub quantity: BigDecimal,
    #[serde(serialize_with = "money")]
    pub net_amount: BigDecimal,
    #[serde(serialize_with = "plain")]
    pub tax_rate: BigDecimal,
    #[serde(serialize_with = "money")]
    pub tax_amount: BigDecimal,
    pub tax: TaxSplit,
    #[serde(serialize_with = "money")]
    pub total_amount: BigDecimal,
    pub shipping: ShippingLine,
}

/// 整张发票的计算结果
///
/// 注意：运费行的税额只逐行展示，不计入 `subtotal`/`total_tax_amount`/`total_amount`。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceSummary {
    pub same_jurisdiction: bool,
    pub lines: Vec<LineBreakdown>,
    #[serde(serialize_with = "money")]
    pub subtotal: BigDecimal,
    #[serde(serialize_with = "money")]
    pub total_tax_amount: BigDecimal,
    #[serde(serialize_with = "money")]
    pub total_amount: BigDecimal,
    pub amount_in_words: String,
}

fn money<S: Serializer>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_money_string(value))
}

fn plain<S: Serializer>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.normalized().to_string())
}

use bigdecimal::BigDecimal;
use std::str::FromStr;

/// 货币符号
pub const CURRENCY_SYMBOL: &str = "₹";

/// 四舍五入到两位小数，并固定两位小数的展示精度
pub fn round_money(value: &BigDecimal) -> BigDecimal {
    value.round(2).with_scale(2)
}

/// 两位小数的金额字符串 (不带货币符号)，JSON/CSV 导出用
pub fn to_money_string(value: &BigDecimal) -> String {
    round_money(value).to_string()
}

/// 页面展示金额，如 `₹274.20`
pub fn format_money(value: &BigDecimal) -> String {
    format!("{}{}", CURRENCY_SYMBOL, to_money_string(value))
}

/// 税率展示：rate × 100，两位小数加百分号，如 0.18 -> `18.00%`
pub fn format_rate(rate: &BigDecimal) -> String {
    format!("{}%", to_money_string(&(rate * &BigDecimal::from(100))))
}

/// 解析 `format_money` / `to_money_string` 的输出
pub fn parse_money(text: &str) -> Option<BigDecimal> {
    let digits = text.trim();
    let digits = digits.strip_prefix(CURRENCY_SYMBOL).unwrap_or(digits);
    BigDecimal::from_str(digits.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn formats_two_decimals_with_symbol() {
        assert_eq!(format_money(&dec("190")), "₹190.00");
        assert_eq!(format_money(&dec("34.2")), "₹34.20");
        assert_eq!(format_money(&dec("2.25")), "₹2.25");
        assert_eq!(format_money(&dec("0")), "₹0.00");
    }

    #[test]
    fn rounds_half_up() {
        assert_eq!(to_money_string(&dec("1.005")), "1.01");
        assert_eq!(to_money_string(&dec("1.004")), "1.00");
        assert_eq!(to_money_string(&dec("54.4999")), "54.50");
    }

    #[test]
    fn formats_rate_as_percentage() {
        assert_eq!(format_rate(&dec("0.18")), "18.00%");
        assert_eq!(format_rate(&dec("0.05")), "5.00%");
        assert_eq!(format_rate(&dec("0.125")), "12.50%");
    }

    #[test]
    fn formatted_amount_parses_back_within_a_paisa() {
        let tolerance = dec("0.01");
        for raw in ["274.2", "0.004", "1234.5678", "99.995", "17.1"] {
            let value = dec(raw);
            let parsed = parse_money(&format_money(&value)).unwrap();
            assert!((&parsed - &value).abs() <= tolerance, "{raw} drifted");
        }
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_money("₹abc").is_none());
        assert!(parse_money("").is_none());
    }
}

use bigdecimal::{BigDecimal, Signed, ToPrimitive};

const ONES: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

// 千进制单位，u64 上限落在 quintillion 段
const SCALES: [&str; 7] = [
    "", "thousand", "million", "billion", "trillion", "quadrillion", "quintillion",
];

/// 金额大写：只取整数卢比部分，小数 (paise) 截断
///
/// `1234.56` -> `one thousand two hundred thirty four rupees only`
pub fn amount_in_words(amount: &BigDecimal) -> String {
    format!("{} rupees only", rupees_in_words(amount))
}

/// 整数部分的英文读法，负数加 `minus` 前缀
pub fn rupees_in_words(amount: &BigDecimal) -> String {
    // with_scale(0) 向零截断
    let whole = amount.abs().with_scale(0);
    let words = match whole.to_u64() {
        Some(n) => number_to_words(n),
        None => {
            tracing::warn!("Amount {} exceeds word conversion range", amount);
            whole.to_string()
        }
    };

    if amount.is_negative() && words != "zero" {
        format!("minus {}", words)
    } else {
        words
    }
}

/// 非负整数转英文 (西式千进制，不带连字符和 "and")
pub fn number_to_words(n: u64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }

    let mut groups: Vec<String> = Vec::new();
    let mut rest = n;
    let mut scale = 0;
    while rest > 0 {
        let chunk = (rest % 1000) as usize;
        if chunk > 0 {
            let mut part = below_thousand(chunk);
            if !SCALES[scale].is_empty() {
                part.push(' ');
                part.push_str(SCALES[scale]);
            }
            groups.push(part);
        }
        rest /= 1000;
        scale += 1;
    }

    groups.reverse();
    groups.join(" ")
}

fn below_thousand(n: usize) -> String {
    let mut words: Vec<&str> = Vec::with_capacity(4);
    let hundreds = n / 100;
    let rest = n % 100;

    if hundreds > 0 {
        words.push(ONES[hundreds]);
        words.push("hundred");
    }
    if rest >= 20 {
        words.push(TENS[rest / 10]);
        if rest % 10 > 0 {
            words.push(ONES[rest % 10]);
        }
    } else if rest > 0 {
        words.push(ONES[rest]);
    }

    words.join(" ")
}

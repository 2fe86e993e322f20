//! Форматирование цен для ценников

/// Вставляет пробелы между триадами целой части
fn group_thousands(integer_part: &str) -> String {
    let (sign, digits) = match integer_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    format!("{}{}", sign, grouped)
}

/// Число с разделителем тысяч (пробел) и `decimals` знаками после точки
///
/// ```
/// use frontend::shared::number_format::format_number_with_decimals;
/// assert_eq!(format_number_with_decimals(1234.567, 2), "1 234.57");
/// ```
pub fn format_number_with_decimals(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value);
    match formatted.split_once('.') {
        Some((integer, fraction)) => format!("{}.{}", group_thousands(integer), fraction),
        None => group_thousands(&formatted),
    }
}

/// Цена в валюте: базовая (SOL) с 3 знаками, фиат с 2
pub fn format_price(value: f64, currency: &str, base_currency: &str) -> String {
    let decimals = if currency == base_currency { 3 } else { 2 };
    format!("{} {}", format_number_with_decimals(value, decimals), currency)
}

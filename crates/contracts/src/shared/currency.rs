//! Валюты и разметка, общие для backend и frontend.
//!
//! Frontend рендерит ценники по соглашению "класс = метка валюты":
//! каждый ценник несёт класс [`PRICE_CLASS`] и ровно один класс, равный
//! метке валюты (например `class="price EUR hidden"`).

/// Базовая валюта, в которой маркетплейс отдаёт floor price.
pub const BASE_CURRENCY: &str = "SOL";

/// Фиатные валюты по умолчанию (порядок = порядок в селекторе).
pub const DEFAULT_FIAT_CURRENCIES: [&str; 4] = ["USD", "EUR", "GBP", "SEK"];

/// id элемента `<select>` с выбором валюты
pub const CURRENCY_SELECT_ID: &str = "currencySelect";

/// Класс, которым помечены все ценники
pub const PRICE_CLASS: &str = "price";

/// Класс скрытого элемента
pub const HIDDEN_CLASS: &str = "hidden";

/// Собирает список валют для отображения: сначала базовая, затем фиатные
/// без повторов.
pub fn display_currencies<S: AsRef<str>>(base: &str, fiats: &[S]) -> Vec<String> {
    let mut result = vec![base.to_string()];
    for fiat in fiats {
        let fiat = fiat.as_ref().trim();
        if fiat.is_empty() || result.iter().any(|c| c == fiat) {
            continue;
        }
        result.push(fiat.to_string());
    }
    result
}

/// Метка валюты пригодна как CSS класс: непустая, без пробелов и
/// не совпадает со служебными классами.
pub fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && !label.chars().any(char::is_whitespace)
        && label != PRICE_CLASS
        && label != HIDDEN_CLASS
}

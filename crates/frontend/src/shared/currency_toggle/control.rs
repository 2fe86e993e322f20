//! Селектор валюты: поиск и выбор начальной метки.

use contracts::shared::currency::CURRENCY_SELECT_ID;

/// Селектор, из которого берётся выбранная валюта
pub trait CurrencyControl {
    /// Выбрать опцию по значению; нет такой опции: выбор сбрасывается (-1)
    fn select_value(&self, value: &str);
    fn selected_index(&self) -> i32;
    fn select_index(&self, index: i32);
    fn option_count(&self) -> u32;
    fn option_text(&self, index: u32) -> Option<String>;
}

/// Селектор должен быть на странице
pub fn require_control<C>(control: Option<C>) -> Result<C, String> {
    control.ok_or_else(|| format!("#{} not found", CURRENCY_SELECT_ID))
}

/// Текст выбранной опции, без пробелов по краям
pub fn selected_label<C: CurrencyControl>(control: &C) -> Option<String> {
    let selected = control.selected_index();
    if selected < 0 {
        return None;
    }
    control
        .option_text(selected as u32)
        .map(|text| text.trim().to_string())
}

/// Начальная метка: `preferred`, если такая опция есть, иначе текущий
/// выбор, иначе первая опция.
pub fn initial_label<C: CurrencyControl>(
    control: &C,
    preferred: Option<&str>,
) -> Result<String, String> {
    if let Some(label) = preferred {
        control.select_value(label);
    }
    if control.selected_index() < 0 && control.option_count() > 0 {
        control.select_index(0);
    }
    selected_label(control).ok_or_else(|| format!("#{} has no selected option", CURRENCY_SELECT_ID))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Опции со значением, равным тексту, как их рисует дашборд
    struct FakeSelect {
        options: Vec<String>,
        selected: Cell<i32>,
    }

    impl FakeSelect {
        fn new(options: &[&str], selected: i32) -> Self {
            Self {
                options: options.iter().map(|o| o.to_string()).collect(),
                selected: Cell::new(selected),
            }
        }
    }

    impl CurrencyControl for FakeSelect {
        fn select_value(&self, value: &str) {
            let position = self
                .options
                .iter()
                .position(|o| o.trim() == value)
                .map_or(-1, |p| p as i32);
            self.selected.set(position);
        }

        fn selected_index(&self) -> i32 {
            self.selected.get()
        }

        fn select_index(&self, index: i32) {
            self.selected.set(index);
        }

        fn option_count(&self) -> u32 {
            self.options.len() as u32
        }

        fn option_text(&self, index: u32) -> Option<String> {
            self.options.get(index as usize).cloned()
        }
    }

    #[test]
    fn test_missing_control_is_an_error() {
        let err = require_control::<FakeSelect>(None).err();
        assert_eq!(err.as_deref(), Some("#currencySelect not found"));
        assert!(require_control(Some(FakeSelect::new(&["SOL"], 0))).is_ok());
    }

    #[test]
    fn test_current_selection_is_kept() {
        let select = FakeSelect::new(&["SOL", " USD\n", "EUR"], 1);
        assert_eq!(initial_label(&select, None), Ok("USD".to_string()));
    }

    #[test]
    fn test_no_selection_falls_back_to_first_option() {
        let select = FakeSelect::new(&["SOL", "USD"], -1);
        assert_eq!(selected_label(&select), None);
        assert_eq!(initial_label(&select, None), Ok("SOL".to_string()));
        assert_eq!(select.selected_index(), 0);
    }

    #[test]
    fn test_no_options_is_an_error() {
        let select = FakeSelect::new(&[], -1);
        assert_eq!(
            initial_label(&select, Some("USD")),
            Err("#currencySelect has no selected option".to_string())
        );
    }

    #[test]
    fn test_preferred_label_is_restored() {
        let select = FakeSelect::new(&["SOL", "USD", "EUR"], 0);
        assert_eq!(initial_label(&select, Some("EUR")), Ok("EUR".to_string()));
        assert_eq!(select.selected_index(), 2);
    }

    #[test]
    fn test_unknown_preferred_label_falls_back_to_first_option() {
        let select = FakeSelect::new(&["SOL", "USD", "EUR"], 2);
        assert_eq!(initial_label(&select, Some("GBP")), Ok("SOL".to_string()));
        assert_eq!(select.selected_index(), 0);
    }
}

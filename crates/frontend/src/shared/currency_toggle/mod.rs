//! Переключение видимости ценников по выбранной валюте.
//!
//! Разметка: каждый ценник имеет класс `price` и класс с меткой своей
//! валюты (`class="price EUR hidden"`). Индекс "метка -> ценники"
//! строится один раз при установке; после каждого выбора видимы ровно
//! ценники выбранной валюты.

pub mod control;
pub mod dom;

use contracts::shared::currency::is_valid_label;
use std::collections::HashMap;

pub use dom::{install_currency_toggle, CurrencyToggleHandle};

/// Элемент, видимостью которого управляет переключатель
pub trait PriceElement {
    fn set_hidden(&self, hidden: bool);
}

/// Все ценники страницы и их группировка по метке валюты
pub struct PriceIndex<E> {
    elements: Vec<E>,
    by_label: HashMap<String, Vec<usize>>,
}

impl<E> Default for PriceIndex<E> {
    fn default() -> Self {
        Self {
            elements: Vec::new(),
            by_label: HashMap::new(),
        }
    }
}

impl<E> PriceIndex<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавить ценник с его метками. Ценник без корректной метки всё
    /// равно участвует в "скрыть все".
    pub fn insert<I, S>(&mut self, markers: I, element: E)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let position = self.elements.len();
        self.elements.push(element);
        for marker in markers {
            let marker = marker.as_ref();
            if !is_valid_label(marker) {
                continue;
            }
            let positions = self.by_label.entry(marker.to_string()).or_default();
            if positions.last() != Some(&position) {
                positions.push(position);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.by_label.keys().map(String::as_str)
    }

    pub fn all(&self) -> impl Iterator<Item = &E> {
        self.elements.iter()
    }

    pub fn matching<'a>(&'a self, label: &str) -> impl Iterator<Item = &'a E> + 'a {
        self.by_label
            .get(label)
            .into_iter()
            .flatten()
            .map(move |position| &self.elements[*position])
    }
}

/// Переключатель: одно состояние на метку ("показана валюта L")
pub struct CurrencyToggler<E> {
    index: PriceIndex<E>,
    displayed: Option<String>,
}

impl<E: PriceElement> CurrencyToggler<E> {
    pub fn new(index: PriceIndex<E>) -> Self {
        Self {
            index,
            displayed: None,
        }
    }

    /// Начальное состояние: скрыть все ценники и показать выбранную валюту.
    /// Не полагается на то, что разметка пришла уже скрытой.
    pub fn initialize(&mut self, label: &str) {
        self.show_only(label);
    }

    /// Реакция на смену выбора в селекторе
    pub fn on_selection_change(&mut self, label: &str) {
        self.show_only(label);
    }

    pub fn displayed_label(&self) -> Option<&str> {
        self.displayed.as_deref()
    }

    /// Сколько ценников сейчас показано
    pub fn visible_count(&self) -> usize {
        match &self.displayed {
            Some(label) => self.index.matching(label).count(),
            None => 0,
        }
    }

    fn show_only(&mut self, label: &str) {
        let label = label.trim();
        for element in self.index.all() {
            element.set_hidden(true);
        }

        let mut revealed = 0;
        for element in self.index.matching(label) {
            element.set_hidden(false);
            revealed += 1;
        }
        if revealed == 0 {
            log::debug!("No price elements for currency '{}'", label);
        }

        self.displayed = Some(label.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone)]
    struct FakeElement {
        hidden: Rc<Cell<bool>>,
    }

    impl FakeElement {
        fn new(hidden: bool) -> Self {
            Self {
                hidden: Rc::new(Cell::new(hidden)),
            }
        }

        fn visible(&self) -> bool {
            !self.hidden.get()
        }
    }

    impl PriceElement for FakeElement {
        fn set_hidden(&self, hidden: bool) {
            self.hidden.set(hidden);
        }
    }

    /// USD: el1, EUR: el2, SOL: el3 + el4
    fn page(start_hidden: bool) -> (CurrencyToggler<FakeElement>, Vec<FakeElement>) {
        let elements: Vec<FakeElement> = (0..4).map(|_| FakeElement::new(start_hidden)).collect();
        let mut index = PriceIndex::new();
        index.insert(["price", "USD"], elements[0].clone());
        index.insert(["price", "EUR", "hidden"], elements[1].clone());
        index.insert(["SOL"], elements[2].clone());
        index.insert(["SOL"], elements[3].clone());
        (CurrencyToggler::new(index), elements)
    }

    fn visible(elements: &[FakeElement]) -> Vec<bool> {
        elements.iter().map(FakeElement::visible).collect()
    }

    #[test]
    fn test_initialize_reveals_only_initial_label() {
        let (mut toggler, elements) = page(true);
        toggler.initialize("USD");
        assert_eq!(visible(&elements), vec![true, false, false, false]);
        assert_eq!(toggler.displayed_label(), Some("USD"));
        assert_eq!(toggler.visible_count(), 1);
    }

    #[test]
    fn test_initialize_hides_elements_that_started_visible() {
        let (mut toggler, elements) = page(false);
        toggler.initialize("EUR");
        assert_eq!(visible(&elements), vec![false, true, false, false]);
    }

    #[test]
    fn test_change_shows_exactly_latest_label() {
        let (mut toggler, elements) = page(true);
        toggler.initialize("USD");
        toggler.on_selection_change("SOL");
        assert_eq!(visible(&elements), vec![false, false, true, true]);
        assert_eq!(toggler.visible_count(), 2);

        toggler.on_selection_change("SOL");
        assert_eq!(visible(&elements), vec![false, false, true, true]);
    }

    #[test]
    fn test_round_trip_restores_visible_set() {
        let (mut direct, direct_elements) = page(true);
        direct.initialize("USD");

        let (mut toggler, elements) = page(true);
        toggler.initialize("USD");
        toggler.on_selection_change("EUR");
        toggler.on_selection_change("USD");

        assert_eq!(visible(&elements), visible(&direct_elements));
    }

    #[test]
    fn test_unknown_label_hides_everything() {
        let (mut toggler, elements) = page(true);
        toggler.initialize("USD");
        toggler.on_selection_change("GBP");
        assert_eq!(visible(&elements), vec![false; 4]);
        assert_eq!(toggler.visible_count(), 0);
        assert_eq!(toggler.displayed_label(), Some("GBP"));
    }

    #[test]
    fn test_usd_eur_scenario() {
        let el1 = FakeElement::new(true);
        let el2 = FakeElement::new(true);
        let mut index = PriceIndex::new();
        index.insert(["price", "USD"], el1.clone());
        index.insert(["price", "EUR"], el2.clone());
        let mut toggler = CurrencyToggler::new(index);

        toggler.initialize("USD");
        assert!(el1.visible() && !el2.visible());

        toggler.on_selection_change("EUR");
        assert!(!el1.visible() && el2.visible());

        toggler.on_selection_change("USD");
        assert!(el1.visible() && !el2.visible());
    }

    #[test]
    fn test_option_text_is_trimmed() {
        let (mut toggler, elements) = page(true);
        toggler.initialize(" EUR\n");
        assert_eq!(visible(&elements), vec![false, true, false, false]);
    }

    #[test]
    fn test_index_ignores_service_classes() {
        let mut index = PriceIndex::new();
        index.insert(["price", "hidden", "USD", "USD"], FakeElement::new(true));
        index.insert(Vec::<String>::new(), FakeElement::new(true));

        let mut labels: Vec<&str> = index.labels().collect();
        labels.sort();
        assert_eq!(labels, vec!["USD"]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.matching("USD").count(), 1);
        assert_eq!(index.matching("price").count(), 0);
    }
}

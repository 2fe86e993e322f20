use contracts::shared::currency::{is_valid_label, CURRENCY_SELECT_ID, HIDDEN_CLASS, PRICE_CLASS};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlOptionElement, HtmlSelectElement};

use super::control::{initial_label, require_control, selected_label, CurrencyControl};
use super::{CurrencyToggler, PriceElement, PriceIndex};

/// Ценник в DOM; скрытие через класс `hidden`
pub struct DomPriceElement(Element);

impl PriceElement for DomPriceElement {
    fn set_hidden(&self, hidden: bool) {
        let classes = self.0.class_list();
        let result = if hidden {
            classes.add_1(HIDDEN_CLASS)
        } else {
            classes.remove_1(HIDDEN_CLASS)
        };
        if let Err(e) = result {
            log::warn!("Failed to toggle '{}' class: {:?}", HIDDEN_CLASS, e);
        }
    }
}

/// Метки валют элемента: все его классы, кроме служебных
fn currency_markers(element: &Element) -> Vec<String> {
    let classes = element.class_list();
    (0..classes.length())
        .filter_map(|i| classes.item(i))
        .filter(|class| is_valid_label(class))
        .collect()
}

/// Собрать индекс ценников документа. HtmlCollection живая, поэтому
/// элементы сразу копируются в индекс.
pub fn build_price_index(document: &Document) -> PriceIndex<DomPriceElement> {
    let collection = document.get_elements_by_class_name(PRICE_CLASS);
    let mut index = PriceIndex::new();
    for i in 0..collection.length() {
        if let Some(element) = collection.item(i) {
            let markers = currency_markers(&element);
            index.insert(markers, DomPriceElement(element));
        }
    }
    index
}

impl CurrencyControl for HtmlSelectElement {
    fn select_value(&self, value: &str) {
        self.set_value(value);
    }

    fn selected_index(&self) -> i32 {
        HtmlSelectElement::selected_index(self)
    }

    fn select_index(&self, index: i32) {
        self.set_selected_index(index);
    }

    fn option_count(&self) -> u32 {
        self.length()
    }

    fn option_text(&self, index: u32) -> Option<String> {
        self.item(index)
            .and_then(|option| option.dyn_into::<HtmlOptionElement>().ok())
            .map(|option| option.text())
    }
}

/// Установленный переключатель. Держит обработчик `change` живым и
/// снимает его при drop.
pub struct CurrencyToggleHandle {
    select: HtmlSelectElement,
    listener: Closure<dyn FnMut(Event)>,
    toggler: Rc<RefCell<CurrencyToggler<DomPriceElement>>>,
}

impl CurrencyToggleHandle {
    pub fn displayed_label(&self) -> Option<String> {
        self.toggler.borrow().displayed_label().map(str::to_string)
    }
}

impl Drop for CurrencyToggleHandle {
    fn drop(&mut self) {
        let _ = self
            .select
            .remove_event_listener_with_callback("change", self.listener.as_ref().unchecked_ref());
    }
}

/// Найти селектор `#currencySelect`, построить индекс ценников,
/// показать выбранную валюту и подписаться на `change`.
///
/// `preferred` восстанавливает выбор после перерисовки селектора;
/// если такой опции нет, выбирается первая.
pub fn install_currency_toggle(
    document: &Document,
    preferred: Option<&str>,
) -> Result<CurrencyToggleHandle, String> {
    let select = document
        .get_element_by_id(CURRENCY_SELECT_ID)
        .map(|element| element.dyn_into::<HtmlSelectElement>())
        .transpose()
        .map_err(|_| format!("#{} is not a <select>", CURRENCY_SELECT_ID))?;
    let select = require_control(select)?;
    let label = initial_label(&select, preferred)?;

    let index = build_price_index(document);
    log::debug!(
        "Currency toggle: {} price elements in {} currencies, initial currency '{}'",
        index.len(),
        index.labels().count(),
        label
    );
    let toggler = Rc::new(RefCell::new(CurrencyToggler::new(index)));
    toggler.borrow_mut().initialize(&label);

    let listener = {
        let toggler = Rc::clone(&toggler);
        let select = select.clone();
        Closure::wrap(Box::new(move |_event: Event| match selected_label(&select) {
            Some(label) => toggler.borrow_mut().on_selection_change(&label),
            None => log::warn!("Currency changed but no option is selected"),
        }) as Box<dyn FnMut(Event)>)
    };

    select
        .add_event_listener_with_callback("change", listener.as_ref().unchecked_ref())
        .map_err(|e| format!("Failed to subscribe to change: {:?}", e))?;

    Ok(CurrencyToggleHandle {
        select,
        listener,
        toggler,
    })
}

use crate::dashboards::d100_floor_prices::api;
use crate::shared::currency_toggle::{install_currency_toggle, CurrencyToggleHandle};
use crate::shared::number_format::format_price;
use contracts::dashboards::d100_floor_prices::{FloorPricesResponse, PriceHistory, TokenStats};
use contracts::shared::currency::{CURRENCY_SELECT_ID, HIDDEN_CLASS, PRICE_CLASS};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::BTreeMap;
use std::time::Duration;

/// Backend refreshes market data every 10 minutes
const REFRESH_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Сколько последних дней истории показывать
const HISTORY_DAYS: usize = 14;

/// Ценник валюты: скрыт, пока переключатель не покажет его валюту
fn price_class(currency: &str) -> String {
    format!("{} {} {}", PRICE_CLASS, currency, HIDDEN_CLASS)
}

/// По одному ценнику на валюту
fn price_spans(values: Vec<(String, Option<f64>)>, base: &str) -> impl IntoView {
    values
        .into_iter()
        .map(|(currency, value)| {
            let text = match value {
                Some(v) => format_price(v, &currency, base),
                None => "—".to_string(),
            };
            view! { <span class=price_class(&currency)>{text}</span> }
        })
        .collect_view()
}

/// "tomorrowland_love_unity" -> "Tomorrowland Love Unity"
fn collection_title(symbol: &str) -> String {
    symbol
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn token_row(token: TokenStats, currencies: &[String], base: &str) -> impl IntoView {
    let values = currencies
        .iter()
        .map(|c| (c.clone(), token.price_in(c, base)))
        .collect();
    view! {
        <tr>
            <td class="d100-token">{collection_title(&token.symbol)}</td>
            <td class="d100-num">{token.listed_count}</td>
            <td class="d100-num">{price_spans(values, base)}</td>
            <td class="d100-num">{format_price(token.avg_price_24hr, base, base)}</td>
            <td class="d100-num">{format_price(token.volume_all, base, base)}</td>
        </tr>
    }
}

/// Последние `HISTORY_DAYS` дат, новые сверху
fn history_rows(history: &PriceHistory, currencies: &[String], base: &str) -> impl IntoView {
    let start = history.dates.len().saturating_sub(HISTORY_DAYS);
    (start..history.dates.len())
        .rev()
        .map(|i| {
            let values = currencies
                .iter()
                .map(|c| (c.clone(), history.value_at(c, i)))
                .collect();
            view! {
                <tr>
                    <td>{history.dates[i].clone()}</td>
                    <td class="d100-num">{price_spans(values, base)}</td>
                </tr>
            }
        })
        .collect_view()
}

fn history_table(
    history: &PriceHistory,
    total_title: &str,
    currencies: &[String],
    base: &str,
) -> impl IntoView {
    view! {
        <table class="d100-table">
            <thead>
                <tr><th>"Дата"</th><th>{total_title.to_string()}</th></tr>
            </thead>
            <tbody>{history_rows(history, currencies, base)}</tbody>
        </table>
    }
}

/// Непустые истории коллекций с заголовками, в порядке символов
fn token_history_sections(
    histories: &BTreeMap<String, PriceHistory>,
) -> Vec<(String, &PriceHistory)> {
    histories
        .iter()
        .filter(|(_, history)| !history.is_empty())
        .map(|(symbol, history)| (collection_title(symbol), history))
        .collect()
}

fn dashboard_body(response: FloorPricesResponse) -> impl IntoView {
    let currencies = response.currencies.clone();
    let base = currencies.first().cloned().unwrap_or_default();

    let options = currencies
        .iter()
        .map(|c| view! { <option value=c.clone()>{c.clone()}</option> })
        .collect_view();

    let totals = currencies
        .iter()
        .map(|c| (c.clone(), response.prices.get(c).copied()))
        .collect();

    let rows = response
        .tokens
        .into_values()
        .map(|token| token_row(token, &currencies, &base))
        .collect_view();

    let history = if response.combined_history.is_empty() {
        view! { <p class="d100-empty">"История пока пуста"</p> }.into_any()
    } else {
        history_table(&response.combined_history, "Всего", &currencies, &base).into_any()
    };

    let token_histories = token_history_sections(&response.token_histories)
        .into_iter()
        .map(|(title, history)| {
            view! {
                <div class="d100-token-history">
                    <h3>{title.clone()}</h3>
                    {history_table(history, &title, &currencies, &base)}
                </div>
            }
        })
        .collect_view();

    let updated = response
        .rates_updated_at
        .unwrap_or_else(|| "—".to_string());

    view! {
        <div class="d100-toolbar">
            <label for=CURRENCY_SELECT_ID>"Валюта"</label>
            <select id=CURRENCY_SELECT_ID>{options}</select>
            <span class="d100-updated">"Курсы обновлены: " {updated}</span>
        </div>

        <section class="d100-total">
            <h2>"Итого (с комиссией)"</h2>
            <div class="d100-total__value">{price_spans(totals, &base)}</div>
        </section>

        <section>
            <h2>"Коллекции"</h2>
            <table class="d100-table">
                <thead>
                    <tr>
                        <th>"Коллекция"</th>
                        <th>"Выставлено"</th>
                        <th>"Floor"</th>
                        <th>"Средняя за 24ч"</th>
                        <th>"Объём"</th>
                    </tr>
                </thead>
                <tbody>{rows}</tbody>
            </table>
        </section>

        <section>
            <h2>"История"</h2>
            {history}
        </section>

        <section>
            <h2>"История по коллекциям"</h2>
            {token_histories}
        </section>
    }
}

/// Floor Prices Dashboard component
#[component]
pub fn FloorPricesDashboard() -> impl IntoView {
    let (data, set_data) = signal(None::<FloorPricesResponse>);
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal(None::<String>);

    // CurrencyToggleHandle holds JS closures (not Send+Sync), store locally
    let toggle = StoredValue::new_local(None::<CurrencyToggleHandle>);

    let load = move || {
        set_loading.set(true);
        spawn_local(async move {
            match api::get_floor_prices().await {
                Ok(response) => {
                    set_error.set(None);
                    set_data.set(Some(response));
                }
                Err(e) => {
                    log::error!("Failed to load D100 floor prices: {}", e);
                    set_error.set(Some(e));
                }
            }
            set_loading.set(false);
        });
    };

    // Load on mount, then follow the backend refresh cadence
    Effect::new(move |_| {
        load();
        spawn_local(async move {
            loop {
                gloo_timers::future::sleep(REFRESH_INTERVAL).await;
                load();
            }
        });
    });

    // (Re)install the currency toggle once the new markup is in the DOM
    Effect::new(move |_| {
        if data.with(|d| d.is_none()) {
            return;
        }
        request_animation_frame(move || {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let previous = toggle.with_value(|handle| {
                handle.as_ref().and_then(CurrencyToggleHandle::displayed_label)
            });
            toggle.set_value(None);
            match install_currency_toggle(&document, previous.as_deref()) {
                Ok(handle) => toggle.set_value(Some(handle)),
                Err(e) => log::error!("Currency toggle was not installed: {}", e),
            }
        });
    });

    view! {
        <div id="d100_floor_prices--dashboard" class="d100-dashboard">
            <h1>"Floor prices"</h1>

            {move || {
                if loading.get() && data.with(|d| d.is_none()) {
                    view! {
                        <div class="d100-loading">
                            <span>"Загрузка данных..."</span>
                        </div>
                    }.into_any()
                } else {
                    view! { <></> }.into_any()
                }
            }}

            {move || {
                if let Some(err) = error.get() {
                    view! {
                        <div class="d100-error">
                            <strong>"⚠ Ошибка: "</strong>
                            {err}
                        </div>
                    }.into_any()
                } else {
                    view! { <></> }.into_any()
                }
            }}

            {move || data.get().map(dashboard_body)}
        </div>
    }
}

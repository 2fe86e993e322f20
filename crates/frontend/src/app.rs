use crate::dashboards::FloorPricesDashboard;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <main class="app">
            <FloorPricesDashboard />
        </main>
    }
}

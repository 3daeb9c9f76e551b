#![cfg(target_arch = "wasm32")]

use std::rc::Rc;

use chart_frontend::ChartHandle;
use chrono::DateTime;
use gloo_timers::future::TimeoutFuture;
use leptos::*;
use serde::Deserialize;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;

const PRICE_CANVAS_ID: &str = "backtest-price-canvas";
const INDICATOR_CANVAS_ID: &str = "backtest-indicator-canvas";
const PNL_CANVAS_ID: &str = "backtest-pnl-canvas";
const CHART_WIDTH: f64 = 860.0;
const CHART_HEIGHT: f64 = 600.0;

#[derive(Deserialize)]
#[serde(tag = "type")]
enum ChartEventPayload {
    ViewChanged { start: i64, end: i64 },
    CrosshairMove { ts: i64, x: f64 },
}

fn format_day(ts: i64) -> String {
    DateTime::from_timestamp_millis(ts)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// The three stacked canvases plus indicator selection and zoom
/// controls, bound to one [`ChartHandle`].
#[component]
pub fn ChartPanel(chart_json: String, indicator_names: Vec<String>) -> impl IntoView {
    let handle = create_rw_signal::<Option<Rc<ChartHandle>>>(None);
    let zoomed = create_rw_signal(false);
    let visible = create_rw_signal::<Option<(i64, i64)>>(None);
    let selected_indicator = create_rw_signal::<Option<String>>(None);

    {
        let chart_json = chart_json.clone();
        spawn_local(async move {
            // Let leptos attach the canvases before looking them up.
            TimeoutFuture::new(0).await;
            let chart = match ChartHandle::new(
                PRICE_CANVAS_ID,
                INDICATOR_CANVAS_ID,
                PNL_CANVAS_ID,
                CHART_WIDTH,
                CHART_HEIGHT,
            ) {
                Ok(c) => c,
                Err(e) => {
                    log::warn!("chart init failed: {e:?}");
                    return;
                }
            };

            let callback = Closure::<dyn FnMut(JsValue)>::wrap(Box::new(move |val: JsValue| {
                let Some(txt) = val.as_string() else { return };
                if let Ok(ChartEventPayload::ViewChanged { start, end }) =
                    serde_json::from_str::<ChartEventPayload>(&txt)
                {
                    visible.set(Some((start, end)));
                }
            }));
            chart.subscribe_events(callback.as_ref().unchecked_ref::<js_sys::Function>().clone());
            callback.forget();

            if let Err(e) = chart.set_data(&chart_json) {
                log::warn!("chart payload rejected: {e:?}");
            }
            zoomed.set(chart.is_zoomed());
            handle.set(Some(Rc::new(chart)));
        });
    }

    create_effect(move |_| {
        // Re-derive the zoom flag whenever the viewport changes.
        let _ = visible.get();
        if let Some(chart) = handle.get_untracked() {
            zoomed.set(chart.is_zoomed());
        }
    });

    on_cleanup(move || {
        if let Some(chart) = handle.get_untracked() {
            chart.destroy();
        }
    });

    let select_indicator = move |name: Option<String>| {
        let Some(chart) = handle.get_untracked() else {
            return;
        };
        match &name {
            Some(n) => {
                if chart.set_indicator(n).is_err() {
                    return;
                }
            }
            None => chart.clear_indicator(),
        }
        selected_indicator.set(name);
    };

    view! {
        <div class="chart-panel">
            <div class="chart-toolbar">
                <div class="indicator-buttons">
                    <button
                        class=move || {
                            if selected_indicator.with(Option::is_none) { "tab active" } else { "tab" }
                        }
                        on:click=move |_| select_indicator(None)
                    >
                        "None"
                    </button>
                    {indicator_names
                        .iter()
                        .map(|name| {
                            let value = name.clone();
                            let label = name.clone();
                            view! {
                                <button
                                    class=move || {
                                        if selected_indicator.get().as_deref() == Some(value.as_str()) {
                                            "tab active"
                                        } else {
                                            "tab"
                                        }
                                    }
                                    on:click={
                                        let value = value.clone();
                                        move |_| select_indicator(Some(value.clone()))
                                    }
                                >
                                    {label}
                                </button>
                            }
                        })
                        .collect_view()}
                </div>
                <div class="zoom-controls">
                    {move || {
                        visible
                            .get()
                            .map(|(start, end)| {
                                view! {
                                    <span class="zoom-range">
                                        {format!("{} to {}", format_day(start), format_day(end))}
                                    </span>
                                }
                            })
                    }}
                    <Show when=move || zoomed.get()>
                        <button
                            class="tab"
                            on:click=move |_| {
                                if let Some(chart) = handle.get_untracked() {
                                    chart.reset_zoom();
                                }
                            }
                        >
                            "Reset zoom"
                        </button>
                    </Show>
                </div>
            </div>
            <div class="chart-stack">
                <canvas id=PRICE_CANVAS_ID></canvas>
                <canvas id=INDICATOR_CANVAS_ID></canvas>
                <canvas id=PNL_CANVAS_ID></canvas>
            </div>
            <p class="chart-hint">"Drag horizontally to zoom. Hover for details."</p>
        </div>
    }
}

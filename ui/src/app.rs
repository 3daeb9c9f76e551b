use crate::theme::GLOBAL_CSS;
use leptos::*;
use leptos_meta::*;

#[cfg(target_arch = "wasm32")]
use crate::results::ResultsPanel;
#[cfg(target_arch = "wasm32")]
use crate::state::AppCtx;
#[cfg(target_arch = "wasm32")]
use api_client::{
    BacktestRequest, BacktestResult, SavedConfiguration, StrategyDescriptor, StrategyParams,
    TickerInfo, TimeFrame,
};
#[cfg(target_arch = "wasm32")]
use chrono::NaiveDate;
#[cfg(target_arch = "wasm32")]
use js_sys::Reflect;
#[cfg(target_arch = "wasm32")]
use std::collections::BTreeMap;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen_futures::spawn_local;

#[cfg(target_arch = "wasm32")]
fn read_global(key: &str) -> Option<String> {
    Reflect::get(&js_sys::global(), &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.as_string())
}

#[cfg(target_arch = "wasm32")]
fn api_base_default() -> String {
    read_global("BACKTEST_API_BASE").unwrap_or_else(|| "/api/strategy".to_string())
}

#[cfg(not(target_arch = "wasm32"))]
#[component]
pub fn App() -> impl IntoView {
    let _ = GLOBAL_CSS;
    view! { <div>"UI available in browser build."</div> }
}

#[cfg(target_arch = "wasm32")]
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    let ctx = AppCtx::new(api_base_default());

    let ticker = create_rw_signal("SPY".to_string());
    let time_frame = create_rw_signal("DAY".to_string());
    let start_date = create_rw_signal("2023-01-01".to_string());
    let end_date =
        create_rw_signal(chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string());

    let available = create_rw_signal::<Vec<StrategyDescriptor>>(Vec::new());
    let tickers = create_rw_signal::<Vec<TickerInfo>>(Vec::new());
    let selected = create_rw_signal::<BTreeMap<String, StrategyParams>>(BTreeMap::new());
    let strategy_choice = create_rw_signal(String::new());

    let saved = create_rw_signal::<Vec<SavedConfiguration>>(Vec::new());
    let config_name = create_rw_signal(String::new());

    let loading = create_rw_signal(false);
    let error = create_rw_signal::<Option<String>>(None);
    let result = create_rw_signal::<Option<BacktestResult>>(None);

    {
        let client = ctx.client();
        spawn_local(async move {
            match client.available_strategies().await {
                Ok(list) => {
                    if let Some(first) = list.first() {
                        strategy_choice.set(first.name.clone());
                    }
                    available.set(list);
                }
                Err(e) => error.set(Some(format!("failed to load strategies: {e}"))),
            }
        });
    }
    {
        let client = ctx.client();
        spawn_local(async move {
            if let Ok(list) = client.available_tickers().await {
                tickers.set(list);
            }
        });
    }
    {
        let client = ctx.client();
        spawn_local(async move {
            if let Ok(list) = client.saved_configurations().await {
                saved.set(list);
            }
        });
    }

    let build_request = move || -> Result<BacktestRequest, String> {
        let strategies = selected.get_untracked();
        if strategies.is_empty() {
            return Err("select at least one strategy".to_string());
        }
        let tf = TimeFrame::from_str(&time_frame.get_untracked())
            .ok_or_else(|| "invalid time frame".to_string())?;
        let start = NaiveDate::parse_from_str(&start_date.get_untracked(), "%Y-%m-%d")
            .map_err(|_| "invalid start date".to_string())?;
        let end = NaiveDate::parse_from_str(&end_date.get_untracked(), "%Y-%m-%d")
            .map_err(|_| "invalid end date".to_string())?;
        if start >= end {
            return Err("start date must precede end date".to_string());
        }
        Ok(BacktestRequest::new(
            ticker.get_untracked().trim().to_uppercase(),
            tf,
            start,
            end,
            strategies,
        ))
    };

    let add_strategy = move |_| {
        let name = strategy_choice.get_untracked();
        let Some(descriptor) = available
            .get_untracked()
            .into_iter()
            .find(|s| s.name == name)
        else {
            return;
        };
        let params: StrategyParams = descriptor
            .parameters
            .iter()
            .map(|p| (p.id.param_name.clone(), p.clone()))
            .collect();
        selected.update(|m| {
            m.insert(descriptor.name.clone(), params);
        });
    };

    let submit = {
        let client = ctx.client();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            let request = match build_request() {
                Ok(r) => r,
                Err(e) => {
                    error.set(Some(e));
                    return;
                }
            };
            loading.set(true);
            error.set(None);
            let client = client.clone();
            spawn_local(async move {
                match client.submit_strategies(&request).await {
                    Ok(res) => result.set(Some(res)),
                    Err(e) => error.set(Some(format!("backtest failed: {e}"))),
                }
                loading.set(false);
            });
        }
    };

    let save_configuration = {
        let client = ctx.client();
        move |_| {
            let name = config_name.get_untracked().trim().to_string();
            if name.is_empty() {
                error.set(Some("configuration name is empty".to_string()));
                return;
            }
            let request = match build_request() {
                Ok(r) => r,
                Err(e) => {
                    error.set(Some(e));
                    return;
                }
            };
            let configuration = SavedConfiguration { name, request };
            let client = client.clone();
            spawn_local(async move {
                match client.save_configuration(&configuration).await {
                    Ok(stored) => saved.update(|list| {
                        list.retain(|c| c.name != stored.name);
                        list.push(stored);
                    }),
                    Err(e) => error.set(Some(format!("save failed: {e}"))),
                }
            });
        }
    };

    let apply_configuration = move |cfg: SavedConfiguration| {
        ticker.set(cfg.request.ticker.clone());
        time_frame.set(cfg.request.time_frame.as_str().to_string());
        // Wire dates are LocalDateTime strings; the form wants bare dates.
        start_date.set(cfg.request.start_date.chars().take(10).collect());
        end_date.set(cfg.request.end_date.chars().take(10).collect());
        selected.set(cfg.request.strategy_name_to_params);
        config_name.set(cfg.name);
    };

    view! {
        <Style>{GLOBAL_CSS}</Style>
        <div class="page">
            <header class="header">
                <h1>"Strategy Backtesting"</h1>
            </header>
            <main class="layout">
                <section class="panel config-panel">
                    <form on:submit=submit>
                        <label class="field">
                            <span>"Ticker"</span>
                            <input
                                type="text"
                                list="ticker-options"
                                prop:value=move || ticker.get()
                                on:input=move |ev| ticker.set(event_target_value(&ev))
                                required
                            />
                            <datalist id="ticker-options">
                                {move || {
                                    tickers
                                        .get()
                                        .into_iter()
                                        .map(|t| view! { <option value=t.ticker></option> })
                                        .collect_view()
                                }}
                            </datalist>
                        </label>
                        <label class="field">
                            <span>"Time frame"</span>
                            <select
                                prop:value=move || time_frame.get()
                                on:change=move |ev| time_frame.set(event_target_value(&ev))
                            >
                                {TimeFrame::ALL
                                    .iter()
                                    .map(|tf| {
                                        view! { <option value=tf.as_str()>{tf.label()}</option> }
                                    })
                                    .collect_view()}
                            </select>
                        </label>
                        <div class="field-row">
                            <label class="field">
                                <span>"Start"</span>
                                <input
                                    type="date"
                                    prop:value=move || start_date.get()
                                    on:input=move |ev| start_date.set(event_target_value(&ev))
                                />
                            </label>
                            <label class="field">
                                <span>"End"</span>
                                <input
                                    type="date"
                                    prop:value=move || end_date.get()
                                    on:input=move |ev| end_date.set(event_target_value(&ev))
                                />
                            </label>
                        </div>

                        <h3>"Strategies"</h3>
                        <div class="field-row">
                            <select
                                prop:value=move || strategy_choice.get()
                                on:change=move |ev| strategy_choice.set(event_target_value(&ev))
                            >
                                {move || {
                                    available
                                        .get()
                                        .into_iter()
                                        .map(|s| {
                                            let name = s.name;
                                            view! { <option value=name.clone()>{name.clone()}</option> }
                                        })
                                        .collect_view()
                                }}
                            </select>
                            <button type="button" on:click=add_strategy>
                                "Add"
                            </button>
                        </div>
                        <StrategyEditor selected=selected/>

                        <button
                            class="primary"
                            type="submit"
                            disabled=move || loading.get() || selected.with(|m| m.is_empty())
                        >
                            {move || if loading.get() { "Processing..." } else { "Run Backtest" }}
                        </button>
                        {move || {
                            error
                                .get()
                                .map(|msg| view! { <div class="error-box">{msg}</div> })
                        }}

                        <h3>"Saved configurations"</h3>
                        <div class="field-row">
                            <input
                                type="text"
                                placeholder="Configuration name"
                                prop:value=move || config_name.get()
                                on:input=move |ev| config_name.set(event_target_value(&ev))
                            />
                            <button type="button" on:click=save_configuration>
                                "Save"
                            </button>
                        </div>
                        <ul class="saved-list">
                            {move || {
                                saved
                                    .get()
                                    .into_iter()
                                    .map(|cfg| {
                                        let label = format!(
                                            "{} ({} {})",
                                            cfg.name,
                                            cfg.request.ticker,
                                            cfg.request.time_frame.as_str(),
                                        );
                                        view! {
                                            <li>
                                                <button
                                                    type="button"
                                                    on:click=move |_| apply_configuration(cfg.clone())
                                                >
                                                    {label}
                                                </button>
                                            </li>
                                        }
                                    })
                                    .collect_view()
                            }}
                        </ul>
                    </form>
                </section>
                <section class="panel results-panel">
                    {move || match result.get() {
                        Some(res) => view! { <ResultsPanel result=res/> }.into_view(),
                        None => {
                            view! {
                                <div class="placeholder">
                                    {move || {
                                        if loading.get() {
                                            "Processing your request..."
                                        } else {
                                            "Configure and run a strategy to see results"
                                        }
                                    }}
                                </div>
                            }
                                .into_view()
                        }
                    }}
                </section>
            </main>
        </div>
    }
}

#[cfg(target_arch = "wasm32")]
#[component]
fn StrategyEditor(selected: RwSignal<BTreeMap<String, StrategyParams>>) -> impl IntoView {
    view! {
        <div class="strategy-editor">
            {move || {
                selected
                    .get()
                    .into_iter()
                    .map(|(name, params)| {
                        let remove_name = name.clone();
                        view! {
                            <div class="strategy-card">
                                <div class="strategy-card-head">
                                    <strong>{name.clone()}</strong>
                                    <button
                                        type="button"
                                        on:click=move |_| {
                                            let name = remove_name.clone();
                                            selected.update(|m| {
                                                m.remove(&name);
                                            })
                                        }
                                    >
                                        "Remove"
                                    </button>
                                </div>
                                {params
                                    .into_iter()
                                    .map(|(param_name, param)| {
                                        let strategy = name.clone();
                                        let key = param_name.clone();
                                        view! {
                                            <label class="field">
                                                <span>{param_name}</span>
                                                <input
                                                    type="number"
                                                    step="any"
                                                    min=param.min
                                                    max=param.max
                                                    prop:value=param.value.to_string()
                                                    on:input=move |ev| {
                                                        if let Ok(v) = event_target_value(&ev).parse::<f64>() {
                                                            let strategy = strategy.clone();
                                                            let key = key.clone();
                                                            selected.update(|m| {
                                                                if let Some(p) = m
                                                                    .get_mut(&strategy)
                                                                    .and_then(|ps| ps.get_mut(&key))
                                                                {
                                                                    p.value = v;
                                                                }
                                                            });
                                                        }
                                                    }
                                                />
                                            </label>
                                        }
                                    })
                                    .collect_view()}
                            </div>
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}

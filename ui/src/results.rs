#![cfg(target_arch = "wasm32")]

use api_client::BacktestResult;
use chart_core::{reconstruct_trades, ChartData, Side, Timestamp};
use chrono::DateTime;
use leptos::*;

use crate::chart_panel::ChartPanel;

fn format_ts(ts: Timestamp) -> String {
    DateTime::from_timestamp_millis(ts)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

fn pnl_class(pnl: f64) -> &'static str {
    if pnl >= 0.0 {
        "gain"
    } else {
        "loss"
    }
}

#[component]
pub fn ResultsPanel(result: BacktestResult) -> impl IntoView {
    let chart_json = serde_json::to_string(&result.chart_data).unwrap_or_default();
    let data = ChartData::from_raw(result.chart_data.clone());
    let trades = reconstruct_trades(&data.signals);
    let signals = data.signals.clone();
    let indicator_names: Vec<String> = data
        .indicator_names()
        .into_iter()
        .map(str::to_string)
        .collect();

    let tab = create_rw_signal("summary");
    let tab_button = move |id: &'static str, label: &'static str| {
        view! {
            <button
                class=move || if tab.get() == id { "tab active" } else { "tab" }
                on:click=move |_| tab.set(id)
            >
                {label}
            </button>
        }
    };

    let win_rate = {
        let total = result.profitable_trades_count + result.lost_trades_count;
        if total > 0 {
            format!(
                "{:.1}%",
                result.profitable_trades_count as f64 / total as f64 * 100.0
            )
        } else {
            "n/a".to_string()
        }
    };

    let summary = {
        let result = result.clone();
        move || {
            view! {
                <table class="metrics">
                    <tbody>
                        <tr>
                            <td>"Long PnL"</td>
                            <td class=pnl_class(result.long_pnl)>{format!("{:+.2}", result.long_pnl)}</td>
                        </tr>
                        <tr>
                            <td>"Short PnL"</td>
                            <td class=pnl_class(result.short_pnl)>{format!("{:+.2}", result.short_pnl)}</td>
                        </tr>
                        <tr>
                            <td>"Buy & hold PnL"</td>
                            <td class=pnl_class(result.buy_and_hold_pnl)>
                                {format!("{:+.2}", result.buy_and_hold_pnl)}
                            </td>
                        </tr>
                        <tr>
                            <td>"Annual return"</td>
                            <td>{format!("{:.2}%", result.annual_percentage_return)}</td>
                        </tr>
                        <tr>
                            <td>"Profit/loss ratio"</td>
                            <td>{format!("{:.2}", result.profit_to_lost_ratio)}</td>
                        </tr>
                        <tr>
                            <td>"Profitable trades"</td>
                            <td>{result.profitable_trades_count}</td>
                        </tr>
                        <tr>
                            <td>"Losing trades"</td>
                            <td>{result.lost_trades_count}</td>
                        </tr>
                        <tr>
                            <td>"Win rate"</td>
                            <td>{win_rate.clone()}</td>
                        </tr>
                    </tbody>
                </table>
            }
        }
    };

    let trades_view = {
        let trades = trades.clone();
        move || {
            if trades.is_empty() {
                return view! { <div class="placeholder">"No completed trades"</div> }.into_view();
            }
            view! {
                <table class="report">
                    <thead>
                        <tr>
                            <th>"Side"</th>
                            <th>"Opened"</th>
                            <th>"Closed"</th>
                            <th>"Open"</th>
                            <th>"Close"</th>
                            <th>"PnL"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {trades
                            .iter()
                            .map(|t| {
                                let side = match t.side {
                                    Side::Long => "Long",
                                    Side::Short => "Short",
                                };
                                view! {
                                    <tr>
                                        <td>{side}</td>
                                        <td>{format_ts(t.open_ts)}</td>
                                        <td>{format_ts(t.close_ts)}</td>
                                        <td>{format!("{:.2}", t.open_price)}</td>
                                        <td>{format!("{:.2}", t.close_price)}</td>
                                        <td class=pnl_class(t.pnl)>{format!("{:+.2}", t.pnl)}</td>
                                    </tr>
                                }
                            })
                            .collect_view()}
                    </tbody>
                </table>
            }
            .into_view()
        }
    };

    let signals_view = {
        let signals = signals.clone();
        move || {
            if signals.is_empty() {
                return view! { <div class="placeholder">"No signals emitted"</div> }.into_view();
            }
            view! {
                <table class="report">
                    <thead>
                        <tr>
                            <th>"Date"</th>
                            <th>"Type"</th>
                            <th>"Price"</th>
                            <th>"Comment"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {signals
                            .iter()
                            .map(|s| {
                                view! {
                                    <tr>
                                        <td>{format_ts(s.ts)}</td>
                                        <td>{s.kind.label()}</td>
                                        <td>{format!("{:.2}", s.price)}</td>
                                        <td>{s.comment.clone().unwrap_or_default()}</td>
                                    </tr>
                                }
                            })
                            .collect_view()}
                    </tbody>
                </table>
            }
            .into_view()
        }
    };

    view! {
        <div class="results">
            <h2>{format!("Results for {}", result.ticker)}</h2>
            <ChartPanel chart_json=chart_json indicator_names=indicator_names/>
            <div class="tabs">
                {tab_button("summary", "Summary")}
                {tab_button("trades", "Trades")}
                {tab_button("signals", "Signals")}
            </div>
            {move || match tab.get() {
                "trades" => trades_view().into_view(),
                "signals" => signals_view().into_view(),
                _ => summary().into_view(),
            }}
        </div>
    }
}

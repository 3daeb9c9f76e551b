//! Canvas renderer for backtest results: three stacked panes (price,
//! indicator, trade PnL) sharing one time axis and one zoom state.

pub mod draw;
pub mod layout;

use std::cell::RefCell;
use std::rc::Rc;

use chart_core::{
    hover_sample, indicator_domain, pnl_domain, price_domain, reconstruct_trades, visible_range,
    visible_trades, x_to_time, ChartData, Timestamp, Trade, ViewState, Viewport,
};
use js_sys::Function;
use serde::Serialize;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

const PRICE_FRACTION: f64 = 0.5;
const INDICATOR_FRACTION: f64 = 0.25;

/// Events pushed to JS subscribers as JSON strings.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum ChartEvent {
    ViewChanged { start: Timestamp, end: Timestamp },
    CrosshairMove { ts: Timestamp, x: f64 },
}

struct Pane {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    height: f64,
}

impl Pane {
    fn from_id(document: &web_sys::Document, id: &str) -> Result<Pane, JsValue> {
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("canvas {id} not found")))?
            .dyn_into()
            .map_err(|_| JsValue::from_str(&format!("element {id} is not a canvas")))?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Pane {
            canvas,
            ctx,
            height: 0.0,
        })
    }

    fn set_size(&mut self, width: f64, height: f64) {
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
        self.height = height;
    }
}

#[derive(Debug, Clone, Copy)]
struct Hover {
    x: f64,
    /// Set only while the pointer is over the price pane.
    price_y: Option<f64>,
}

struct Chart {
    price: Pane,
    indicator: Pane,
    pnl: Pane,
    width: f64,
    data: ChartData,
    trades: Vec<Trade>,
    selected_indicator: Option<String>,
    view: ViewState,
    hover: Option<Hover>,
    destroyed: bool,
}

impl Chart {
    fn new(
        price: Pane,
        indicator: Pane,
        pnl: Pane,
        width: f64,
        height: f64,
        now: Timestamp,
    ) -> Chart {
        let data = ChartData::default();
        let view = ViewState::new(data.full_viewport(now));
        let mut chart = Chart {
            price,
            indicator,
            pnl,
            width,
            data,
            trades: Vec::new(),
            selected_indicator: None,
            view,
            hover: None,
            destroyed: false,
        };
        chart.resize(width, height);
        chart
    }

    fn set_data(&mut self, data: ChartData, now: Timestamp) {
        self.trades = reconstruct_trades(&data.signals);
        self.view.set_original(data.full_viewport(now));
        self.hover = None;
        self.data = data;
        self.render_all();
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(1.0);
        let height = height.max(1.0);
        self.price.set_size(self.width, height * PRICE_FRACTION);
        self.indicator
            .set_size(self.width, height * INDICATOR_FRACTION);
        self.pnl.set_size(
            self.width,
            height * (1.0 - PRICE_FRACTION - INDICATOR_FRACTION),
        );
        self.render_all();
    }

    fn viewport(&self) -> Viewport {
        self.view.viewport()
    }

    fn render_all(&self) {
        if self.destroyed {
            return;
        }
        self.render_price();
        self.render_indicator();
        self.render_pnl();
    }

    fn render_price(&self) {
        let ctx = &self.price.ctx;
        let (w, h) = (self.width, self.price.height);
        draw::clear(ctx, w, h);
        if self.data.prices.is_empty() {
            draw::no_data(ctx, w, h, "No price data available");
            return;
        }
        let vp = self.viewport();
        let visible = visible_range(&self.data.prices, vp);
        if visible.is_empty() {
            draw::no_data(ctx, w, h, "No price data in selected range");
            self.render_overlays(ctx, w, h, true);
            return;
        }
        let domain = price_domain(visible);
        draw::grid(ctx, w, h);
        draw::date_axis(ctx, vp, w, h);
        draw::value_axis(ctx, domain, h, "Price");
        draw::candles(ctx, &layout::candles(visible, vp, domain, w, h));
        let signals = visible_range(&self.data.signals, vp);
        draw::markers(ctx, &layout::markers(signals, vp, domain, w, h));
        self.render_overlays(ctx, w, h, true);
        if self.view.is_selecting() {
            return;
        }
        if let Some(hover) = self.hover {
            let ts = x_to_time(hover.x, vp, w);
            if let Some(sample) = hover_sample(&self.data, vp, ts) {
                draw::tooltip(ctx, &sample, hover.x, hover.price_y.unwrap_or(h * 0.5), w);
            }
        }
    }

    fn render_indicator(&self) {
        let ctx = &self.indicator.ctx;
        let (w, h) = (self.width, self.indicator.height);
        draw::clear(ctx, w, h);
        let Some(name) = self.selected_indicator.as_deref() else {
            draw::no_data(ctx, w, h, "No indicator selected");
            self.render_overlays(ctx, w, h, false);
            return;
        };
        let series = self.data.indicator(name).unwrap_or(&[]);
        if series.is_empty() {
            draw::no_data(ctx, w, h, "No indicator data available");
            self.render_overlays(ctx, w, h, false);
            return;
        }
        let vp = self.viewport();
        let visible = visible_range(series, vp);
        if visible.is_empty() {
            draw::no_data(ctx, w, h, "No indicator data in selected range");
            self.render_overlays(ctx, w, h, false);
            return;
        }
        let domain = indicator_domain(visible);
        draw::grid(ctx, w, h);
        draw::date_axis(ctx, vp, w, h);
        draw::value_axis(ctx, domain, h, name);
        draw::polyline(
            ctx,
            &layout::polyline(visible, vp, domain, w, h),
            draw::INDICATOR_LINE,
        );
        self.render_overlays(ctx, w, h, false);
    }

    fn render_pnl(&self) {
        let ctx = &self.pnl.ctx;
        let (w, h) = (self.width, self.pnl.height);
        draw::clear(ctx, w, h);
        if self.trades.is_empty() {
            draw::no_data(ctx, w, h, "No trades executed");
            self.render_overlays(ctx, w, h, false);
            return;
        }
        let vp = self.viewport();
        let visible: Vec<Trade> = visible_trades(&self.trades, vp).copied().collect();
        if visible.is_empty() {
            draw::no_data(ctx, w, h, "No trades in selected range");
            self.render_overlays(ctx, w, h, false);
            return;
        }
        let domain = pnl_domain(&visible);
        draw::grid(ctx, w, h);
        draw::date_axis(ctx, vp, w, h);
        draw::value_axis(ctx, domain, h, "Trade PnL");
        draw::zero_line(ctx, domain, w, h);
        draw::trade_bars(ctx, &layout::trade_bars(&visible, vp, domain, w, h));
        self.render_overlays(ctx, w, h, false);
    }

    /// Selection rectangle and crosshair, drawn on every pane so the
    /// gesture reads as one chart.
    fn render_overlays(
        &self,
        ctx: &CanvasRenderingContext2d,
        width: f64,
        height: f64,
        price_pane: bool,
    ) {
        if let Some(sel) = self.view.selection() {
            draw::selection(ctx, sel.anchor_x, sel.cursor_x, height);
        } else if let Some(hover) = self.hover {
            let y = if price_pane { hover.price_y } else { None };
            draw::crosshair(ctx, hover.x, y, width, height);
        }
    }

    fn on_mouse_down(&mut self, x: f64) {
        self.view.begin_selection(x);
        self.render_all();
    }

    /// Returns the hovered timestamp for event dispatch.
    fn on_mouse_move(&mut self, x: f64, price_y: Option<f64>) -> Timestamp {
        self.view.update_selection(x);
        self.hover = Some(Hover { x, price_y });
        self.render_all();
        x_to_time(x, self.viewport(), self.width)
    }

    /// Returns true when a zoom was committed.
    fn on_mouse_up(&mut self) -> bool {
        let committed = self.view.finish_selection(self.width);
        self.render_all();
        committed
    }

    fn on_mouse_leave(&mut self) {
        self.view.cancel_selection();
        self.hover = None;
        self.render_all();
    }

    /// Returns true when the viewport actually changed.
    fn reset_zoom(&mut self) -> bool {
        let changed = self.view.reset();
        if changed {
            self.render_all();
        }
        changed
    }

    fn destroy(&mut self) {
        draw::clear(&self.price.ctx, self.width, self.price.height);
        draw::clear(&self.indicator.ctx, self.width, self.indicator.height);
        draw::clear(&self.pnl.ctx, self.width, self.pnl.height);
        self.destroyed = true;
    }
}

struct EventSubscription {
    id: u32,
    callback: Function,
}

struct ChartHandleInner {
    chart: Chart,
    next_event_id: u32,
    subscribers: Vec<EventSubscription>,
}

impl ChartHandleInner {
    fn dispatch_event(&self, event: &ChartEvent) {
        if self.subscribers.is_empty() {
            return;
        }
        if let Ok(json) = serde_json::to_string(event) {
            let val = JsValue::from_str(&json);
            for sub in &self.subscribers {
                let _ = sub.callback.call1(&JsValue::NULL, &val);
            }
        }
    }

    fn dispatch_view_changed(&self) {
        let vp = self.chart.viewport();
        self.dispatch_event(&ChartEvent::ViewChanged {
            start: vp.start(),
            end: vp.end(),
        });
    }

    fn add_subscription(&mut self, cb: Function) -> u32 {
        let id = self.next_event_id;
        self.next_event_id = self.next_event_id.wrapping_add(1);
        self.subscribers
            .push(EventSubscription { id, callback: cb });
        id
    }

    fn remove_subscription(&mut self, id: u32) {
        if let Some(idx) = self.subscribers.iter().position(|s| s.id == id) {
            self.subscribers.remove(idx);
        }
    }
}

fn setup_mouse_events(
    inner_rc: &Rc<RefCell<ChartHandleInner>>,
    canvas: &HtmlCanvasElement,
    price_pane: bool,
) -> Result<(), JsValue> {
    // mousedown
    {
        let inner_rc = inner_rc.clone();
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |event: MouseEvent| {
            event.prevent_default();
            let rect = canvas_clone.get_bounding_client_rect();
            let x = event.client_x() as f64 - rect.left();
            inner_rc.borrow_mut().chart.on_mouse_down(x);
        }));
        canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // mousemove
    {
        let inner_rc = inner_rc.clone();
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |event: MouseEvent| {
            event.prevent_default();
            let rect = canvas_clone.get_bounding_client_rect();
            let x = event.client_x() as f64 - rect.left();
            let y = event.client_y() as f64 - rect.top();
            let price_y = price_pane.then_some(y);
            let ts = {
                let mut inner = inner_rc.borrow_mut();
                inner.chart.on_mouse_move(x, price_y)
            };
            inner_rc
                .borrow()
                .dispatch_event(&ChartEvent::CrosshairMove { ts, x });
        }));
        canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // mouseup
    {
        let inner_rc = inner_rc.clone();
        let closure = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |event: MouseEvent| {
            event.prevent_default();
            let committed = inner_rc.borrow_mut().chart.on_mouse_up();
            if committed {
                inner_rc.borrow().dispatch_view_changed();
            }
        }));
        canvas.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // mouseleave cancels any drag so a release outside never commits.
    {
        let inner_rc = inner_rc.clone();
        let closure = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |_event: MouseEvent| {
            inner_rc.borrow_mut().chart.on_mouse_leave();
        }));
        canvas.add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}

/// Public JS-facing chart API over the three stacked canvases.
#[wasm_bindgen]
pub struct ChartHandle {
    inner: Rc<RefCell<ChartHandleInner>>,
}

#[wasm_bindgen]
impl ChartHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(
        price_canvas_id: &str,
        indicator_canvas_id: &str,
        pnl_canvas_id: &str,
        width: f64,
        height: f64,
    ) -> Result<ChartHandle, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let price = Pane::from_id(&document, price_canvas_id)?;
        let indicator = Pane::from_id(&document, indicator_canvas_id)?;
        let pnl = Pane::from_id(&document, pnl_canvas_id)?;

        let now = js_sys::Date::now() as Timestamp;
        let chart = Chart::new(price, indicator, pnl, width, height, now);

        let inner = Rc::new(RefCell::new(ChartHandleInner {
            chart,
            next_event_id: 1,
            subscribers: Vec::new(),
        }));

        let (price_canvas, indicator_canvas, pnl_canvas) = {
            let inner_ref = inner.borrow();
            (
                inner_ref.chart.price.canvas.clone(),
                inner_ref.chart.indicator.canvas.clone(),
                inner_ref.chart.pnl.canvas.clone(),
            )
        };
        setup_mouse_events(&inner, &price_canvas, true)?;
        setup_mouse_events(&inner, &indicator_canvas, false)?;
        setup_mouse_events(&inner, &pnl_canvas, false)?;

        Ok(ChartHandle { inner })
    }

    /// Load a backtest result payload (JSON). Replaces all series,
    /// rebuilds trades and resets any zoom.
    pub fn set_data(&self, json: &str) -> Result<(), JsValue> {
        let data = ChartData::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let now = js_sys::Date::now() as Timestamp;
        self.inner.borrow_mut().chart.set_data(data, now);
        self.inner.borrow().dispatch_view_changed();
        Ok(())
    }

    /// Names of the indicator series present in the loaded payload.
    pub fn indicator_names(&self) -> Vec<String> {
        self.inner
            .borrow()
            .chart
            .data
            .indicator_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Select which indicator series the middle pane plots.
    pub fn set_indicator(&self, name: &str) -> Result<(), JsValue> {
        let mut inner = self.inner.borrow_mut();
        if inner.chart.data.indicator(name).is_none() {
            return Err(JsValue::from_str(&format!("unknown indicator {name}")));
        }
        inner.chart.selected_indicator = Some(name.to_string());
        inner.chart.render_indicator();
        Ok(())
    }

    pub fn clear_indicator(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.chart.selected_indicator = None;
        inner.chart.render_indicator();
    }

    pub fn reset_zoom(&self) {
        let changed = self.inner.borrow_mut().chart.reset_zoom();
        if changed {
            self.inner.borrow().dispatch_view_changed();
        }
    }

    pub fn is_zoomed(&self) -> bool {
        self.inner.borrow().chart.view.is_zoomed()
    }

    pub fn visible_start(&self) -> f64 {
        self.inner.borrow().chart.viewport().start() as f64
    }

    pub fn visible_end(&self) -> f64 {
        self.inner.borrow().chart.viewport().end() as f64
    }

    pub fn resize(&self, width: f64, height: f64) {
        self.inner.borrow_mut().chart.resize(width, height);
    }

    /// Subscribe to chart events; the callback receives JSON strings.
    /// Returns an id for [`ChartHandle::unsubscribe_events`].
    pub fn subscribe_events(&self, callback: Function) -> u32 {
        self.inner.borrow_mut().add_subscription(callback)
    }

    pub fn unsubscribe_events(&self, id: u32) {
        self.inner.borrow_mut().remove_subscription(id);
    }

    /// Clear all surfaces and stop reacting to input. The handle is
    /// inert afterwards.
    pub fn destroy(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.chart.destroy();
        inner.subscribers.clear();
    }
}

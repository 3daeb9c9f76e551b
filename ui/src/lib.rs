pub mod app;
pub mod chart_panel;
pub mod results;
pub mod state;
pub mod theme;

pub use app::App;

#[cfg(target_arch = "wasm32")]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount_to_body(|| leptos::view! { <App/> });
}

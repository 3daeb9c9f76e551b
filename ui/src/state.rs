use api_client::BacktestClient;
use leptos::*;

/// Application-wide state: where the backend lives.
#[derive(Clone)]
pub struct AppCtx {
    pub api_base: RwSignal<String>,
}

impl AppCtx {
    pub fn new(api_base: String) -> Self {
        AppCtx {
            api_base: create_rw_signal(api_base),
        }
    }

    pub fn client(&self) -> BacktestClient {
        BacktestClient::new(self.api_base.get_untracked())
    }
}

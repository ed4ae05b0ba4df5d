//! Browser front-end for the housing affordability dashboard.
//!
//! Embeds every chart with `vegaEmbed`, then binds the page's `<select>`
//! controls to chart signals through [`affordability_dash::Dashboard`].

use std::rc::Rc;

use affordability_dash::{ControlId, DashError, Dashboard, DashboardConfig, Palette};
use tracing::{debug, info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::Event;

pub mod fetch;
pub mod logging;
pub mod page;
pub mod vega;

pub use fetch::FetchSource;
pub use page::WebPage;
pub use vega::{VegaRenderer, VegaView};

use vega::js_error_text;

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_COMMIT: &str = env!("DASH_GIT_COMMIT");

pub type WebDashboard = Dashboard<VegaRenderer, WebPage>;

fn bind_controls(dashboard: &Rc<WebDashboard>) -> Result<(), DashError> {
    for control in ControlId::ALL {
        let Some(select) = dashboard.page().select(control) else {
            debug!(?control, "control not on page");
            continue;
        };
        let dash = Rc::clone(dashboard);
        let on_change = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_event: Event| {
            let dash = Rc::clone(&dash);
            spawn_local(async move { dash.dispatch(control).await });
        }));
        select
            .add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())
            .map_err(|err| DashError::Page(js_error_text(&err)))?;
        on_change.forget();
    }
    Ok(())
}

/// Load every chart, wire the controls and push their initial values.
pub async fn run() -> Result<(), DashError> {
    let window = web_sys::window().ok_or_else(|| DashError::Page("no window".to_string()))?;
    let document = window
        .document()
        .ok_or_else(|| DashError::Page("no document".to_string()))?;
    let page = WebPage::new(window, document);

    let parsed = match page.config_text() {
        Some(raw) => DashboardConfig::from_json(&raw),
        None => Ok(DashboardConfig::default()),
    };
    let level = parsed
        .as_ref()
        .map(|cfg| cfg.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    logging::init(&level);
    let config = parsed.unwrap_or_else(|err| {
        warn!(%err, "using default dashboard config");
        DashboardConfig::default()
    });
    info!(version = APP_VERSION, commit = APP_COMMIT, "starting dashboard");

    let palette = Palette::from_css(|var| page.css_var(var));
    let renderer = VegaRenderer::from_global()?;
    let dashboard = Rc::new(Dashboard::load(config, &palette, &FetchSource, &renderer, page).await?);

    dashboard.prime_controls();
    bind_controls(&dashboard)?;
    dashboard.initialize_controls().await
}

#[cfg(target_arch = "wasm32")]
async fn launch() {
    if let Err(err) = run().await {
        tracing::error!(%err, "dashboard startup failed");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    if document.ready_state() != "loading" {
        spawn_local(launch());
        return;
    }
    let on_ready = Closure::once(move || spawn_local(launch()));
    if document
        .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())
        .is_ok()
    {
        on_ready.forget();
    } else {
        spawn_local(launch());
    }
}

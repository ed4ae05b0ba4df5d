//! Seams between the controller and the browser: spec fetching, the chart
//! renderer, live views, and the host page.
//!
//! Everything here is single-threaded, so the async methods carry no
//! `Send` bounds.
#![allow(async_fn_in_trait)]

use serde_json::Value;
use tracing::{debug, info};

use crate::charts::{ChartDef, ControlId, DisplayId};
use crate::config::{DashboardConfig, EmbedOptions};
use crate::palette::Palette;
use crate::signals::SignalValue;
use crate::DashError;

pub trait SpecSource {
    /// Fetch and parse one JSON document. A non-success response is a
    /// [`DashError::Load`].
    async fn fetch_spec(&self, path: &str) -> Result<Value, DashError>;
}

/// Live handle to one rendered chart.
pub trait ChartView {
    /// Current value of `name`; errors when the view has no such signal.
    fn signal(&self, name: &str) -> Result<SignalValue, DashError>;
    fn set_signal(&self, name: &str, value: &SignalValue) -> Result<(), DashError>;
    /// Evaluate pending signal changes and re-render.
    async fn run(&self) -> Result<(), DashError>;
    /// Resolves once any dataflow evaluation in progress has finished.
    async fn settled(&self) -> Result<(), DashError>;
    /// Materialised datasets, in the order the renderer reports them.
    fn datasets(&self) -> Result<Vec<(String, Value)>, DashError>;
}

pub trait Renderer {
    type View: ChartView;

    async fn embed(
        &self,
        selector: &str,
        spec: Value,
        options: &EmbedOptions,
    ) -> Result<Self::View, DashError>;
}

/// Deferred page work, run once the browser paints.
pub type FrameTask<P> = Box<dyn FnOnce(&P)>;

/// Host page holding the form controls, display spans and chart mounts.
/// Missing elements read as `None`/empty and writes to them are no-ops.
pub trait Page: Sized + 'static {
    fn control_value(&self, control: ControlId) -> Option<String>;
    fn set_control_value(&self, control: ControlId, value: &str);
    /// `(value, text)` pairs of the control's options.
    fn control_options(&self, control: ControlId) -> Vec<(String, String)>;
    fn set_display_text(&self, display: DisplayId, text: &str);
    fn legend_labels(&self, selector: &str) -> Result<Vec<String>, DashError>;
    fn set_legend_label(&self, selector: &str, index: usize, text: &str)
        -> Result<(), DashError>;
    /// Run `task` against this page after the next frame has painted.
    /// Must return without waiting for that frame.
    fn on_next_frame(&self, task: FrameTask<Self>);
}

pub async fn load_spec<S: SpecSource + ?Sized>(source: &S, path: &str) -> Result<Value, DashError> {
    debug!(path, "fetching chart spec");
    source.fetch_spec(path).await
}

/// Load, transform and render one chart.
pub async fn embed_chart<S, R>(
    source: &S,
    renderer: &R,
    palette: &Palette,
    config: &DashboardConfig,
    def: &ChartDef,
) -> Result<R::View, DashError>
where
    S: SpecSource + ?Sized,
    R: Renderer + ?Sized,
{
    let path = config.spec_path(def.file_stem);
    let spec = load_spec(source, &path).await?;
    let spec = def.pipeline().apply(spec, palette);
    let view = renderer.embed(def.selector, spec, &config.embed).await?;
    info!(chart = ?def.id, selector = def.selector, "chart rendered");
    Ok(view)
}

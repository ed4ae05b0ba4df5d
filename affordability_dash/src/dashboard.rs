//! Dashboard controller: owns one view per chart and maps control changes
//! onto chart signals.

use std::collections::BTreeMap;

use futures::future::try_join_all;
use tracing::{info, warn};

use crate::charts::{ChartId, ControlId, DisplayId};
use crate::config::DashboardConfig;
use crate::labels::{js_number, region_label, year_label};
use crate::legend::{annotate_legend, AnnotationOutcome, SkipReason};
use crate::palette::Palette;
use crate::render::{embed_chart, Page, Renderer, SpecSource};
use crate::signals::{sync_signals, SignalValue, SyncOutcome};
use crate::DashError;

pub const YEAR_SIGNAL: &str = "yearParam";
pub const YEAR_LABEL_SIGNAL: &str = "yearLabelParam";
pub const CITY_SIGNAL: &str = "cityParam";
pub const CITY_LABEL_SIGNAL: &str = "cityLabelParam";
pub const FOCUS_SIGNAL: &str = "focusState";

pub struct Dashboard<R: Renderer, P: Page> {
    config: DashboardConfig,
    page: P,
    views: BTreeMap<ChartId, R::View>,
}

impl<R: Renderer, P: Page> Dashboard<R, P> {
    /// Load and render every chart concurrently. Fails as soon as any
    /// chart fails; no view is kept in that case.
    pub async fn load<S>(
        config: DashboardConfig,
        palette: &Palette,
        source: &S,
        renderer: &R,
        page: P,
    ) -> Result<Self, DashError>
    where
        S: SpecSource + ?Sized,
    {
        let views = {
            let config = &config;
            try_join_all(ChartId::ALL.into_iter().map(|id| async move {
                let view = embed_chart(source, renderer, palette, config, &id.def()).await?;
                Ok::<_, DashError>((id, view))
            }))
            .await?
        };
        info!(charts = views.len(), "dashboard charts ready");
        Ok(Self::from_views(config, page, views))
    }

    pub fn from_views(
        config: DashboardConfig,
        page: P,
        views: impl IntoIterator<Item = (ChartId, R::View)>,
    ) -> Self {
        Self {
            config,
            page,
            views: views.into_iter().collect(),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn view(&self, chart: ChartId) -> Option<&R::View> {
        self.views.get(&chart)
    }

    async fn sync(
        &self,
        chart: ChartId,
        updates: &[(&str, SignalValue)],
    ) -> Result<SyncOutcome, DashError> {
        match self.view(chart) {
            Some(view) => sync_signals(view, updates).await,
            None => Ok(SyncOutcome::Unchanged),
        }
    }

    fn has_control(&self, control: ControlId) -> bool {
        self.page.control_value(control).is_some()
    }

    fn control_year(&self, control: ControlId) -> Option<f64> {
        self.page.control_value(control).map(|v| js_number(&v))
    }

    /// Year shown by the summary chart.
    pub fn summary_year(&self) -> f64 {
        self.control_year(ControlId::GlobalYear)
            .unwrap_or(self.config.default_year)
    }

    fn summary_region(&self) -> String {
        self.page
            .control_value(ControlId::SnapshotCity)
            .unwrap_or_else(|| self.config.default_region.clone())
    }

    fn summary_region_label(&self, value: &str) -> String {
        if !self.has_control(ControlId::SnapshotCity) {
            return String::new();
        }
        let options = self.page.control_options(ControlId::SnapshotCity);
        region_label(
            value,
            options.iter().map(|(v, t)| (v.as_str(), t.as_str())),
        )
    }

    pub async fn update_summary_signals(&self) -> Result<SyncOutcome, DashError> {
        let year = self.summary_year();
        let region = self.summary_region();
        let region_label = self.summary_region_label(&region);
        self.sync(
            ChartId::Kpi,
            &[
                (YEAR_SIGNAL, year.into()),
                (YEAR_LABEL_SIGNAL, year_label(year).into()),
                (CITY_SIGNAL, region.into()),
                (CITY_LABEL_SIGNAL, region_label.into()),
            ],
        )
        .await
    }

    pub async fn refresh_summary(&self) -> Result<SyncOutcome, DashError> {
        self.page
            .set_display_text(DisplayId::GlobalYear, &year_label(self.summary_year()));
        self.update_summary_signals().await
    }

    /// Push `year` into the city comparator, then re-annotate the legend.
    pub async fn update_city_year(&self, year: f64) -> Result<SyncOutcome, DashError> {
        self.page
            .set_display_text(DisplayId::CityYear, &year_label(year));
        let outcome = self
            .sync(ChartId::City, &[(YEAR_SIGNAL, year.into())])
            .await?;
        self.annotate_city_legend().await;
        Ok(outcome)
    }

    /// Mark the highest and lowest price-to-income cities in the legend.
    /// The label write itself lands on the next painted frame.
    pub async fn annotate_city_legend(&self) -> AnnotationOutcome {
        let Some(selector) = ChartId::City.def().legend_selector else {
            return AnnotationOutcome::Skipped(SkipReason::NoLegend);
        };
        let outcome = annotate_legend(self.view(ChartId::City), &self.page, selector).await;
        outcome.report(selector);
        outcome
    }

    async fn update_year_control(&self, control: ControlId) -> Result<SyncOutcome, DashError> {
        let Some(year) = self.control_year(control) else {
            return Ok(SyncOutcome::Unchanged);
        };
        self.sync(control.chart(), &[(YEAR_SIGNAL, year.into())])
            .await
    }

    async fn update_text_control(
        &self,
        control: ControlId,
        signal: &str,
    ) -> Result<SyncOutcome, DashError> {
        let Some(value) = self.page.control_value(control) else {
            return Ok(SyncOutcome::Unchanged);
        };
        self.sync(control.chart(), &[(signal, value.into())]).await
    }

    /// Routine bound to `control`'s change event.
    pub async fn handle_change(&self, control: ControlId) -> Result<SyncOutcome, DashError> {
        match control {
            ControlId::GlobalYear => self.refresh_summary().await,
            ControlId::SnapshotCity => self.update_summary_signals().await,
            ControlId::CityYear => {
                let year = self
                    .control_year(ControlId::CityYear)
                    .unwrap_or(self.config.default_year);
                self.update_city_year(year).await
            }
            ControlId::Sa3Year | ControlId::DistributionYear | ControlId::IncomeYear => {
                self.update_year_control(control).await
            }
            ControlId::Sa3City => self.update_text_control(control, CITY_SIGNAL).await,
            ControlId::StateHighlight => self.update_text_control(control, FOCUS_SIGNAL).await,
        }
    }

    /// [`Self::handle_change`] with failures logged instead of returned.
    pub async fn dispatch(&self, control: ControlId) {
        if let Err(err) = self.handle_change(control).await {
            warn!(control = ?control, "{}: {err}", control.failure_context());
        }
    }

    /// Display labels and the highlight default, before any listener fires.
    pub fn prime_controls(&self) {
        if self.has_control(ControlId::GlobalYear) {
            self.page
                .set_display_text(DisplayId::GlobalYear, &year_label(self.summary_year()));
        }
        if let Some(raw) = self.page.control_value(ControlId::CityYear) {
            let year = if raw.is_empty() {
                self.summary_year()
            } else {
                js_number(&raw)
            };
            self.page
                .set_display_text(DisplayId::CityYear, &year_label(year));
        }
        if self.has_control(ControlId::StateHighlight) {
            self.page
                .set_control_value(ControlId::StateHighlight, &self.config.highlight_default);
        }
    }

    /// Run every control routine once so chart signals match the controls.
    pub async fn initialize_controls(&self) -> Result<(), DashError> {
        self.refresh_summary().await?;
        let city_year = self
            .page
            .control_value(ControlId::CityYear)
            .filter(|v| !v.is_empty())
            .map(|v| js_number(&v))
            .unwrap_or(self.config.default_year);
        self.update_city_year(city_year).await?;
        self.update_year_control(ControlId::IncomeYear).await?;
        self.update_year_control(ControlId::Sa3Year).await?;
        self.update_text_control(ControlId::Sa3City, CITY_SIGNAL)
            .await?;
        self.update_year_control(ControlId::DistributionYear)
            .await?;
        self.update_text_control(ControlId::StateHighlight, FOCUS_SIGNAL)
            .await?;
        info!("dashboard controls initialised");
        Ok(())
    }
}

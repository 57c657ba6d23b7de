use std::collections::BTreeMap;
use std::path::Path;

use plotters::prelude::{BitMapBackend, DrawingBackend, SVGBackend};
use tracing::{debug, info};

use crate::models::{History, Summary};
use crate::services::chart_service::{
    draw_line_chart, is_svg_path, prepare_output, ChartError, PlottersSurface, Surface,
};
use crate::services::format_service::{format_currency, format_percent};
use crate::services::rules_service::summarize;
use crate::utils::Table;

pub const NO_DATA_TEXT: &str = "Sem dados ainda";
pub const NO_PREVIOUS_TEXT: &str = "Sem ponto anterior";
pub const NO_SOURCE_TEXT: &str = "—";
pub const NOT_AVAILABLE_TEXT: &str = "N/A";
pub const DEFAULT_CHART_POINTS: usize = 60;

/// Text outputs of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Slot {
    LastBid,
    LastMeta,
    Delta,
    DeltaMeta,
    Source,
    ChartMeta,
}

impl Slot {
    pub const ALL: [Slot; 6] = [
        Slot::LastBid,
        Slot::LastMeta,
        Slot::Delta,
        Slot::DeltaMeta,
        Slot::Source,
        Slot::ChartMeta,
    ];

    /// Element id used by the HTML dashboard
    pub fn element_id(&self) -> &'static str {
        match self {
            Slot::LastBid => "lastBid",
            Slot::LastMeta => "lastMeta",
            Slot::Delta => "delta",
            Slot::DeltaMeta => "deltaMeta",
            Slot::Source => "source",
            Slot::ChartMeta => "chartMeta",
        }
    }
}

/// Everything the dashboard writes to
pub trait Page {
    type Surface: Surface;

    fn set_text(&mut self, slot: Slot, text: &str);
    /// Target of the repository link
    fn set_link(&mut self, href: &str);
    fn surface(&mut self) -> &mut Self::Surface;
}

#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub repo_url: String,
    /// How many trailing observations are charted
    pub chart_points: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            repo_url: "https://github.com/".to_string(),
            chart_points: DEFAULT_CHART_POINTS,
        }
    }
}

/// Fill the page from the history.
///
/// Returns the summary that was displayed, or `None` for an empty history.
pub fn render_dashboard<P: Page>(
    history: &History,
    page: &mut P,
    settings: &DashboardSettings,
) -> Result<Option<Summary>, ChartError> {
    page.set_link(&settings.repo_url);

    let Some(summary) = summarize(history) else {
        info!("History is empty, nothing to chart");
        page.set_text(Slot::LastBid, NO_DATA_TEXT);
        return Ok(None);
    };

    page.set_text(Slot::LastBid, &format_currency(summary.last.bid));
    page.set_text(Slot::LastMeta, &format!("UTC: {}", summary.last.timestamp_iso));

    let delta = match summary.change {
        Some(change) => format_percent(change),
        None => NOT_AVAILABLE_TEXT.to_string(),
    };
    page.set_text(Slot::Delta, &delta);

    let delta_meta = match &summary.previous {
        Some(prev) => format!("Anterior UTC: {}", prev.timestamp_iso),
        None => NO_PREVIOUS_TEXT.to_string(),
    };
    page.set_text(Slot::DeltaMeta, &delta_meta);

    page.set_text(Slot::Source, summary.last.source.as_deref().unwrap_or(NO_SOURCE_TEXT));

    let points = history.tail_points(settings.chart_points);
    debug!("Charting {} of {} observations", points.len(), history.len());
    draw_line_chart(page.surface(), &points)?;
    page.set_text(Slot::ChartMeta, &format!("Mostrando {} pontos (últimos).", points.len()));

    Ok(Some(summary))
}

/// Render the dashboard with its chart written to `path` (SVG or PNG).
///
/// Returns the displayed summary and the written slots as a table.
pub fn render_dashboard_file(
    history: &History,
    settings: &DashboardSettings,
    path: &Path,
    size: (u32, u32),
) -> Result<(Option<Summary>, Table), ChartError> {
    prepare_output(path)?;

    if is_svg_path(path) {
        render_onto(PlottersSurface::new(SVGBackend::new(path, size)), history, settings)
    } else {
        render_onto(PlottersSurface::new(BitMapBackend::new(path, size)), history, settings)
    }
}

fn render_onto<DB: DrawingBackend>(
    surface: PlottersSurface<DB>,
    history: &History,
    settings: &DashboardSettings,
) -> Result<(Option<Summary>, Table), ChartError> {
    let mut page = RenderedPage::new(surface);
    let summary = render_dashboard(history, &mut page, settings)?;
    let table = page.to_table();

    let mut surface = page.into_surface();
    if summary.is_none() {
        // nothing was charted, write a blank image
        surface.clear()?;
    }
    surface.finish()?;

    Ok((summary, table))
}

/// A page that keeps its text in memory and draws onto any surface
pub struct RenderedPage<S: Surface> {
    texts: BTreeMap<Slot, String>,
    link: Option<String>,
    surface: S,
}

impl<S: Surface> RenderedPage<S> {
    pub fn new(surface: S) -> Self {
        Self {
            texts: BTreeMap::new(),
            link: None,
            surface,
        }
    }

    pub fn text(&self, slot: Slot) -> Option<&str> {
        self.texts.get(&slot).map(String::as_str)
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Slots that were written, as a console table
    pub fn to_table(&self) -> Table {
        let mut table = Table::new(vec!["Element", "Value"]);
        for slot in Slot::ALL {
            if let Some(text) = self.texts.get(&slot) {
                table.add_row(vec![slot.element_id(), text.as_str()]);
            }
        }
        if let Some(link) = &self.link {
            table.add_row(vec!["repoLink", link.as_str()]);
        }
        table
    }
}

impl<S: Surface> Page for RenderedPage<S> {
    type Surface = S;

    fn set_text(&mut self, slot: Slot, text: &str) {
        self.texts.insert(slot, text.to_string());
    }

    fn set_link(&mut self, href: &str) {
        self.link = Some(href.to_string());
    }

    fn surface(&mut self) -> &mut S {
        &mut self.surface
    }
}

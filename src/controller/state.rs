use crate::filter::apply_filter;
use crate::forecast::ForecastSeries;
use crate::models::{Category, DateRange, FilterSelection, ForecastRecord, ValidatedRecord};
use crate::presenter::{present_forecast, present_history, ChartSeries};
use crate::vocabulary::event_vocabulary;
use tracing::debug;

/// Everything that can change what the dashboard shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetRange(DateRange),
    SetCategory(Category),
    HistoryLoaded(Vec<ValidatedRecord>),
    HistoryFailed,
    ForecastLoaded(Vec<ForecastRecord>),
    ForecastFailed,
}

/// One render's worth of output.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardFrame {
    pub selection: FilterSelection,
    pub categories: Vec<String>,
    pub history: ChartSeries,
    pub forecast: ChartSeries,
}

/// Synchronous dashboard state. Vocabulary and the filtered view are derived
/// and recomputed on every action that can change them.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    selection: FilterSelection,
    history: Vec<ValidatedRecord>,
    vocabulary: Vec<String>,
    filtered: Vec<ValidatedRecord>,
    forecast: ForecastSeries,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            selection: FilterSelection::default(),
            history: Vec::new(),
            vocabulary: event_vocabulary(&[]),
            filtered: Vec::new(),
            forecast: ForecastSeries::default(),
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::SetRange(range) => {
                self.selection.date_range = range;
                self.refilter();
            }
            Action::SetCategory(category) => {
                if !self.vocabulary.iter().any(|c| *c == category.to_string()) {
                    debug!("Category {:?} not present in current dataset", category.to_string());
                }
                self.selection.category = category;
                self.refilter();
            }
            Action::HistoryLoaded(records) => {
                self.history = records;
                self.vocabulary = event_vocabulary(&self.history);
                self.refilter();
            }
            Action::HistoryFailed => {
                self.history.clear();
                self.vocabulary = event_vocabulary(&[]);
                self.filtered.clear();
            }
            Action::ForecastLoaded(records) => {
                self.forecast = ForecastSeries::new(records);
            }
            Action::ForecastFailed => {
                self.forecast = ForecastSeries::default();
            }
        }
    }

    fn refilter(&mut self) {
        self.filtered = apply_filter(&self.history, &self.selection);
        debug!(
            "Filter {:?}/{}: {} of {} records",
            self.selection.date_range,
            self.selection.category,
            self.filtered.len(),
            self.history.len()
        );
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn history(&self) -> &[ValidatedRecord] {
        &self.history
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn filtered(&self) -> &[ValidatedRecord] {
        &self.filtered
    }

    pub fn forecast(&self) -> &ForecastSeries {
        &self.forecast
    }

    pub fn frame(&self) -> DashboardFrame {
        DashboardFrame {
            selection: self.selection.clone(),
            categories: self.vocabulary.clone(),
            history: present_history(&self.filtered),
            forecast: present_forecast(&self.forecast),
        }
    }
}

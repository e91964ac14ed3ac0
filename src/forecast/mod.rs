use crate::models::ForecastRecord;

/// Predicted prices, shown in full. History filters never reach this series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastSeries {
    records: Vec<ForecastRecord>,
}

impl ForecastSeries {
    pub fn new(records: Vec<ForecastRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ForecastRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

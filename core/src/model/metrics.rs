use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Trailing window used for the `range_*` counters.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RangeSelector {
    Week,
    Month,
}

impl Default for RangeSelector {
    fn default() -> Self {
        RangeSelector::Week
    }
}

impl RangeSelector {
    pub fn days(&self) -> i64 {
        match self {
            RangeSelector::Week => 7,
            RangeSelector::Month => 30,
        }
    }

    pub fn window(&self) -> Duration {
        Duration::days(self.days())
    }

    pub fn label(&self) -> String {
        format!("Last {} Days", self.days())
    }
}

impl std::str::FromStr for RangeSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "week" | "w" | "7" => Ok(RangeSelector::Week),
            "month" | "m" | "30" => Ok(RangeSelector::Month),
            other => Err(format!("unknown range '{}', expected week or month", other)),
        }
    }
}

/// Running totals for one technician during a single aggregation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TechnicianAccumulator {
    pub jobs_completed: u32,
    pub total_sales: f64,
    pub delays: u32,
    pub range_jobs: u32,
    pub range_sales: f64,
    pub total_hours: f64,
}

impl TechnicianAccumulator {
    pub fn add_job(&mut self, amount: f64) {
        self.jobs_completed += 1;
        self.total_sales += amount;
    }

    pub fn add_duration(&mut self, hours: f64, delay_threshold_hours: f64) {
        self.total_hours += hours;
        if hours > delay_threshold_hours {
            self.delays += 1;
        }
    }

    pub fn add_in_range(&mut self, amount: f64) {
        self.range_jobs += 1;
        self.range_sales += amount;
    }

    pub fn into_metrics(self, name: String) -> TechnicianMetrics {
        debug_assert!(self.jobs_completed > 0, "accumulator without a job");
        let jobs = f64::from(self.jobs_completed);
        TechnicianMetrics {
            name,
            jobs_completed: self.jobs_completed,
            total_sales: self.total_sales,
            delays: self.delays,
            range_jobs: self.range_jobs,
            range_sales: self.range_sales,
            total_hours: self.total_hours,
            avg_job_value: self.total_sales / jobs,
            avg_completion_time: self.total_hours / jobs,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TechnicianMetrics {
    pub name: String,
    pub jobs_completed: u32,
    pub total_sales: f64,
    pub delays: u32,
    pub range_jobs: u32,
    pub range_sales: f64,
    pub total_hours: f64,
    pub avg_job_value: f64,
    pub avg_completion_time: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TopPerformer {
    pub rank: usize, // 1-based
    pub name: String,
    pub range_jobs: u32,
    pub range_sales: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MetricsView {
    pub range: RangeSelector,
    pub metrics: Vec<TechnicianMetrics>,
    pub top_performers: Vec<TopPerformer>,
    pub jobs_series: ChartSeries,
    pub revenue_series: ChartSeries,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_selector_parse() {
        assert_eq!("week".parse::<RangeSelector>(), Ok(RangeSelector::Week));
        assert_eq!("Month".parse::<RangeSelector>(), Ok(RangeSelector::Month));
        assert!("year".parse::<RangeSelector>().is_err());
        assert_eq!(RangeSelector::Month.label(), "Last 30 Days");
    }

    #[test]
    fn test_accumulator_delay_threshold_is_strict() {
        let mut acc = TechnicianAccumulator::default();
        acc.add_job(10.0);
        acc.add_duration(24.0, 24.0);
        acc.add_job(10.0);
        acc.add_duration(24.5, 24.0);
        assert_eq!(acc.delays, 1);
        assert_eq!(acc.total_hours, 48.5);
    }

    #[test]
    fn test_into_metrics_averages_over_jobs() {
        let mut acc = TechnicianAccumulator::default();
        acc.add_job(100.0);
        acc.add_duration(2.0, 24.0);
        acc.add_job(50.0);
        acc.add_duration(4.0, 24.0);

        let m = acc.into_metrics("Ali".to_string());
        assert_eq!(m.jobs_completed, 2);
        assert_eq!(m.avg_job_value, 75.0);
        assert_eq!(m.avg_completion_time, 3.0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "accumulator without a job")]
    fn test_into_metrics_rejects_empty_accumulator() {
        TechnicianAccumulator::default().into_metrics("Ghost".to_string());
    }
}

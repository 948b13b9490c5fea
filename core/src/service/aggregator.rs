use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::input::parse_amount;
use crate::model::metrics::{
    ChartSeries, MetricsView, RangeSelector, TechnicianAccumulator, TechnicianMetrics, TopPerformer,
};
use crate::model::order::OrderRecord;
use crate::model::role::Viewer;
use crate::time::{hours_between, parse_timestamp, window_start};

/// Folds completed orders into per-technician performance rows.
///
/// Pure: the caller supplies the orders, the range and `now`, and every
/// call starts from an empty accumulator map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceAggregator {
    pub delay_threshold_hours: f64,
    pub top_performers: usize,
}

impl Default for PerformanceAggregator {
    fn default() -> Self {
        Self {
            delay_threshold_hours: 24.0,
            top_performers: 3,
        }
    }
}

impl PerformanceAggregator {
    pub fn from_config(config: &Config) -> Self {
        Self {
            delay_threshold_hours: config.delay_threshold_hours,
            top_performers: config.top_performers,
        }
    }

    /// Returns one row per technician sorted by `range_sales` descending.
    /// Orders not in "Completed" status are ignored.
    pub fn aggregate(
        &self,
        orders: &[OrderRecord],
        range: RangeSelector,
        now: DateTime<Utc>,
    ) -> Vec<TechnicianMetrics> {
        let start = window_start(now, range);

        // Insertion order is kept so equal range_sales stay in first-seen order.
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut accumulators: Vec<(&str, TechnicianAccumulator)> = Vec::new();

        for order in orders.iter().filter(|o| o.is_completed()) {
            let name = order.assigned_technician.as_str();
            let slot = *index.entry(name).or_insert_with(|| {
                accumulators.push((name, TechnicianAccumulator::default()));
                accumulators.len() - 1
            });
            let acc = &mut accumulators[slot].1;

            let amount = parse_amount(order.final_amount.as_ref());
            acc.add_job(amount);

            let completed_at = parse_timestamp(order.completed_at.as_deref());
            let created_at = parse_timestamp(order.created_at.as_deref());

            if let (Some(created), Some(completed)) = (created_at, completed_at) {
                acc.add_duration(hours_between(created, completed), self.delay_threshold_hours);
            }

            if matches!(completed_at, Some(completed) if completed >= start) {
                acc.add_in_range(amount);
            }
        }

        let mut metrics: Vec<TechnicianMetrics> = accumulators
            .into_iter()
            .map(|(name, acc)| acc.into_metrics(name.to_string()))
            .collect();
        sort_by_range_sales(&mut metrics);

        log::debug!(
            "aggregated {} technicians over {} orders ({:?})",
            metrics.len(),
            orders.len(),
            range
        );
        metrics
    }

    /// Leaderboard over the full, administrator-visible sequence.
    pub fn top_performers(&self, metrics: &[TechnicianMetrics]) -> Vec<TopPerformer> {
        metrics
            .iter()
            .take(self.top_performers)
            .enumerate()
            .map(|(i, m)| TopPerformer {
                rank: i + 1,
                name: m.name.clone(),
                range_jobs: m.range_jobs,
                range_sales: m.range_sales,
            })
            .collect()
    }

    /// Aggregates and shapes the result for one viewer.
    pub fn build_view(
        &self,
        orders: &[OrderRecord],
        range: RangeSelector,
        now: DateTime<Utc>,
        viewer: &Viewer,
    ) -> MetricsView {
        let all = self.aggregate(orders, range, now);

        let top_performers = if viewer.is_admin() {
            self.top_performers(&all)
        } else {
            Vec::new()
        };
        let metrics = visible_to(all, viewer);

        MetricsView {
            range,
            jobs_series: jobs_series(&metrics, range),
            revenue_series: revenue_series(&metrics, range),
            metrics,
            top_performers,
        }
    }
}

// Standalone functions for pure logic

pub fn sort_by_range_sales(metrics: &mut [TechnicianMetrics]) {
    metrics.sort_by(|a, b| {
        b.range_sales
            .partial_cmp(&a.range_sales)
            .unwrap_or(Ordering::Equal)
    });
}

/// Administrators see every row; anyone else sees only their own.
pub fn visible_to(metrics: Vec<TechnicianMetrics>, viewer: &Viewer) -> Vec<TechnicianMetrics> {
    if viewer.is_admin() {
        metrics
    } else {
        metrics.into_iter().filter(|m| m.name == viewer.name).collect()
    }
}

pub fn jobs_series(metrics: &[TechnicianMetrics], range: RangeSelector) -> ChartSeries {
    ChartSeries {
        label: format!("Jobs Completed ({})", range.label()),
        labels: metrics.iter().map(|m| m.name.clone()).collect(),
        values: metrics.iter().map(|m| f64::from(m.range_jobs)).collect(),
    }
}

pub fn revenue_series(metrics: &[TechnicianMetrics], range: RangeSelector) -> ChartSeries {
    ChartSeries {
        label: format!("Revenue Share ({})", range.label()),
        labels: metrics.iter().map(|m| m.name.clone()).collect(),
        values: metrics.iter().map(|m| m.range_sales).collect(),
    }
}

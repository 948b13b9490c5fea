use chrono::{DateTime, Utc};

use crate::error::FetchError;
use crate::model::metrics::{MetricsView, RangeSelector};
use crate::model::order::STATUS_COMPLETED;
use crate::model::role::Viewer;
use crate::repository::OrderRepository;
use crate::service::aggregator::PerformanceAggregator;

pub struct DashboardUseCase<'a, R: OrderRepository> {
    order_repo: &'a R,
    aggregator: PerformanceAggregator,
}

impl<'a, R: OrderRepository> DashboardUseCase<'a, R> {
    pub fn new(order_repo: &'a R, aggregator: PerformanceAggregator) -> Self {
        Self {
            order_repo,
            aggregator,
        }
    }

    /// One full read of the completed orders and one full fold.
    pub fn load(
        &self,
        range: RangeSelector,
        viewer: &Viewer,
        now: DateTime<Utc>,
    ) -> Result<MetricsView, FetchError> {
        let orders = self
            .order_repo
            .list_by_status(STATUS_COMPLETED)
            .map_err(FetchError::new)?;
        Ok(self.aggregator.build_view(&orders, range, now, viewer))
    }
}

/// Identifies one refresh. Only the most recently issued ticket may
/// deliver a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    pub generation: u64,
    pub range: RangeSelector,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardState {
    Loading,
    Ready(MetricsView),
    /// The last fetch failed; nothing is shown until the next refresh.
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Applied,
    Stale,
}

/// Holds what the dashboard currently shows and discards results from
/// superseded refreshes.
#[derive(Debug)]
pub struct DashboardSession {
    range: RangeSelector,
    generation: u64,
    state: DashboardState,
}

impl Default for DashboardSession {
    fn default() -> Self {
        Self::new(RangeSelector::default())
    }
}

impl DashboardSession {
    pub fn new(range: RangeSelector) -> Self {
        Self {
            range,
            generation: 0,
            state: DashboardState::Loading,
        }
    }

    pub fn range(&self) -> RangeSelector {
        self.range
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn metrics(&self) -> Option<&MetricsView> {
        match &self.state {
            DashboardState::Ready(view) => Some(view),
            _ => None,
        }
    }

    /// Starts a refresh for `range`, superseding any refresh in flight.
    pub fn begin(&mut self, range: RangeSelector) -> RefreshTicket {
        self.generation += 1;
        self.range = range;
        self.state = DashboardState::Loading;
        RefreshTicket {
            generation: self.generation,
            range,
        }
    }

    pub fn deliver(
        &mut self,
        ticket: RefreshTicket,
        result: Result<MetricsView, FetchError>,
    ) -> Delivery {
        if ticket.generation != self.generation || ticket.range != self.range {
            log::debug!(
                "dropping stale dashboard result (generation {}, current {})",
                ticket.generation,
                self.generation
            );
            return Delivery::Stale;
        }

        self.state = match result {
            Ok(view) => DashboardState::Ready(view),
            Err(e) => {
                log::error!("Error fetching technician data: {}", e);
                DashboardState::Unavailable(e.to_string())
            }
        };
        Delivery::Applied
    }

    /// Convenience for synchronous callers: begin, load, deliver.
    pub fn refresh<R: OrderRepository>(
        &mut self,
        usecase: &DashboardUseCase<'_, R>,
        range: RangeSelector,
        viewer: &Viewer,
        now: DateTime<Utc>,
    ) -> &DashboardState {
        let ticket = self.begin(range);
        let result = usecase.load(range, viewer, now);
        self.deliver(ticket, result);
        &self.state
    }
}

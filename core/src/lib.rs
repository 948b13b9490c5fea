pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;
pub mod usecase;

pub use config::{resolve_data_dir, resolve_viewer, Config, ConfigRoleDirectory};
pub use error::{ConfigError, FetchError, NotifyError, OrderError};
pub use input::{expand_key, parse_amount, parse_args, ParsedInput};
pub use model::metrics::{MetricsView, RangeSelector, TechnicianMetrics, TopPerformer};
pub use model::order::{OrderRecord, StatusChange, STATUS_COMPLETED, STATUS_PENDING};
pub use model::role::{Role, Viewer};
pub use repository::{FileOrderRepository, OrderRepository, RoleDirectory};
pub use service::aggregator::PerformanceAggregator;
pub use service::notification::{CompletionNotifier, DeliveryOutcome, OutboxChannel};
pub use service::order_service::{Completion, NewOrder, OrderService};
pub use time::parse_timestamp;
pub use usecase::dashboard::{DashboardSession, DashboardState, DashboardUseCase};

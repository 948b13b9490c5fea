mod dashboard;
mod orders;

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use fieldops_core::service::notification::OutboxChannel;
use fieldops_core::{
    expand_key, parse_args, resolve_data_dir, resolve_viewer, Completion, CompletionNotifier,
    Config, ConfigRoleDirectory, DashboardSession, DashboardUseCase, FileOrderRepository,
    NewOrder, OrderService, PerformanceAggregator, RangeSelector, Role, Viewer,
};

#[derive(Parser)]
#[command(name = "fieldops")]
#[command(about = "Field-service job tracking and technician performance", long_about = None)]
struct Cli {
    /// Data directory (defaults to $FIELDOPS_HOME or ~/.fieldops)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Technician performance dashboard
    Dashboard {
        /// week or month
        #[arg(short, long, default_value = "week")]
        range: RangeSelector,
        /// View as this user (role comes from config); omit for the admin view
        #[arg(long = "as")]
        viewer: Option<String>,
        /// Print the metrics view as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create an order (usage: add Leaking unit customer:Siti phone:+6012... tech:Ali price:120 ...)
    Add {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List pending jobs for a technician
    Pending { technician: String },
    /// Complete a job (usage: complete ORDER1234 amount:150 work:"Replaced capacitor")
    Complete {
        /// Order number or document id
        order: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List all orders
    List,
}

const ORDER_KEYS: [&str; 7] = ["customer", "phone", "address", "service", "price", "technician", "notes"];
const COMPLETION_KEYS: [&str; 4] = ["amount", "work", "extra", "remarks"];

fn normalize(metadata: HashMap<String, String>, known_keys: &[&str]) -> HashMap<String, String> {
    let mut normalized = HashMap::new();
    for (key, value) in metadata {
        match expand_key(&key, known_keys) {
            Ok(full_key) => {
                normalized.insert(full_key, value);
            }
            Err(e) => {
                println!("Warning: {}", e);
            }
        }
    }
    normalized
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let data_dir = resolve_data_dir(cli.data_dir)?;
    let config = Config::load(&data_dir)?;
    let repo = FileOrderRepository::new(&data_dir)?;
    log::debug!("using data directory {}", data_dir.display());

    match cli.command {
        Some(Commands::Dashboard { range, viewer, json }) => {
            let viewer = match viewer {
                Some(name) => resolve_viewer(&ConfigRoleDirectory::new(&config), &name),
                None => Viewer::new("admin", Role::Administrator),
            };
            run_dashboard(&repo, &config, range, &viewer, json)?;
        }
        Some(Commands::Add { args }) => {
            let parsed = parse_args(&args);
            let mut fields = normalize(parsed.metadata, &ORDER_KEYS);
            let mut take = |key: &str| fields.remove(key).unwrap_or_default();

            let new_order = NewOrder {
                customer_name: take("customer"),
                phone: take("phone"),
                address: take("address"),
                problem_description: parsed.text,
                service: take("service"),
                quoted_price: take("price"),
                assigned_technician: take("technician"),
                admin_notes: take("notes"),
            };

            let service = OrderService::new(repo);
            match service.create_order(new_order, Utc::now()) {
                Ok(order) => {
                    println!("Order added: {} (ID: {})", order.order_id, order.id);
                    println!("  Customer:   {}", order.customer_name);
                    println!("  Service:    {}", order.service);
                    println!("  Technician: {}", order.assigned_technician);
                }
                Err(e) => println!("Error: {}", e),
            }
        }
        Some(Commands::Pending { technician }) => {
            let service = OrderService::new(repo);
            let pending = service.pending_for(&technician)?;
            if pending.is_empty() {
                println!("No pending jobs for {}.", technician);
            } else {
                orders::print_orders(&pending);
            }
        }
        Some(Commands::Complete { order, args }) => {
            let parsed = parse_args(&args);
            let mut fields = normalize(parsed.metadata, &COMPLETION_KEYS);
            let completion = Completion {
                final_amount: fields.remove("amount"),
                work_done: fields.remove("work"),
                extra_charges: fields.remove("extra"),
                remarks: fields.remove("remarks"),
            };

            let service = OrderService::new(repo);
            let target = service.find(&order)?;
            let now = Utc::now();
            let outbox = data_dir.join(&config.outbox_file);
            let notifier = CompletionNotifier::new(
                OutboxChannel::chat(outbox.clone()),
                OutboxChannel::email(outbox, "customer@example.com"),
            );
            let (change, outcome) = service.complete_and_notify(&target.id, completion, &notifier, now)?;
            println!("Job {} completed.", change.after.order_id);
            println!("  Notification: {}", orders::describe_outcome(&outcome));
        }
        Some(Commands::List) | None => {
            let service = OrderService::new(repo);
            let all = service.list_orders()?;
            if all.is_empty() {
                println!("No orders found.");
            } else {
                orders::print_orders(&all);
            }
        }
    }
    Ok(())
}

fn run_dashboard(
    repo: &FileOrderRepository,
    config: &Config,
    range: RangeSelector,
    viewer: &Viewer,
    json: bool,
) -> Result<()> {
    let usecase = DashboardUseCase::new(repo, PerformanceAggregator::from_config(config));
    let mut session = DashboardSession::new(range);
    session.refresh(&usecase, range, viewer, Utc::now());

    match session.metrics() {
        Some(view) if json => println!("{}", serde_json::to_string_pretty(view)?),
        Some(view) => dashboard::show_dashboard(view, viewer, &config.currency),
        None => println!("Technician data is unavailable. Run the command again to retry."),
    }
    Ok(())
}

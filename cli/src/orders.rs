use fieldops_core::service::notification::DeliveryOutcome;
use fieldops_core::{parse_amount, parse_timestamp, OrderRecord};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct OrderRow {
    #[tabled(rename = "Order")]
    order_id: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Technician")]
    technician: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

pub fn print_orders(orders: &[OrderRecord]) {
    let rows: Vec<OrderRow> = orders
        .iter()
        .map(|o| OrderRow {
            order_id: o.order_id.clone(),
            customer: o.customer_name.clone(),
            service: o.service.clone(),
            technician: o.assigned_technician.clone(),
            status: o.status.clone(),
            created: parse_timestamp(o.created_at.as_deref())
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
            amount: match &o.final_amount {
                Some(v) => format!("{:.2}", parse_amount(Some(v))),
                None => format!("{} (quoted)", o.quoted_price),
            },
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);
}

pub fn describe_outcome(outcome: &DeliveryOutcome) -> String {
    match outcome {
        DeliveryOutcome::Primary(m) => format!("sent via {} to {}", m.channel, m.recipient),
        DeliveryOutcome::Fallback(m) => format!("fell back to {} ({})", m.channel, m.recipient),
        DeliveryOutcome::Failed(e) => format!("all channels failed: {}", e),
        DeliveryOutcome::Skipped => "not required".to_string(),
    }
}

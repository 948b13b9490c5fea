use fieldops_core::model::metrics::ChartSeries;
use fieldops_core::{MetricsView, Viewer};
use tabled::settings::object::{Columns, Rows};
use tabled::settings::{Alignment, Color, Modify, Style};
use tabled::{Table, Tabled};

const MEDALS: [&str; 3] = ["gold", "silver", "bronze"];

#[derive(Tabled)]
struct LeaderRow {
    #[tabled(rename = "#")]
    rank: String,
    #[tabled(rename = "Technician")]
    name: String,
    #[tabled(rename = "Jobs")]
    jobs: u32,
    #[tabled(rename = "Sales")]
    sales: String,
}

#[derive(Tabled)]
struct MetricsRow {
    #[tabled(rename = "Technician")]
    name: String,
    #[tabled(rename = "Jobs Completed")]
    jobs: u32,
    #[tabled(rename = "Total Sales")]
    total_sales: String,
    #[tabled(rename = "Delays")]
    delays: String,
    #[tabled(rename = "Avg. Job Value")]
    avg_value: String,
    #[tabled(rename = "Avg. Completion Time")]
    avg_time: String,
}

#[derive(Tabled)]
struct SeriesRow {
    #[tabled(rename = "Technician")]
    name: String,
    #[tabled(rename = "Jobs")]
    jobs: String,
    #[tabled(rename = "Revenue")]
    revenue: String,
    #[tabled(rename = "")]
    bar: String,
}

pub fn show_dashboard(view: &MetricsView, viewer: &Viewer, currency: &str) {
    let title = if viewer.is_admin() {
        "Technician Performance Dashboard"
    } else {
        "My Performance"
    };
    println!("\n\x1b[1;36m{}\x1b[0m ({})", title, view.range.label());

    if view.metrics.is_empty() {
        println!("No completed jobs found.");
        return;
    }

    if viewer.is_admin() && !view.top_performers.is_empty() {
        println!("\nTop Performers");
        let rows: Vec<LeaderRow> = view
            .top_performers
            .iter()
            .map(|t| LeaderRow {
                rank: format!("{} {}", t.rank, MEDALS.get(t.rank - 1).unwrap_or(&"")),
                name: t.name.clone(),
                jobs: t.range_jobs,
                sales: format!("{}{:.2}", currency, t.range_sales),
            })
            .collect();
        print_table(Table::new(rows));
    }

    println!("\nPerformance Overview");
    print_series(&view.jobs_series, &view.revenue_series, currency);

    println!("\nDetailed Metrics");
    let rows: Vec<MetricsRow> = view
        .metrics
        .iter()
        .map(|m| MetricsRow {
            name: m.name.clone(),
            jobs: m.jobs_completed,
            total_sales: format!("{:.2}", m.total_sales),
            delays: if m.delays > 0 { format!("{} !", m.delays) } else { "0".to_string() },
            avg_value: format!("{}{:.2}", currency, m.avg_job_value),
            avg_time: format!("{:.1}h", m.avg_completion_time),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Modify::new(Columns::new(1..)).with(Alignment::right()));
    print_table(table);
}

fn print_series(jobs: &ChartSeries, revenue: &ChartSeries, currency: &str) {
    let max_revenue = revenue.values.iter().cloned().fold(0.0_f64, f64::max);

    let rows: Vec<SeriesRow> = jobs
        .labels
        .iter()
        .zip(jobs.values.iter().zip(revenue.values.iter()))
        .map(|(name, (job_count, amount))| {
            let width = if max_revenue > 0.0 { (amount / max_revenue * 20.0).round() as usize } else { 0 };
            SeriesRow {
                name: name.clone(),
                jobs: format!("{}", job_count),
                revenue: format!("{}{:.2}", currency, amount),
                bar: "█".repeat(width),
            }
        })
        .collect();

    println!("{} / {}", jobs.label, revenue.label);
    print_table(Table::new(rows));
}

fn print_table(mut table: Table) {
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);
}

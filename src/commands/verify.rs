//! Read-only verification of a seeded FactoryOS instance.

use anyhow::Result;
use colored::Colorize;
use factoryos::{Client, Dashboard, FeatureFlag};

use crate::config::SeedConfig;
use crate::ui::{self, display_value};

/// Everything the summary read back from the API.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Verification {
    pub dashboard: Dashboard,
    /// `None` when the daily report was unavailable.
    pub report_entries: Option<usize>,
    pub downtime_logs: usize,
    pub users: usize,
    pub features: Vec<FeatureFlag>,
}

pub fn run(config: &SeedConfig) -> Result<()> {
    let mut client = super::client(config);
    super::connect(&mut client, config)?;
    summary(&client);
    Ok(())
}

/// Print the dashboard, report and feature-flag summary.
///
/// Read failures are reported and never abort.
pub fn summary(client: &Client) -> Verification {
    ui::header("9. DASHBOARD VERIFICATION");
    let dashboard = client.dashboard().unwrap_or_else(|e| {
        ui::error(&format!("Dashboard: {e}"));
        Dashboard::default()
    });
    print_dashboard(&dashboard);

    ui::header("10. REPORTS VERIFICATION");
    let report_entries = match client.daily_report() {
        Ok(report) if report.is_available() => {
            ui::success(&format!("Daily report: {} entries", report.entries()));
            Some(report.entries())
        }
        Ok(report) => {
            ui::error(&format!(
                "Daily report: {}",
                report.error.as_deref().unwrap_or("N/A")
            ));
            None
        }
        Err(e) => {
            ui::error(&format!("Daily report: {e}"));
            None
        }
    };

    let downtime_logs = match client.downtime_logs() {
        Ok(logs) => {
            ui::success(&format!("Downtime logs: {} entries", logs.len()));
            logs.len()
        }
        Err(e) => {
            ui::error(&format!("Downtime logs: {e}"));
            0
        }
    };

    let users = match client.users() {
        Ok(users) => {
            ui::success(&format!("Users: {} total", users.len()));
            users.len()
        }
        Err(e) => {
            ui::error(&format!("Users: {e}"));
            0
        }
    };

    ui::header("11. FEATURE FLAGS");
    let features = client.feature_flags().unwrap_or_else(|e| {
        ui::error(&format!("Feature flags: {e}"));
        Vec::new()
    });
    for flag in &features {
        print_flag(flag);
    }

    Verification {
        dashboard,
        report_entries,
        downtime_logs,
        users,
        features,
    }
}

fn print_dashboard(d: &Dashboard) {
    let percent = |value: Option<&serde_json::Value>| format!("{}%", display_value(value));

    ui::rule(40);
    ui::kv("Total Machines", &display_value(d.total_machines.as_ref()));
    ui::kv("Active Machines", &display_value(d.active_machines.as_ref()));
    ui::kv("Today's Plans", &display_value(d.today_plans.as_ref()));
    ui::kv("Today Produced", &display_value(d.today_produced.as_ref()));
    ui::kv("Today Target", &display_value(d.today_target.as_ref()));
    ui::kv("Today OK", &display_value(d.today_ok.as_ref()));
    ui::kv("Today Rejected", &display_value(d.today_rejected.as_ref()));
    ui::kv("Rejection Rate", &percent(d.rejection_rate.as_ref()));
    ui::kv("Efficiency", &percent(d.efficiency.as_ref()));
    ui::kv("Downtime (min)", &display_value(d.today_downtime_min.as_ref()));
    ui::rule(40);
}

fn print_flag(flag: &FeatureFlag) {
    let api = format!("{:8}", flag.api.as_deref().unwrap_or("N/A"));
    let api = if flag.api_enabled() { api.green() } else { api.red() };
    println!(
        "  {:12}  api={}  ui={:8}  {}",
        flag.id,
        api,
        flag.ui.as_deref().unwrap_or("N/A"),
        flag.label.as_deref().unwrap_or("")
    );
}

//! Seed command: populate a FactoryOS instance with the demo dataset.
//!
//! Steps run strictly in order. Only the health check and login are fatal;
//! every later failure is reported per item and the run carries on.

use anyhow::Result;
use colored::Colorize;
use factoryos::{AssignedId, Client, PlanStatus};

use super::verify;
use crate::Context as AppContext;
use crate::cli::SeedArgs;
use crate::config::SeedConfig;
use crate::dataset::{self, COMPLETED_PLANS, IN_PROGRESS_PLANS, MachineIds, PlanIds};
use crate::dates::Clock;
use crate::{progress, ui};

/// Outcome counts for one batch of writes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub created: usize,
    /// Rejected as already existing, which counts as success.
    pub existing: usize,
    pub failed: usize,
}

impl Tally {
    pub fn succeeded(&self) -> usize {
        self.created + self.existing
    }
}

/// What a seed run did, step by step.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub users: Tally,
    pub machines: Tally,
    pub plans: Tally,
    pub patched: usize,
    pub production_logs: Tally,
    pub downtime: Tally,
}

pub fn run(ctx: &AppContext, config: &SeedConfig, args: SeedArgs) -> Result<()> {
    let clock = Clock::now();

    if args.dry_run {
        dry_run(ctx, config, &clock)?;
        return Ok(());
    }

    let mut client = super::client(config);
    let report = seed(ctx, &mut client, config, &clock)?;
    verify::summary(&client);
    finish(config, &report);

    Ok(())
}

/// Run every seeding step against `client`.
///
/// Returns an error only when the API is down or login fails.
pub fn seed(
    ctx: &AppContext,
    client: &mut Client,
    config: &SeedConfig,
    clock: &Clock,
) -> Result<SeedReport> {
    super::connect(client, config)?;

    let mut report = SeedReport {
        users: create_users(client),
        machines: create_machines(client),
        ..SeedReport::default()
    };

    list_shifts(client);

    ui::header("5. CREATE PRODUCTION PLANS");
    let machine_ids = resolve_machines(client);
    let plan_ids = create_plans(client, &machine_ids, clock, &mut report.plans);

    report.patched = apply_status_patches(client, &plan_ids);
    report.production_logs = create_production_logs(ctx, client, &machine_ids, &plan_ids);
    report.downtime = create_downtime(client, &machine_ids, clock);

    Ok(report)
}

// ============================================================================
// Steps
// ============================================================================

fn create_users(client: &Client) -> Tally {
    ui::header("2. CREATE USERS");
    let mut tally = Tally::default();

    for user in dataset::users() {
        match client.create_user(&user) {
            Ok(()) => {
                tally.created += 1;
                ui::success(&format!("Created {}: {}", user.role, user.full_name));
            }
            Err(e) if e.says_already_exists() => {
                tally.existing += 1;
                ui::success(&format!("Exists {}: {}", user.role, user.full_name));
            }
            Err(e) => {
                tally.failed += 1;
                ui::error(&format!("{}: {e}", user.full_name));
            }
        }
    }

    tally
}

fn create_machines(client: &Client) -> Tally {
    ui::header("3. CREATE MACHINES");
    let mut tally = Tally::default();

    for machine in dataset::machines() {
        let label = format!("{} ({})", machine.machine_code, machine.machine_name);
        match client.create_machine(&machine) {
            Ok(()) => {
                tally.created += 1;
                ui::success(&format!("Created: {label}"));
            }
            Err(e) if e.is_ignorable() => {
                tally.existing += 1;
                ui::success(&format!("Exists: {label}"));
            }
            Err(e) => {
                tally.failed += 1;
                ui::error(&format!("{}: {e}", machine.machine_code));
            }
        }
    }

    tally
}

fn list_shifts(client: &Client) {
    ui::header("4. VERIFY SHIFTS");
    match client.list_shifts() {
        Ok(shifts) => {
            let names: Vec<&str> = shifts.iter().map(|s| s.shift_name.as_str()).collect();
            ui::success(&format!(
                "Shifts available: {} ({})",
                shifts.len(),
                names.join(", ")
            ));
        }
        Err(e) => ui::error(&format!("Shifts: {e}")),
    }
}

fn resolve_machines(client: &Client) -> MachineIds {
    let ids = match client.list_machines() {
        Ok(machines) => MachineIds::from_listing(&machines),
        Err(e) => {
            ui::warn(&format!("Could not list machines: {e}"));
            MachineIds::default()
        }
    };

    let unresolved = ids.unresolved();
    if !unresolved.is_empty() {
        ui::warn(&format!("Using fallback ids for {}", unresolved.join(", ")));
    }

    ids
}

fn create_plans(client: &Client, ids: &MachineIds, clock: &Clock, tally: &mut Tally) -> PlanIds {
    let mut plan_ids = PlanIds::new();

    for (i, plan) in dataset::plans(ids, clock).iter().enumerate() {
        match client.create_plan(plan) {
            Ok(assigned) => {
                tally.created += 1;
                let label = match assigned {
                    AssignedId::Id(id) => {
                        plan_ids.insert(i, id);
                        id.to_string()
                    }
                    AssignedId::Missing => {
                        let id = i as u64 + 1;
                        log::warn!("Plan {i} created without an id, assuming {id}");
                        plan_ids.insert(i, id);
                        id.to_string()
                    }
                    AssignedId::Unusable(value) => {
                        log::warn!("Plan {i} created with unusable id {value}, status left unchanged");
                        "?".to_string()
                    }
                };
                ui::success(&format!(
                    "Plan {label}: {} ({} pcs, {})",
                    plan.product_name, plan.target_quantity, plan.plan_date
                ));
            }
            Err(e) => {
                tally.failed += 1;
                ui::error(&format!("Plan {i}: {e}"));
            }
        }
    }

    plan_ids
}

/// Status updates implied by plan position.
///
/// Plans that failed to create have no id and are skipped.
pub fn status_patches(plan_ids: &PlanIds) -> Vec<(u64, PlanStatus)> {
    let mut patches = Vec::new();
    for (range, status) in [
        (IN_PROGRESS_PLANS, PlanStatus::InProgress),
        (COMPLETED_PLANS, PlanStatus::Completed),
    ] {
        patches.extend(range.filter_map(|i| plan_ids.get(&i)).map(|&id| (id, status)));
    }
    patches
}

fn apply_status_patches(client: &Client, plan_ids: &PlanIds) -> usize {
    ui::header("6. SET PLAN STATUSES");
    let mut applied = 0;

    for (id, status) in status_patches(plan_ids) {
        match client.patch_plan_status(id, status) {
            Ok(()) => applied += 1,
            Err(e) => log::debug!("Plan {id} -> {status} not applied: {e}"),
        }
    }

    ui::success(&format!(
        "Plans {}-{} (today morning) → {}",
        IN_PROGRESS_PLANS.start + 1,
        IN_PROGRESS_PLANS.end,
        PlanStatus::InProgress
    ));
    ui::success(&format!(
        "Plans {}-{} (yesterday + 2 days ago) → {}",
        COMPLETED_PLANS.start + 1,
        COMPLETED_PLANS.end,
        PlanStatus::Completed
    ));

    applied
}

fn create_production_logs(
    ctx: &AppContext,
    client: &Client,
    ids: &MachineIds,
    plan_ids: &PlanIds,
) -> Tally {
    ui::header("7. LOG PRODUCTION DATA");
    let entries = dataset::production_logs(ids, plan_ids);
    let pb = progress::bar(entries.len() as u64, "Logging", ctx.quiet);
    let mut tally = Tally::default();

    for entry in &entries {
        pb.set_message(entry.hour_slot.clone());
        match client.create_production_log(entry) {
            Ok(()) => tally.created += 1,
            Err(e) => {
                tally.failed += 1;
                log::debug!(
                    "Production log {} for machine {} rejected: {e}",
                    entry.hour_slot,
                    entry.machine_id
                );
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let msg = format!(
        "Production logs: {} created, {} failed",
        tally.created, tally.failed
    );
    if tally.failed == 0 {
        ui::success(&msg);
    } else {
        ui::warn(&msg);
    }

    tally
}

fn create_downtime(client: &Client, ids: &MachineIds, clock: &Clock) -> Tally {
    ui::header("8. LOG DOWNTIME EVENTS");
    let mut tally = Tally::default();

    for event in dataset::downtime_events(ids, clock) {
        match client.create_downtime_event(&event) {
            Ok(()) => {
                tally.created += 1;
                let state = if event.is_ongoing() { "ongoing" } else { "resolved" };
                ui::success(&format!(
                    "Downtime: {} ({state})",
                    ui::truncate(&event.reason, 40)
                ));
            }
            Err(e) => {
                tally.failed += 1;
                ui::error(&format!("Downtime: {e}"));
            }
        }
    }

    tally
}

// ============================================================================
// Output
// ============================================================================

fn finish(config: &SeedConfig, report: &SeedReport) {
    ui::section("Seeded");
    for (name, tally) in [
        ("Users", report.users),
        ("Machines", report.machines),
        ("Plans", report.plans),
        ("Production logs", report.production_logs),
        ("Downtime events", report.downtime),
    ] {
        let failed = if tally.failed > 0 {
            format!("{} failed", tally.failed).red().to_string()
        } else {
            "0 failed".dimmed().to_string()
        };
        ui::kv(
            name,
            &format!(
                "{} ok ({} new, {} existing), {failed}",
                tally.succeeded(),
                tally.created,
                tally.existing
            ),
        );
    }
    ui::kv("Status updates", &report.patched.to_string());

    ui::banner("✓ SEED DATA COMPLETE – FactoryOS is ready!");
    println!();
    println!("  Login: {}", config.ui_url);
    println!(
        "  Credentials: {} / {}",
        config.credentials.username, config.credentials.password
    );
    println!("  API: {}/api/v1/...", config.base_url);
    println!();
}

fn dry_run(ctx: &AppContext, config: &SeedConfig, clock: &Clock) -> Result<()> {
    ui::header("DRY RUN");
    ui::kv("API", &config.base_url);
    ui::kv("Today", &clock.today());
    ui::kv("Yesterday", &clock.yesterday());
    ui::kv("Two days ago", &clock.two_days_ago());

    let ids = MachineIds::default();
    let plans = dataset::plans(&ids, clock);
    let logs = dataset::production_logs(&ids, &PlanIds::new());
    let downtime = dataset::downtime_events(&ids, clock);

    ui::section("Records");
    ui::kv("Users", &dataset::USERS.len().to_string());
    ui::kv("Machines", &dataset::MACHINES.len().to_string());
    ui::kv("Plans", &plans.len().to_string());
    ui::kv("Production logs", &logs.len().to_string());
    ui::kv("Downtime events", &downtime.len().to_string());

    ui::section("Plans");
    for (i, plan) in plans.iter().enumerate() {
        println!(
            "  {:>2}. {:<24} {:>5} pcs  {}  shift {}",
            i + 1,
            plan.product_name,
            plan.target_quantity,
            plan.plan_date,
            plan.shift_id
        );
    }

    if ctx.verbose > 0 {
        ui::section("Downtime payloads");
        println!("{}", serde_json::to_string_pretty(&downtime)?);
    }

    println!();
    ui::info("No requests were sent");
    ui::dim("Machine and plan ids are resolved from the API on a live run.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use factoryos::backend::Method;
    use factoryos::MockBackend;

    fn ctx() -> AppContext {
        AppContext {
            verbose: 0,
            quiet: true,
        }
    }

    fn clock() -> Clock {
        Clock::at(
            NaiveDate::from_ymd_opt(2026, 10, 19)
                .unwrap()
                .and_hms_opt(11, 0, 0)
                .unwrap(),
        )
    }

    fn run_seed(mock: &MockBackend) -> Result<SeedReport> {
        let mut client = Client::with_backend(Box::new(mock.clone()));
        seed(&ctx(), &mut client, &SeedConfig::default(), &clock())
    }

    fn wrote_records(mock: &MockBackend) -> bool {
        mock.requests().iter().any(|r| {
            r.method == Method::Post
                && (r.path == "/api/v1/auth/register" || r.path == "/api/v1/machines")
        })
    }

    #[test]
    fn test_full_seed_against_fresh_api() {
        let mock = MockBackend::new();
        let report = run_seed(&mock).unwrap();

        assert_eq!(report.users, Tally { created: 8, existing: 0, failed: 0 });
        assert_eq!(report.machines, Tally { created: 8, existing: 0, failed: 0 });
        assert_eq!(report.plans.created, 14);
        assert_eq!(report.patched, 12);
        assert_eq!(report.production_logs, Tally { created: 28, existing: 0, failed: 0 });
        assert_eq!(report.downtime.created, 4);
        assert_eq!(mock.production_log_count(), 28);
        assert_eq!(mock.downtime_count(), 4);

        let statuses = mock.plan_statuses();
        for id in 1..=7 {
            assert_eq!(statuses[&id], "IN_PROGRESS");
        }
        assert_eq!(statuses[&8], "PLANNED");
        assert_eq!(statuses[&9], "PLANNED");
        for id in 10..=14 {
            assert_eq!(statuses[&id], "COMPLETED");
        }
    }

    #[test]
    fn test_existing_machines_count_as_success() {
        let mock = MockBackend::new();
        mock.add_machine("CNC-002");
        mock.add_machine("INJ-002");

        let report = run_seed(&mock).unwrap();

        assert_eq!(report.users.created, 8);
        assert_eq!(report.machines.created, 6);
        assert_eq!(report.machines.existing, 2);
        assert_eq!(report.machines.failed, 0);
        assert_eq!(report.machines.succeeded(), 8);
    }

    #[test]
    fn test_existing_users_count_as_success() {
        let mock = MockBackend::new();
        mock.add_user("amit.patel");

        let report = run_seed(&mock).unwrap();

        assert_eq!(report.users, Tally { created: 7, existing: 1, failed: 0 });
    }

    #[test]
    fn test_no_token_aborts_before_writes() {
        let mock = MockBackend::new();
        mock.set_no_token();

        assert!(run_seed(&mock).is_err());
        assert!(!wrote_records(&mock));
        assert_eq!(mock.requests().len(), 2);
    }

    #[test]
    fn test_unreachable_api_aborts() {
        let mock = MockBackend::new();
        mock.set_unreachable();

        assert!(run_seed(&mock).is_err());
        assert_eq!(mock.requests().len(), 1);
    }

    #[test]
    fn test_unhealthy_api_aborts() {
        let mock = MockBackend::new();
        mock.set_unhealthy();

        assert!(run_seed(&mock).is_err());
        assert!(!wrote_records(&mock));
    }

    #[test]
    fn test_failed_plans_are_not_patched() {
        let mock = MockBackend::new();
        mock.fail_plans(&[2, 10]);

        let report = run_seed(&mock).unwrap();

        assert_eq!(report.plans, Tally { created: 12, existing: 0, failed: 2 });
        assert_eq!(report.patched, 10);
        // Logs for the two missing plans go out with a null plan id and fail.
        assert_eq!(report.production_logs, Tally { created: 24, existing: 0, failed: 4 });

        let statuses = mock.plan_statuses();
        for id in 1..=6 {
            assert_eq!(statuses[&id], "IN_PROGRESS");
        }
        assert_eq!(statuses[&7], "PLANNED");
        assert_eq!(statuses[&8], "PLANNED");
        for id in 9..=12 {
            assert_eq!(statuses[&id], "COMPLETED");
        }
    }

    #[test]
    fn test_text_plan_ids_are_used_as_reported() {
        let mock = MockBackend::new();
        mock.quote_plan_ids();
        mock.fail_plans(&[2]);

        let report = run_seed(&mock).unwrap();

        assert_eq!(report.plans.created, 13);
        assert_eq!(report.patched, 11);
        let statuses = mock.plan_statuses();
        for id in 1..=6 {
            assert_eq!(statuses[&id], "IN_PROGRESS");
        }
        // Position 6 was reported as id 6; a position-based guess would hit 7.
        assert_eq!(statuses[&7], "PLANNED");
        assert_eq!(statuses[&8], "PLANNED");
        for id in 9..=13 {
            assert_eq!(statuses[&id], "COMPLETED");
        }
    }

    #[test]
    fn test_unusable_plan_ids_are_not_patched() {
        let mock = MockBackend::new();
        mock.garble_plan_ids();

        let report = run_seed(&mock).unwrap();

        assert_eq!(report.plans.created, 14);
        assert_eq!(report.patched, 0);
        assert!(!mock.requests().iter().any(|r| r.method == Method::Patch));
        assert!(mock.plan_statuses().values().all(|s| s == "PLANNED"));
    }

    #[test]
    fn test_plan_id_fallback_to_position() {
        let mock = MockBackend::new();
        mock.omit_plan_ids();

        let report = run_seed(&mock).unwrap();

        assert_eq!(report.plans.created, 14);
        assert_eq!(report.patched, 12);
        assert_eq!(mock.plan_statuses()[&1], "IN_PROGRESS");
        assert_eq!(mock.plan_statuses()[&14], "COMPLETED");
    }

    #[test]
    fn test_status_patches_ranges() {
        let plan_ids: PlanIds = (0..14).map(|i| (i, 100 + i as u64)).collect();
        let patches = status_patches(&plan_ids);

        assert_eq!(patches.len(), 12);
        let in_progress: Vec<u64> = patches
            .iter()
            .filter(|(_, s)| *s == PlanStatus::InProgress)
            .map(|(id, _)| *id)
            .collect();
        assert_eq!(in_progress, (100..107).collect::<Vec<_>>());
        let completed: Vec<u64> = patches
            .iter()
            .filter(|(_, s)| *s == PlanStatus::Completed)
            .map(|(id, _)| *id)
            .collect();
        assert_eq!(completed, (109..114).collect::<Vec<_>>());
    }

    #[test]
    fn test_status_patches_skip_missing() {
        let plan_ids: PlanIds = [(0, 1), (3, 4), (7, 8), (8, 9), (13, 14)].into_iter().collect();
        let patches = status_patches(&plan_ids);

        assert_eq!(
            patches,
            vec![
                (1, PlanStatus::InProgress),
                (4, PlanStatus::InProgress),
                (14, PlanStatus::Completed),
            ]
        );
    }

    #[test]
    fn test_dry_run_does_not_need_api() {
        let config = SeedConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..SeedConfig::default()
        };
        assert!(dry_run(&ctx(), &config, &clock()).is_ok());
    }
}

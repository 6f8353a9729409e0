//! Request and response records for the FactoryOS API.
//!
//! Field names follow the API's JSON schema. Response records are lenient:
//! every field has a default so a partially populated envelope still parses.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

// =============================================================================
// Requests
// =============================================================================

/// Login credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account name.
    pub username: String,
    /// Plain-text password.
    pub password: String,
}

impl Credentials {
    /// Create credentials from a username and password.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Role of a FactoryOS user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Shift supervisor.
    Supervisor,
    /// Machine operator.
    Operator,
}

impl Role {
    /// Lowercase label used in console output.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Supervisor => "supervisor",
            Self::Operator => "operator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A user registration request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    /// Login name.
    pub username: String,
    /// Initial password.
    pub password: String,
    /// Display name.
    pub full_name: String,
    /// Assigned role.
    pub role: Role,
}

/// Operational status of a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MachineStatus {
    /// Available for production.
    Active,
    /// Down for maintenance.
    Maintenance,
}

/// A machine creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMachine {
    /// Human-readable code, unique per factory (e.g. `CNC-001`).
    pub machine_code: String,
    /// Display name.
    pub machine_name: String,
    /// Owning department.
    pub department: String,
    /// Machine kind.
    pub machine_type: String,
    /// Initial status.
    pub status: MachineStatus,
}

/// A production plan creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPlan {
    /// Server-side machine identifier.
    pub machine_id: u64,
    /// Server-side shift identifier.
    pub shift_id: u64,
    /// Product being made.
    pub product_name: String,
    /// Product code.
    pub product_code: String,
    /// Pieces to produce.
    pub target_quantity: u32,
    /// Plan date as `YYYY-MM-DD`.
    pub plan_date: String,
}

/// Lifecycle status of a production plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanStatus {
    /// Created but not started.
    Planned,
    /// Currently being produced.
    InProgress,
    /// Finished.
    Completed,
}

impl PlanStatus {
    /// Wire name of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "PLANNED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Body of a plan status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusPatch {
    /// New status.
    pub status: PlanStatus,
}

/// An hourly production record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductionLog {
    /// Plan this output counts against; `null` when the plan was never created.
    pub plan_id: Option<u64>,
    /// Machine that produced the output.
    pub machine_id: u64,
    /// Shift during which it was produced.
    pub shift_id: u64,
    /// Total pieces produced.
    pub quantity_produced: u32,
    /// Pieces passing quality checks.
    pub quantity_ok: u32,
    /// Pieces rejected.
    pub quantity_rejected: u32,
    /// Time window as `HH:MM-HH:MM`.
    pub hour_slot: String,
}

/// Cause class of a downtime event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DowntimeCategory {
    /// Planned maintenance.
    Maintenance,
    /// Unplanned breakdown.
    Breakdown,
    /// Material supply problem.
    Material,
    /// Quality issue.
    Quality,
}

/// A machine outage record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DowntimeEvent {
    /// Affected machine.
    pub machine_id: u64,
    /// Free-text reason.
    pub reason: String,
    /// Cause class.
    pub category: DowntimeCategory,
    /// Start timestamp (naive local ISO-8601).
    pub started_at: String,
    /// End timestamp; omitted while the outage is ongoing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,
}

impl DowntimeEvent {
    /// Whether the outage has not been resolved yet.
    #[must_use]
    pub fn is_ongoing(&self) -> bool {
        self.ended_at.is_none()
    }
}

// =============================================================================
// Responses
// =============================================================================

/// Read a server id from a JSON number or a numeric string.
///
/// Returns `None` for anything else, including negative numbers and `null`.
#[must_use]
pub fn parse_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_id<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_id))
}

/// Identifier the server reported for a newly created record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignedId {
    /// A usable id.
    Id(u64),
    /// The response carried no id at all.
    Missing,
    /// The response carried an id that is not a non-negative integer.
    Unusable(Value),
}

impl AssignedId {
    /// Classify the id field of a creation response.
    #[must_use]
    pub fn from_field(field: Option<&Value>) -> Self {
        match field {
            None => Self::Missing,
            Some(value) => parse_id(value).map_or_else(|| Self::Unusable(value.clone()), Self::Id),
        }
    }
}

/// Health endpoint response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Health {
    /// Whether the service reports itself healthy.
    pub success: bool,
    /// Service name.
    pub service: Option<String>,
}

/// Login endpoint response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct LoginResponse {
    pub token: Option<String>,
}

/// A shift as listed by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Shift {
    /// Server-side identifier; `None` when the API sent something unusable.
    #[serde(deserialize_with = "lenient_id")]
    pub shift_id: Option<u64>,
    /// Display name (e.g. "Morning").
    pub shift_name: String,
}

/// A machine as listed by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Machine {
    /// Server-side identifier; `None` when the API sent something unusable.
    #[serde(deserialize_with = "lenient_id")]
    pub machine_id: Option<u64>,
    /// Human-readable code.
    pub machine_code: String,
    /// Display name.
    pub machine_name: Option<String>,
    /// Current status.
    pub status: Option<String>,
}

/// Dashboard summary.
///
/// Values are kept as raw JSON since they are only printed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Dashboard {
    /// Machines registered.
    pub total_machines: Option<Value>,
    /// Machines in `ACTIVE` status.
    pub active_machines: Option<Value>,
    /// Plans dated today.
    pub today_plans: Option<Value>,
    /// Pieces produced today.
    pub today_produced: Option<Value>,
    /// Pieces targeted today.
    pub today_target: Option<Value>,
    /// Pieces passing quality today.
    pub today_ok: Option<Value>,
    /// Pieces rejected today.
    pub today_rejected: Option<Value>,
    /// Rejected share of production, in percent.
    pub rejection_rate: Option<Value>,
    /// Produced share of target, in percent.
    pub efficiency: Option<Value>,
    /// Downtime minutes today.
    pub today_downtime_min: Option<Value>,
}

/// Daily report response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DailyReport {
    /// Envelope success flag.
    pub success: bool,
    /// Report rows.
    pub report: Option<Value>,
    /// Error text when the report is unavailable.
    pub error: Option<String>,
}

impl DailyReport {
    /// Whether the report can be shown.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.success || self.entries() > 0
    }

    /// Number of report rows (or keys, for object-shaped reports).
    #[must_use]
    pub fn entries(&self) -> usize {
        match &self.report {
            Some(Value::Array(rows)) => rows.len(),
            Some(Value::Object(map)) => map.len(),
            _ => 0,
        }
    }
}

/// A feature flag with separate API and UI enablement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FeatureFlag {
    /// Flag identifier.
    pub id: String,
    /// API-side state (`ENABLED` / `DISABLED`).
    pub api: Option<String>,
    /// UI-side state (`ENABLED` / `DISABLED`).
    pub ui: Option<String>,
    /// Human-readable label.
    pub label: Option<String>,
}

impl FeatureFlag {
    /// Whether the API side of the flag is enabled.
    #[must_use]
    pub fn api_enabled(&self) -> bool {
        self.api.as_deref() == Some("ENABLED")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_user_serializes_role_uppercase() {
        let user = NewUser {
            username: "amit.patel".to_string(),
            password: "Pass@123".to_string(),
            full_name: "Amit Patel".to_string(),
            role: Role::Operator,
        };
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["role"], "OPERATOR");
        assert_eq!(value["full_name"], "Amit Patel");
    }

    #[test]
    fn test_status_patch_serialization() {
        let patch = StatusPatch {
            status: PlanStatus::InProgress,
        };
        assert_eq!(
            serde_json::to_value(patch).unwrap(),
            json!({"status": "IN_PROGRESS"})
        );
        assert_eq!(PlanStatus::Completed.to_string(), "COMPLETED");
    }

    #[test]
    fn test_ongoing_downtime_omits_ended_at() {
        let event = DowntimeEvent {
            machine_id: 8,
            reason: "Scheduled preventive maintenance".to_string(),
            category: DowntimeCategory::Maintenance,
            started_at: "2026-10-19T02:00:00.000000".to_string(),
            ended_at: None,
        };
        assert!(event.is_ongoing());
        let value = serde_json::to_value(&event).unwrap();
        assert!(value.get("ended_at").is_none());
        assert_eq!(value["category"], "MAINTENANCE");
    }

    #[test]
    fn test_production_log_null_plan_id() {
        let log = ProductionLog {
            plan_id: None,
            machine_id: 1,
            shift_id: 1,
            quantity_produced: 120,
            quantity_ok: 118,
            quantity_rejected: 2,
            hour_slot: "06:00-07:00".to_string(),
        };
        let value = serde_json::to_value(&log).unwrap();
        assert!(value["plan_id"].is_null());
    }

    #[test]
    fn test_dashboard_camel_case() {
        let dashboard: Dashboard =
            serde_json::from_value(json!({"totalMachines": 8, "rejectionRate": "2.1"})).unwrap();
        assert_eq!(dashboard.total_machines, Some(json!(8)));
        assert_eq!(dashboard.rejection_rate, Some(json!("2.1")));
        assert!(dashboard.efficiency.is_none());
    }

    #[test]
    fn test_daily_report_entries() {
        let report: DailyReport =
            serde_json::from_value(json!({"report": [{"machine": "CNC-001"}, {}]})).unwrap();
        assert!(!report.success);
        assert!(report.is_available());
        assert_eq!(report.entries(), 2);

        let empty = DailyReport::default();
        assert!(!empty.is_available());
    }

    #[test]
    fn test_feature_flag_api_enabled() {
        let flag: FeatureFlag =
            serde_json::from_value(json!({"id": "downtime", "api": "ENABLED", "ui": "DISABLED"}))
                .unwrap();
        assert!(flag.api_enabled());
        assert_eq!(flag.label, None);
    }

    #[test]
    fn test_parse_id_accepts_numbers_and_numeric_strings() {
        assert_eq!(parse_id(&json!(42)), Some(42));
        assert_eq!(parse_id(&json!("42")), Some(42));
        assert_eq!(parse_id(&json!(" 7 ")), Some(7));
        assert_eq!(parse_id(&json!("plan-7")), None);
        assert_eq!(parse_id(&json!(-1)), None);
        assert_eq!(parse_id(&json!(1.5)), None);
        assert_eq!(parse_id(&Value::Null), None);
    }

    #[test]
    fn test_assigned_id_from_field() {
        assert_eq!(AssignedId::from_field(Some(&json!("42"))), AssignedId::Id(42));
        assert_eq!(AssignedId::from_field(None), AssignedId::Missing);
        assert_eq!(
            AssignedId::from_field(Some(&Value::Null)),
            AssignedId::Unusable(Value::Null)
        );
    }

    #[test]
    fn test_machine_listing_with_mixed_ids() {
        let machines: Vec<Machine> = serde_json::from_value(json!([
            {"machine_id": 11, "machine_code": "CNC-001"},
            {"machine_id": "12", "machine_code": "CNC-002"},
            {"machine_id": "n/a", "machine_code": "INJ-001"},
            {"machine_code": "INJ-002"},
        ]))
        .unwrap();
        let ids: Vec<Option<u64>> = machines.iter().map(|m| m.machine_id).collect();
        assert_eq!(ids, vec![Some(11), Some(12), None, None]);
    }

    #[test]
    fn test_shift_id_from_string() {
        let shift: Shift =
            serde_json::from_value(json!({"shift_id": "2", "shift_name": "Afternoon"})).unwrap();
        assert_eq!(shift.shift_id, Some(2));
    }
}

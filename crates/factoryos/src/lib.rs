//! # factoryos
//!
//! Blocking client for the FactoryOS factory-operations HTTP API.
//!
//! This crate provides:
//! - Typed request records (users, machines, plans, production logs, downtime)
//! - A [`Client`] that logs in once and attaches the bearer token afterwards
//! - A pluggable [`backend::Backend`] with a live HTTP implementation and an
//!   in-memory mock for tests
//!
//! ## Example
//!
//! ```no_run
//! use factoryos::{Client, Credentials};
//!
//! let mut client = Client::new("http://localhost:4000");
//! client.health_check().expect("API is down");
//! client.login(&Credentials::new("admin", "admin123")).expect("login failed");
//!
//! for machine in client.list_machines().unwrap() {
//!     println!("{} -> {}", machine.machine_code, machine.machine_id.unwrap_or_default());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod types;

pub use backend::MockBackend;
pub use backend::http::DEFAULT_BASE_URL;
pub use error::{Error, ErrorCategory, Result};
pub use types::{
    AssignedId, Credentials, DailyReport, Dashboard, DowntimeCategory, DowntimeEvent, FeatureFlag, Health,
    Machine, MachineStatus, NewMachine, NewPlan, NewUser, PlanStatus, ProductionLog, Role, Shift,
    StatusPatch,
};

use backend::http::HttpBackend;
use backend::{Backend, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use types::LoginResponse;

/// High-level client for the FactoryOS API.
///
/// Every operation is a single blocking request. The token obtained by
/// [`Client::login`] is attached to all later calls.
pub struct Client {
    backend: Box<dyn Backend>,
    token: Option<String>,
}

impl Client {
    /// Create a client talking HTTP to `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_backend(Box::new(HttpBackend::new(base_url)))
    }

    /// Create an HTTP client with an overall per-request timeout.
    #[must_use]
    pub fn with_timeout(base_url: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self::with_backend(Box::new(HttpBackend::with_timeout(base_url, timeout)))
    }

    /// Create a client with a custom backend (useful for testing).
    #[must_use]
    pub fn with_backend(backend: Box<dyn Backend>) -> Self {
        Self {
            backend,
            token: None,
        }
    }

    /// Token from the last successful login.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Check that the API is up.
    ///
    /// Fails with [`Error::Unhealthy`] when the endpoint answers without
    /// `success: true`.
    pub fn health_check(&self) -> Result<Health> {
        let value = self.backend.send(Method::Get, "/api/health", None, None)?;
        let health: Health = serde_json::from_value(value)?;
        if !health.success {
            return Err(Error::Unhealthy);
        }
        Ok(health)
    }

    /// Log in and keep the returned token for subsequent calls.
    pub fn login(&mut self, credentials: &Credentials) -> Result<&str> {
        let body = serde_json::to_value(credentials)?;
        let value = self
            .backend
            .send(Method::Post, "/api/v1/auth/login", Some(&body), None)?;
        let response: LoginResponse = serde_json::from_value(value.clone())?;
        match response.token.filter(|t| !t.is_empty()) {
            Some(token) => Ok(self.token.insert(token).as_str()),
            None => Err(Error::NoToken(value.to_string())),
        }
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Register a user.
    pub fn create_user(&self, user: &NewUser) -> Result<()> {
        self.post("/api/v1/auth/register", user).map(drop)
    }

    /// Create a machine.
    pub fn create_machine(&self, machine: &NewMachine) -> Result<()> {
        self.post("/api/v1/machines", machine).map(drop)
    }

    /// Create a production plan.
    ///
    /// Reports the `plan.plan_id` of the response, which may be missing or
    /// unusable even though creation succeeded.
    pub fn create_plan(&self, plan: &NewPlan) -> Result<AssignedId> {
        let value = self.post("/api/v1/plans", plan)?;
        Ok(AssignedId::from_field(value.pointer("/plan/plan_id")))
    }

    /// Move a plan to a new status.
    pub fn patch_plan_status(&self, plan_id: u64, status: PlanStatus) -> Result<()> {
        let body = serde_json::to_value(StatusPatch { status })?;
        self.send(Method::Patch, &format!("/api/v1/plans/{plan_id}"), Some(&body))
            .map(drop)
    }

    /// Record an hourly production log.
    pub fn create_production_log(&self, log: &ProductionLog) -> Result<()> {
        self.post("/api/v1/production-logs", log).map(drop)
    }

    /// Record a downtime event.
    pub fn create_downtime_event(&self, event: &DowntimeEvent) -> Result<()> {
        self.post("/api/v1/downtime", event).map(drop)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// List configured shifts.
    pub fn list_shifts(&self) -> Result<Vec<Shift>> {
        self.get_list("/api/v1/shifts", "shifts")
    }

    /// List machines.
    pub fn list_machines(&self) -> Result<Vec<Machine>> {
        self.get_list("/api/v1/machines", "machines")
    }

    /// Fetch the dashboard summary.
    pub fn dashboard(&self) -> Result<Dashboard> {
        let value = self.get("/api/v1/dashboard")?;
        match value.get("dashboard") {
            Some(dashboard) => Ok(serde_json::from_value(dashboard.clone())?),
            None => Ok(Dashboard::default()),
        }
    }

    /// Fetch today's production report.
    pub fn daily_report(&self) -> Result<DailyReport> {
        Ok(serde_json::from_value(self.get("/api/v1/reports/daily")?)?)
    }

    /// List downtime logs.
    pub fn downtime_logs(&self) -> Result<Vec<Value>> {
        self.get_list("/api/v1/downtime", "logs")
    }

    /// List users.
    pub fn users(&self) -> Result<Vec<Value>> {
        self.get_list("/api/v1/auth/users", "users")
    }

    /// List feature flags.
    pub fn feature_flags(&self) -> Result<Vec<FeatureFlag>> {
        self.get_list("/api/v1/admin/features", "features")
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        self.backend.send(method, path, body, self.token.as_deref())
    }

    fn get(&self, path: &str) -> Result<Value> {
        self.send(Method::Get, path, None)
    }

    /// POST a record and require `success: true` in the response envelope.
    fn post<T: Serialize>(&self, path: &str, record: &T) -> Result<Value> {
        let body = serde_json::to_value(record)?;
        let value = self.send(Method::Post, path, Some(&body))?;
        ensure_success(value)
    }

    /// GET an envelope and decode the list under `key` (empty if missing).
    fn get_list<T: DeserializeOwned>(&self, path: &str, key: &str) -> Result<Vec<T>> {
        let mut value = self.get(path)?;
        match value.get_mut(key).map(Value::take) {
            Some(list) if !list.is_null() => Ok(serde_json::from_value(list)?),
            _ => Ok(Vec::new()),
        }
    }
}

/// Turn a 2xx envelope carrying `success: false` into an API error.
fn ensure_success(value: Value) -> Result<Value> {
    if value.get("success").and_then(Value::as_bool) == Some(true) {
        return Ok(value);
    }
    let message = value
        .get("error")
        .and_then(Value::as_str)
        .map_or_else(|| value.to_string(), str::to_string);
    Err(Error::api(200, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn logged_in(mock: &MockBackend) -> Client {
        let mut client = Client::with_backend(Box::new(mock.clone()));
        client.login(&Credentials::new("admin", "admin123")).unwrap();
        client
    }

    fn machine(code: &str) -> NewMachine {
        NewMachine {
            machine_code: code.to_string(),
            machine_name: "CNC Lathe Alpha".to_string(),
            department: "Machining".to_string(),
            machine_type: "CNC Lathe".to_string(),
            status: MachineStatus::Active,
        }
    }

    #[test]
    fn test_health_check() {
        let mock = MockBackend::new();
        let client = Client::with_backend(Box::new(mock.clone()));
        let health = client.health_check().unwrap();
        assert_eq!(health.service.as_deref(), Some("api-gateway"));

        mock.set_unhealthy();
        assert!(matches!(client.health_check(), Err(Error::Unhealthy)));
    }

    #[test]
    fn test_login_stores_token() {
        let mock = MockBackend::new();
        let client = logged_in(&mock);
        assert_eq!(client.token(), Some(backend::MOCK_TOKEN));
    }

    #[test]
    fn test_login_without_token() {
        let mock = MockBackend::new();
        mock.set_no_token();
        let mut client = Client::with_backend(Box::new(mock));
        let err = client
            .login(&Credentials::new("admin", "wrong"))
            .unwrap_err();
        assert!(matches!(err, Error::NoToken(_)));
        assert!(client.token().is_none());
    }

    #[test]
    fn test_token_attached_after_login() {
        let mock = MockBackend::new();
        let client = logged_in(&mock);
        client.list_shifts().unwrap();

        let requests = mock.requests();
        assert!(!requests[0].authenticated);
        assert!(requests[1].authenticated);
    }

    #[test]
    fn test_create_machine_duplicate_is_ignorable() {
        let mock = MockBackend::new();
        mock.add_machine("CNC-001");
        let client = logged_in(&mock);

        let err = client.create_machine(&machine("CNC-001")).unwrap_err();
        assert!(err.is_ignorable());
        client.create_machine(&machine("CNC-002")).unwrap();
        assert_eq!(client.list_machines().unwrap().len(), 2);
    }

    #[test]
    fn test_create_plan_returns_id() {
        let mock = MockBackend::new();
        let client = logged_in(&mock);
        let plan = NewPlan {
            machine_id: 1,
            shift_id: 1,
            product_name: "Gear Box Cover".to_string(),
            product_code: "GBC-2002".to_string(),
            target_quantity: 300,
            plan_date: "2026-10-19".to_string(),
        };
        assert_eq!(client.create_plan(&plan).unwrap(), AssignedId::Id(1));

        mock.quote_plan_ids();
        assert_eq!(client.create_plan(&plan).unwrap(), AssignedId::Id(2));

        mock.omit_plan_ids();
        assert_eq!(client.create_plan(&plan).unwrap(), AssignedId::Missing);

        mock.garble_plan_ids();
        assert_eq!(
            client.create_plan(&plan).unwrap(),
            AssignedId::Unusable(json!("plan-4"))
        );
    }

    /// Answers every request with the same body.
    struct Canned(Value);

    impl Backend for Canned {
        fn send(
            &self,
            _method: Method,
            _path: &str,
            _body: Option<&Value>,
            _token: Option<&str>,
        ) -> Result<Value> {
            Ok(self.0.clone())
        }
    }

    fn canned(body: Value) -> Client {
        Client::with_backend(Box::new(Canned(body)))
    }

    #[test]
    fn test_create_plan_with_text_id() {
        let plan = NewPlan {
            machine_id: 1,
            shift_id: 1,
            product_name: "Gear Box Cover".to_string(),
            product_code: "GBC-2002".to_string(),
            target_quantity: 300,
            plan_date: "2026-10-19".to_string(),
        };
        let client = canned(json!({"success": true, "plan": {"plan_id": "42"}}));
        assert_eq!(client.create_plan(&plan).unwrap(), AssignedId::Id(42));

        let client = canned(json!({"success": true, "plan": {"plan_id": null}}));
        assert_eq!(
            client.create_plan(&plan).unwrap(),
            AssignedId::Unusable(Value::Null)
        );
    }

    #[test]
    fn test_list_machines_keeps_valid_ids() {
        let client = canned(json!({
            "success": true,
            "machines": [
                {"machine_id": 11, "machine_code": "CNC-001"},
                {"machine_id": "12", "machine_code": "CNC-002"},
                {"machine_id": {"oid": 3}, "machine_code": "INJ-001"},
            ],
        }));
        let machines = client.list_machines().unwrap();
        assert_eq!(machines.len(), 3);
        assert_eq!(machines[0].machine_id, Some(11));
        assert_eq!(machines[1].machine_id, Some(12));
        assert_eq!(machines[2].machine_id, None);
    }

    #[test]
    fn test_ensure_success() {
        assert!(ensure_success(json!({"success": true})).is_ok());

        let err = ensure_success(json!({"success": false, "error": "bad shift"})).unwrap_err();
        assert_eq!(err.to_string(), "bad shift");

        let err = ensure_success(json!({"ok": 1})).unwrap_err();
        assert!(err.to_string().contains("ok"));
    }

    #[test]
    fn test_missing_list_is_empty() {
        let mock = MockBackend::new();
        let client = logged_in(&mock);
        assert!(client.list_machines().unwrap().is_empty());
        assert_eq!(client.feature_flags().unwrap().len(), 3);
    }
}

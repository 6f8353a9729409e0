//! Backend trait and implementations for reaching the FactoryOS API.
//!
//! The primary implementation is [`http::HttpBackend`]. [`MockBackend`] is an
//! in-memory stand-in for the API gateway that keeps just enough state
//! (users, machines, plans, logs) to exercise a full seed run offline:
//!
//! ```
//! use factoryos::backend::{Backend, Method, MockBackend};
//!
//! let mock = MockBackend::new();
//! let health = mock.send(Method::Get, "/api/health", None, None).unwrap();
//! assert_eq!(health["success"], true);
//! assert_eq!(mock.requests().len(), 1);
//! ```

pub mod http;

use crate::error::{Error, Result};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

/// HTTP methods used by the FactoryOS API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Read.
    Get,
    /// Create.
    Post,
    /// Partial update.
    Patch,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
        };
        write!(f, "{name}")
    }
}

/// Backend trait for sending requests to the API.
///
/// Implementations return the parsed JSON body of a 2xx response,
/// [`Error::Api`] for any other status, and [`Error::Unreachable`] when the
/// server cannot be contacted.
pub trait Backend: Send + Sync {
    /// Send one request.
    ///
    /// `path` is relative to the API base (e.g. `/api/v1/machines`). When
    /// `token` is set it is attached as a bearer token.
    fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<Value>;
}

/// A request as recorded by [`MockBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: Method,
    /// Request path.
    pub path: String,
    /// Whether a bearer token was attached.
    pub authenticated: bool,
}

/// Token issued by [`MockBackend`] unless configured otherwise.
pub const MOCK_TOKEN: &str = "mock-session-token";

/// How the mock reports ids of created plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlanIdStyle {
    Number,
    Text,
    Omitted,
    Garbled,
}

#[derive(Debug)]
struct MockState {
    reachable: bool,
    healthy: bool,
    token: Option<String>,
    usernames: Vec<String>,
    machines: Vec<Value>,
    plans: BTreeMap<u64, Value>,
    next_plan_id: u64,
    plan_attempts: usize,
    failing_plans: Vec<usize>,
    plan_id_style: PlanIdStyle,
    production_logs: Vec<Value>,
    downtime: Vec<Value>,
    requests: Vec<RecordedRequest>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            reachable: true,
            healthy: true,
            token: Some(MOCK_TOKEN.to_string()),
            usernames: vec!["admin".to_string()],
            machines: Vec::new(),
            plans: BTreeMap::new(),
            next_plan_id: 1,
            plan_attempts: 0,
            failing_plans: Vec::new(),
            plan_id_style: PlanIdStyle::Number,
            production_logs: Vec::new(),
            downtime: Vec::new(),
            requests: Vec::new(),
        }
    }
}

/// Mock backend for testing without network access.
///
/// Clones share state, so a test can hand one clone to a client and keep
/// another to inspect what was sent.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    /// Create a healthy mock that accepts any login.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every request fail as if the server were down.
    pub fn set_unreachable(&self) {
        self.state.lock().unwrap().reachable = false;
    }

    /// Make the health endpoint report failure.
    pub fn set_unhealthy(&self) {
        self.state.lock().unwrap().healthy = false;
    }

    /// Make login answer without a token.
    pub fn set_no_token(&self) {
        self.state.lock().unwrap().token = None;
    }

    /// Pre-register a machine so creating it again reports a duplicate.
    pub fn add_machine(&self, machine_code: &str) {
        let mut state = self.state.lock().unwrap();
        let machine_id = state.machines.len() as u64 + 1;
        state.machines.push(json!({
            "machine_id": machine_id,
            "machine_code": machine_code,
            "status": "ACTIVE",
        }));
    }

    /// Pre-register a username so registering it again is rejected.
    pub fn add_user(&self, username: &str) {
        self.state
            .lock()
            .unwrap()
            .usernames
            .push(username.to_string());
    }

    /// Reject the plan creation requests at these zero-based positions.
    pub fn fail_plans(&self, positions: &[usize]) {
        self.state
            .lock()
            .unwrap()
            .failing_plans
            .extend_from_slice(positions);
    }

    /// Answer plan creation with `success` but without a `plan` object.
    pub fn omit_plan_ids(&self) {
        self.state.lock().unwrap().plan_id_style = PlanIdStyle::Omitted;
    }

    /// Report plan ids as numeric strings (`"7"`).
    pub fn quote_plan_ids(&self) {
        self.state.lock().unwrap().plan_id_style = PlanIdStyle::Text;
    }

    /// Report plan ids that are not numbers at all (`"plan-7"`).
    pub fn garble_plan_ids(&self) {
        self.state.lock().unwrap().plan_id_style = PlanIdStyle::Garbled;
    }

    /// All requests received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Current status of every stored plan, keyed by plan id.
    #[must_use]
    pub fn plan_statuses(&self) -> BTreeMap<u64, String> {
        self.state
            .lock()
            .unwrap()
            .plans
            .iter()
            .map(|(id, plan)| (*id, plan["status"].as_str().unwrap_or_default().to_string()))
            .collect()
    }

    /// Number of production logs stored.
    #[must_use]
    pub fn production_log_count(&self) -> usize {
        self.state.lock().unwrap().production_logs.len()
    }

    /// Number of downtime events stored.
    #[must_use]
    pub fn downtime_count(&self) -> usize {
        self.state.lock().unwrap().downtime.len()
    }
}

fn field<'a>(body: Option<&'a Value>, key: &str) -> Option<&'a Value> {
    body.and_then(|b| b.get(key)).filter(|v| !v.is_null())
}

fn conflict(message: &str) -> Error {
    Error::from_status(409, &json!({"success": false, "error": message}).to_string())
}

fn bad_request(message: &str) -> Error {
    Error::from_status(400, &json!({"success": false, "error": message}).to_string())
}

impl MockState {
    fn route(
        &mut self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<Value> {
        if path == "/api/health" {
            return Ok(json!({"success": self.healthy, "service": "api-gateway"}));
        }
        if path == "/api/v1/auth/login" {
            return Ok(match &self.token {
                Some(token) => json!({"success": true, "token": token}),
                None => json!({"success": false, "error": "Invalid credentials"}),
            });
        }
        if token.is_none() || token != self.token.as_deref() {
            return Err(Error::from_status(401, r#"{"error":"Unauthorized"}"#));
        }

        match (method, path) {
            (Method::Post, "/api/v1/auth/register") => {
                let username = field(body, "username")
                    .and_then(Value::as_str)
                    .ok_or_else(|| bad_request("username is required"))?;
                if self.usernames.iter().any(|u| u == username) {
                    return Err(conflict("Username already exists"));
                }
                self.usernames.push(username.to_string());
                Ok(json!({"success": true}))
            }
            (Method::Get, "/api/v1/auth/users") => {
                let users: Vec<Value> = self
                    .usernames
                    .iter()
                    .map(|u| json!({"username": u}))
                    .collect();
                Ok(json!({"success": true, "users": users}))
            }
            (Method::Post, "/api/v1/machines") => {
                let code = field(body, "machine_code")
                    .and_then(Value::as_str)
                    .ok_or_else(|| bad_request("machine_code is required"))?;
                if self.machines.iter().any(|m| m["machine_code"] == code) {
                    return Err(conflict(&format!("Machine {code} already exists")));
                }
                let mut machine = body.cloned().unwrap_or_default();
                machine["machine_id"] = json!(self.machines.len() as u64 + 1);
                self.machines.push(machine.clone());
                Ok(json!({"success": true, "machine": machine}))
            }
            (Method::Get, "/api/v1/machines") => {
                Ok(json!({"success": true, "machines": self.machines}))
            }
            (Method::Get, "/api/v1/shifts") => Ok(json!({
                "success": true,
                "shifts": [
                    {"shift_id": 1, "shift_name": "Morning"},
                    {"shift_id": 2, "shift_name": "Afternoon"},
                    {"shift_id": 3, "shift_name": "Night"},
                ],
            })),
            (Method::Post, "/api/v1/plans") => {
                let position = self.plan_attempts;
                self.plan_attempts += 1;
                if self.failing_plans.contains(&position) {
                    return Err(bad_request("machine_id does not exist"));
                }
                let plan_id = self.next_plan_id;
                self.next_plan_id += 1;
                let mut plan = body.cloned().unwrap_or_default();
                plan["plan_id"] = json!(plan_id);
                plan["status"] = json!("PLANNED");
                self.plans.insert(plan_id, plan.clone());
                match self.plan_id_style {
                    PlanIdStyle::Number => {}
                    PlanIdStyle::Text => plan["plan_id"] = json!(plan_id.to_string()),
                    PlanIdStyle::Garbled => plan["plan_id"] = json!(format!("plan-{plan_id}")),
                    PlanIdStyle::Omitted => return Ok(json!({"success": true})),
                }
                Ok(json!({"success": true, "plan": plan}))
            }
            (Method::Patch, _) if path.starts_with("/api/v1/plans/") => {
                let plan = path
                    .trim_start_matches("/api/v1/plans/")
                    .parse::<u64>()
                    .ok()
                    .and_then(|id| self.plans.get_mut(&id))
                    .ok_or_else(|| Error::from_status(404, r#"{"error":"Plan not found"}"#))?;
                if let Some(status) = field(body, "status") {
                    plan["status"] = status.clone();
                }
                Ok(json!({"success": true, "plan": plan}))
            }
            (Method::Post, "/api/v1/production-logs") => {
                if field(body, "plan_id").is_none() {
                    return Err(bad_request("plan_id is required"));
                }
                self.production_logs.push(body.cloned().unwrap_or_default());
                Ok(json!({"success": true}))
            }
            (Method::Post, "/api/v1/downtime") => {
                if field(body, "started_at").is_none() {
                    return Err(bad_request("started_at is required"));
                }
                self.downtime.push(body.cloned().unwrap_or_default());
                Ok(json!({"success": true}))
            }
            (Method::Get, "/api/v1/downtime") => {
                Ok(json!({"success": true, "logs": self.downtime}))
            }
            (Method::Get, "/api/v1/dashboard") => {
                let active = self
                    .machines
                    .iter()
                    .filter(|m| m["status"] == "ACTIVE")
                    .count();
                Ok(json!({
                    "success": true,
                    "dashboard": {
                        "totalMachines": self.machines.len(),
                        "activeMachines": active,
                        "todayPlans": self.plans.len(),
                    },
                }))
            }
            (Method::Get, "/api/v1/reports/daily") => {
                let rows: Vec<Value> = self
                    .production_logs
                    .iter()
                    .map(|log| json!({"machine_id": log["machine_id"]}))
                    .collect();
                Ok(json!({"success": true, "report": rows}))
            }
            (Method::Get, "/api/v1/admin/features") => Ok(json!({
                "success": true,
                "features": [
                    {"id": "production", "api": "ENABLED", "ui": "ENABLED", "label": "Production"},
                    {"id": "downtime", "api": "ENABLED", "ui": "ENABLED", "label": "Downtime"},
                    {"id": "quality", "api": "DISABLED", "ui": "DISABLED", "label": "Quality"},
                ],
            })),
            _ => Err(Error::from_status(404, r#"{"error":"Not found"}"#)),
        }
    }
}

impl Backend for MockBackend {
    fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<Value> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(RecordedRequest {
            method,
            path: path.to_string(),
            authenticated: token.is_some(),
        });
        if !state.reachable {
            return Err(Error::Unreachable {
                url: format!("mock://{path}"),
                message: "connection refused".to_string(),
            });
        }
        state.route(method, path, body, token)
    }
}

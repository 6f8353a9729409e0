//! Demo dataset: a small discrete-manufacturing plant.
//!
//! Plans reference machines by code; the server assigns numeric ids, which
//! are resolved at seed time through [`MachineIds`]. Production logs
//! reference plans by their position in [`PLANS`].

use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

use factoryos::{
    DowntimeCategory, DowntimeEvent, Machine, MachineStatus, NewMachine, NewPlan, NewUser,
    ProductionLog, Role,
};

use crate::dates::Clock;

/// Password given to every seeded user.
pub const USER_PASSWORD: &str = "Pass@123";

/// Shift ids as configured on a fresh FactoryOS install.
pub const MORNING_SHIFT: u64 = 1;
pub const AFTERNOON_SHIFT: u64 = 2;

/// Plans moved to `IN_PROGRESS` (today's morning shift).
pub const IN_PROGRESS_PLANS: Range<usize> = 0..7;
/// Plans moved to `COMPLETED` (yesterday and two days ago).
pub const COMPLETED_PLANS: Range<usize> = 9..14;

/// Server-assigned plan id, keyed by position in [`PLANS`].
pub type PlanIds = BTreeMap<usize, u64>;

// ============================================================================
// Users
// ============================================================================

pub struct UserSpec {
    pub username: &'static str,
    pub full_name: &'static str,
    pub role: Role,
}

pub const USERS: &[UserSpec] = &[
    UserSpec { username: "rajesh.kumar", full_name: "Rajesh Kumar", role: Role::Supervisor },
    UserSpec { username: "priya.sharma", full_name: "Priya Sharma", role: Role::Supervisor },
    UserSpec { username: "amit.patel", full_name: "Amit Patel", role: Role::Operator },
    UserSpec { username: "sunita.devi", full_name: "Sunita Devi", role: Role::Operator },
    UserSpec { username: "vikram.singh", full_name: "Vikram Singh", role: Role::Operator },
    UserSpec { username: "neha.gupta", full_name: "Neha Gupta", role: Role::Operator },
    UserSpec { username: "ravi.verma", full_name: "Ravi Verma", role: Role::Operator },
    UserSpec { username: "deepa.rani", full_name: "Deepa Rani", role: Role::Operator },
];

pub fn users() -> Vec<NewUser> {
    USERS
        .iter()
        .map(|u| NewUser {
            username: u.username.to_string(),
            password: USER_PASSWORD.to_string(),
            full_name: u.full_name.to_string(),
            role: u.role,
        })
        .collect()
}

// ============================================================================
// Machines
// ============================================================================

pub struct MachineSpec {
    pub code: &'static str,
    pub name: &'static str,
    pub department: &'static str,
    pub machine_type: &'static str,
    pub status: MachineStatus,
    /// Id assumed when the machine list cannot be read back.
    pub fallback_id: u64,
}

pub const CNC_001: MachineSpec = MachineSpec {
    code: "CNC-001",
    name: "CNC Lathe Alpha",
    department: "Machining",
    machine_type: "CNC Lathe",
    status: MachineStatus::Active,
    fallback_id: 1,
};
pub const CNC_002: MachineSpec = MachineSpec {
    code: "CNC-002",
    name: "CNC Mill Beta",
    department: "Machining",
    machine_type: "CNC Mill",
    status: MachineStatus::Active,
    fallback_id: 2,
};
pub const INJ_001: MachineSpec = MachineSpec {
    code: "INJ-001",
    name: "Injection Molder A",
    department: "Molding",
    machine_type: "Injection Molder",
    status: MachineStatus::Active,
    fallback_id: 3,
};
pub const INJ_002: MachineSpec = MachineSpec {
    code: "INJ-002",
    name: "Injection Molder B",
    department: "Molding",
    machine_type: "Injection Molder",
    status: MachineStatus::Active,
    fallback_id: 4,
};
pub const PRESS_001: MachineSpec = MachineSpec {
    code: "PRESS-001",
    name: "Hydraulic Press 50T",
    department: "Pressing",
    machine_type: "Hydraulic Press",
    status: MachineStatus::Active,
    fallback_id: 5,
};
pub const WELD_001: MachineSpec = MachineSpec {
    code: "WELD-001",
    name: "Robotic Welder R1",
    department: "Welding",
    machine_type: "Robotic Welder",
    status: MachineStatus::Active,
    fallback_id: 6,
};
pub const PACK_001: MachineSpec = MachineSpec {
    code: "PACK-001",
    name: "Packaging Line 1",
    department: "Packaging",
    machine_type: "Packaging",
    status: MachineStatus::Active,
    fallback_id: 7,
};
pub const GRIND_001: MachineSpec = MachineSpec {
    code: "GRIND-001",
    name: "Surface Grinder G1",
    department: "Machining",
    machine_type: "Surface Grinder",
    status: MachineStatus::Maintenance,
    fallback_id: 8,
};

pub const MACHINES: &[MachineSpec] = &[
    CNC_001, CNC_002, INJ_001, INJ_002, PRESS_001, WELD_001, PACK_001, GRIND_001,
];

pub fn machines() -> Vec<NewMachine> {
    MACHINES
        .iter()
        .map(|m| NewMachine {
            machine_code: m.code.to_string(),
            machine_name: m.name.to_string(),
            department: m.department.to_string(),
            machine_type: m.machine_type.to_string(),
            status: m.status,
        })
        .collect()
}

/// Machine code to server id, as read back from the API.
#[derive(Debug, Clone, Default)]
pub struct MachineIds {
    by_code: HashMap<String, u64>,
}

impl MachineIds {
    /// Listed machines without a usable id are left to their fallback.
    pub fn from_listing(machines: &[Machine]) -> Self {
        Self {
            by_code: machines
                .iter()
                .filter_map(|m| m.machine_id.map(|id| (m.machine_code.clone(), id)))
                .collect(),
        }
    }

    /// Server id for a machine, or its fallback id when it was not listed.
    pub fn resolve(&self, machine: &MachineSpec) -> u64 {
        self.by_code
            .get(machine.code)
            .copied()
            .unwrap_or(machine.fallback_id)
    }

    /// Codes of dataset machines missing from the listing.
    pub fn unresolved(&self) -> Vec<&'static str> {
        MACHINES
            .iter()
            .filter(|m| !self.by_code.contains_key(m.code))
            .map(|m| m.code)
            .collect()
    }
}

// ============================================================================
// Production plans
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanDay {
    Today,
    Yesterday,
    TwoDaysAgo,
}

impl PlanDay {
    pub fn date(self, clock: &Clock) -> String {
        match self {
            Self::Today => clock.today(),
            Self::Yesterday => clock.yesterday(),
            Self::TwoDaysAgo => clock.two_days_ago(),
        }
    }
}

pub struct PlanSpec {
    pub machine: &'static MachineSpec,
    pub shift_id: u64,
    pub product_name: &'static str,
    pub product_code: &'static str,
    pub target_quantity: u32,
    pub day: PlanDay,
}

const fn plan(
    machine: &'static MachineSpec,
    shift_id: u64,
    product_name: &'static str,
    product_code: &'static str,
    target_quantity: u32,
    day: PlanDay,
) -> PlanSpec {
    PlanSpec {
        machine,
        shift_id,
        product_name,
        product_code,
        target_quantity,
        day,
    }
}

pub const PLANS: &[PlanSpec] = &[
    // Today, morning shift
    plan(&CNC_001, MORNING_SHIFT, "Shaft Bearing Housing", "SBH-1001", 500, PlanDay::Today),
    plan(&CNC_002, MORNING_SHIFT, "Gear Box Cover", "GBC-2002", 300, PlanDay::Today),
    plan(&INJ_001, MORNING_SHIFT, "Plastic Housing Cap", "PHC-3001", 1000, PlanDay::Today),
    plan(&INJ_002, MORNING_SHIFT, "Connector Shell", "CS-4001", 800, PlanDay::Today),
    plan(&PRESS_001, MORNING_SHIFT, "Metal Bracket A", "MBA-5001", 600, PlanDay::Today),
    plan(&WELD_001, MORNING_SHIFT, "Frame Assembly", "FA-6001", 200, PlanDay::Today),
    plan(&PACK_001, MORNING_SHIFT, "Final Pack Unit", "FPU-7001", 400, PlanDay::Today),
    // Today, afternoon shift
    plan(&CNC_001, AFTERNOON_SHIFT, "Shaft Bearing Housing", "SBH-1001", 450, PlanDay::Today),
    plan(&INJ_001, AFTERNOON_SHIFT, "Valve Body", "VB-3002", 750, PlanDay::Today),
    // Yesterday
    plan(&CNC_001, MORNING_SHIFT, "Shaft Bearing Housing", "SBH-1001", 500, PlanDay::Yesterday),
    plan(&CNC_002, MORNING_SHIFT, "Gear Box Cover", "GBC-2002", 300, PlanDay::Yesterday),
    plan(&INJ_001, MORNING_SHIFT, "Plastic Housing Cap", "PHC-3001", 1000, PlanDay::Yesterday),
    // Two days ago
    plan(&CNC_001, MORNING_SHIFT, "Shaft Bearing Housing", "SBH-1001", 500, PlanDay::TwoDaysAgo),
    plan(&PRESS_001, MORNING_SHIFT, "Metal Bracket A", "MBA-5001", 600, PlanDay::TwoDaysAgo),
];

pub fn plans(ids: &MachineIds, clock: &Clock) -> Vec<NewPlan> {
    PLANS
        .iter()
        .map(|p| NewPlan {
            machine_id: ids.resolve(p.machine),
            shift_id: p.shift_id,
            product_name: p.product_name.to_string(),
            product_code: p.product_code.to_string(),
            target_quantity: p.target_quantity,
            plan_date: p.day.date(clock),
        })
        .collect()
}

// ============================================================================
// Production logs
// ============================================================================

pub struct LogSpec {
    /// Position of the plan in [`PLANS`].
    pub plan: usize,
    pub produced: u32,
    pub ok: u32,
    pub rejected: u32,
    pub hour_slot: &'static str,
}

const fn log(plan: usize, produced: u32, ok: u32, rejected: u32, hour_slot: &'static str) -> LogSpec {
    LogSpec {
        plan,
        produced,
        ok,
        rejected,
        hour_slot,
    }
}

pub const PRODUCTION_LOGS: &[LogSpec] = &[
    // Today: CNC-001, target 500
    log(0, 120, 118, 2, "06:00-07:00"),
    log(0, 110, 107, 3, "07:00-08:00"),
    log(0, 90, 88, 2, "08:00-09:00"),
    // Today: CNC-002, target 300
    log(1, 95, 92, 3, "06:00-07:00"),
    log(1, 85, 82, 3, "07:00-08:00"),
    // Today: INJ-001, target 1000
    log(2, 200, 195, 5, "06:00-07:00"),
    log(2, 220, 215, 5, "07:00-08:00"),
    log(2, 230, 225, 5, "08:00-09:00"),
    // Today: INJ-002, target 800
    log(3, 180, 176, 4, "06:00-07:00"),
    log(3, 170, 166, 4, "07:00-08:00"),
    log(3, 170, 166, 4, "08:00-09:00"),
    // Today: PRESS-001, target 600
    log(4, 150, 148, 2, "06:00-07:00"),
    log(4, 140, 137, 3, "07:00-08:00"),
    log(4, 110, 108, 2, "08:00-09:00"),
    // Today: WELD-001, target 200
    log(5, 60, 58, 2, "06:00-07:00"),
    log(5, 60, 59, 1, "07:00-08:00"),
    // Today: PACK-001, target 400
    log(6, 100, 99, 1, "06:00-07:00"),
    log(6, 95, 95, 0, "07:00-08:00"),
    log(6, 85, 85, 0, "08:00-09:00"),
    // Yesterday
    log(9, 250, 245, 5, "06:00-10:00"),
    log(9, 240, 233, 7, "10:00-14:00"),
    log(10, 295, 288, 7, "06:00-14:00"),
    log(11, 500, 488, 12, "06:00-10:00"),
    log(11, 480, 467, 13, "10:00-14:00"),
    // Two days ago
    log(12, 260, 256, 4, "06:00-10:00"),
    log(12, 250, 248, 2, "10:00-14:00"),
    log(13, 300, 295, 5, "06:00-10:00"),
    log(13, 280, 275, 5, "10:00-14:00"),
];

/// Build production logs against the plans that were actually created.
///
/// A log whose plan failed to create is still sent, with a `null` plan id.
pub fn production_logs(ids: &MachineIds, plan_ids: &PlanIds) -> Vec<ProductionLog> {
    PRODUCTION_LOGS
        .iter()
        .map(|l| {
            let plan = &PLANS[l.plan];
            ProductionLog {
                plan_id: plan_ids.get(&l.plan).copied(),
                machine_id: ids.resolve(plan.machine),
                shift_id: plan.shift_id,
                quantity_produced: l.produced,
                quantity_ok: l.ok,
                quantity_rejected: l.rejected,
                hour_slot: l.hour_slot.to_string(),
            }
        })
        .collect()
}

// ============================================================================
// Downtime
// ============================================================================

pub struct DowntimeSpec {
    pub machine: &'static MachineSpec,
    pub reason: &'static str,
    pub category: DowntimeCategory,
    pub started_minutes_ago: i64,
    /// `None` while the outage is ongoing.
    pub ended_minutes_ago: Option<i64>,
}

pub const DOWNTIME: &[DowntimeSpec] = &[
    DowntimeSpec {
        machine: &GRIND_001,
        reason: "Scheduled preventive maintenance - bearing replacement",
        category: DowntimeCategory::Maintenance,
        started_minutes_ago: 8 * 60,
        ended_minutes_ago: None,
    },
    DowntimeSpec {
        machine: &CNC_002,
        reason: "Tool breakage - carbide insert shattered",
        category: DowntimeCategory::Breakdown,
        started_minutes_ago: 4 * 60,
        ended_minutes_ago: Some(2 * 60),
    },
    DowntimeSpec {
        machine: &INJ_002,
        reason: "Material feed jam - hopper blockage",
        category: DowntimeCategory::Material,
        started_minutes_ago: 6 * 60,
        ended_minutes_ago: Some(5 * 60),
    },
    DowntimeSpec {
        machine: &WELD_001,
        reason: "Calibration drift detected - recalibration performed",
        category: DowntimeCategory::Quality,
        started_minutes_ago: 3 * 60,
        ended_minutes_ago: Some(2 * 60 + 30),
    },
];

pub fn downtime_events(ids: &MachineIds, clock: &Clock) -> Vec<DowntimeEvent> {
    DOWNTIME
        .iter()
        .map(|d| DowntimeEvent {
            machine_id: ids.resolve(d.machine),
            reason: d.reason.to_string(),
            category: d.category,
            started_at: clock.minutes_ago(d.started_minutes_ago),
            ended_at: d.ended_minutes_ago.map(|m| clock.minutes_ago(m)),
        })
        .collect()
}

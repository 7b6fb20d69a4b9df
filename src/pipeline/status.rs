//! Traffic-light classification ("semáforo") of scored projects.
//!
//! Rules are tried in order and the first one that yields a status wins:
//!
//! | Order | Rule      | Condition                                   |
//! |-------|-----------|---------------------------------------------|
//! | 1     | completed | `Estado_manual` is "completado"             |
//! | 2     | undated   | no usable ETD, score tier decides           |
//! | 3     | overdue   | ETD before the evaluation date              |
//! | 4     | urgent    | ETD within the urgency window               |
//!
//! When none matches, the dated score tier decides.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;

use crate::config::Thresholds;
use crate::table::{Cell, ProjectRecord};

pub const ESTADO_COLUMN: &str = "Estado_manual";
pub const ETD_COLUMN: &str = "ETD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Status {
    Completed,
    HighNoEtd,
    ImportantNoEtd,
    ParkingNoEtd,
    Overdue,
    Urgent,
    Strategic,
    Important,
    Parking,
}

impl Status {
    pub const ALL: [Status; 9] = [
        Status::Completed,
        Status::HighNoEtd,
        Status::ImportantNoEtd,
        Status::ParkingNoEtd,
        Status::Overdue,
        Status::Urgent,
        Status::Strategic,
        Status::Important,
        Status::Parking,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Status::Completed => "✅ VERDE – Completado",
            Status::HighNoEtd => "🟢 VERDE – Alta prioridad (sin fecha ETD)",
            Status::ImportantNoEtd => "🟢 Verde media – Importante (sin fecha ETD)",
            Status::ParkingNoEtd => "⚪ Parking – Baja prioridad (sin fecha ETD)",
            Status::Overdue => "🔴 ROJO – Atrasado",
            Status::Urgent => "🟠 AMARILLO – Urgente (<30 días)",
            Status::Strategic => "🟢 VERDE – Prioridad estratégica",
            Status::Important => "🟢 Verde media – Importante",
            Status::Parking => "⚪ Parking – Baja prioridad",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    High,
    Medium,
    Low,
}

fn tier(score: f64, thresholds: &Thresholds) -> Tier {
    match score {
        s if s >= thresholds.high => Tier::High,
        s if s >= thresholds.medium => Tier::Medium,
        _ => Tier::Low,
    }
}

/// Everything the rules look at for one project.
#[derive(Debug, Clone, Copy)]
pub struct Facts {
    pub score: f64,
    pub completed: bool,
    pub etd: Option<NaiveDate>,
    pub today: NaiveDate,
}

impl Facts {
    pub fn from_record(record: &ProjectRecord<'_>, score: f64, today: NaiveDate) -> Self {
        Self {
            score,
            completed: record.get(ESTADO_COLUMN).is_some_and(is_completed),
            etd: record.get(ETD_COLUMN).and_then(resolve_etd),
            today,
        }
    }
}

type Rule = fn(&Facts, &Thresholds) -> Option<Status>;

const RULES: &[Rule] = &[completed, undated, overdue, urgent];

fn completed(facts: &Facts, _: &Thresholds) -> Option<Status> {
    facts.completed.then_some(Status::Completed)
}

fn undated(facts: &Facts, thresholds: &Thresholds) -> Option<Status> {
    if facts.etd.is_some() {
        return None;
    }
    Some(match tier(facts.score, thresholds) {
        Tier::High => Status::HighNoEtd,
        Tier::Medium => Status::ImportantNoEtd,
        Tier::Low => Status::ParkingNoEtd,
    })
}

fn overdue(facts: &Facts, _: &Thresholds) -> Option<Status> {
    facts
        .etd
        .filter(|etd| *etd < facts.today)
        .map(|_| Status::Overdue)
}

fn urgent(facts: &Facts, thresholds: &Thresholds) -> Option<Status> {
    facts
        .etd
        .filter(|etd| (*etd - facts.today).num_days() <= thresholds.urgency_window_days)
        .map(|_| Status::Urgent)
}

fn dated_tier(score: f64, thresholds: &Thresholds) -> Status {
    match tier(score, thresholds) {
        Tier::High => Status::Strategic,
        Tier::Medium => Status::Important,
        Tier::Low => Status::Parking,
    }
}

/// Runs the rule cascade. Total: every input gets exactly one status.
pub fn classify(facts: &Facts, thresholds: &Thresholds) -> Status {
    RULES
        .iter()
        .find_map(|rule| rule(facts, thresholds))
        .unwrap_or_else(|| dated_tier(facts.score, thresholds))
}

pub fn is_completed(cell: &Cell) -> bool {
    cell.as_text()
        .is_some_and(|s| s.trim().to_lowercase() == "completado")
}

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%d.%m.%Y",
    "%d %B %Y",
    "%B %d, %Y",
    "%B %d %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
];

/// `YYYYMMDD` with no separators.
fn parse_compact(s: &str) -> Option<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = s[..4].parse().ok()?;
    let month = s[4..6].parse().ok()?;
    let day = s[6..].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Reads a textual date, returning `None` when no known format matches.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    parse_compact(s)
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        })
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Effective ETD of a cell. Anything that is not a date or a parseable date
/// string means "no date".
pub fn resolve_etd(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Date(dt) => Some(dt.date()),
        Cell::Text(s) => parse_date(s),
        Cell::Number(_) | Cell::Bool(_) | Cell::Empty => None,
    }
}

//! Scoring policy: the weight table and the status thresholds.
//!
//! Defaults reproduce the board's standard policy. A JSON file can override
//! any subset of the values:
//! ```json
//! {
//!   "weights": { "impacto_ventas": 3.0 },
//!   "thresholds": { "urgency_window_days": 14 }
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// The six columns that feed the score, in weight-table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoringField {
    ImpactoVentas,
    TiempoImpl,
    Facilidad,
    AlineacionVision,
    Diferenciacion,
    RiesgoBajo,
}

impl ScoringField {
    pub const ALL: [ScoringField; 6] = [
        ScoringField::ImpactoVentas,
        ScoringField::TiempoImpl,
        ScoringField::Facilidad,
        ScoringField::AlineacionVision,
        ScoringField::Diferenciacion,
        ScoringField::RiesgoBajo,
    ];

    /// Column name as it appears in the workbook header.
    pub fn column(self) -> &'static str {
        match self {
            ScoringField::ImpactoVentas => "Impacto_ventas",
            ScoringField::TiempoImpl => "Tiempo_impl",
            ScoringField::Facilidad => "Facilidad",
            ScoringField::AlineacionVision => "Alineacion_vision",
            ScoringField::Diferenciacion => "Diferenciacion",
            ScoringField::RiesgoBajo => "Riesgo_bajo",
        }
    }
}

/// Per-field coefficients of the weighted sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub impacto_ventas: f64,
    pub tiempo_impl: f64,
    pub facilidad: f64,
    pub alineacion_vision: f64,
    pub diferenciacion: f64,
    pub riesgo_bajo: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            impacto_ventas: 2.0,
            tiempo_impl: 1.5,
            facilidad: 1.5,
            alineacion_vision: 2.0,
            diferenciacion: 1.0,
            riesgo_bajo: 1.0,
        }
    }
}

impl Weights {
    pub fn get(&self, field: ScoringField) -> f64 {
        match field {
            ScoringField::ImpactoVentas => self.impacto_ventas,
            ScoringField::TiempoImpl => self.tiempo_impl,
            ScoringField::Facilidad => self.facilidad,
            ScoringField::AlineacionVision => self.alineacion_vision,
            ScoringField::Diferenciacion => self.diferenciacion,
            ScoringField::RiesgoBajo => self.riesgo_bajo,
        }
    }

    /// Iterates over `(field, weight)` pairs in weight-table order.
    pub fn iter(&self) -> impl Iterator<Item = (ScoringField, f64)> + '_ {
        ScoringField::ALL.into_iter().map(|f| (f, self.get(f)))
    }
}

/// Score cut-offs and the ETD urgency window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Scores at or above this are top priority.
    pub high: f64,
    /// Scores at or above this (and below `high`) are important.
    pub medium: f64,
    /// ETDs this many days away or fewer are urgent.
    pub urgency_window_days: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high: 30.0,
            medium: 22.0,
            urgency_window_days: 30,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub weights: Weights,
    pub thresholds: Thresholds,
}

impl ScoringPolicy {
    /// Loads a policy from a JSON file at `path`. Missing keys keep their defaults.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read policy file '{path}'"))?;
        Self::from_json(&content).with_context(|| format!("invalid policy file '{path}'"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

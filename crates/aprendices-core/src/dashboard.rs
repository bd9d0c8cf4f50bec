//! Dashboard payload types.
//!
//! The backend answers `/api/data` with summary cards and a set of
//! distribution charts. Chart records arrive as `{ <LABEL>: string,
//! cantidad: number }` where the label field name depends on the chart, and
//! are normalized here into [`ChartPoint`]s.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Chart key for the distribution by training level.
pub const CHART_NIVEL: &str = "distribucion_nivel";
/// Chart key for the distribution by training modality.
pub const CHART_MODALIDAD: &str = "distribucion_modalidad";
/// Chart key for the distribution by training program.
pub const CHART_PROGRAMAS: &str = "distribucion_programas";

const COUNT_FIELD: &str = "cantidad";

/// Full dashboard response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardPayload {
    /// Summary metrics.
    pub cards: DashboardCards,
    /// Distribution charts keyed by chart name.
    #[serde(default)]
    pub charts: BTreeMap<String, Vec<ChartPoint>>,
}

impl DashboardPayload {
    /// Points for a chart, empty when the backend did not send it.
    #[must_use]
    pub fn chart(&self, key: &str) -> &[ChartPoint] {
        self.charts.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Distinct labels of the modality, program and level charts.
    #[must_use]
    pub fn filter_options(&self) -> FilterOptions {
        let labels = |key: &str| -> Vec<String> {
            self.chart(key)
                .iter()
                .map(|p| p.label.clone())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        };

        FilterOptions {
            modalidades: labels(CHART_MODALIDAD),
            programas: labels(CHART_PROGRAMAS),
            niveles: labels(CHART_NIVEL),
        }
    }
}

/// Summary metrics shown on the dashboard cards.
///
/// Metrics the backend omits read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardCards {
    /// Total trainees (female + male + non-binary).
    pub total_aprendices: u64,
    /// Active trainees.
    pub activos: u64,
    /// Female trainees.
    pub femeninos: u64,
    /// Male trainees.
    pub masculinos: u64,
    /// Non-binary trainees.
    pub no_binarios: u64,
    /// Total groups.
    pub total_grupos: u64,
    /// Groups with virtual modality.
    pub grupos_virtuales: u64,
    /// Groups with on-site modality.
    pub grupos_presenciales: u64,
}

impl DashboardCards {
    /// Metrics as `(name, value)` pairs, in display order.
    #[must_use]
    pub const fn metrics(&self) -> [(&'static str, u64); 8] {
        [
            ("total_aprendices", self.total_aprendices),
            ("activos", self.activos),
            ("femeninos", self.femeninos),
            ("masculinos", self.masculinos),
            ("no_binarios", self.no_binarios),
            ("total_grupos", self.total_grupos),
            ("grupos_virtuales", self.grupos_virtuales),
            ("grupos_presenciales", self.grupos_presenciales),
        ]
    }
}

/// One bar/slice of a distribution chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Map<String, serde_json::Value>")]
pub struct ChartPoint {
    /// Category label.
    pub label: String,
    /// Count for the category.
    pub value: u64,
}

impl TryFrom<serde_json::Map<String, serde_json::Value>> for ChartPoint {
    type Error = CoreError;

    fn try_from(record: serde_json::Map<String, serde_json::Value>) -> Result<Self, Self::Error> {
        // Already-normalized records round-trip as-is.
        if let (Some(label), Some(value)) = (
            record.get("label").and_then(serde_json::Value::as_str),
            record.get("value").and_then(serde_json::Value::as_u64),
        ) {
            return Ok(Self {
                label: label.to_string(),
                value,
            });
        }

        let value = record
            .get(COUNT_FIELD)
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| CoreError::InvalidChartRecord(format!("missing `{COUNT_FIELD}`")))?;

        let label = record
            .iter()
            .filter(|(key, _)| key.as_str() != COUNT_FIELD)
            .find_map(|(_, v)| v.as_str())
            .ok_or_else(|| CoreError::InvalidChartRecord("missing label field".to_string()))?;

        Ok(Self {
            label: label.to_string(),
            value,
        })
    }
}

/// Values available for each dashboard filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    /// Modalities present in the data.
    pub modalidades: Vec<String>,
    /// Programs present in the data.
    pub programas: Vec<String>,
    /// Levels present in the data.
    pub niveles: Vec<String>,
}

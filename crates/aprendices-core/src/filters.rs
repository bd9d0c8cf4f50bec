//! Dashboard filters and their query-string encoding.
//!
//! The backend accepts three optional filters on `/api/data`. Empty values
//! are never sent, and the keys always appear in the order `modalidad`,
//! `programa`, `nivel`.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// The filters understood by the dashboard endpoint, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    /// Training modality (e.g. `VIRTUAL`, `PRESENCIAL`).
    Modalidad,
    /// Training program name.
    Programa,
    /// Training level.
    Nivel,
}

impl FilterKey {
    /// All filter keys in the order they are appended to a query string.
    pub const ALL: [Self; 3] = [Self::Modalidad, Self::Programa, Self::Nivel];

    /// Query parameter name for this filter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Modalidad => "modalidad",
            Self::Programa => "programa",
            Self::Nivel => "nivel",
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of optional dashboard filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    /// Filter by training modality.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modalidad: Option<String>,
    /// Filter by training program name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub programa: Option<String>,
    /// Filter by training level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nivel: Option<String>,
}

impl FilterSet {
    /// Create an empty filter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the modality filter.
    #[must_use]
    pub fn with_modalidad(mut self, value: impl Into<String>) -> Self {
        self.modalidad = Some(value.into());
        self
    }

    /// Set the program filter.
    #[must_use]
    pub fn with_programa(mut self, value: impl Into<String>) -> Self {
        self.programa = Some(value.into());
        self
    }

    /// Set the level filter.
    #[must_use]
    pub fn with_nivel(mut self, value: impl Into<String>) -> Self {
        self.nivel = Some(value.into());
        self
    }

    /// Get the raw value stored for a filter, if any.
    #[must_use]
    pub fn get(&self, key: FilterKey) -> Option<&str> {
        match key {
            FilterKey::Modalidad => self.modalidad.as_deref(),
            FilterKey::Programa => self.programa.as_deref(),
            FilterKey::Nivel => self.nivel.as_deref(),
        }
    }

    /// The filters that will actually be sent, in wire order.
    pub fn active(&self) -> impl Iterator<Item = (FilterKey, &str)> + '_ {
        FilterKey::ALL
            .into_iter()
            .filter_map(|key| self.get(key).filter(|v| !v.is_empty()).map(|v| (key, v)))
    }

    /// Returns `true` if no filter would be sent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }

    /// Encode the active filters as an `application/x-www-form-urlencoded`
    /// query string (without the leading `?`).
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.active() {
            serializer.append_pair(key.as_str(), value);
        }
        serializer.finish()
    }

    /// Append the query string to `path`, leaving `path` untouched when no
    /// filter is active.
    #[must_use]
    pub fn apply_to(&self, path: &str) -> String {
        let query = self.to_query_string();
        if query.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{query}")
        }
    }
}

use crate::core::geo::GeoPoint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What a marker stands for on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Device,
    Metric,
    Command,
    #[default]
    Plain,
}

/// Live status of the device behind a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerStatus {
    Online,
    Offline,
    Error,
    Warning,
}

/// A point marker supplied by the data-binding layer.
///
/// The map never mutates markers; each render takes the current list as a
/// read-only snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: String,
    pub position: GeoPoint,
    #[serde(default)]
    pub kind: MarkerKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MarkerStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Marker {
    pub fn new(id: impl Into<String>, position: GeoPoint) -> Self {
        Self {
            id: id.into(),
            position,
            kind: MarkerKind::Plain,
            status: None,
            label: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_kind(mut self, kind: MarkerKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_status(mut self, status: MarkerStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Parses a JSON array of markers as produced by the binding layer
    pub fn list_from_json(json: &str) -> Result<Vec<Marker>, crate::MapError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let marker = Marker::new("pump-7", GeoPoint::new(48.1, 11.6))
            .with_kind(MarkerKind::Device)
            .with_status(MarkerStatus::Warning)
            .with_label("Pump 7")
            .with_metadata("firmware", "2.4.1");

        assert_eq!(marker.id, "pump-7");
        assert_eq!(marker.kind, MarkerKind::Device);
        assert_eq!(marker.status, Some(MarkerStatus::Warning));
        assert_eq!(marker.label.as_deref(), Some("Pump 7"));
        assert_eq!(marker.metadata.get("firmware").map(String::as_str), Some("2.4.1"));
    }

    #[test]
    fn test_list_from_json() {
        let markers = Marker::list_from_json(
            r#"[
                { "id": "a", "position": { "lat": 1.0, "lng": 2.0 }, "kind": "metric", "status": "online" },
                { "id": "b", "position": { "lat": -3.5, "lng": 100.25 }, "metadata": { "room": "B2" } }
            ]"#,
        )
        .unwrap();

        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].kind, MarkerKind::Metric);
        assert_eq!(markers[0].status, Some(MarkerStatus::Online));
        assert_eq!(markers[1].kind, MarkerKind::Plain);
        assert!(markers[1].status.is_none());
        assert_eq!(markers[1].metadata["room"], "B2");
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result = Marker::list_from_json(
            r#"[{ "id": "x", "position": { "lat": 0.0, "lng": 0.0 }, "kind": "satellite" }]"#,
        );
        assert!(result.is_err());
    }
}

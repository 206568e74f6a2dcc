use serde::{Deserialize, Serialize};

/// Identifier of a discovered location or region, as issued by the host.
pub type LocationId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub map_x: f64,
    pub map_y: f64,
    #[serde(default)]
    pub region_id: Option<String>,
    #[serde(default)]
    pub parent_location_id: Option<LocationId>,
    #[serde(default)]
    pub connections: Vec<LocationId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: String,
    pub name: String,
}

/// Parameters handed to the external find-location search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindLocationRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_id: Option<String>,
}

impl FindLocationRequest {
    /// Build a request from raw form input. Returns `None` when the name is blank.
    pub fn from_form(name: &str, region_id: &str) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let region_id = match region_id.trim() {
            "" => None,
            id => Some(id.to_string()),
        };
        Some(FindLocationRequest {
            name: name.to_string(),
            region_id,
        })
    }
}

pub fn find_location<'a>(locations: &'a [Location], id: &str) -> Option<&'a Location> {
    locations.iter().find(|l| l.id == id)
}

pub fn find_region<'a>(regions: &'a [Region], id: &str) -> Option<&'a Region> {
    regions.iter().find(|r| r.id == id)
}

#[cfg(test)]
pub(crate) fn location(id: &str, x: f64, y: f64, parent: Option<&str>) -> Location {
    Location {
        id: id.to_string(),
        name: id.to_uppercase(),
        description: String::new(),
        map_x: x,
        map_y: y,
        region_id: None,
        parent_location_id: parent.map(str::to_string),
        connections: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_deserializes_camel_case() {
        let json = r#"{"id":"harbor","name":"Harbor","mapX":120.5,"mapY":80.0,"regionId":"coast","parentLocationId":null,"connections":["market"]}"#;
        let loc: Location = serde_json::from_str(json).unwrap();
        assert_eq!(loc.id, "harbor");
        assert!((loc.map_x - 120.5).abs() < 1e-9);
        assert_eq!(loc.region_id.as_deref(), Some("coast"));
        assert!(loc.parent_location_id.is_none());
        assert_eq!(loc.connections, vec!["market"]);
        assert!(loc.description.is_empty());
    }

    #[test]
    fn test_location_optional_fields_default() {
        let json = r#"{"id":"cave","name":"Cave","mapX":1.0,"mapY":2.0}"#;
        let loc: Location = serde_json::from_str(json).unwrap();
        assert!(loc.region_id.is_none());
        assert!(loc.connections.is_empty());
    }

    #[test]
    fn test_find_location_missing_is_none() {
        let locations = vec![location("a", 0.0, 0.0, None)];
        assert!(find_location(&locations, "a").is_some());
        assert!(find_location(&locations, "zzz").is_none());
    }

    #[test]
    fn test_find_region() {
        let regions = vec![Region {
            id: "north".to_string(),
            name: "Northlands".to_string(),
        }];
        assert_eq!(find_region(&regions, "north").unwrap().name, "Northlands");
        assert!(find_region(&regions, "south").is_none());
    }

    #[test]
    fn test_find_request_rejects_blank_name() {
        assert!(FindLocationRequest::from_form("   ", "north").is_none());
    }

    #[test]
    fn test_find_request_trims_and_drops_empty_region() {
        let req = FindLocationRequest::from_form("  Old Mill ", " ").unwrap();
        assert_eq!(req.name, "Old Mill");
        assert!(req.region_id.is_none());
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("regionId").is_none());
    }
}

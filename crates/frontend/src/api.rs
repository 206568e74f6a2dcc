use atlas_shared::models::{FindLocationRequest, Location, LocationId, Region};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Build the variables JSON for an update-coordinates mutation.
pub fn build_update_coordinates_variables(id: &str, x: f64, y: f64) -> serde_json::Value {
    serde_json::json!({
        "input": {
            "id": id,
            "mapX": x,
            "mapY": y
        }
    })
}

/// Build the variables JSON for a find-location query.
pub fn build_find_location_variables(request: &FindLocationRequest) -> serde_json::Value {
    serde_json::json!({ "input": request })
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphQLRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

fn api_url() -> Result<String, String> {
    // Build-time override for deployments where the API lives elsewhere.
    if let Some(url) = option_env!("ATLAS_API_URL") {
        return Ok(url.to_string());
    }
    let window = web_sys::window().ok_or("No window available")?;
    let origin = window
        .location()
        .origin()
        .map_err(|_| "Unable to read window origin".to_string())?;
    Ok(format!("{}/graphql", origin))
}

async fn query<T: for<'de> Deserialize<'de>>(
    query_str: &str,
    variables: Option<serde_json::Value>,
) -> Result<T, String> {
    let req = GraphQLRequest {
        query: query_str.to_string(),
        variables,
    };

    let resp = reqwest::Client::new()
        .post(api_url()?)
        .json(&req)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let gql_resp: GraphQLResponse<T> = resp.json().await.map_err(|e| e.to_string())?;

    if let Some(errors) = gql_resp.errors {
        if !errors.is_empty() {
            return Err(errors[0].message.clone());
        }
    }

    gql_resp.data.ok_or_else(|| "No data returned".to_string())
}

const LOCATION_FIELDS: &str =
    "id name description mapX mapY regionId parentLocationId connections";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationsResponse {
    pub discovered_locations: Vec<Location>,
}

pub async fn fetch_locations() -> Result<Vec<Location>, String> {
    let resp: LocationsResponse = query(
        &format!("query {{ discoveredLocations {{ {LOCATION_FIELDS} }} }}"),
        None,
    )
    .await?;
    Ok(resp.discovered_locations)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionsResponse {
    pub discovered_regions: Vec<Region>,
}

pub async fn fetch_regions() -> Result<Vec<Region>, String> {
    let resp: RegionsResponse = query(r#"query { discoveredRegions { id name } }"#, None).await?;
    Ok(resp.discovered_regions)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentLocationResponse {
    pub current_location_id: Option<LocationId>,
}

pub async fn fetch_current_location_id() -> Result<Option<LocationId>, String> {
    let resp: CurrentLocationResponse = query(r#"query { currentLocationId }"#, None).await?;
    Ok(resp.current_location_id)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCoordinatesResponse {
    pub update_location_coordinates: bool,
}

/// Fire-and-forget coordinate update. Failures are logged and dropped.
pub fn update_location_coordinates_fire(id: LocationId, x: f64, y: f64) {
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = update_location_coordinates(&id, x, y).await {
            warn!(id = %id, error = %e, "coordinate update failed");
        }
    });
}

pub async fn update_location_coordinates(id: &str, x: f64, y: f64) -> Result<bool, String> {
    let resp: UpdateCoordinatesResponse = query(
        r#"mutation UpdateLocationCoordinates($input: LocationCoordinatesInput!) {
            updateLocationCoordinates(input: $input)
        }"#,
        Some(build_update_coordinates_variables(id, x, y)),
    )
    .await?;
    Ok(resp.update_location_coordinates)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindLocationResponse {
    pub find_location: Option<Location>,
}

pub async fn find_location(request: &FindLocationRequest) -> Result<Option<Location>, String> {
    let resp: FindLocationResponse = query(
        &format!(
            "query FindLocation($input: FindLocationInput!) {{ findLocation(input: $input) {{ {LOCATION_FIELDS} }} }}"
        ),
        Some(build_find_location_variables(request)),
    )
    .await?;
    Ok(resp.find_location)
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- GraphQL request serialization ---

    #[test]
    fn test_graphql_request_serializes_with_variables() {
        let req = GraphQLRequest {
            query: "query { discoveredRegions { id } }".to_string(),
            variables: Some(serde_json::json!({"first": 10})),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["query"], "query { discoveredRegions { id } }");
        assert_eq!(json["variables"]["first"], 10);
    }

    #[test]
    fn test_graphql_request_omits_null_variables() {
        let req = GraphQLRequest {
            query: "query { discoveredLocations { id } }".to_string(),
            variables: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("variables").is_none());
    }

    // --- Response deserialization ---

    #[test]
    fn test_locations_response_deserializes() {
        let json = r#"{"discoveredLocations":[{"id":"harbor","name":"Harbor","description":"Docks","mapX":10.0,"mapY":20.0,"regionId":"coast","parentLocationId":null,"connections":["market"]}]}"#;
        let resp: LocationsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.discovered_locations.len(), 1);
        let loc = &resp.discovered_locations[0];
        assert_eq!(loc.name, "Harbor");
        assert_eq!(loc.connections, vec!["market"]);
    }

    #[test]
    fn test_regions_response_deserializes() {
        let json = r#"{"discoveredRegions":[{"id":"coast","name":"Sunken Coast"}]}"#;
        let resp: RegionsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.discovered_regions[0].name, "Sunken Coast");
    }

    #[test]
    fn test_current_location_response_deserializes() {
        let resp: CurrentLocationResponse =
            serde_json::from_str(r#"{"currentLocationId":"harbor"}"#).unwrap();
        assert_eq!(resp.current_location_id.as_deref(), Some("harbor"));
        let resp: CurrentLocationResponse =
            serde_json::from_str(r#"{"currentLocationId":null}"#).unwrap();
        assert!(resp.current_location_id.is_none());
    }

    #[test]
    fn test_find_location_response_null() {
        let json = r#"{"findLocation":null}"#;
        let resp: FindLocationResponse = serde_json::from_str(json).unwrap();
        assert!(resp.find_location.is_none());
    }

    #[test]
    fn test_graphql_error_response() {
        let json = r#"{"data":null,"errors":[{"message":"Unknown location: mill"}]}"#;
        let resp: GraphQLResponse<UpdateCoordinatesResponse> = serde_json::from_str(json).unwrap();
        assert!(resp.data.is_none());
        assert_eq!(resp.errors.unwrap()[0].message, "Unknown location: mill");
    }

    // --- Variable builders ---

    #[test]
    fn test_build_update_coordinates_variables() {
        let vars = build_update_coordinates_variables("mill", 30.0, 42.5);
        assert_eq!(vars["input"]["id"], "mill");
        assert_eq!(vars["input"]["mapX"], 30.0);
        assert_eq!(vars["input"]["mapY"], 42.5);
    }

    #[test]
    fn test_build_find_location_variables() {
        let req = FindLocationRequest {
            name: "Old Mill".to_string(),
            region_id: Some("north".to_string()),
        };
        let vars = build_find_location_variables(&req);
        assert_eq!(vars["input"]["name"], "Old Mill");
        assert_eq!(vars["input"]["regionId"], "north");
    }

    #[test]
    fn test_build_find_location_variables_without_region() {
        let req = FindLocationRequest {
            name: "Old Mill".to_string(),
            region_id: None,
        };
        let vars = build_find_location_variables(&req);
        assert!(vars["input"].get("regionId").is_none());
    }
}

use geo::Point;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

#[derive(Serialize, Deserialize, Debug)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<AmenityElement>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Node,
    Way,
    Relation,
}

#[derive(thiserror::Error, Debug)]
pub enum ElementError {
    #[error("Element has no valid {0}")]
    Missing(&'static str),
}

/// An OSM object carrying an `amenity` tag, as returned by `out center`.
///
/// The object is kept exactly as received and serialises back to the same
/// fields in the same order. Only `type` and `id` are checked up front.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "Map<String, Value>")]
pub struct AmenityElement {
    element_type: ElementType,
    id: u64,
    raw: Map<String, Value>,
}

impl TryFrom<Map<String, Value>> for AmenityElement {
    type Error = ElementError;

    fn try_from(raw: Map<String, Value>) -> Result<Self, Self::Error> {
        let element_type = raw
            .get("type")
            .and_then(|t| ElementType::deserialize(t).ok())
            .ok_or(ElementError::Missing("type"))?;
        let id = raw
            .get("id")
            .and_then(Value::as_u64)
            .ok_or(ElementError::Missing("id"))?;

        Ok(AmenityElement {
            element_type,
            id,
            raw,
        })
    }
}

impl Serialize for AmenityElement {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.raw.serialize(serializer)
    }
}

impl AmenityElement {
    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.raw.get("tags")?.get(key)?.as_str()
    }

    pub fn amenity(&self) -> Option<&str> {
        self.tag("amenity")
    }

    /// The point routes are measured to.
    ///
    /// Ways only carry a center. Nodes carry their own coordinate; relations
    /// normally only have a center, which is used when they lack one.
    pub fn position(&self) -> Option<Point> {
        let own = coordinate(&self.raw);
        let center = self
            .raw
            .get("center")
            .and_then(Value::as_object)
            .and_then(coordinate);

        match self.element_type {
            ElementType::Way => center,
            ElementType::Node => own,
            ElementType::Relation => own.or(center),
        }
    }
}

fn coordinate(object: &Map<String, Value>) -> Option<Point> {
    let lat = object.get("lat")?.as_f64()?;
    let lon = object.get("lon")?.as_f64()?;
    Some(Point::new(lon, lat))
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    const RESPONSE: &str = r#"{
        "version": 0.6,
        "elements": [
            {"type": "node", "id": 1, "lat": 43.69, "lon": 7.19, "tags": {"amenity": "cafe", "name": "Chez Nous"}},
            {"type": "way", "id": 2, "center": {"lat": 43.70, "lon": 7.20}, "nodes": [5, 6, 7], "tags": {"amenity": "school"}},
            {"type": "relation", "id": 3, "center": {"lat": 43.71, "lon": 7.21}, "members": [], "tags": {"amenity": "hospital"}}
        ]
    }"#;

    #[test]
    fn test_parse_response() {
        let response: OverpassResponse = serde_json::from_str(RESPONSE).unwrap();

        assert_eq!(response.elements.len(), 3);
        assert_eq!(response.elements[0].element_type(), ElementType::Node);
        assert_eq!(response.elements[0].id(), 1);
        assert_eq!(response.elements[0].amenity(), Some("cafe"));
        assert_eq!(response.elements[0].tag("name"), Some("Chez Nous"));
        assert_eq!(response.elements[1].element_type(), ElementType::Way);
        assert_eq!(response.elements[2].element_type(), ElementType::Relation);
    }

    #[test]
    fn test_positions() {
        let response: OverpassResponse = serde_json::from_str(RESPONSE).unwrap();

        assert_eq!(response.elements[0].position(), Some(Point::new(7.19, 43.69)));
        assert_eq!(response.elements[1].position(), Some(Point::new(7.20, 43.70)));
        assert_eq!(response.elements[2].position(), Some(Point::new(7.21, 43.71)));
    }

    #[test]
    fn test_way_ignores_own_coordinate() {
        let json = r#"{"type": "way", "id": 9, "lat": 1.0, "lon": 2.0, "tags": {}}"#;
        let element: AmenityElement = serde_json::from_str(json).unwrap();
        assert_eq!(element.position(), None);
    }

    #[test]
    fn test_relation_prefers_own_coordinate() {
        let element: AmenityElement = serde_json::from_value(json!({
            "type": "relation", "id": 4, "lat": 1.0, "lon": 2.0,
            "center": {"lat": 3.0, "lon": 4.0}
        }))
        .unwrap();
        assert_eq!(element.position(), Some(Point::new(2.0, 1.0)));
    }

    #[test]
    fn test_missing_type_or_id_rejected() {
        let no_type = serde_json::from_value::<AmenityElement>(json!({"id": 1}));
        assert!(no_type.is_err());

        let bad_type = serde_json::from_value::<AmenityElement>(json!({"type": "area", "id": 1}));
        assert!(bad_type.is_err());

        let no_id = serde_json::from_value::<AmenityElement>(json!({"type": "node"}));
        assert!(no_id.is_err());
    }

    #[test]
    fn test_unknown_fields_survive() {
        let response: OverpassResponse = serde_json::from_str(RESPONSE).unwrap();
        let way = serde_json::to_value(&response.elements[1]).unwrap();

        assert_eq!(way["nodes"], json!([5, 6, 7]));
        assert_eq!(way["center"]["lat"], json!(43.70));
        assert!(way.get("lat").is_none());
    }

    #[test]
    fn test_written_back_verbatim() {
        let json = r#"{"type":"node","id":11,"tags":{"name":"Zinc","amenity":"bar","opening_hours":"Mo-Su 18:00-02:00"},"lon":7.19,"lat":43.69}"#;
        let element: AmenityElement = serde_json::from_str(json).unwrap();

        assert_eq!(serde_json::to_string(&element).unwrap(), json);
    }
}

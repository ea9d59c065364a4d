use serde::{Deserialize, Serialize};

/// One search hit. Nominatim encodes coordinates as strings.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Place {
    pub place_id: Option<u64>,
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
}

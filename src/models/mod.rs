use serde::{Deserialize, Deserializer, Serialize};

/// A single Mars real-estate listing as served by the listing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
    #[serde(rename = "img_src")]
    pub img_src_url: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub price: f64,
}

impl Property {
    /// Rentals are tagged `"rent"` by the server, everything else is for sale
    pub fn is_rental(&self) -> bool {
        self.property_type == "rent"
    }
}

/// The server sends ids as numeric strings; accept plain numbers too.
fn deserialize_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(n) => Ok(n),
        RawId::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid property id {:?}: {}", s, e))),
    }
}

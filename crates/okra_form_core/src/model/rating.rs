//! Rating domain model.
//!
//! A rating is a survey question shown after each task. The response type is
//! a key from the backend-supplied rating choice map, so it is kept as a plain
//! string here and validated at the editor boundary.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Stable identifier of a rating.
pub type RatingId = Uuid;

/// Response type assigned to newly added ratings.
pub const DEFAULT_RATING_TYPE: &str = "emoticon";

/// Post-task survey question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: RatingId,
    pub question: String,
    /// Serialized as `type` to match the backend schema.
    #[serde(rename = "type")]
    pub rating_type: String,
    /// Label for the low end of the scale.
    #[serde(default)]
    pub low_extreme: Option<String>,
    /// Label for the high end of the scale.
    #[serde(default)]
    pub high_extreme: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Rating {
    /// Creates an empty rating question with the default response type.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            question: String::new(),
            rating_type: DEFAULT_RATING_TYPE.to_string(),
            low_extreme: None,
            high_extreme: None,
            extra: Map::new(),
        }
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self::new()
    }
}

//! Rating editor.
//!
//! # Invariants
//! - `rating_type` only ever takes keys of the rating choice map it was
//!   opened with.

use crate::editor::EditorError;
use crate::model::rating::Rating;
use crate::options::ChoiceMap;

/// Edit session over a local copy of one rating.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingEditor {
    rating: Rating,
    rating_types: ChoiceMap,
}

impl RatingEditor {
    /// Starts an edit session from a rating snapshot and the offered types.
    pub fn new(snapshot: &Rating, rating_types: &ChoiceMap) -> Self {
        Self {
            rating: snapshot.clone(),
            rating_types: rating_types.clone(),
        }
    }

    pub fn set_question(&mut self, question: impl Into<String>) -> &Rating {
        self.rating.question = question.into();
        &self.rating
    }

    /// Selects a response type.
    ///
    /// # Errors
    /// - Returns `UnknownRatingType` when `key` is not an offered choice; the
    ///   local copy is left unchanged.
    pub fn set_type(&mut self, key: &str) -> Result<&Rating, EditorError> {
        if !self.rating_types.contains_key(key) {
            return Err(EditorError::UnknownRatingType(key.to_string()));
        }
        self.rating.rating_type = key.to_string();
        Ok(&self.rating)
    }

    pub fn set_low_extreme(&mut self, label: Option<String>) -> &Rating {
        self.rating.low_extreme = label;
        &self.rating
    }

    pub fn set_high_extreme(&mut self, label: Option<String>) -> &Rating {
        self.rating.high_extreme = label;
        &self.rating
    }

    /// Response types offered by this session.
    pub fn rating_types(&self) -> &ChoiceMap {
        &self.rating_types
    }

    pub fn rating(&self) -> &Rating {
        &self.rating
    }

    pub fn into_rating(self) -> Rating {
        self.rating
    }
}

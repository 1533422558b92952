//! Database row models
//!
//! Shapes of the rows handed to the store, after normalization has attached
//! ingestion-order numbering and resolved parent surrogate ids.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeRow {
    pub air_date: NaiveDate,
    pub season_number: i32,
    /// Position within the season's first-seen air date list, 1-based
    pub episode_number: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRow {
    pub name: String,
    pub round: i32,
    pub episode_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRow {
    pub clue_value: i32,
    pub comment: String,
    pub question: String,
    pub answer: String,
    pub category_id: i64,
}

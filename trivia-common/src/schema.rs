//! Field-schema validation for insert batches
//!
//! Every batch is checked against the store's declared column types
//! immediately before insertion: 16-bit signed range for round, episode
//! number, and clue value; 32-bit signed range for surrogate ids and season
//! number; an 80-character bound on category names. A failure aborts the
//! remaining steps for the current file.

use crate::db::models::{CategoryRow, EpisodeRow, QuestionRow};
use crate::{Error, Result};

/// Integer column width, matching the store's declared column types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntKind {
    /// 16-bit signed
    SmallInt,
    /// 32-bit signed
    Integer,
}

impl IntKind {
    fn bounds(self) -> (i64, i64) {
        match self {
            IntKind::SmallInt => (i64::from(i16::MIN), i64::from(i16::MAX)),
            IntKind::Integer => (i64::from(i32::MIN), i64::from(i32::MAX)),
        }
    }
}

/// Maximum category name length, in characters
pub const CATEGORY_NAME_MAX_LEN: usize = 80;

/// Check an integer field against its declared column width
pub fn check_int(field: &str, value: i64, kind: IntKind) -> Result<()> {
    let (min, max) = kind.bounds();
    if value < min || value > max {
        return Err(Error::Validation {
            field: field.to_string(),
            message: format!("{} outside range [{}, {}]", value, min, max),
        });
    }
    Ok(())
}

/// Check a string field against its declared length bound
pub fn check_varchar(field: &str, value: &str, max_len: usize) -> Result<()> {
    let len = value.chars().count();
    if len > max_len {
        return Err(Error::Validation {
            field: field.to_string(),
            message: format!("length {} exceeds bound {}", len, max_len),
        });
    }
    Ok(())
}

/// Validate an episode batch before insertion
pub fn validate_episodes(rows: &[EpisodeRow]) -> Result<()> {
    for row in rows {
        check_int(
            "episode.season_number",
            i64::from(row.season_number),
            IntKind::Integer,
        )?;
        check_int(
            "episode.episode_number",
            i64::from(row.episode_number),
            IntKind::SmallInt,
        )?;
    }
    Ok(())
}

/// Validate a category batch before insertion
pub fn validate_categories(rows: &[CategoryRow]) -> Result<()> {
    for row in rows {
        check_varchar("category.name", &row.name, CATEGORY_NAME_MAX_LEN)?;
        check_int("category.round", i64::from(row.round), IntKind::SmallInt)?;
        check_int("category.episode_id", row.episode_id, IntKind::Integer)?;
    }
    Ok(())
}

/// Validate a question batch before insertion
pub fn validate_questions(rows: &[QuestionRow]) -> Result<()> {
    for row in rows {
        check_int(
            "question.clue_value",
            i64::from(row.clue_value),
            IntKind::SmallInt,
        )?;
        check_int("question.category_id", row.category_id, IntKind::Integer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_round_exceeding_smallint_fails() {
        let rows = vec![CategoryRow {
            name: "HISTORY".to_string(),
            round: 40000,
            episode_id: 1,
        }];

        let err = validate_categories(&rows).unwrap_err();
        match err {
            Error::Validation { field, .. } => assert_eq!(field, "category.round"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_batches_pass() {
        let episodes = vec![EpisodeRow {
            air_date: date("2021-05-04"),
            season_number: 3,
            episode_number: 1,
        }];
        validate_episodes(&episodes).unwrap();

        let categories = vec![CategoryRow {
            name: "SPORTS".to_string(),
            round: 1,
            episode_id: 42,
        }];
        validate_categories(&categories).unwrap();

        let questions = vec![QuestionRow {
            clue_value: -2000,
            comment: String::new(),
            question: "What is a wager?".to_string(),
            answer: "a bet".to_string(),
            category_id: 7,
        }];
        validate_questions(&questions).unwrap();
    }

    #[test]
    fn test_category_name_length_bound() {
        let rows = vec![CategoryRow {
            name: "X".repeat(81),
            round: 1,
            episode_id: 1,
        }];

        let err = validate_categories(&rows).unwrap_err();
        match err {
            Error::Validation { field, .. } => assert_eq!(field, "category.name"),
            other => panic!("Expected Validation error, got {:?}", other),
        }

        // Exactly at the bound is accepted
        let rows = vec![CategoryRow {
            name: "X".repeat(80),
            round: 1,
            episode_id: 1,
        }];
        validate_categories(&rows).unwrap();
    }

    #[test]
    fn test_negative_clue_value_within_range() {
        // Wagered clues carry negative values; only the 16-bit bound applies
        let rows = vec![QuestionRow {
            clue_value: -32768,
            comment: String::new(),
            question: "q".to_string(),
            answer: "a".to_string(),
            category_id: 1,
        }];
        validate_questions(&rows).unwrap();

        let rows = vec![QuestionRow {
            clue_value: 32767,
            comment: String::new(),
            question: "q".to_string(),
            answer: "a".to_string(),
            category_id: 1,
        }];
        validate_questions(&rows).unwrap();
    }

    #[test]
    fn test_surrogate_id_integer_bound() {
        let rows = vec![CategoryRow {
            name: "SPORTS".to_string(),
            round: 1,
            episode_id: i64::from(i32::MAX) + 1,
        }];

        let err = validate_categories(&rows).unwrap_err();
        match err {
            Error::Validation { field, .. } => assert_eq!(field, "category.episode_id"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }
}

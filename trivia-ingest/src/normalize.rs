//! Deduplicating normalizer
//!
//! Folds one season's flat clue records into the episode → category →
//! question hierarchy the store expects. Identity is natural-key equality
//! only: episodes by air date, categories by (air date, round, name),
//! questions by exact content within their category. The first occurrence of
//! a key wins, exact repeats are dropped, and first-seen order is preserved
//! throughout — the position of an air date in the episode list later
//! becomes that episode's number.
//!
//! Grouping uses composite-key maps for membership alongside vectors for
//! order, so lookups stay O(1) at any season size.

use crate::parser::FlatRecord;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// One category as it will be inserted under an episode
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryEntry {
    pub round: i32,
    pub name: String,
}

/// Categories of a single episode, grouped by air date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup {
    pub air_date: NaiveDate,
    pub entries: Vec<CategoryEntry>,
}

/// One question as it will be inserted under a category
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuestionEntry {
    pub clue_value: i32,
    pub comment: String,
    pub question: String,
    pub answer: String,
}

/// Questions of a single category, grouped by (air date, round, name)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionGroup {
    pub air_date: NaiveDate,
    pub round: i32,
    pub category_name: String,
    pub entries: Vec<QuestionEntry>,
}

/// Collect the first occurrence of each distinct air date, in first-seen order
pub fn extract_episodes(records: &[FlatRecord]) -> Vec<NaiveDate> {
    let mut seen = HashSet::new();
    let mut air_dates = Vec::new();

    for record in records {
        if seen.insert(record.air_date) {
            air_dates.push(record.air_date);
        }
    }

    air_dates
}

/// Group distinct (round, name) categories under their air date
///
/// A category name may recur across dates or rounds; each scope keeps its
/// own entry. A later record that repeats a (round, name) pair already in
/// its scope is skipped.
pub fn extract_categories(records: &[FlatRecord]) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();
    let mut group_index: HashMap<NaiveDate, usize> = HashMap::new();
    let mut seen: HashSet<(NaiveDate, i32, String)> = HashSet::new();

    for record in records {
        let key = (record.air_date, record.round, record.category.clone());
        if !seen.insert(key) {
            debug!(
                air_date = %record.air_date,
                round = record.round,
                category = %record.category,
                "Skipping repeated category"
            );
            continue;
        }

        let index = *group_index.entry(record.air_date).or_insert_with(|| {
            groups.push(CategoryGroup {
                air_date: record.air_date,
                entries: Vec::new(),
            });
            groups.len() - 1
        });
        groups[index].entries.push(CategoryEntry {
            round: record.round,
            name: record.category.clone(),
        });
    }

    groups
}

/// Group content-distinct questions under their (air date, round, name) scope
///
/// A record whose (clue_value, comment, question, answer) exactly matches an
/// entry already in its scope is dropped; a record that shares the scope but
/// differs in any field is kept as an additional entry.
pub fn extract_questions(records: &[FlatRecord]) -> Vec<QuestionGroup> {
    let mut groups: Vec<QuestionGroup> = Vec::new();
    let mut group_index: HashMap<(NaiveDate, i32, String), usize> = HashMap::new();
    let mut seen: HashSet<(NaiveDate, i32, String, QuestionEntry)> = HashSet::new();

    for record in records {
        let entry = QuestionEntry {
            clue_value: record.clue_value,
            comment: record.comments.clone(),
            question: record.question.clone(),
            answer: record.answer.clone(),
        };

        let member_key = (
            record.air_date,
            record.round,
            record.category.clone(),
            entry.clone(),
        );
        if !seen.insert(member_key) {
            debug!(
                air_date = %record.air_date,
                category = %record.category,
                answer = %record.answer,
                "Skipping duplicate question"
            );
            continue;
        }

        let key = (record.air_date, record.round, record.category.clone());
        let index = *group_index.entry(key).or_insert_with(|| {
            groups.push(QuestionGroup {
                air_date: record.air_date,
                round: record.round,
                category_name: record.category.clone(),
                entries: Vec::new(),
            });
            groups.len() - 1
        });
        groups[index].entries.push(entry);
    }

    groups
}

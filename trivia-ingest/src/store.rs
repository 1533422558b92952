//! Persistence store
//!
//! Owns the connection pool and the per-run natural-key → surrogate-id
//! caches. Surrogate ids are assigned by the store at insert time; each
//! cache fills on first lookup and is never invalidated during a run, which
//! is sound only because natural keys are immutable once inserted.
//! Re-running the loader against a non-purged store is unsupported: repeated
//! episode inserts trip the air date uniqueness constraint.

use crate::normalize::{CategoryEntry, QuestionGroup};
use chrono::NaiveDate;
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::{debug, info};
use trivia_common::db::models::{CategoryRow, EpisodeRow, QuestionRow};
use trivia_common::{schema, Error, Result};

pub struct Store {
    db: SqlitePool,
    episode_ids: HashMap<NaiveDate, i64>,
    category_ids: HashMap<(NaiveDate, i32, String), i64>,
}

impl Store {
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            episode_ids: HashMap::new(),
            category_ids: HashMap::new(),
        }
    }

    /// Insert one season's episodes, numbering them by list position
    ///
    /// The batch is validated immediately before insertion; episode numbers
    /// are positions in the first-seen air date list, 1-based.
    pub async fn insert_episodes(
        &mut self,
        season_number: i32,
        air_dates: &[NaiveDate],
    ) -> Result<()> {
        let rows: Vec<EpisodeRow> = air_dates
            .iter()
            .enumerate()
            .map(|(index, air_date)| EpisodeRow {
                air_date: *air_date,
                season_number,
                episode_number: index as i32 + 1,
            })
            .collect();

        schema::validate_episodes(&rows)?;

        debug!(count = rows.len(), season = season_number, "Inserting episodes");
        for row in &rows {
            sqlx::query(
                "INSERT INTO episodes (air_date, season_number, episode_number) VALUES (?, ?, ?)",
            )
            .bind(row.air_date)
            .bind(row.season_number)
            .bind(row.episode_number)
            .execute(&self.db)
            .await?;
        }

        Ok(())
    }

    /// Insert one episode's categories, resolving the parent episode id
    pub async fn insert_categories(
        &mut self,
        air_date: NaiveDate,
        entries: &[CategoryEntry],
    ) -> Result<()> {
        let episode_id = self.resolve_episode(air_date).await?;

        let rows: Vec<CategoryRow> = entries
            .iter()
            .map(|entry| CategoryRow {
                name: entry.name.clone(),
                round: entry.round,
                episode_id,
            })
            .collect();

        schema::validate_categories(&rows)?;

        debug!(count = rows.len(), air_date = %air_date, "Inserting categories");
        for row in &rows {
            sqlx::query("INSERT INTO categories (name, round, episode_id) VALUES (?, ?, ?)")
                .bind(&row.name)
                .bind(row.round)
                .bind(row.episode_id)
                .execute(&self.db)
                .await?;
        }

        Ok(())
    }

    /// Insert question batches, one batch per category scope
    pub async fn insert_questions(&mut self, groups: &[QuestionGroup]) -> Result<()> {
        for group in groups {
            let category_id = self
                .resolve_category(group.air_date, group.round, &group.category_name)
                .await?;

            let rows: Vec<QuestionRow> = group
                .entries
                .iter()
                .map(|entry| QuestionRow {
                    clue_value: entry.clue_value,
                    comment: entry.comment.clone(),
                    question: entry.question.clone(),
                    answer: entry.answer.clone(),
                    category_id,
                })
                .collect();

            schema::validate_questions(&rows)?;

            debug!(
                count = rows.len(),
                category = %group.category_name,
                "Inserting questions"
            );
            for row in &rows {
                sqlx::query(
                    "INSERT INTO questions (clue_value, comment, question, answer, category_id) \
                     VALUES (?, ?, ?, ?, ?)",
                )
                .bind(row.clue_value)
                .bind(&row.comment)
                .bind(&row.question)
                .bind(&row.answer)
                .bind(row.category_id)
                .execute(&self.db)
                .await?;
            }
        }

        Ok(())
    }

    /// Resolve an episode's surrogate id from its air date (memoized)
    ///
    /// Repeated calls for the same air date return the cached id without
    /// re-querying. Zero or multiple matches mean normalization produced a
    /// reference with no single persisted row — an ordering invariant
    /// violation, not a data error.
    pub async fn resolve_episode(&mut self, air_date: NaiveDate) -> Result<i64> {
        if let Some(id) = self.episode_ids.get(&air_date) {
            return Ok(*id);
        }

        debug!(air_date = %air_date, "Resolving episode id");
        let ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM episodes WHERE air_date = ?")
            .bind(air_date)
            .fetch_all(&self.db)
            .await?;

        let id = match ids.as_slice() {
            [] => {
                return Err(Error::Lookup(format!(
                    "No episode with air date {}",
                    air_date
                )))
            }
            [id] => *id,
            more => {
                return Err(Error::Lookup(format!(
                    "{} episodes share air date {}",
                    more.len(),
                    air_date
                )))
            }
        };

        self.episode_ids.insert(air_date, id);
        Ok(id)
    }

    /// Resolve a category's surrogate id from its natural key (memoized)
    pub async fn resolve_category(
        &mut self,
        air_date: NaiveDate,
        round: i32,
        name: &str,
    ) -> Result<i64> {
        let key = (air_date, round, name.to_string());
        if let Some(id) = self.category_ids.get(&key) {
            return Ok(*id);
        }

        let episode_id = self.resolve_episode(air_date).await?;

        debug!(air_date = %air_date, round, name, "Resolving category id");
        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT id FROM categories WHERE episode_id = ? AND round = ? AND name = ?",
        )
        .bind(episode_id)
        .bind(round)
        .bind(name)
        .fetch_all(&self.db)
        .await?;

        let id = match ids.as_slice() {
            [] => {
                return Err(Error::Lookup(format!(
                    "No category '{}' in round {} on {}",
                    name, round, air_date
                )))
            }
            [id] => *id,
            more => {
                return Err(Error::Lookup(format!(
                    "{} categories named '{}' in round {} on {}",
                    more.len(),
                    name,
                    round,
                    air_date
                )))
            }
        };

        self.category_ids.insert(key, id);
        Ok(id)
    }

    /// Delete every loaded row, children first, and drop the id caches
    pub async fn purge(&mut self) -> Result<()> {
        info!("Purging all rows");
        sqlx::query("DELETE FROM questions").execute(&self.db).await?;
        sqlx::query("DELETE FROM categories").execute(&self.db).await?;
        sqlx::query("DELETE FROM episodes").execute(&self.db).await?;

        self.episode_ids.clear();
        self.category_ids.clear();

        Ok(())
    }
}

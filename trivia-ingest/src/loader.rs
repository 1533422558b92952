//! Season loader orchestration
//!
//! Drives parse → extract → insert for each season file, strictly in
//! sequence, and walks season files numbered from 1 until the first gap.

use crate::normalize::{extract_categories, extract_episodes, extract_questions};
use crate::parser::parse_file;
use crate::store::Store;
use std::path::Path;
use tracing::{debug, info};
use trivia_common::Result;

pub struct SeasonLoader {
    store: Store,
}

impl SeasonLoader {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Load `season<N>.tsv` files numbered from 1 until the first missing N
    ///
    /// A missing number means "no more seasons", not an error. Returns the
    /// count of seasons loaded.
    pub async fn load_seasons(&mut self, data_dir: &Path) -> Result<u32> {
        let mut season_number: i32 = 1;
        loop {
            let file_path = data_dir.join(format!("season{}.tsv", season_number));
            if !file_path.is_file() {
                break;
            }
            info!(season = season_number, file = %file_path.display(), "Loading season");
            self.load_season(season_number, &file_path).await?;
            season_number += 1;
        }

        let loaded = (season_number - 1) as u32;
        info!(seasons = loaded, "No more season files");
        Ok(loaded)
    }

    /// Load one season file through the full pipeline
    ///
    /// The first failing step aborts the file with completed steps left in
    /// place; there is no rollback across steps.
    pub async fn load_season(&mut self, season_number: i32, path: &Path) -> Result<()> {
        let records = parse_file(path)?;
        debug!(rows = records.len(), "Parsed season file");

        let episodes = extract_episodes(&records);
        debug!(count = episodes.len(), "Extracted episodes");
        self.store.insert_episodes(season_number, &episodes).await?;

        let category_groups = extract_categories(&records);
        debug!(groups = category_groups.len(), "Extracted categories");
        for group in &category_groups {
            self.store
                .insert_categories(group.air_date, &group.entries)
                .await?;
        }

        let question_groups = extract_questions(&records);
        debug!(groups = question_groups.len(), "Extracted questions");
        self.store.insert_questions(&question_groups).await?;

        Ok(())
    }
}

//! Game degenerate dimension.
//!
//! A game is identified by (name, platform key, genre key, publisher key).
//! The first row seen for a key fixes its release year, success category and
//! multi-region flag; later rows with the same key reuse it unchanged.
use std::collections::HashMap;

use rusqlite::{params, Connection, OptionalExtension};

use crate::dataset::PreparedRecord;
use crate::error::EtlResult;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameKey {
    pub name: String,
    pub platform_id: i64,
    pub genre_id: i64,
    pub publisher_id: i64,
}

#[derive(Debug, Default)]
pub struct GameCatalog {
    ids: HashMap<GameKey, i64>,
    created: usize,
}

impl GameCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Existing key for `key`, or a new game row built from `first_seen`.
    pub fn resolve(
        &mut self,
        conn: &Connection,
        key: GameKey,
        first_seen: &PreparedRecord,
    ) -> EtlResult<i64> {
        if let Some(id) = self.ids.get(&key) {
            return Ok(*id);
        }

        let stored: Option<i64> = conn
            .prepare_cached(
                "SELECT game_id FROM game_dim \
                 WHERE game_name = ?1 AND platform_id = ?2 AND genre_id = ?3 AND publisher_id = ?4 \
                 ORDER BY game_id LIMIT 1",
            )?
            .query_row(
                params![key.name, key.platform_id, key.genre_id, key.publisher_id],
                |row| row.get(0),
            )
            .optional()?;

        let id = match stored {
            Some(id) => id,
            None => {
                conn.prepare_cached(
                    "INSERT INTO game_dim (game_name, platform_id, genre_id, publisher_id, \
                     release_year, success_category, multi_region_success) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                )?
                .execute(params![
                    key.name,
                    key.platform_id,
                    key.genre_id,
                    key.publisher_id,
                    first_seen.year,
                    first_seen.success_category.label(),
                    first_seen.multi_region_success,
                ])?;
                self.created += 1;
                conn.last_insert_rowid()
            }
        };
        self.ids.insert(key, id);
        Ok(id)
    }

    /// Distinct games resolved so far.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Games inserted by this catalog (as opposed to found in the store).
    pub fn created(&self) -> usize {
        self.created
    }
}

//! `SQLite` implementation of [`ScheduleStore`].
//!
//! Overrides live in `mode_overrides`, one row per date. Phase tables live
//! in `phase_slots`, one row per mode and hour with `NULL` for unset slots,
//! so a table with no phase at all still round-trips.

use std::collections::BTreeMap;
use std::future::Future;

use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use planner_app::ports::ScheduleStore;
use planner_domain::error::PlannerError;
use planner_domain::schedule::{PhaseTable, ScheduleConfig};
use planner_domain::time::{Hour, date_key, parse_date_key};

use crate::error::StorageError;

struct OverrideRow(NaiveDate, String);

impl<'r> FromRow<'r, SqliteRow> for OverrideRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let date: String = row.try_get("date")?;
        let mode: String = row.try_get("mode")?;
        let date = parse_date_key(&date).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        Ok(Self(date, mode))
    }
}

struct SlotRow {
    mode: String,
    hour: Hour,
    phase: Option<String>,
}

impl<'r> FromRow<'r, SqliteRow> for SlotRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let mode: String = row.try_get("mode")?;
        let hour: i64 = row.try_get("hour")?;
        let phase: Option<String> = row.try_get("phase")?;

        let hour = u32::try_from(hour)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))
            .and_then(|hour| Hour::new(hour).map_err(|err| sqlx::Error::Decode(Box::new(err))))?;

        Ok(Self { mode, hour, phase })
    }
}

const SELECT_OVERRIDES: &str = "SELECT date, mode FROM mode_overrides ORDER BY date";
const SELECT_SLOTS: &str = "SELECT mode, hour, phase FROM phase_slots ORDER BY mode, hour";
const DELETE_OVERRIDES: &str = "DELETE FROM mode_overrides";
const DELETE_SLOTS: &str = "DELETE FROM phase_slots";
const INSERT_OVERRIDE: &str = "INSERT INTO mode_overrides (date, mode) VALUES (?, ?)";
const INSERT_SLOT: &str = "INSERT INTO phase_slots (mode, hour, phase) VALUES (?, ?, ?)";

/// `SQLite`-backed schedule store.
pub struct SqliteScheduleStore {
    pool: SqlitePool,
}

impl SqliteScheduleStore {
    /// Create a new store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ScheduleStore for SqliteScheduleStore {
    fn get(&self) -> impl Future<Output = Result<ScheduleConfig, PlannerError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut tx = pool.begin().await.map_err(StorageError::from)?;

            let overrides: Vec<OverrideRow> = sqlx::query_as(SELECT_OVERRIDES)
                .fetch_all(&mut *tx)
                .await
                .map_err(StorageError::from)?;
            let slots: Vec<SlotRow> = sqlx::query_as(SELECT_SLOTS)
                .fetch_all(&mut *tx)
                .await
                .map_err(StorageError::from)?;

            tx.commit().await.map_err(StorageError::from)?;

            let mut grouped: BTreeMap<String, Vec<(Hour, Option<String>)>> = BTreeMap::new();
            for slot in slots {
                grouped
                    .entry(slot.mode)
                    .or_default()
                    .push((slot.hour, slot.phase));
            }

            Ok(ScheduleConfig {
                mode_overrides: overrides.into_iter().map(|row| (row.0, row.1)).collect(),
                phase_tables: grouped
                    .into_iter()
                    .map(|(mode, slots)| (mode, PhaseTable::from_stored(slots)))
                    .collect(),
            })
        }
    }

    fn put(&self, config: ScheduleConfig) -> impl Future<Output = Result<(), PlannerError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut tx = pool.begin().await.map_err(StorageError::from)?;

            sqlx::query(DELETE_OVERRIDES)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
            sqlx::query(DELETE_SLOTS)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;

            for (date, mode) in &config.mode_overrides {
                sqlx::query(INSERT_OVERRIDE)
                    .bind(date_key(*date))
                    .bind(mode)
                    .execute(&mut *tx)
                    .await
                    .map_err(StorageError::from)?;
            }

            for (mode, table) in &config.phase_tables {
                for (hour, phase) in table.iter() {
                    sqlx::query(INSERT_SLOT)
                        .bind(mode)
                        .bind(i64::from(hour.value()))
                        .bind(phase)
                        .execute(&mut *tx)
                        .await
                        .map_err(StorageError::from)?;
                }
            }

            tx.commit().await.map_err(StorageError::from)?;
            tracing::debug!(
                overrides = config.mode_overrides.len(),
                tables = config.phase_tables.len(),
                "schedule written"
            );
            Ok(())
        }
    }
}

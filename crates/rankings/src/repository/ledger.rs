use chrono::NaiveDateTime;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{RankingError, Result};
use crate::models::{EntryKind, NewRankStatEntry, RankStatEntry, StatLine};

const ENTRY_COLUMNS: &str = "entry_id, definition_id, user_id, session_id, match_id, kind, \
    deltas, recorded_by, note, correction_of_entry_id, created_at";

#[derive(FromRow)]
struct EntryRow {
    entry_id: Uuid,
    definition_id: Uuid,
    user_id: Uuid,
    session_id: Option<Uuid>,
    match_id: Option<Uuid>,
    kind: String,
    deltas: Json<StatLine>,
    recorded_by: Uuid,
    note: Option<String>,
    correction_of_entry_id: Option<Uuid>,
    created_at: NaiveDateTime,
}

impl TryFrom<EntryRow> for RankStatEntry {
    type Error = RankingError;

    fn try_from(row: EntryRow) -> Result<Self> {
        let kind = row
            .kind
            .parse::<EntryKind>()
            .map_err(|e| RankingError::Database(sqlx::Error::Decode(e.into())))?;

        Ok(Self {
            entry_id: row.entry_id,
            definition_id: row.definition_id,
            user_id: row.user_id,
            session_id: row.session_id,
            match_id: row.match_id,
            kind,
            deltas: row.deltas.0,
            recorded_by: row.recorded_by,
            note: row.note,
            correction_of_entry_id: row.correction_of_entry_id,
            created_at: row.created_at,
        })
    }
}

/// Read side of the append-only stat ledger.
pub struct LedgerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LedgerRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, entry_id: Uuid) -> Result<RankStatEntry> {
        let row = sqlx::query_as::<_, EntryRow>(&format!(
            "SELECT {} FROM rank_stat_entries WHERE entry_id = $1",
            ENTRY_COLUMNS
        ))
        .bind(entry_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RankingError::NotFound)?;

        row.try_into()
    }

    pub async fn list_for_match(&self, match_id: Uuid) -> Result<Vec<RankStatEntry>> {
        let rows = sqlx::query_as::<_, EntryRow>(&format!(
            "SELECT {} FROM rank_stat_entries WHERE match_id = $1 ORDER BY seq",
            ENTRY_COLUMNS
        ))
        .bind(match_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(RankStatEntry::try_from).collect()
    }

    /// Oldest first.
    pub async fn list_for_member(
        &self,
        definition_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<RankStatEntry>> {
        let rows = sqlx::query_as::<_, EntryRow>(&format!(
            "SELECT {} FROM rank_stat_entries WHERE definition_id = $1 AND user_id = $2 ORDER BY seq",
            ENTRY_COLUMNS
        ))
        .bind(definition_id)
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(RankStatEntry::try_from).collect()
    }
}

/// Appends one entry. The partial unique indexes reject a second session
/// entry for a member and a second reversal of an entry at insert time.
pub(crate) async fn insert_entry(
    tx: &mut Transaction<'_, Postgres>,
    entry: &NewRankStatEntry,
) -> Result<RankStatEntry> {
    let row = sqlx::query_as::<_, EntryRow>(&format!(
        r#"
        INSERT INTO rank_stat_entries (
            entry_id, definition_id, user_id, session_id, match_id, kind,
            deltas, recorded_by, note, correction_of_entry_id
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {}
        "#,
        ENTRY_COLUMNS
    ))
    .bind(entry.entry_id)
    .bind(entry.definition_id)
    .bind(entry.user_id)
    .bind(entry.session_id)
    .bind(entry.match_id)
    .bind(entry.kind.as_str())
    .bind(Json(&entry.deltas))
    .bind(entry.recorded_by)
    .bind(&entry.note)
    .bind(entry.correction_of_entry_id)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| unique_guard_error(e, entry))?;

    row.try_into()
}

fn unique_guard_error(error: sqlx::Error, entry: &NewRankStatEntry) -> RankingError {
    if let sqlx::Error::Database(ref db_err) = error {
        match (db_err.code().as_deref(), db_err.constraint()) {
            (Some("23505"), Some("rank_stat_entries_session_once")) => {
                if let Some(session_id) = entry.session_id {
                    return RankingError::AlreadyRecorded {
                        user_id: entry.user_id,
                        session_id,
                    };
                }
            }
            (Some("23505"), Some("rank_stat_entries_reversed_once")) => {
                if let Some(original) = entry.correction_of_entry_id {
                    return RankingError::AlreadyCorrected(original);
                }
            }
            (Some("23503"), _) => return RankingError::NotFound,
            _ => {}
        }
    }
    RankingError::from(error)
}

use chrono::NaiveDateTime;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domains::Winner;
use crate::error::{RankingError, Result};
use crate::models::{MatchRecord, NewMatchRecord, StatSnapshot};

const MATCH_COLUMNS: &str = "match_id, definition_id, session_id, format, team1, team2, score, \
    winner, stats_snapshot, recorded_by, note, correction_of_match_id, created_at";

#[derive(FromRow)]
struct MatchRecordRow {
    match_id: Uuid,
    definition_id: Uuid,
    session_id: Option<Uuid>,
    format: String,
    team1: Vec<Uuid>,
    team2: Vec<Uuid>,
    score: Json<Value>,
    winner: String,
    stats_snapshot: Json<StatSnapshot>,
    recorded_by: Uuid,
    note: Option<String>,
    correction_of_match_id: Option<Uuid>,
    created_at: NaiveDateTime,
}

impl TryFrom<MatchRecordRow> for MatchRecord {
    type Error = RankingError;

    fn try_from(row: MatchRecordRow) -> Result<Self> {
        let winner = row
            .winner
            .parse::<Winner>()
            .map_err(|e| RankingError::Database(sqlx::Error::Decode(e.into())))?;

        Ok(Self {
            match_id: row.match_id,
            definition_id: row.definition_id,
            session_id: row.session_id,
            format: row.format,
            team1: row.team1,
            team2: row.team2,
            score: row.score.0,
            winner,
            stats_snapshot: row.stats_snapshot.0,
            recorded_by: row.recorded_by,
            note: row.note,
            correction_of_match_id: row.correction_of_match_id,
            created_at: row.created_at,
        })
    }
}

pub struct MatchRecordRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MatchRecordRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, match_id: Uuid) -> Result<MatchRecord> {
        let row = sqlx::query_as::<_, MatchRecordRow>(&format!(
            "SELECT {} FROM match_records WHERE match_id = $1",
            MATCH_COLUMNS
        ))
        .bind(match_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RankingError::NotFound)?;

        row.try_into()
    }

    /// Newest first.
    pub async fn list_for_definition(&self, definition_id: Uuid) -> Result<Vec<MatchRecord>> {
        let rows = sqlx::query_as::<_, MatchRecordRow>(&format!(
            "SELECT {} FROM match_records WHERE definition_id = $1 ORDER BY seq DESC",
            MATCH_COLUMNS
        ))
        .bind(definition_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(MatchRecord::try_from).collect()
    }
}

/// Appends a match record. A second correction of the same match fails with
/// `AlreadyCorrected`.
pub(crate) async fn insert_match(
    tx: &mut Transaction<'_, Postgres>,
    record: &NewMatchRecord,
) -> Result<MatchRecord> {
    let row = sqlx::query_as::<_, MatchRecordRow>(&format!(
        r#"
        INSERT INTO match_records (
            match_id, definition_id, session_id, format, team1, team2, score,
            winner, stats_snapshot, recorded_by, note, correction_of_match_id
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING {}
        "#,
        MATCH_COLUMNS
    ))
    .bind(record.match_id)
    .bind(record.definition_id)
    .bind(record.session_id)
    .bind(&record.format)
    .bind(&record.team1)
    .bind(&record.team2)
    .bind(Json(&record.score))
    .bind(record.winner.as_str())
    .bind(Json(&record.stats_snapshot))
    .bind(record.recorded_by)
    .bind(&record.note)
    .bind(record.correction_of_match_id)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            match (db_err.code().as_deref(), db_err.constraint()) {
                (Some("23505"), Some("match_records_correction_once")) => {
                    if let Some(original) = record.correction_of_match_id {
                        return RankingError::AlreadyCorrected(original);
                    }
                }
                (Some("23503"), _) => return RankingError::NotFound,
                _ => {}
            }
        }
        RankingError::from(e)
    })?;

    row.try_into()
}

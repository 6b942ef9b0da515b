//! SQLite-backed profile store
//!
//! Maps one `ProgressionSnapshot` to one row in `profiles`. Placement
//! scores travel as a JSON array in a text column; the phase flag plus
//! tier and LP columns carry the ranked side.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::params;

use super::{ProfileStore, TrackerDb};
use crate::domain::{
    PlacementRecord, ProgressionPhase, ProgressionSnapshot, RankState, RankTier,
};

#[derive(Clone)]
pub struct SqliteProfileStore {
    db: TrackerDb,
}

impl SqliteProfileStore {
    pub fn new(db: TrackerDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileStore for SqliteProfileStore {
    async fn load(&self, user_id: &str) -> Result<Option<ProgressionSnapshot>> {
        let conn = self.db.conn();
        let row = conn.query_row(
            "SELECT total_xp, in_placements, placement_scores, tier_index, lp
             FROM profiles WHERE user_id = ?1",
            [user_id],
            |row| {
                Ok((
                    row.get::<_, u64>(0)?,
                    row.get::<_, bool>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            },
        );
        let (total_xp, in_placements, scores_json, tier_index, lp) = match row {
            Ok(columns) => columns,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e).context("Failed to load profile row"),
        };

        let scores: Vec<u32> =
            serde_json::from_str(&scores_json).context("Corrupt placement_scores column")?;
        let placements = PlacementRecord::from_scores(scores);

        let phase = if in_placements {
            ProgressionPhase::Placement(placements)
        } else {
            let tier = u8::try_from(tier_index)
                .ok()
                .filter(|t| RankTier::get(*t).is_some())
                .with_context(|| format!("Invalid tier index {tier_index} in profile row"))?;
            let lp = u32::try_from(lp)
                .with_context(|| format!("Invalid lp {lp} in profile row"))?;
            ProgressionPhase::Ranked {
                placements,
                rank: RankState { tier, lp },
            }
        };

        Ok(Some(ProgressionSnapshot { total_xp, phase }))
    }

    async fn save(&self, user_id: &str, snapshot: &ProgressionSnapshot) -> Result<()> {
        let scores_json = serde_json::to_string(snapshot.placement().scores())
            .context("Failed to serialize placement scores")?;
        let (in_placements, tier_index, lp) = match snapshot.rank() {
            Some(rank) => (false, i64::from(rank.tier), i64::from(rank.lp)),
            None => (true, 0, 0),
        };

        let conn = self.db.conn();
        conn.execute(
            r#"
            INSERT INTO profiles (user_id, total_xp, in_placements, placement_scores, tier_index, lp, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(user_id) DO UPDATE SET
                total_xp = excluded.total_xp,
                in_placements = excluded.in_placements,
                placement_scores = excluded.placement_scores,
                tier_index = excluded.tier_index,
                lp = excluded.lp,
                updated_at = excluded.updated_at
            "#,
            params![
                user_id,
                snapshot.total_xp,
                in_placements,
                scores_json,
                tier_index,
                lp,
                Utc::now().timestamp_millis(),
            ],
        )
        .context("Failed to save profile row")?;
        Ok(())
    }
}

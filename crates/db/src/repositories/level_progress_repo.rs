//! Repository for the `user_level_progress` table.

use sqlx::PgPool;
use speakcoach_core::types::DbId;

use crate::models::level_progress::LevelProgressRow;

const COLUMNS: &str =
    "id, user_id, level, progress, session_count, best_score, total_time_secs, \
     created_at, updated_at";

/// Read access to a user's per-level progress buckets. Writes happen
/// through [`crate::repositories::ProgressionRepo`] so they commit with
/// the session they belong to.
pub struct LevelProgressRepo;

impl LevelProgressRepo {
    /// All progress rows for a user, in ascending difficulty order.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<LevelProgressRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_level_progress
             WHERE user_id = $1
             ORDER BY CASE level WHEN 'easy' THEN 1 WHEN 'medium' THEN 2 ELSE 3 END"
        );
        sqlx::query_as::<_, LevelProgressRow>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}

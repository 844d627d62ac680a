//! Repository for the `user_achievements` table.

use std::collections::HashSet;

use sqlx::PgPool;
use speakcoach_core::types::DbId;

use crate::models::achievement::UnlockedAchievement;

const COLUMNS: &str = "id, user_id, achievement_id, points_awarded, unlocked_at";

/// Read access to achievement unlock records. Inserts happen through
/// [`crate::repositories::ProgressionRepo`].
pub struct AchievementRepo;

impl AchievementRepo {
    /// All unlock records for a user, oldest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<UnlockedAchievement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_achievements
             WHERE user_id = $1
             ORDER BY unlocked_at ASC"
        );
        sqlx::query_as::<_, UnlockedAchievement>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// The set of unlocked achievement ids for a user.
    pub async fn unlocked_ids(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<HashSet<String>, sqlx::Error> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT achievement_id FROM user_achievements WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}

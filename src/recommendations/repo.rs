use anyhow::Context;
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use tracing::warn;

use crate::nutrition::types::Recommendation;

#[derive(Debug, FromRow)]
struct RecommendationRow {
    recommendations_data: String,
    overall_assessment: String,
    weekly_goal: String,
    created_at: String,
}

/// The latest recommendation for a user together with when it was generated.
#[derive(Debug, Clone, Serialize)]
pub struct StoredRecommendation {
    #[serde(flatten)]
    pub recommendation: Recommendation,
    pub created_at: String,
}

impl From<RecommendationRow> for StoredRecommendation {
    fn from(r: RecommendationRow) -> Self {
        let mut recommendation: Recommendation = serde_json::from_str(&r.recommendations_data)
            .unwrap_or_else(|e| {
                warn!(error = %e, "stored recommendation is unreadable");
                Recommendation::default()
            });
        recommendation.overall_assessment = r.overall_assessment;
        recommendation.weekly_goal = r.weekly_goal;
        Self {
            recommendation,
            created_at: r.created_at,
        }
    }
}

/// Replaces whatever was stored for the user.
pub async fn store_recommendations(
    db: &SqlitePool,
    user_id: i64,
    rec: &Recommendation,
) -> anyhow::Result<()> {
    let data = serde_json::to_string(rec).context("encode recommendation")?;

    let mut tx = db.begin().await.context("begin tx")?;
    sqlx::query("DELETE FROM recommendations WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .context("delete old recommendations")?;
    sqlx::query(
        r#"
        INSERT INTO recommendations (user_id, recommendations_data, overall_assessment, weekly_goal)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(data)
    .bind(&rec.overall_assessment)
    .bind(&rec.weekly_goal)
    .execute(&mut *tx)
    .await
    .context("insert recommendation")?;
    tx.commit().await.context("commit tx")?;
    Ok(())
}

pub async fn get_stored_recommendations(
    db: &SqlitePool,
    user_id: i64,
) -> anyhow::Result<Option<StoredRecommendation>> {
    let row = sqlx::query_as::<_, RecommendationRow>(
        r#"
        SELECT recommendations_data, overall_assessment, weekly_goal, created_at
        FROM recommendations
        WHERE user_id = ?
        ORDER BY created_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("select recommendation")?;
    Ok(row.map(StoredRecommendation::from))
}

use anyhow::Context;
use sqlx::SqlitePool;

use super::dto::{Goals, Profile, ProfileUpdate, Settings, SettingsUpdate};
use super::repo_types::{GoalsRow, ProfileRow, SettingsRow};
use crate::nutrition::types::NutritionGoals;

impl Profile {
    pub async fn find(db: &SqlitePool, user_id: i64) -> anyhow::Result<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, name, email, age, gender, weight, height, activity_level
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("select profile")?;
        Ok(row.map(Profile::from))
    }

    /// Updates the provided fields, creating the user first when it does not exist.
    pub async fn upsert(db: &SqlitePool, user_id: i64, update: ProfileUpdate) -> anyhow::Result<()> {
        let update = update.normalized();
        let mut tx = db.begin().await.context("begin tx")?;

        let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await
            .context("select user")?
            .is_some();

        if exists {
            sqlx::query(
                r#"
                UPDATE users
                SET name = COALESCE(?, name),
                    age = COALESCE(?, age),
                    gender = COALESCE(?, gender),
                    weight = COALESCE(?, weight),
                    height = COALESCE(?, height),
                    activity_level = COALESCE(?, activity_level)
                WHERE id = ?
                "#,
            )
            .bind(&update.name)
            .bind(update.age)
            .bind(&update.gender)
            .bind(update.weight)
            .bind(update.height)
            .bind(&update.activity_level)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .context("update profile")?;
        } else {
            let name = update.name.unwrap_or_else(|| "Demo User".into());
            let email = update
                .email
                .unwrap_or_else(|| format!("user{user_id}@chundiet.app"));
            sqlx::query(
                r#"
                INSERT INTO users (id, name, email, age, gender, weight, height, activity_level)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(user_id)
            .bind(name)
            .bind(email)
            .bind(update.age)
            .bind(&update.gender)
            .bind(update.weight)
            .bind(update.height)
            .bind(&update.activity_level)
            .execute(&mut *tx)
            .await
            .context("insert profile")?;
        }

        tx.commit().await.context("commit tx")?;
        Ok(())
    }
}

impl Settings {
    pub async fn find(db: &SqlitePool, user_id: i64) -> anyhow::Result<Option<Settings>> {
        let row = sqlx::query_as::<_, SettingsRow>(
            r#"
            SELECT gemini_api_keys, ai_temperature, ai_top_p, theme, units, notifications_enabled
            FROM user_settings
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("select settings")?;
        Ok(row.map(Settings::from))
    }

    /// Applies the provided fields on top of the stored (or default) settings.
    pub async fn upsert(db: &SqlitePool, user_id: i64, update: SettingsUpdate) -> anyhow::Result<()> {
        let keys = update
            .gemini_api_keys
            .map(|k| serde_json::to_string(&k))
            .transpose()
            .context("encode API keys")?;

        let mut tx = db.begin().await.context("begin tx")?;

        sqlx::query("INSERT INTO user_settings (user_id) VALUES (?) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .context("insert default settings")?;

        sqlx::query(
            r#"
            UPDATE user_settings
            SET gemini_api_keys = COALESCE(?, gemini_api_keys),
                ai_temperature = COALESCE(?, ai_temperature),
                ai_top_p = COALESCE(?, ai_top_p),
                theme = COALESCE(?, theme),
                units = COALESCE(?, units),
                notifications_enabled = COALESCE(?, notifications_enabled)
            WHERE user_id = ?
            "#,
        )
        .bind(keys)
        .bind(update.ai_temperature)
        .bind(update.ai_top_p)
        .bind(&update.theme)
        .bind(&update.units)
        .bind(update.notifications_enabled)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .context("update settings")?;

        tx.commit().await.context("commit tx")?;
        Ok(())
    }
}

impl Goals {
    pub async fn find(db: &SqlitePool, user_id: i64) -> anyhow::Result<Option<Goals>> {
        let row = sqlx::query_as::<_, GoalsRow>(
            r#"
            SELECT goal_description, daily_calories, daily_protein, daily_carbs, daily_fat, updated_at
            FROM user_goals
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("select goals")?;
        Ok(row.map(Goals::from))
    }

    /// Replaces all five targets.
    pub async fn replace(db: &SqlitePool, user_id: i64, goals: &NutritionGoals) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_goals (user_id, goal_description, daily_calories, daily_protein, daily_carbs, daily_fat)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (user_id) DO UPDATE SET
                goal_description = excluded.goal_description,
                daily_calories = excluded.daily_calories,
                daily_protein = excluded.daily_protein,
                daily_carbs = excluded.daily_carbs,
                daily_fat = excluded.daily_fat,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(user_id)
        .bind(&goals.goal_description)
        .bind(goals.daily_calories)
        .bind(goals.daily_protein)
        .bind(goals.daily_carbs)
        .bind(goals.daily_fat)
        .execute(db)
        .await
        .context("upsert goals")?;
        Ok(())
    }
}

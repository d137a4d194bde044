use anyhow::Context;
use sqlx::SqlitePool;
use time::Date;

use super::repo_types::MealEntryRow;
use crate::nutrition::{aggregate::MealEntry, types::NutritionRecord};

/// Inserts the meal and its nutrition row together. Returns the new meal id.
pub async fn store_meal(
    db: &SqlitePool,
    user_id: i64,
    record: &NutritionRecord,
    logged_on: Date,
) -> anyhow::Result<i64> {
    let values = &record.nutritional_values;
    let vitamins = serde_json::to_string(&values.vitamins).context("encode vitamins")?;

    let mut tx = db.begin().await.context("begin tx")?;

    let meal_id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO meals (user_id, food_item, consumption_time, date_logged)
        VALUES (?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(&record.food_item)
    .bind(&record.consumption_time)
    .bind(logged_on)
    .fetch_one(&mut *tx)
    .await
    .context("insert meal")?;

    sqlx::query(
        r#"
        INSERT INTO nutrition_entries
            (meal_id, serving_size, calories, protein, total_carbohydrates, fiber, sugars,
             total_fat, saturated_fat, vitamins)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(meal_id)
    .bind(&values.serving_size)
    .bind(values.calories)
    .bind(&values.protein)
    .bind(&values.carbohydrates.total)
    .bind(&values.carbohydrates.fiber)
    .bind(&values.carbohydrates.sugars)
    .bind(&values.fat.total)
    .bind(&values.fat.saturated)
    .bind(vitamins)
    .execute(&mut *tx)
    .await
    .context("insert nutrition entry")?;

    tx.commit().await.context("commit tx")?;
    Ok(meal_id)
}

/// Meals with their nutrition logged between `from` and `to`, both inclusive.
pub async fn list_entries(
    db: &SqlitePool,
    user_id: i64,
    from: Date,
    to: Date,
) -> anyhow::Result<Vec<MealEntry>> {
    let rows = sqlx::query_as::<_, MealEntryRow>(
        r#"
        SELECT m.id, m.food_item, m.consumption_time, m.date_logged,
               n.serving_size, n.calories, n.protein, n.total_carbohydrates, n.fiber,
               n.sugars, n.total_fat, n.saturated_fat, n.vitamins
        FROM meals m
        JOIN nutrition_entries n ON n.meal_id = m.id
        WHERE m.user_id = ? AND m.date_logged BETWEEN ? AND ?
        ORDER BY m.date_logged DESC, m.consumption_time DESC, m.id DESC
        "#,
    )
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(db)
    .await
    .context("select meal entries")?;

    Ok(rows.into_iter().map(MealEntry::from).collect())
}

/// False when the meal does not exist or is owned by someone else.
pub async fn delete_meal(db: &SqlitePool, meal_id: i64, user_id: i64) -> anyhow::Result<bool> {
    let mut tx = db.begin().await.context("begin tx")?;

    let owned = sqlx::query_scalar::<_, i64>("SELECT id FROM meals WHERE id = ? AND user_id = ?")
        .bind(meal_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .context("select meal")?
        .is_some();
    if !owned {
        return Ok(false);
    }

    sqlx::query("DELETE FROM nutrition_entries WHERE meal_id = ?")
        .bind(meal_id)
        .execute(&mut *tx)
        .await
        .context("delete nutrition entries")?;
    sqlx::query("DELETE FROM meals WHERE id = ? AND user_id = ?")
        .bind(meal_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .context("delete meal")?;

    tx.commit().await.context("commit tx")?;
    Ok(true)
}

use sqlx::SqlitePool;

use super::models::{App, NewApp};

/// All catalog entries, `sort_order` ascending (rows without one last),
/// ties broken by id.
pub(crate) async fn list_apps(pool: &SqlitePool) -> Result<Vec<App>, sqlx::Error> {
    sqlx::query_as::<_, App>(
        "SELECT id, url, title, description, thumbnail, sort_order, prompt, click_count
         FROM apps ORDER BY sort_order IS NULL, sort_order ASC, id ASC",
    )
    .fetch_all(pool)
    .await
}

pub(crate) async fn get_app(pool: &SqlitePool, id: i64) -> Result<Option<App>, sqlx::Error> {
    sqlx::query_as::<_, App>(
        "SELECT id, url, title, description, thumbnail, sort_order, prompt, click_count
         FROM apps WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Inserts a new row with a zero click count and returns the generated id.
pub(crate) async fn create_app(pool: &SqlitePool, app: &NewApp) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO apps (url, title, description, thumbnail, sort_order, prompt, click_count)
         VALUES (?, ?, ?, ?, ?, ?, 0)",
    )
    .bind(&app.url)
    .bind(&app.title)
    .bind(&app.description)
    .bind(&app.thumbnail)
    .bind(app.sort_order)
    .bind(&app.prompt)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Overwrites every mutable field of the row with the given id. A missing id
/// matches zero rows and is not an error.
pub(crate) async fn update_app(
    pool: &SqlitePool,
    id: i64,
    app: &NewApp,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE apps SET url = ?, title = ?, description = ?, thumbnail = ?, sort_order = ?, prompt = ?
         WHERE id = ?",
    )
    .bind(&app.url)
    .bind(&app.title)
    .bind(&app.description)
    .bind(&app.thumbnail)
    .bind(app.sort_order)
    .bind(&app.prompt)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn delete_app(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM apps WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Single-statement counter bump; a missing id is a no-op.
pub(crate) async fn increment_click_count(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE apps SET click_count = click_count + 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) async fn count_apps(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM apps")
        .fetch_one(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::test_pool;

    fn sample(title: &str, sort_order: Option<i64>) -> NewApp {
        NewApp {
            url: format!("https://{}.example.com/", title.to_lowercase()),
            title: title.to_string(),
            description: format!("{title} description"),
            thumbnail: Some(format!("/static/thumbs/{title}.jpg")),
            sort_order,
            prompt: Some("build it".to_string()),
        }
    }

    #[tokio::test]
    async fn list_orders_by_sort_order_then_id() {
        let pool = test_pool().await;
        create_app(&pool, &sample("Charlie", Some(3))).await.unwrap();
        create_app(&pool, &sample("Alpha", Some(1))).await.unwrap();
        create_app(&pool, &sample("Bravo", Some(2))).await.unwrap();
        create_app(&pool, &sample("NoOrder", None)).await.unwrap();
        create_app(&pool, &sample("AlphaTwin", Some(1))).await.unwrap();

        let apps = list_apps(&pool).await.unwrap();
        let titles: Vec<&str> = apps.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Alpha", "AlphaTwin", "Bravo", "Charlie", "NoOrder"]
        );
        // the tie between the two sort_order=1 rows breaks on insertion id
        assert!(apps[0].id < apps[1].id);
    }

    #[tokio::test]
    async fn create_then_get_round_trips_all_fields() {
        let pool = test_pool().await;
        let input = sample("Roundtrip", Some(7));
        let id = create_app(&pool, &input).await.unwrap();

        let app = get_app(&pool, id).await.unwrap().expect("row exists");
        assert_eq!(app.id, id);
        assert_eq!(app.url, input.url);
        assert_eq!(app.title, input.title);
        assert_eq!(app.description, input.description);
        assert_eq!(app.thumbnail, input.thumbnail);
        assert_eq!(app.sort_order, input.sort_order);
        assert_eq!(app.prompt, input.prompt);
        assert_eq!(app.click_count, 0);
    }

    #[tokio::test]
    async fn optional_fields_keep_none_and_empty_distinct() {
        let pool = test_pool().await;
        let mut input = sample("Nulls", None);
        input.thumbnail = None;
        input.prompt = Some(String::new());
        let id = create_app(&pool, &input).await.unwrap();

        let app = get_app(&pool, id).await.unwrap().unwrap();
        assert_eq!(app.thumbnail, None);
        assert_eq!(app.prompt, Some(String::new()));
    }

    #[tokio::test]
    async fn update_missing_id_is_a_noop() {
        let pool = test_pool().await;
        update_app(&pool, 12345, &sample("Ghost", Some(1)))
            .await
            .unwrap();
        assert_eq!(count_apps(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn update_overwrites_all_mutable_fields() {
        let pool = test_pool().await;
        let id = create_app(&pool, &sample("Before", Some(1))).await.unwrap();

        let replacement = NewApp {
            url: "https://after.example.com/".into(),
            title: "After".into(),
            description: "changed".into(),
            thumbnail: None,
            sort_order: None,
            prompt: None,
        };
        update_app(&pool, id, &replacement).await.unwrap();

        let app = get_app(&pool, id).await.unwrap().unwrap();
        assert_eq!(app.title, "After");
        assert_eq!(app.thumbnail, None);
        assert_eq!(app.sort_order, None);
        assert_eq!(app.prompt, None);
        // the counter is not part of the mutable field set
        assert_eq!(app.click_count, 0);
    }

    #[tokio::test]
    async fn delete_missing_id_is_a_noop() {
        let pool = test_pool().await;
        create_app(&pool, &sample("Keeper", Some(1))).await.unwrap();
        delete_app(&pool, 999).await.unwrap();
        assert_eq!(count_apps(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn delete_removes_the_row() {
        let pool = test_pool().await;
        let id = create_app(&pool, &sample("Gone", Some(1))).await.unwrap();
        delete_app(&pool, id).await.unwrap();
        assert_eq!(get_app(&pool, id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn increment_click_count_adds_one() {
        let pool = test_pool().await;
        let id = create_app(&pool, &sample("Clicky", Some(1))).await.unwrap();
        increment_click_count(&pool, id).await.unwrap();
        increment_click_count(&pool, id).await.unwrap();
        let app = get_app(&pool, id).await.unwrap().unwrap();
        assert_eq!(app.click_count, 2);
    }

    #[tokio::test]
    async fn increment_missing_id_is_a_noop() {
        let pool = test_pool().await;
        increment_click_count(&pool, 42).await.unwrap();
        assert_eq!(count_apps(&pool).await.unwrap(), 0);
    }
}

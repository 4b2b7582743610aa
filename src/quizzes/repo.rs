use sqlx::PgPool;
use uuid::Uuid;

use crate::quizzes::repo_types::Quiz;

impl Quiz {
    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Quiz>> {
        let rows = sqlx::query_as::<_, Quiz>(
            r#"
            SELECT id, title, description, created_at
            FROM quizzes
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Quiz>> {
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            SELECT id, title, description, created_at
            FROM quizzes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(quiz)
    }

    pub async fn create(
        db: &PgPool,
        title: &str,
        description: Option<&str>,
    ) -> anyhow::Result<Quiz> {
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            INSERT INTO quizzes (title, description)
            VALUES ($1, $2)
            RETURNING id, title, description, created_at
            "#,
        )
        .bind(title)
        .bind(description)
        .fetch_one(db)
        .await?;
        Ok(quiz)
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        title: &str,
        description: Option<&str>,
    ) -> anyhow::Result<Option<Quiz>> {
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            UPDATE quizzes SET title = $2, description = $3
            WHERE id = $1
            RETURNING id, title, description, created_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(description)
        .fetch_optional(db)
        .await?;
        Ok(quiz)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM quizzes WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

use std::{str::FromStr, sync::Arc};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    query::Query,
    Pool, Row, Sqlite,
};
use uuid::Uuid;

use super::update_query::{build_update, timestamp_text, SqlArg, NOW_SQL, TODO_COLUMNS};
use crate::domain::{
    repository::TodoRepository,
    todo::{NewTodo, OwnerId, Todo, TodoChanges, TodoId},
};

#[derive(Clone)]
pub struct SqliteTodoRepository {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteTodoRepository {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .context("invalid DATABASE_URL")?
            .create_if_missing(true);
        // Each connection to `:memory:` is its own database, so keep exactly one alive.
        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new().max_connections(1).min_connections(1).idle_timeout(None).max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options.connect_with(options).await.context("failed to connect to database")?;
        Ok(Self { pool: Arc::new(pool) })
    }
}

#[async_trait]
impl TodoRepository for SqliteTodoRepository {
    async fn init(&self) -> Result<()> {
        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS todos (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT,
                due_date TEXT NOT NULL,
                completed BOOLEAN NOT NULL DEFAULT 0,
                user_id TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT ({NOW_SQL}),
                updated_at TEXT NOT NULL DEFAULT ({NOW_SQL})
            )"
        ))
        .execute(&*self.pool)
        .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS todos_user_due ON todos (user_id, due_date)")
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    async fn list(&self, owner: &OwnerId) -> Result<Vec<Todo>> {
        let rows = sqlx::query(&format!("SELECT {TODO_COLUMNS} FROM todos WHERE user_id = ?1 ORDER BY due_date ASC"))
            .bind(owner.as_str())
            .fetch_all(&*self.pool)
            .await?;
        rows.iter().map(row_to_todo).collect()
    }

    async fn create(&self, owner: &OwnerId, input: NewTodo) -> Result<Todo> {
        let id = TodoId(Uuid::new_v4());
        let row = sqlx::query(&format!(
            "INSERT INTO todos (id, title, description, due_date, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {TODO_COLUMNS}"
        ))
        .bind(id.to_string())
        .bind(&input.title)
        .bind(&input.description)
        .bind(timestamp_text(&input.due_date))
        .bind(owner.as_str())
        .fetch_one(&*self.pool)
        .await?;
        row_to_todo(&row)
    }

    async fn update(&self, owner: &OwnerId, id: &TodoId, changes: TodoChanges) -> Result<Option<Todo>> {
        let statement = build_update(id, owner, changes);
        let query = statement.args.into_iter().fold(sqlx::query(&statement.sql), bind_arg);
        let row = query.fetch_optional(&*self.pool).await?;
        row.as_ref().map(row_to_todo).transpose()
    }

    async fn delete(&self, owner: &OwnerId, id: &TodoId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?1 AND user_id = ?2")
            .bind(id.to_string())
            .bind(owner.as_str())
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn bind_arg<'q>(query: Query<'q, Sqlite, SqliteArguments<'q>>, arg: SqlArg) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match arg {
        SqlArg::Text(text) => query.bind(text),
        SqlArg::NullableText(text) => query.bind(text),
        SqlArg::Timestamp(at) => query.bind(timestamp_text(&at)),
        SqlArg::Bool(flag) => query.bind(flag),
    }
}

fn row_to_todo(row: &SqliteRow) -> Result<Todo> {
    let id_str: String = row.try_get("id")?;
    let user_id: String = row.try_get("user_id")?;

    Ok(Todo {
        id: TodoId(Uuid::parse_str(&id_str).with_context(|| format!("stored id {id_str:?} is not a uuid"))?),
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        due_date: parse_timestamp(row, "due_date")?,
        completed: row.try_get("completed")?,
        user_id: OwnerId::new(user_id)?,
        created_at: parse_timestamp(row, "created_at")?,
        updated_at: parse_timestamp(row, "updated_at")?,
    })
}

fn parse_timestamp(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>> {
    let text: String = row.try_get(column)?;
    let at = DateTime::parse_from_rfc3339(&text).with_context(|| format!("stored {column} {text:?} is not RFC 3339"))?;
    Ok(at.with_timezone(&Utc))
}

//! Builds the `UPDATE .. RETURNING` statement for a sparse todo update.
//!
//! Column assignments are collected first as `(column, value)` pairs; the SQL
//! text and the argument list are then rendered together, with each
//! placeholder number read from the argument list right after the push.
//! Values only ever travel as bound arguments.

use chrono::{DateTime, Utc};

use crate::domain::todo::{OwnerId, Patch, TodoChanges, TodoId};

/// Columns of a persisted todo, in the order `row_to_todo` reads them.
pub const TODO_COLUMNS: &str = "id, title, description, due_date, completed, user_id, created_at, updated_at";

/// The store's clock as RFC 3339 UTC text with milliseconds.
pub const NOW_SQL: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

#[derive(Debug, Clone, PartialEq)]
pub enum SqlArg {
    Text(String),
    NullableText(Option<String>),
    Timestamp(DateTime<Utc>),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    pub sql: String,
    pub args: Vec<SqlArg>,
}

pub fn build_update(id: &TodoId, owner: &OwnerId, changes: TodoChanges) -> UpdateStatement {
    let mut assignments: Vec<(&'static str, SqlArg)> = Vec::with_capacity(4);
    if let Some(title) = changes.title {
        assignments.push(("title", SqlArg::Text(title)));
    }
    match changes.description {
        Patch::Unset => {}
        Patch::Null => assignments.push(("description", SqlArg::NullableText(None))),
        Patch::Value(description) => assignments.push(("description", SqlArg::NullableText(Some(description)))),
    }
    if let Some(due_date) = changes.due_date {
        assignments.push(("due_date", SqlArg::Timestamp(due_date)));
    }
    if let Some(completed) = changes.completed {
        assignments.push(("completed", SqlArg::Bool(completed)));
    }

    let mut sql = format!("UPDATE todos SET updated_at = {NOW_SQL}");
    let mut args = Vec::with_capacity(assignments.len() + 2);
    for (column, value) in assignments {
        args.push(value);
        sql.push_str(&format!(", {column} = ?{}", args.len()));
    }
    args.push(SqlArg::Text(id.to_string()));
    sql.push_str(&format!(" WHERE id = ?{}", args.len()));
    args.push(SqlArg::Text(owner.as_str().to_owned()));
    sql.push_str(&format!(" AND user_id = ?{}", args.len()));
    sql.push_str(&format!(" RETURNING {TODO_COLUMNS}"));

    UpdateStatement { sql, args }
}

/// Fixed-width UTC text (`YYYY-MM-DDTHH:MM:SS.nnnnnnnnnZ`); sorts chronologically as a
/// string for years 0000 through 9999, which is all the domain admits.
pub fn timestamp_text(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(chrono::SecondsFormat::Nanos, true)
}

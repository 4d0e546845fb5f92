use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::error::TodoError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct TodoId(pub Uuid);

impl Default for TodoId {
    fn default() -> Self { Self(Uuid::new_v4()) }
}

impl TodoId {
    /// Path segments that are not UUIDs name no record; callers treat `None` as not found.
    pub fn parse(raw: &str) -> Option<Self> { Uuid::parse_str(raw).ok().map(Self) }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { std::fmt::Display::fmt(&self.0, f) }
}

/// Identifier of the user a todo belongs to. Never empty.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(raw: impl Into<String>) -> Result<Self, TodoError> {
        let raw = raw.into();
        if raw.is_empty() { return Err(TodoError::Unauthorized); }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(&self.0) }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    pub completed: bool,
    pub user_id: OwnerId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A field in a sparse update: left out, sent as `null`, or sent with a value.
///
/// Use with `#[serde(default)]` so a missing key decodes as `Unset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Unset,
    Null,
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self { Patch::Unset }
}

impl<T> Patch<T> {
    pub fn is_unset(&self) -> bool { matches!(self, Patch::Unset) }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTodo {
    #[serde(default)]
    pub title: Patch<String>,
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(default)]
    pub due_date: Patch<DateTime<Utc>>,
    #[serde(default)]
    pub completed: Patch<bool>,
}

/// A create request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
}

impl TryFrom<CreateTodo> for NewTodo {
    type Error = TodoError;

    fn try_from(input: CreateTodo) -> Result<Self, Self::Error> {
        if input.title.is_empty() {
            return Err(TodoError::validation("title is required"));
        }
        check_due_date(&input.due_date)?;
        Ok(Self { title: input.title, description: input.description, due_date: input.due_date })
    }
}

/// An update request that passed validation. `None` means "leave unchanged";
/// only `description` can be cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Patch<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed: Option<bool>,
}

impl TryFrom<UpdateTodo> for TodoChanges {
    type Error = TodoError;

    fn try_from(input: UpdateTodo) -> Result<Self, Self::Error> {
        let title = required("title", input.title)?;
        if title.as_deref() == Some("") {
            return Err(TodoError::validation("title must not be empty"));
        }
        let due_date = required("due_date", input.due_date)?;
        if let Some(due_date) = &due_date {
            check_due_date(due_date)?;
        }
        Ok(Self {
            title,
            description: input.description,
            due_date,
            completed: required("completed", input.completed)?,
        })
    }
}

/// Stored due dates are four-digit-year RFC 3339 text; anything else could not be read back.
fn check_due_date(due_date: &DateTime<Utc>) -> Result<(), TodoError> {
    if !(0..=9999).contains(&due_date.year()) {
        return Err(TodoError::validation("due_date year must be between 0000 and 9999"));
    }
    Ok(())
}

fn required<T>(field: &str, patch: Patch<T>) -> Result<Option<T>, TodoError> {
    match patch {
        Patch::Unset => Ok(None),
        Patch::Null => Err(TodoError::validation(format!("{field} must not be null"))),
        Patch::Value(value) => Ok(Some(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn patch_distinguishes_missing_null_and_value() {
        let input: UpdateTodo = serde_json::from_value(json!({ "description": null, "completed": true })).unwrap();
        assert!(input.title.is_unset());
        assert_eq!(input.description, Patch::Null);
        assert!(input.due_date.is_unset());
        assert_eq!(input.completed, Patch::Value(true));
    }

    #[test]
    fn changes_reject_null_for_required_columns() {
        let input: UpdateTodo = serde_json::from_value(json!({ "due_date": null })).unwrap();
        let err = TodoChanges::try_from(input).unwrap_err();
        assert!(matches!(err, TodoError::Validation(ref m) if m.contains("due_date")));
    }

    #[test]
    fn changes_reject_empty_title() {
        let input: UpdateTodo = serde_json::from_value(json!({ "title": "" })).unwrap();
        assert!(matches!(TodoChanges::try_from(input), Err(TodoError::Validation(_))));
    }

    #[test]
    fn new_todo_requires_title() {
        let input: CreateTodo = serde_json::from_value(json!({ "title": "", "due_date": "2030-01-01T00:00:00Z" })).unwrap();
        assert!(matches!(NewTodo::try_from(input), Err(TodoError::Validation(_))));
    }

    #[test]
    fn due_date_year_must_have_four_digits() {
        use chrono::TimeZone;

        let input: CreateTodo = serde_json::from_value(json!({ "title": "t", "due_date": "+10000-01-01T00:00:00Z" })).unwrap();
        assert!(matches!(NewTodo::try_from(input), Err(TodoError::Validation(_))));
        let input: UpdateTodo = serde_json::from_value(json!({ "due_date": "+10000-01-01T00:00:00Z" })).unwrap();
        assert!(matches!(TodoChanges::try_from(input), Err(TodoError::Validation(_))));

        let before_year_zero = Utc.with_ymd_and_hms(-1, 12, 31, 23, 59, 59).unwrap();
        let input = CreateTodo { title: "t".into(), description: None, due_date: before_year_zero };
        assert!(matches!(NewTodo::try_from(input), Err(TodoError::Validation(_))));
        let input = UpdateTodo { due_date: Patch::Value(before_year_zero), ..Default::default() };
        assert!(matches!(TodoChanges::try_from(input), Err(TodoError::Validation(_))));

        let last = Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).unwrap();
        assert!(NewTodo::try_from(CreateTodo { title: "t".into(), description: None, due_date: last }).is_ok());
    }

    #[test]
    fn owner_id_rejects_empty() {
        assert!(matches!(OwnerId::new(""), Err(TodoError::Unauthorized)));
        assert_eq!(OwnerId::new("u1").unwrap().as_str(), "u1");
    }

    #[test]
    fn todo_id_parse_rejects_garbage() {
        assert!(TodoId::parse("not-a-uuid").is_none());
        let id = TodoId::default();
        assert_eq!(TodoId::parse(&id.to_string()), Some(id));
    }
}

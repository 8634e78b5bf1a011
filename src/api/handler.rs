//! # Tracker Service
//!
//! The query/response mapper: resolves users, builds store filters, and
//! shapes results into wire responses. Constructed once at startup
//! around the opened store and shared with every route handler through
//! router state — there is no lazily-connected global anywhere.

use std::sync::Arc;

use serde_json::Value;

use crate::entities::{Exercise, NewExercise, NewUser, User, DATE_STORAGE_FORMAT};
use crate::observability::Logger;
use crate::store::{sort_ascending, CollectionSpec, DocumentStore, Filter, Predicate, StoreError};

use super::errors::{ApiError, ApiResult};
use super::request::LogQuery;
use super::response::{ExerciseResponse, LogEntry, LogResponse, UserResponse};

/// The collections the tracker declares on its store.
pub fn collection_specs() -> Vec<CollectionSpec> {
    vec![
        CollectionSpec::with_unique(User::COLLECTION, "username"),
        CollectionSpec::new(Exercise::COLLECTION),
    ]
}

/// Exercise tracker service over an injected document store.
#[derive(Clone)]
pub struct Tracker {
    store: Arc<DocumentStore>,
}

impl Tracker {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// Creates a user. The store's unique-field declaration rejects a
    /// duplicate username atomically with the insert.
    pub fn create_user(&self, new_user: NewUser) -> ApiResult<UserResponse> {
        let document = self
            .store
            .insert(User::COLLECTION, new_user.to_document())
            .map_err(|err| match err {
                StoreError::DuplicateValue { value, .. } => ApiError::DuplicateUsername(value),
                other => ApiError::Store(other),
            })?;
        let user = User::from_document(&document)
            .ok_or_else(|| malformed_document(User::COLLECTION))?;

        Logger::info(
            "USER_CREATED",
            &[("id", &user.id), ("username", &user.username)],
        );
        Ok(UserResponse::from(&user))
    }

    /// All users, `{username, id}` only, in insertion order.
    pub fn list_users(&self) -> ApiResult<Vec<UserResponse>> {
        let documents = self.store.find(User::COLLECTION, &Filter::new())?;
        Ok(documents
            .iter()
            .filter_map(User::from_document)
            .map(|user| UserResponse::from(&user))
            .collect())
    }

    /// Persists an exercise for an existing user and echoes it back with
    /// the user's identity.
    pub fn add_exercise(&self, user_id: &str, new_exercise: NewExercise) -> ApiResult<ExerciseResponse> {
        let user = self.resolve_user(user_id)?;
        let document = self
            .store
            .insert(Exercise::COLLECTION, new_exercise.to_document(&user.id))?;
        let exercise = Exercise::from_document(&document)
            .ok_or_else(|| malformed_document(Exercise::COLLECTION))?;

        Logger::info(
            "EXERCISE_ADDED",
            &[
                ("user_id", &user.id),
                ("duration", &exercise.duration.to_string()),
            ],
        );
        Ok(ExerciseResponse::new(&user, &exercise))
    }

    /// Date-filtered, limited, ascending-by-date log of one user's
    /// exercises. `count` reflects what is returned.
    pub fn get_logs(&self, user_id: &str, query: LogQuery) -> ApiResult<LogResponse> {
        let user = self.resolve_user(user_id)?;

        let mut filter = Filter::new().and(Predicate::eq("userId", Value::String(user.id.clone())));
        if let Some(from) = query.from {
            let bound = from.format(DATE_STORAGE_FORMAT).to_string();
            filter = filter.and(Predicate::gte("date", Value::String(bound)));
        }
        if let Some(to) = query.to {
            let bound = to.format(DATE_STORAGE_FORMAT).to_string();
            filter = filter.and(Predicate::lte("date", Value::String(bound)));
        }

        let mut documents = self.store.find(Exercise::COLLECTION, &filter)?;
        sort_ascending(&mut documents, "date");
        if let Some(limit) = query.limit {
            documents.truncate(limit);
        }

        let log: Vec<LogEntry> = documents
            .iter()
            .filter_map(Exercise::from_document)
            .map(|exercise| LogEntry::from(&exercise))
            .collect();
        Ok(LogResponse::new(&user, log))
    }

    fn resolve_user(&self, user_id: &str) -> ApiResult<User> {
        let document = self
            .store
            .get(User::COLLECTION, user_id)?
            .ok_or_else(|| ApiError::UnknownUser(user_id.to_string()))?;
        User::from_document(&document).ok_or_else(|| malformed_document(User::COLLECTION))
    }
}

fn malformed_document(collection: &str) -> ApiError {
    ApiError::Internal(format!("malformed document in collection {}", collection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn tracker(dir: &TempDir) -> Tracker {
        let store = DocumentStore::open(dir.path(), &collection_specs()).unwrap();
        Tracker::new(Arc::new(store))
    }

    fn new_exercise(description: &str, duration: &str, date: &str) -> NewExercise {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        NewExercise::parse(Some(description), Some(duration), Some(date), today).unwrap()
    }

    #[test]
    fn test_create_and_list_users() {
        let dir = TempDir::new().unwrap();
        let tracker = tracker(&dir);

        let created = tracker
            .create_user(NewUser::parse(Some("fcc_test")).unwrap())
            .unwrap();
        assert_eq!(created.username, "fcc_test");
        assert!(!created.id.is_empty());

        let users = tracker.list_users().unwrap();
        assert_eq!(users, vec![created]);
    }

    #[test]
    fn test_duplicate_username_conflict() {
        let dir = TempDir::new().unwrap();
        let tracker = tracker(&dir);

        tracker
            .create_user(NewUser::parse(Some("alice")).unwrap())
            .unwrap();
        let result = tracker.create_user(NewUser::parse(Some("alice")).unwrap());
        assert!(matches!(result, Err(ApiError::DuplicateUsername(_))));
    }

    #[test]
    fn test_add_exercise_unknown_user_persists_nothing() {
        let dir = TempDir::new().unwrap();
        let tracker = tracker(&dir);

        let result = tracker.add_exercise("missing", new_exercise("run", "30", "2023-01-15"));
        assert!(matches!(result, Err(ApiError::UnknownUser(_))));

        let user = tracker
            .create_user(NewUser::parse(Some("alice")).unwrap())
            .unwrap();
        let logs = tracker.get_logs(&user.id, LogQuery::default()).unwrap();
        assert_eq!(logs.count, 0);
    }

    #[test]
    fn test_exercise_roundtrip() {
        let dir = TempDir::new().unwrap();
        let tracker = tracker(&dir);

        let user = tracker
            .create_user(NewUser::parse(Some("fcc_test")).unwrap())
            .unwrap();
        let added = tracker
            .add_exercise(&user.id, new_exercise("test run", "30", "2023-01-15"))
            .unwrap();
        assert_eq!(added.id, user.id);
        assert_eq!(added.date, "Sun Jan 15 2023");

        let logs = tracker.get_logs(&user.id, LogQuery::default()).unwrap();
        assert_eq!(logs.count, 1);
        assert_eq!(logs.log[0].description, "test run");
        assert_eq!(logs.log[0].duration, 30);
        assert_eq!(logs.log[0].date, added.date);
    }
}

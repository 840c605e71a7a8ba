use std::sync::Arc;

use todo_core::store::migrations::latest_version;
use todo_core::{SqliteTodoStore, StoreError, TodoService, TodoStatus, TodoStore};

#[tokio::test]
async fn records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.db");

    let created = {
        let service = TodoService::new(Arc::new(SqliteTodoStore::open(&path).unwrap()));
        service
            .create("persisted".to_string(), Some("on disk".to_string()))
            .await
            .unwrap()
    };

    let service = TodoService::new(Arc::new(SqliteTodoStore::open(&path).unwrap()));
    let loaded = service.get_by_id(created.id).await.unwrap();
    assert_eq!(loaded, Some(created));
}

#[tokio::test]
async fn open_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("data").join("todo.db");
    SqliteTodoStore::open(&path).unwrap();
    assert!(path.exists());
}

#[tokio::test]
async fn ids_are_never_reused_after_delete() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.db");

    let first_id = {
        let service = TodoService::new(Arc::new(SqliteTodoStore::open(&path).unwrap()));
        let first = service.create("first".to_string(), None).await.unwrap();
        assert!(service.delete(first.id).await.unwrap());
        first.id
    };

    let service = TodoService::new(Arc::new(SqliteTodoStore::open(&path).unwrap()));
    let second = service.create("second".to_string(), None).await.unwrap();
    assert!(second.id > first_id);
}

#[tokio::test]
async fn overlong_description_is_rejected() {
    let store = SqliteTodoStore::open_in_memory().unwrap();
    let service = TodoService::new(Arc::new(store.clone()));
    let err = service
        .create("ok".to_string(), Some("d".repeat(501)))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Constraint { field: "description", .. }));
    assert!(store.scan(TodoStatus::All).await.unwrap().is_empty());
}

#[test]
fn newer_schema_version_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.db");
    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version() + 1))
            .unwrap();
    }

    let err = SqliteTodoStore::open(&path).unwrap_err();
    assert!(matches!(err, StoreError::UnsupportedSchemaVersion { .. }));
}

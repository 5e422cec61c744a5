use storage::repository::{PreferenceRepository, Storage};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_roundtrip_persists_preferences() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_prefs_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get("sound").await.unwrap(), None);

    repo.set("sound", "false").await.unwrap();
    repo.set("direction_swap", "true").await.unwrap();
    repo.set("sound", "true").await.unwrap();

    assert_eq!(repo.get("sound").await.unwrap().as_deref(), Some("true"));
    assert_eq!(
        repo.get("direction_swap").await.unwrap().as_deref(),
        Some("true")
    );
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let url = "sqlite:file:memdb_prefs_migrate?mode=memory&cache=shared";
    let repo = SqliteRepository::connect(url).await.expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.set("sound", "false").await.unwrap();
    repo.migrate().await.expect("second migrate");

    assert_eq!(repo.get("sound").await.unwrap().as_deref(), Some("false"));
}

#[tokio::test]
async fn storage_sqlite_exposes_preferences() {
    let storage = Storage::sqlite("sqlite:file:memdb_prefs_storage?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage.preferences.set("sound", "false").await.unwrap();
    assert_eq!(
        storage.preferences.get("sound").await.unwrap().as_deref(),
        Some("false")
    );
}

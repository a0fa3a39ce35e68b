//! Opening a database written by an earlier deployment.

use anireq::db::{CastVote, RequestId, Store};
use anireq::domain::RequestStatus;
use sea_orm::{ConnectionTrait, Database};

const LEGACY_SCHEMA: &str = r"
    CREATE TABLE requests (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        anime_name TEXT NOT NULL,
        votes INTEGER DEFAULT 1,
        status TEXT DEFAULT 'Pending'
    );
    CREATE TABLE vote_logs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        request_id INTEGER NOT NULL,
        user_ip TEXT NOT NULL,
        UNIQUE(request_id, user_ip)
    );
    INSERT INTO requests (anime_name, votes, status) VALUES ('Legacy Show', 3, 'Uploaded');
    INSERT INTO vote_logs (request_id, user_ip) VALUES (1, '1.2.3.4');
";

fn temp_db_url() -> String {
    let db_path =
        std::env::temp_dir().join(format!("anireq-migration-test-{}.db", uuid::Uuid::new_v4()));
    format!("sqlite:{}", db_path.display())
}

#[tokio::test]
async fn legacy_table_gains_episode_columns() {
    let url = temp_db_url();

    let legacy = Database::connect(format!("{url}?mode=rwc")).await.unwrap();
    for statement in LEGACY_SCHEMA.split(';').filter(|s| !s.trim().is_empty()) {
        legacy.execute_unprepared(statement).await.unwrap();
    }
    legacy.close().await.unwrap();

    let store = Store::new(&url).await.unwrap();
    let id = RequestId::new(1);

    let request = store.get_request(id).await.unwrap().unwrap();
    assert_eq!(request.anime_name, "Legacy Show");
    assert_eq!(request.votes, 3);
    assert_eq!(request.status, RequestStatus::Uploaded);
    assert_eq!(request.total_episodes, 0);
    assert_eq!(request.uploaded_episodes, 0);

    // The old ledger still blocks a repeat vote.
    assert!(store.has_voted(id, "1.2.3.4").await.unwrap());
    assert_eq!(
        store.cast_vote(id, "1.2.3.4").await.unwrap(),
        CastVote::AlreadyVoted
    );

    store.update_request_progress(id, 12, 4).await.unwrap();
    let request = store.get_request(id).await.unwrap().unwrap();
    assert_eq!((request.total_episodes, request.uploaded_episodes), (12, 4));
}

#[tokio::test]
async fn reopening_is_idempotent() {
    let url = temp_db_url();

    let store = Store::new(&url).await.unwrap();
    let id = store.insert_request("Show", 12).await.unwrap().unwrap();
    store.conn.close().await.unwrap();

    let store = Store::new(&url).await.unwrap();
    let request = store.get_request(id).await.unwrap().unwrap();
    assert_eq!(request.total_episodes, 12);
    assert_eq!(store.request_count().await.unwrap(), 1);
}

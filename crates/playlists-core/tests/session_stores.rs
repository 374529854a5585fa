use std::sync::Arc;

use playlists_core::auth::{FileStore, KeyringStore, Session, SessionData, SessionStore};
use playlists_core::models::UserProfile;

fn ada() -> UserProfile {
    UserProfile {
        id: 1,
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
    }
}

#[test]
fn test_file_session_set_read_clear() {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::new(FileStore::in_dir(dir.path()));

    session.set_auth("t1", &ada()).unwrap();
    assert_eq!(session.token().as_deref(), Some("t1"));
    assert_eq!(session.user::<UserProfile>(), Some(ada()));
    assert!(session.is_authenticated());

    session.clear_auth().unwrap();
    assert_eq!(session.token(), None);
    assert_eq!(session.user::<UserProfile>(), None);
    assert!(!session.is_authenticated());
}

#[test]
fn test_file_session_reopened_returns_same_pair() {
    let dir = tempfile::tempdir().unwrap();
    Session::new(FileStore::in_dir(dir.path()))
        .set_auth("t1", &ada())
        .unwrap();

    let reopened = Session::new(FileStore::in_dir(dir.path()));
    assert_eq!(
        reopened.load::<UserProfile>(),
        Some(SessionData {
            token: "t1".to_string(),
            user: ada(),
        })
    );
}

#[test]
fn test_file_session_recovers_from_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::in_dir(dir.path());
    std::fs::write(store.path(), "{ truncated").unwrap();
    let session = Session::new(store);

    assert!(!session.is_authenticated());
    session.clear_auth().unwrap();

    session.set_auth("t2", &ada()).unwrap();
    assert_eq!(session.token().as_deref(), Some("t2"));
    assert_eq!(session.user::<UserProfile>(), Some(ada()));
}

#[test]
fn test_keyring_session_set_read_clear() {
    let store = KeyringStore::new(format!("playlists-session-test-{}", std::process::id()));
    let session = Session::from_arc(Arc::new(store) as Arc<dyn SessionStore>);

    // Without a usable keychain the write must fail instead of pretending
    if session.set_auth("t1", &ada()).is_err() {
        assert!(!session.is_authenticated());
        return;
    }
    assert_eq!(session.token().as_deref(), Some("t1"));
    assert_eq!(session.user::<UserProfile>(), Some(ada()));

    session.clear_auth().unwrap();
    assert!(!session.is_authenticated());
    assert_eq!(session.user::<UserProfile>(), None);
}

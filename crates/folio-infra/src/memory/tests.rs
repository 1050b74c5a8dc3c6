use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use uuid::Uuid;

use folio_core::domain::{EntryDraft, PostDraft, Session};
use folio_core::error::DomainError;
use folio_core::ports::{PostRepository, SessionRepository};
use folio_core::services::ContentService;

use super::InMemoryStore;
use crate::database::Collection;

fn content(store: &Arc<InMemoryStore>) -> ContentService {
    ContentService::new(store.clone(), store.clone())
}

fn hello() -> PostDraft {
    PostDraft::new("Hello", "# Hi\nworld", "s", "c.png")
}

#[tokio::test]
async fn test_create_then_get_round_trips() {
    let store = Arc::new(InMemoryStore::new());
    let svc = content(&store);

    let created = svc.create_post(hello()).await.unwrap();
    let fetched = svc.get_post(&created.id.to_string()).await.unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched.likes, 0);
    assert_eq!(fetched.comments, 0);
}

#[tokio::test]
async fn test_posts_are_listed_newest_first() {
    let store = Arc::new(InMemoryStore::new());
    let base = Utc::now();
    for (title, age) in [("old", 30), ("newest", 0), ("middle", 10), ("older", 20)] {
        PostRepository::insert(
            store.as_ref(),
            PostDraft::new(title, "", "", ""),
            base - TimeDelta::minutes(age),
        )
        .await
        .unwrap();
    }

    let posts = content(&store).get_posts().await.unwrap();

    let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["newest", "middle", "older", "old"]);
    assert!(posts.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}

#[tokio::test]
async fn test_update_of_missing_post_changes_nothing() {
    let store = Arc::new(InMemoryStore::new());
    let svc = content(&store);
    let existing = svc.create_post(hello()).await.unwrap();

    let err = svc
        .update_post(&Uuid::new_v4().to_string(), PostDraft::new("x", "y", "z", "w"))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::NotFound { entity_type: "post", .. }));
    assert_eq!(store.count(Collection::Posts).await, 1);
    assert_eq!(svc.get_post(&existing.id.to_string()).await.unwrap(), existing);
}

#[tokio::test]
async fn test_update_keeps_date_and_counters() {
    let store = Arc::new(InMemoryStore::new());
    let svc = content(&store);
    let post = svc.create_post(hello()).await.unwrap();
    let id = post.id.to_string();
    svc.increment_like(&id).await.unwrap();

    let updated = svc
        .update_post(&id, PostDraft::new("Edited", "body", "syn", "d.png"))
        .await
        .unwrap();

    assert_eq!(updated.title, "Edited");
    assert_eq!(updated.cover_image, "d.png");
    assert_eq!(updated.likes, 1);
    assert_eq!(updated.created_at, post.created_at);
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let store = Arc::new(InMemoryStore::new());
    let svc = content(&store);
    let id = svc.create_post(hello()).await.unwrap().id.to_string();

    svc.delete_post(&id).await.unwrap();

    assert!(matches!(
        svc.get_post(&id).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        svc.delete_post(&id).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_sequential_likes_add_up() {
    let store = Arc::new(InMemoryStore::new());
    let svc = content(&store);
    let id = svc.create_post(hello()).await.unwrap().id.to_string();

    for _ in 0..7 {
        svc.increment_like(&id).await.unwrap();
    }

    assert_eq!(svc.get_post(&id).await.unwrap().likes, 7);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_likes_are_not_lost() {
    let store = Arc::new(InMemoryStore::new());
    let svc = Arc::new(content(&store));
    let id = svc.create_post(hello()).await.unwrap().id.to_string();

    let handles: Vec<_> = (0..50)
        .map(|_| {
            let svc = svc.clone();
            let id = id.clone();
            tokio::spawn(async move { svc.increment_like(&id).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(svc.get_post(&id).await.unwrap().likes, 50);
}

#[tokio::test]
async fn test_search_matches_title_prefix_only() {
    let store = Arc::new(InMemoryStore::new());
    let svc = content(&store);
    for title in ["Rust lifetimes", "rusty tools", "Trusting Rust", "Go notes"] {
        svc.create_post(PostDraft::new(title, "", "", ""))
            .await
            .unwrap();
    }

    let mut found: Vec<_> = svc
        .search_posts("RUST")
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.title)
        .collect();
    found.sort();

    assert_eq!(found, ["Rust lifetimes", "rusty tools"]);
    assert_eq!(svc.search_posts("   ").await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_read_post_lists_the_other_posts() {
    let store = Arc::new(InMemoryStore::new());
    let svc = content(&store);
    let first = svc.create_post(hello()).await.unwrap();
    let second = svc
        .create_post(PostDraft::new("Second", "", "", ""))
        .await
        .unwrap();

    let reading = svc.read_post(&first.id.to_string()).await.unwrap();

    assert_eq!(reading.post.id, first.id);
    assert_eq!(reading.more_posts.len(), 1);
    assert_eq!(reading.more_posts[0].id, second.id);
}

#[tokio::test]
async fn test_home_feed_limits_posts_and_features_newest_entry() {
    let store = Arc::new(InMemoryStore::new());
    let svc = content(&store);

    let empty = svc.home().await.unwrap();
    assert!(empty.posts.is_empty());
    assert!(empty.featured.is_none());

    let base = Utc::now();
    for i in 0..8 {
        PostRepository::insert(
            store.as_ref(),
            PostDraft::new(format!("post {i}"), "", "", ""),
            base + TimeDelta::seconds(i),
        )
        .await
        .unwrap();
    }
    svc.create_portfolio_entry(EntryDraft::new("older", "", "", ""))
        .await
        .unwrap();
    let newest = svc
        .create_portfolio_entry(EntryDraft::new("newer", "https://git.example/r", "", ""))
        .await
        .unwrap();

    let home = svc.home().await.unwrap();
    assert_eq!(home.posts.len(), 5);
    assert_eq!(home.posts[0].title, "post 7");
    assert_eq!(home.entries.len(), 2);
    assert_eq!(home.featured.map(|e| e.id), Some(newest.id));
}

#[tokio::test]
async fn test_portfolio_lifecycle() {
    let store = Arc::new(InMemoryStore::new());
    let svc = content(&store);

    let entry = svc
        .create_portfolio_entry(EntryDraft::new(
            "Folio",
            "https://git.example/folio",
            "https://folio.example",
            "f.png",
        ))
        .await
        .unwrap();
    let id = entry.id.to_string();

    let updated = svc
        .update_entry(&id, EntryDraft::new("Folio 2", "repo", "url", "g.png"))
        .await
        .unwrap();
    assert_eq!(updated.title, "Folio 2");
    assert_eq!(updated.created_at, entry.created_at);
    assert_eq!(svc.get_entry(&id).await.unwrap(), updated);

    svc.delete_entry(&id).await.unwrap();
    assert!(matches!(
        svc.get_entry(&id).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        svc.get_entry("nope").await,
        Err(DomainError::InvalidIdentifier(_))
    ));
}

#[tokio::test]
async fn test_sessions_are_looked_up_by_token() {
    let store = InMemoryStore::new();
    let session = Session::new("abc".into(), Uuid::new_v4(), Utc::now());
    SessionRepository::insert(&store, session.clone()).await.unwrap();

    assert_eq!(store.find_by_token("abc").await.unwrap(), Some(session));
    assert_eq!(store.find_by_token("abd").await.unwrap(), None);
}

#[cfg(feature = "auth")]
mod auth {
    use super::*;
    use crate::auth::{Argon2PasswordService, PasswordConfig, UuidTokenGenerator};
    use folio_core::services::AuthService;

    fn auth(store: &Arc<InMemoryStore>) -> AuthService {
        AuthService::new(
            store.clone(),
            store.clone(),
            Arc::new(Argon2PasswordService::new(&PasswordConfig::fast_for_tests()).unwrap()),
            Arc::new(UuidTokenGenerator),
        )
    }

    #[tokio::test]
    async fn test_authentication_outcomes() {
        let store = Arc::new(InMemoryStore::new());
        let svc = auth(&store);
        svc.register_user("admin", "correct horse").await.unwrap();

        let user = svc.authenticate_user("admin", "correct horse").await.unwrap();
        assert_eq!(user.username, "admin");
        assert_ne!(user.password_hash, "correct horse");
        assert!(user.password_hash.starts_with("$argon2id$"));

        assert!(matches!(
            svc.authenticate_user("admin", "battery staple").await,
            Err(DomainError::InvalidCredentials)
        ));
        assert!(matches!(
            svc.authenticate_user("root", "correct horse").await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_usernames_are_unique() {
        let store = Arc::new(InMemoryStore::new());
        let svc = auth(&store);
        svc.register_user("admin", "a").await.unwrap();

        assert!(matches!(
            svc.register_user("admin", "b").await,
            Err(DomainError::Duplicate(_))
        ));
        assert_eq!(store.count(Collection::Users).await, 1);
    }

    #[tokio::test]
    async fn test_session_expiry() {
        let store = Arc::new(InMemoryStore::new());
        let svc = auth(&store);
        let now = Utc::now();

        for (token, offset) in [("expired", -1), ("live", 1)] {
            let expires_at = now + TimeDelta::seconds(offset);
            SessionRepository::insert(
                store.as_ref(),
                Session::new(token.into(), Uuid::new_v4(), expires_at),
            )
            .await
            .unwrap();
        }

        assert!(!svc.validate_session_at("expired", now).await.unwrap());
        assert!(svc.validate_session_at("live", now).await.unwrap());
        assert!(!svc.validate_session_at("missing", now).await.unwrap());
    }

    #[tokio::test]
    async fn test_login_issues_a_day_long_session() {
        let store = Arc::new(InMemoryStore::new());
        let svc = auth(&store);
        svc.register_user("admin", "pw").await.unwrap();

        let (user, session) = svc.login("admin", "pw").await.unwrap();

        assert_eq!(session.user_id, user.id);
        let ttl = session.expires_at - Utc::now();
        assert!(ttl > TimeDelta::hours(23) && ttl <= TimeDelta::hours(24));
        assert!(svc.validate_session(&session.token).await.unwrap());
        assert_eq!(svc.session_user(&session.token).await.unwrap(), Some(user.id));
    }
}

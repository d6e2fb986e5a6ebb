//! Test helpers for the web integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum_test::{TestRequest, TestServer};

use feedlist::config::{Config, WebConfig};
use feedlist::web::handlers::AppState;
use feedlist::web::middleware::JwtState;
use feedlist::web::router::create_router;
use feedlist::{Database, EntryRepository, NewEntry, NewUser, User, UserRepository};

/// Secret used to sign session tokens in tests.
pub const TEST_JWT_SECRET: &str = "test-secret-key-for-testing-only";

/// Feed token of the test reader.
pub const TEST_FEED_TOKEN: &str = "feed-token-alice";

/// A running test server with direct database access.
pub struct TestApp {
    pub server: TestServer,
    pub db: Database,
    pub jwt: JwtState,
}

impl TestApp {
    /// Create a test app with the given web settings.
    pub async fn with_web(web: WebConfig) -> Self {
        let config = Config {
            web: WebConfig {
                jwt_secret: TEST_JWT_SECRET.to_string(),
                ..web
            },
            ..Config::default()
        };

        let db = Database::open_in_memory()
            .await
            .expect("Failed to create test database");
        let app_state = Arc::new(AppState::new(db.clone(), &config));
        let jwt_state = Arc::new(JwtState::new(TEST_JWT_SECRET));

        let router = create_router(app_state, jwt_state, &config.web.cors_origins);
        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            db,
            jwt: JwtState::new(TEST_JWT_SECRET),
        }
    }

    /// Create a test app without anonymous access.
    pub async fn new() -> Self {
        Self::with_web(WebConfig {
            default_user: "alice".to_string(),
            ..WebConfig::default()
        })
        .await
    }

    /// Create a user with a feed token.
    pub async fn create_user(&self, username: &str) -> User {
        UserRepository::new(self.db.pool())
            .create(&NewUser::new(username).with_feed_token(format!("feed-token-{username}")))
            .await
            .expect("Failed to create user")
    }

    /// Mint a session token for a user.
    pub fn token_for(&self, user: &User) -> String {
        self.jwt
            .issue(user.id, &user.username, 3600)
            .expect("Failed to issue token")
    }

    /// Build a GET request carrying the user's session.
    pub fn get_as(&self, user: &User, path: &str) -> TestRequest {
        self.server
            .get(path)
            .add_header(AUTHORIZATION, format!("Bearer {}", self.token_for(user)))
    }

    /// Build a POST request carrying the user's session.
    pub fn post_as(&self, user: &User, path: &str) -> TestRequest {
        self.server
            .post(path)
            .add_header(AUTHORIZATION, format!("Bearer {}", self.token_for(user)))
    }
}

/// IDs of a seeded category and its feed.
pub struct Seeded {
    pub category_id: i64,
    pub feed_id: i64,
    pub entry_ids: Vec<i64>,
}

/// File `count` unread entries under a new category and feed of `user`.
pub async fn seed_entries(db: &Database, user: &User, count: usize) -> Seeded {
    seed_entries_with(db, user, count, |entry| entry).await
}

/// Like [`seed_entries`], letting the caller adjust each entry.
pub async fn seed_entries_with(
    db: &Database,
    user: &User,
    count: usize,
    adjust: impl Fn(NewEntry) -> NewEntry,
) -> Seeded {
    let repo = EntryRepository::new(db.pool());
    let category = repo
        .create_category(user.id, "Tech")
        .await
        .expect("Failed to create category");
    let feed = repo
        .create_feed(user.id, category.id, "https://example.com/feed", "Example")
        .await
        .expect("Failed to create feed");

    let mut entry_ids = Vec::with_capacity(count);
    for i in 1..=count {
        let entry = adjust(
            NewEntry::new(feed.id, format!("guid-{i}"), format!("Entry {i}"))
                .with_link(format!("https://example.com/{i}")),
        );
        let id = repo
            .insert_entry(&entry)
            .await
            .expect("Failed to insert entry")
            .expect("Duplicate entry");
        entry_ids.push(id);
    }

    Seeded {
        category_id: category.id,
        feed_id: feed.id,
        entry_ids,
    }
}

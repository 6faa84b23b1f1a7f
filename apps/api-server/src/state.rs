//! Application state - shared across all handlers.

use std::sync::Arc;

use photogram_core::SnsService;
use photogram_core::ports::{
    CommentRepository, MemberRepository, PasswordService, PhotoStorage, PostRepository,
    TokenService,
};
use photogram_infra::database::DatabaseConfig;
use photogram_infra::{
    Argon2PasswordService, InMemoryStore, JwtConfig, JwtTokenService, LocalPhotoStorage,
};

#[cfg(feature = "postgres")]
use photogram_infra::database::{
    PostgresCommentRepository, PostgresMemberRepository, PostgresPostRepository,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub sns: SnsService,
    pub members: Arc<dyn MemberRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    /// Largest photo upload accepted, in bytes.
    pub max_photo_bytes: usize,
}

/// The three stores the domain service reads and writes.
struct Stores {
    members: Arc<dyn MemberRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl Stores {
    fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            members: store.clone(),
            posts: store.clone(),
            comments: store,
        }
    }

    #[cfg(feature = "postgres")]
    async fn connect(db_config: Option<&DatabaseConfig>) -> Self {
        use photogram_infra::DatabaseConnection;

        let Some(config) = db_config else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Self::in_memory();
        };

        match DatabaseConnection::init(config).await {
            Ok(db) => Self {
                members: Arc::new(PostgresMemberRepository::new(db.conn.clone())),
                posts: Arc::new(PostgresPostRepository::new(db.conn.clone())),
                comments: Arc::new(PostgresCommentRepository::new(db.conn)),
            },
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Self::in_memory()
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn connect(_db_config: Option<&DatabaseConfig>) -> Self {
        tracing::info!("Running without postgres feature - using in-memory store");
        Self::in_memory()
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let stores = Stores::connect(config.database.as_ref()).await;
        let photos = Arc::new(LocalPhotoStorage::new(config.photos.clone()));

        let state = Self::assemble(stores, photos, &config.jwt, config.photos.max_bytes);
        tracing::info!("Application state initialized");
        state
    }

    /// State backed entirely by process memory, apart from `photos`.
    pub fn in_memory(photos: Arc<dyn PhotoStorage>, jwt: &JwtConfig, max_photo_bytes: usize) -> Self {
        Self::assemble(Stores::in_memory(), photos, jwt, max_photo_bytes)
    }

    fn assemble(
        stores: Stores,
        photos: Arc<dyn PhotoStorage>,
        jwt: &JwtConfig,
        max_photo_bytes: usize,
    ) -> Self {
        let sns = SnsService::new(
            stores.members.clone(),
            stores.posts,
            stores.comments,
            photos,
        );

        Self {
            sns,
            members: stores.members,
            tokens: Arc::new(JwtTokenService::new(jwt.clone())),
            passwords: Arc::new(Argon2PasswordService::new()),
            max_photo_bytes,
        }
    }
}

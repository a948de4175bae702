use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod background_task;

pub use domain::{autosave, entities, registry, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{auth, cache, db, limiter, utils};

use autosave::ContentEditor;
use cache::ttl_cache::{SystemClock, TtlCache};
use entities::{asset::AssetKind, content::ContentType};
use errors::AppError;
use limiter::rate_limiter::SubmissionLimiter;
use repositories::{
    asset::AssetRepository,
    background_theme::BackgroundThemeRepository,
    catalog::CatalogRepository,
    client::ClientRepository,
    content::ContentRepository,
    custom_theme::CustomThemeRepository,
    guestbook::GuestbookRepository,
    memory::{MemoryAssetRepo, MemoryStore},
    rsvp::RsvpRepository,
    sqlx_repo::{SqlxAssetRepo, SqlxRepo},
    unified_theme::UnifiedThemeRepository,
};
use settings::AppConfig;
use use_cases::{
    assets::AssetHandler,
    background_themes::BackgroundThemeHandler,
    catalog::CatalogHandler,
    clients::ClientHandler,
    composer::ThemeComposer,
    content::ContentHandler,
    custom_themes::CustomThemeHandler,
    guests::GuestHandler,
    invitation::InvitationRenderer,
    unified_themes::UnifiedThemeHandler,
};

/// Where records live for this process.
#[derive(Clone)]
pub enum Storage {
    Postgres(SqlxRepo),
    Memory(Arc<MemoryStore>),
}

impl Storage {
    pub async fn check_connection(&self) -> Result<(), AppError> {
        match self {
            Storage::Postgres(db) => db.check_connection().await,
            Storage::Memory(_) => Ok(()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Storage::Postgres(_) => "postgres",
            Storage::Memory(_) => "memory",
        }
    }
}

/// One trait object per resource, all backed by the same storage.
#[derive(Clone)]
pub struct Repositories {
    pub clients: Arc<dyn ClientRepository>,
    pub custom_themes: Arc<dyn CustomThemeRepository>,
    pub background_themes: Arc<dyn BackgroundThemeRepository>,
    pub unified_themes: Arc<dyn UnifiedThemeRepository>,
    pub catalog: Arc<dyn CatalogRepository>,
    pub content: Arc<dyn ContentRepository>,
    pub guestbook: Arc<dyn GuestbookRepository>,
    pub rsvps: Arc<dyn RsvpRepository>,
    pub ornament_library: Arc<dyn AssetRepository>,
    pub bank_logos: Arc<dyn AssetRepository>,
    pub music_library: Arc<dyn AssetRepository>,
}

impl Repositories {
    pub fn for_storage(storage: &Storage) -> Self {
        match storage {
            Storage::Postgres(db) => Self::postgres(db.clone()),
            Storage::Memory(store) => Self::in_memory(store.clone()),
        }
    }

    fn postgres(db: SqlxRepo) -> Self {
        let shared = Arc::new(db.clone());
        Repositories {
            clients: shared.clone(),
            custom_themes: shared.clone(),
            background_themes: shared.clone(),
            unified_themes: shared.clone(),
            catalog: shared.clone(),
            content: shared.clone(),
            guestbook: shared.clone(),
            rsvps: shared,
            ornament_library: Arc::new(SqlxAssetRepo::new(db.clone(), AssetKind::OrnamentLibrary)),
            bank_logos: Arc::new(SqlxAssetRepo::new(db.clone(), AssetKind::BankLogo)),
            music_library: Arc::new(SqlxAssetRepo::new(db, AssetKind::Music)),
        }
    }

    fn in_memory(store: Arc<MemoryStore>) -> Self {
        Repositories {
            clients: store.clone(),
            custom_themes: store.clone(),
            background_themes: store.clone(),
            unified_themes: store.clone(),
            catalog: store.clone(),
            content: store.clone(),
            guestbook: store.clone(),
            rsvps: store.clone(),
            ornament_library: Arc::new(MemoryAssetRepo::new(store.clone(), AssetKind::OrnamentLibrary)),
            bank_logos: Arc::new(MemoryAssetRepo::new(store.clone(), AssetKind::BankLogo)),
            music_library: Arc::new(MemoryAssetRepo::new(store, AssetKind::Music)),
        }
    }
}

/// Opens the backend named by `database_url`: `memory://` or a Postgres URL.
pub async fn connect_storage(config: &AppConfig) -> Result<Storage, AppError> {
    if config.uses_memory_storage() {
        tracing::warn!("Using in-memory storage; data is lost on restart");
        return Ok(Storage::Memory(MemoryStore::new()));
    }

    let pool = db::postgres::create_pool(&config.database_url, config.database_max_connections).await?;
    Ok(Storage::Postgres(SqlxRepo::new(pool)))
}

pub struct AppState {
    pub config: AppConfig,
    pub storage: Storage,
    pub clients: ClientHandler,
    pub custom_themes: Arc<CustomThemeHandler>,
    pub background_themes: BackgroundThemeHandler,
    pub unified_themes: UnifiedThemeHandler,
    pub composer: Arc<ThemeComposer>,
    pub catalog: CatalogHandler,
    pub ornament_library: AssetHandler,
    pub bank_logos: AssetHandler,
    pub music_library: AssetHandler,
    pub content: Arc<ContentHandler>,
    pub guests: GuestHandler,
    pub invitations: InvitationRenderer,
    pub limiter: SubmissionLimiter,
}

impl AppState {
    pub fn new(config: AppConfig, storage: Storage) -> Self {
        let repos = Repositories::for_storage(&storage);
        let limiter = SubmissionLimiter::new(config.submission_limit, config.submission_window());

        let custom_themes = Arc::new(CustomThemeHandler::new(
            repos.custom_themes.clone(),
            repos.clients.clone(),
            TtlCache::new(config.theme_cache_ttl(), Arc::new(SystemClock)),
        ));
        let composer = Arc::new(ThemeComposer::new(
            custom_themes.clone(),
            repos.background_themes.clone(),
            repos.unified_themes.clone(),
        ));

        AppState {
            clients: ClientHandler::new(repos.clients.clone()),
            background_themes: BackgroundThemeHandler::new(repos.background_themes.clone(), repos.clients.clone()),
            unified_themes: UnifiedThemeHandler::new(repos.unified_themes.clone(), repos.clients.clone()),
            catalog: CatalogHandler::new(repos.catalog.clone()),
            ornament_library: AssetHandler::new(repos.ornament_library.clone()),
            bank_logos: AssetHandler::new(repos.bank_logos.clone()),
            music_library: AssetHandler::new(repos.music_library.clone()),
            content: Arc::new(ContentHandler::new(repos.content.clone(), repos.clients.clone())),
            guests: GuestHandler::new(
                repos.guestbook.clone(),
                repos.rsvps.clone(),
                repos.clients.clone(),
                limiter.clone(),
            ),
            invitations: InvitationRenderer::new(
                repos.clients,
                repos.content,
                repos.guestbook,
                repos.rsvps,
                composer.clone(),
            ),
            custom_themes,
            composer,
            limiter,
            storage,
            config,
        }
    }

    pub fn assets(&self, kind: AssetKind) -> &AssetHandler {
        match kind {
            AssetKind::OrnamentLibrary => &self.ornament_library,
            AssetKind::BankLogo => &self.bank_logos,
            AssetKind::Music => &self.music_library,
        }
    }

    /// Opens an autosaving editor with the configured debounce.
    pub async fn open_editor(
        &self,
        client_slug: &str,
        content_type: ContentType,
        fields: &[&str],
    ) -> Result<ContentEditor, AppError> {
        ContentEditor::open(self.content.clone(), client_slug, content_type, fields, self.config.autosave_debounce()).await
    }
}

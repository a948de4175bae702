//! In-process storage selected with a `memory://` database URL.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    entities::{
        asset::{AssetKind, LibraryAsset},
        background_theme::CustomBackgroundTheme,
        catalog::{CatalogFilter, CatalogTemplate},
        client::{Client, ClientListQuery, ThemeSlot},
        color_theme::CustomTheme,
        content::{merge_objects, ContentRecord, ContentType},
        guestbook::GuestbookEntry,
        rsvp::Rsvp,
        unified_theme::UnifiedTheme,
    },
    errors::AppError,
    repositories::{
        asset::AssetRepository, background_theme::BackgroundThemeRepository, catalog::CatalogRepository,
        client::ClientRepository, content::ContentRepository, custom_theme::CustomThemeRepository,
        guestbook::GuestbookRepository, rsvp::RsvpRepository, unified_theme::UnifiedThemeRepository,
    },
};

const THEME_EXISTS: &str = "Theme ID already exists";

#[derive(Default)]
pub struct MemoryStore {
    clients: Mutex<BTreeMap<String, Client>>,
    custom_themes: Mutex<BTreeMap<String, CustomTheme>>,
    background_themes: Mutex<BTreeMap<String, CustomBackgroundTheme>>,
    unified_themes: Mutex<BTreeMap<String, UnifiedTheme>>,
    catalog: Mutex<BTreeMap<Uuid, CatalogTemplate>>,
    content: Mutex<BTreeMap<(String, ContentType), ContentRecord>>,
    assets: Mutex<HashMap<AssetKind, BTreeMap<Uuid, LibraryAsset>>>,
    guestbook: Mutex<Vec<GuestbookEntry>>,
    rsvps: Mutex<Vec<Rsvp>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

fn paginate<T>(items: Vec<T>, page: u32, per_page: u32) -> Vec<T> {
    let skip = (page.saturating_sub(1) as usize) * per_page as usize;
    items.into_iter().skip(skip).take(per_page as usize).collect()
}

#[async_trait]
impl ClientRepository for MemoryStore {
    async fn create_client(&self, client: &Client) -> Result<Client, AppError> {
        let mut clients = self.clients.lock();
        if clients.contains_key(&client.slug) {
            return Err(AppError::Conflict("Slug already exists".into()));
        }
        clients.insert(client.slug.clone(), client.clone());
        Ok(client.clone())
    }

    async fn client_slug_exists(&self, slug: &str) -> Result<bool, AppError> {
        Ok(self.clients.lock().contains_key(slug))
    }

    async fn get_client_by_slug(&self, slug: &str) -> Result<Option<Client>, AppError> {
        Ok(self.clients.lock().get(slug).cloned())
    }

    async fn list_clients(&self, query: &ClientListQuery) -> Result<(Vec<Client>, i64), AppError> {
        let term = query.search.as_deref().map(|t| t.trim().to_lowercase()).filter(|t| !t.is_empty());
        let mut matching: Vec<Client> = self
            .clients
            .lock()
            .values()
            .filter(|c| term.as_deref().is_none_or(|t| c.slug.to_lowercase().contains(t)))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = matching.len() as i64;
        Ok((paginate(matching, query.page, query.per_page), total))
    }

    async fn update_client(&self, client: &Client) -> Result<Client, AppError> {
        let mut clients = self.clients.lock();
        match clients.get_mut(&client.slug) {
            Some(stored) => {
                *stored = client.clone();
                Ok(client.clone())
            }
            None => Err(AppError::NotFound("Client not found".into())),
        }
    }

    async fn delete_client(&self, slug: &str) -> Result<bool, AppError> {
        let mut clients = self.clients.lock();
        if clients.remove(slug).is_none() {
            return Ok(false);
        }
        self.content.lock().retain(|(owner, _), _| owner != slug);
        self.guestbook.lock().retain(|e| e.client_slug != slug);
        self.rsvps.lock().retain(|r| r.client_slug != slug);
        Ok(true)
    }

    async fn count_theme_references(&self, slot: ThemeSlot, theme_id: &str) -> Result<i64, AppError> {
        let count = self.clients.lock().values().filter(|c| c.references_theme(slot, theme_id)).count();
        Ok(count as i64)
    }
}

#[async_trait]
impl CustomThemeRepository for MemoryStore {
    async fn create_custom_theme(&self, theme: &CustomTheme) -> Result<CustomTheme, AppError> {
        let mut themes = self.custom_themes.lock();
        if themes.contains_key(&theme.theme_id) {
            return Err(AppError::Conflict(THEME_EXISTS.into()));
        }
        themes.insert(theme.theme_id.clone(), theme.clone());
        Ok(theme.clone())
    }

    async fn get_custom_theme(&self, theme_id: &str, include_backgrounds: bool) -> Result<Option<CustomTheme>, AppError> {
        Ok(self.custom_themes.lock().get(theme_id).cloned().map(|mut t| {
            if !include_backgrounds {
                t.backgrounds = None;
            }
            t
        }))
    }

    async fn list_custom_themes(&self, include_backgrounds: bool) -> Result<Vec<CustomTheme>, AppError> {
        let mut themes: Vec<CustomTheme> = self.custom_themes.lock().values().cloned().collect();
        themes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if !include_backgrounds {
            themes.iter_mut().for_each(|t| t.backgrounds = None);
        }
        Ok(themes)
    }

    async fn update_custom_theme(&self, theme: &CustomTheme) -> Result<CustomTheme, AppError> {
        let mut themes = self.custom_themes.lock();
        match themes.get_mut(&theme.theme_id) {
            Some(stored) => {
                *stored = theme.clone();
                Ok(theme.clone())
            }
            None => Err(AppError::NotFound("Theme not found".into())),
        }
    }

    async fn delete_custom_theme(&self, theme_id: &str) -> Result<bool, AppError> {
        Ok(self.custom_themes.lock().remove(theme_id).is_some())
    }
}

#[async_trait]
impl BackgroundThemeRepository for MemoryStore {
    async fn create_background_theme(&self, theme: &CustomBackgroundTheme) -> Result<CustomBackgroundTheme, AppError> {
        let mut themes = self.background_themes.lock();
        if themes.contains_key(&theme.id) {
            return Err(AppError::Conflict(THEME_EXISTS.into()));
        }
        themes.insert(theme.id.clone(), theme.clone());
        Ok(theme.clone())
    }

    async fn get_background_theme(&self, id: &str) -> Result<Option<CustomBackgroundTheme>, AppError> {
        Ok(self.background_themes.lock().get(id).cloned())
    }

    async fn list_background_themes(&self) -> Result<Vec<CustomBackgroundTheme>, AppError> {
        let mut themes: Vec<_> = self.background_themes.lock().values().cloned().collect();
        themes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(themes)
    }

    async fn update_background_theme(&self, theme: &CustomBackgroundTheme) -> Result<CustomBackgroundTheme, AppError> {
        let mut themes = self.background_themes.lock();
        match themes.get_mut(&theme.id) {
            Some(stored) => {
                *stored = theme.clone();
                Ok(theme.clone())
            }
            None => Err(AppError::NotFound("Background theme not found".into())),
        }
    }

    async fn delete_background_theme(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.background_themes.lock().remove(id).is_some())
    }
}

#[async_trait]
impl UnifiedThemeRepository for MemoryStore {
    async fn create_unified_theme(&self, theme: &UnifiedTheme) -> Result<UnifiedTheme, AppError> {
        let mut themes = self.unified_themes.lock();
        if themes.contains_key(&theme.id) {
            return Err(AppError::Conflict(THEME_EXISTS.into()));
        }
        themes.insert(theme.id.clone(), theme.clone());
        Ok(theme.clone())
    }

    async fn get_unified_theme(&self, id: &str) -> Result<Option<UnifiedTheme>, AppError> {
        Ok(self.unified_themes.lock().get(id).cloned())
    }

    async fn list_unified_themes(&self) -> Result<Vec<UnifiedTheme>, AppError> {
        let mut themes: Vec<_> = self.unified_themes.lock().values().cloned().collect();
        themes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(themes)
    }

    async fn update_unified_theme(&self, theme: &UnifiedTheme) -> Result<UnifiedTheme, AppError> {
        let mut themes = self.unified_themes.lock();
        match themes.get_mut(&theme.id) {
            Some(stored) => {
                *stored = theme.clone();
                Ok(theme.clone())
            }
            None => Err(AppError::NotFound("Unified theme not found".into())),
        }
    }

    async fn delete_unified_theme(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.unified_themes.lock().remove(id).is_some())
    }
}

#[async_trait]
impl CatalogRepository for MemoryStore {
    async fn create_template(&self, template: &CatalogTemplate) -> Result<CatalogTemplate, AppError> {
        self.catalog.lock().insert(template.id, template.clone());
        Ok(template.clone())
    }

    async fn get_template(&self, id: Uuid) -> Result<Option<CatalogTemplate>, AppError> {
        Ok(self.catalog.lock().get(&id).cloned())
    }

    async fn list_templates(&self, filter: &CatalogFilter) -> Result<(Vec<CatalogTemplate>, i64), AppError> {
        let mut matching: Vec<_> = self.catalog.lock().values().filter(|t| t.matches(filter)).cloned().collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = matching.len() as i64;
        Ok((paginate(matching, filter.page, filter.per_page), total))
    }

    async fn update_template(&self, template: &CatalogTemplate) -> Result<CatalogTemplate, AppError> {
        let mut catalog = self.catalog.lock();
        match catalog.get_mut(&template.id) {
            Some(stored) => {
                *stored = template.clone();
                Ok(template.clone())
            }
            None => Err(AppError::NotFound("Catalog template not found".into())),
        }
    }

    async fn delete_template(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.catalog.lock().remove(&id).is_some())
    }
}

#[async_trait]
impl ContentRepository for MemoryStore {
    async fn get_content(&self, client_slug: &str, content_type: ContentType) -> Result<Option<ContentRecord>, AppError> {
        Ok(self.content.lock().get(&(client_slug.to_string(), content_type)).cloned())
    }

    async fn list_content(&self, client_slug: &str) -> Result<Vec<ContentRecord>, AppError> {
        Ok(self
            .content
            .lock()
            .iter()
            .filter(|((owner, _), _)| owner == client_slug)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn replace_content(&self, client_slug: &str, content_type: ContentType, data: &Value) -> Result<ContentRecord, AppError> {
        let record = ContentRecord {
            client_slug: client_slug.to_string(),
            content_type,
            content_data: data.clone(),
            updated_at: Utc::now(),
        };
        self.content
            .lock()
            .insert((client_slug.to_string(), content_type), record.clone());
        Ok(record)
    }

    async fn merge_content(&self, client_slug: &str, content_type: ContentType, patch: &Value) -> Result<ContentRecord, AppError> {
        let mut content = self.content.lock();
        let key = (client_slug.to_string(), content_type);
        let merged = match content.get(&key) {
            Some(existing) => merge_objects(&existing.content_data, patch),
            None => merge_objects(&Value::Null, patch),
        };
        let record = ContentRecord {
            client_slug: client_slug.to_string(),
            content_type,
            content_data: merged,
            updated_at: Utc::now(),
        };
        content.insert(key, record.clone());
        Ok(record)
    }

    async fn delete_content(&self, client_slug: &str, content_type: Option<ContentType>) -> Result<u64, AppError> {
        let mut content = self.content.lock();
        let before = content.len();
        content.retain(|(owner, ct), _| !(owner == client_slug && content_type.is_none_or(|wanted| *ct == wanted)));
        Ok((before - content.len()) as u64)
    }
}

#[async_trait]
impl GuestbookRepository for MemoryStore {
    async fn create_entry(&self, entry: &GuestbookEntry) -> Result<GuestbookEntry, AppError> {
        self.guestbook.lock().push(entry.clone());
        Ok(entry.clone())
    }

    async fn list_entries(&self, client_slug: &str) -> Result<Vec<GuestbookEntry>, AppError> {
        let mut entries: Vec<_> = self
            .guestbook
            .lock()
            .iter()
            .filter(|e| e.client_slug == client_slug)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    async fn delete_entry(&self, id: Uuid) -> Result<bool, AppError> {
        let mut entries = self.guestbook.lock();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        Ok(entries.len() < before)
    }
}

#[async_trait]
impl RsvpRepository for MemoryStore {
    async fn create_rsvp(&self, rsvp: &Rsvp) -> Result<Rsvp, AppError> {
        self.rsvps.lock().push(rsvp.clone());
        Ok(rsvp.clone())
    }

    async fn list_rsvps(&self, client_slug: &str) -> Result<Vec<Rsvp>, AppError> {
        let mut rsvps: Vec<_> = self
            .rsvps
            .lock()
            .iter()
            .filter(|r| r.client_slug == client_slug)
            .cloned()
            .collect();
        rsvps.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rsvps)
    }

    async fn delete_rsvp(&self, id: Uuid) -> Result<bool, AppError> {
        let mut rsvps = self.rsvps.lock();
        let before = rsvps.len();
        rsvps.retain(|r| r.id != id);
        Ok(rsvps.len() < before)
    }
}

/// One asset library backed by the shared store.
#[derive(Clone)]
pub struct MemoryAssetRepo {
    store: Arc<MemoryStore>,
    kind: AssetKind,
}

impl MemoryAssetRepo {
    pub fn new(store: Arc<MemoryStore>, kind: AssetKind) -> Self {
        MemoryAssetRepo { store, kind }
    }
}

#[async_trait]
impl AssetRepository for MemoryAssetRepo {
    fn kind(&self) -> AssetKind {
        self.kind
    }

    async fn create_asset(&self, asset: &LibraryAsset) -> Result<LibraryAsset, AppError> {
        self.store
            .assets
            .lock()
            .entry(self.kind)
            .or_default()
            .insert(asset.id, asset.clone());
        Ok(asset.clone())
    }

    async fn get_asset(&self, id: Uuid) -> Result<Option<LibraryAsset>, AppError> {
        Ok(self
            .store
            .assets
            .lock()
            .get(&self.kind)
            .and_then(|assets| assets.get(&id))
            .cloned())
    }

    async fn list_assets(&self, category: Option<String>) -> Result<Vec<LibraryAsset>, AppError> {
        let mut assets: Vec<_> = self
            .store
            .assets
            .lock()
            .get(&self.kind)
            .map(|assets| {
                assets
                    .values()
                    .filter(|a| category.is_none() || a.category == category)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        assets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(assets)
    }

    async fn update_asset(&self, asset: &LibraryAsset) -> Result<LibraryAsset, AppError> {
        let mut all = self.store.assets.lock();
        match all.get_mut(&self.kind).and_then(|assets| assets.get_mut(&asset.id)) {
            Some(stored) => {
                *stored = asset.clone();
                Ok(asset.clone())
            }
            None => Err(AppError::NotFound(format!("No {} with id {}", self.kind, asset.id))),
        }
    }

    async fn delete_asset(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self
            .store
            .assets
            .lock()
            .get_mut(&self.kind)
            .is_some_and(|assets| assets.remove(&id).is_some()))
    }
}

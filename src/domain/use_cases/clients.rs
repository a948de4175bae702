use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::password::{generate_password, hash_password},
    entities::{
        client::{Client, ClientChanges, ClientListQuery, CreateClientRequest, CreateClientResponse, UpdateClientRequest},
        response::Page,
    },
    errors::AppError,
    repositories::client::ClientRepository,
};

/// Numbered suffixes tried before falling back to a random one.
const MAX_NUMBERED_SUFFIX: u32 = 100;

const MAX_CREATE_ATTEMPTS: u32 = 5;

pub struct ClientHandler {
    clients: Arc<dyn ClientRepository>,
}

impl ClientHandler {
    pub fn new(clients: Arc<dyn ClientRepository>) -> Self {
        ClientHandler { clients }
    }

    /// Creates a client under a unique slug derived from the requested one.
    pub async fn create_client(&self, request: CreateClientRequest) -> Result<CreateClientResponse, AppError> {
        request.validate()?;

        let original_slug = slug::slugify(request.slug.trim());
        if original_slug.is_empty() {
            return Err(AppError::InvalidInput("Slug must contain letters or digits".into()));
        }

        let (password_hash, generated_password) = match request.password.as_deref() {
            Some(password) => (hash_password(password)?, None),
            None => {
                let password = generate_password();
                (hash_password(&password)?, Some(password.to_string()))
            }
        };

        let now = Utc::now();
        let mut client = Client {
            id: Uuid::new_v4(),
            slug: String::new(),
            theme: request.theme,
            color_theme: request.color_theme,
            background_theme: request.background_theme,
            password_hash: Some(password_hash),
            created_at: now,
            updated_at: now,
        };

        // A concurrent create can take the slug between the lookup and the insert.
        let mut attempt = 1;
        let client = loop {
            client.slug = self.unique_slug(&original_slug).await?;
            match self.clients.create_client(&client).await {
                Err(AppError::Conflict(_)) if attempt < MAX_CREATE_ATTEMPTS => {
                    warn!(slug = %client.slug, attempt, "slug taken concurrently, retrying");
                    attempt += 1;
                }
                result => break result?,
            }
        };
        let slug = client.slug.clone();
        info!(slug = %client.slug, "client created");

        Ok(CreateClientResponse {
            was_modified: slug != original_slug,
            slug,
            original_slug,
            client,
            generated_password,
        })
    }

    async fn unique_slug(&self, base: &str) -> Result<String, AppError> {
        if !self.clients.client_slug_exists(base).await? {
            return Ok(base.to_string());
        }
        for n in 2..=MAX_NUMBERED_SUFFIX {
            let candidate = format!("{}-{}", base, n);
            if !self.clients.client_slug_exists(&candidate).await? {
                return Ok(candidate);
            }
        }
        let suffix = Uuid::new_v4().simple().to_string();
        Ok(format!("{}-{}", base, &suffix[..8]))
    }

    pub async fn get_client(&self, slug: &str) -> Result<Client, AppError> {
        self.clients
            .get_client_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Client not found".into()))
    }

    pub async fn list_clients(&self, query: ClientListQuery) -> Result<Page<Client>, AppError> {
        let (clients, total) = self.clients.list_clients(&query).await?;
        Ok(Page::new(clients, total, query.page, query.per_page))
    }

    /// Reassigns themes and optionally resets the password.
    pub async fn update_client(&self, request: UpdateClientRequest) -> Result<Client, AppError> {
        request.validate()?;

        let mut client = self.get_client(&request.slug).await?;
        let password_hash = request.password.as_deref().map(hash_password).transpose()?;

        ClientChanges {
            theme: request.theme,
            color_theme: request.color_theme,
            background_theme: request.background_theme,
            password_hash,
        }
        .apply_to(&mut client, Utc::now());

        self.clients.update_client(&client).await
    }

    /// Deletes the client together with its content, guestbook and RSVP rows.
    pub async fn delete_client(&self, slug: &str) -> Result<(), AppError> {
        if !self.clients.delete_client(slug).await? {
            return Err(AppError::NotFound("Client not found".into()));
        }
        info!(slug, "client deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::password::verify_password, repositories::client::MockClientRepository};
    use crate::{entities::client::ThemeSlot, repositories::memory::MemoryStore};
    use async_trait::async_trait;
    use mockall::predicate::eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Barrier;

    /// Holds the first two slug lookups until both have seen the slug as free.
    struct InterleavedLookups {
        store: Arc<MemoryStore>,
        barrier: Barrier,
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl ClientRepository for InterleavedLookups {
        async fn create_client(&self, client: &Client) -> Result<Client, AppError> {
            self.store.create_client(client).await
        }

        async fn client_slug_exists(&self, slug: &str) -> Result<bool, AppError> {
            let exists = self.store.client_slug_exists(slug).await?;
            if self.lookups.fetch_add(1, Ordering::SeqCst) < 2 {
                self.barrier.wait().await;
            }
            Ok(exists)
        }

        async fn get_client_by_slug(&self, slug: &str) -> Result<Option<Client>, AppError> {
            self.store.get_client_by_slug(slug).await
        }

        async fn list_clients(&self, query: &ClientListQuery) -> Result<(Vec<Client>, i64), AppError> {
            self.store.list_clients(query).await
        }

        async fn update_client(&self, client: &Client) -> Result<Client, AppError> {
            self.store.update_client(client).await
        }

        async fn delete_client(&self, slug: &str) -> Result<bool, AppError> {
            self.store.delete_client(slug).await
        }

        async fn count_theme_references(&self, slot: ThemeSlot, theme_id: &str) -> Result<i64, AppError> {
            self.store.count_theme_references(slot, theme_id).await
        }
    }

    fn request(slug: &str, password: Option<&str>) -> CreateClientRequest {
        CreateClientRequest {
            slug: slug.into(),
            theme: None,
            color_theme: Some("sage_garden".into()),
            background_theme: None,
            password: password.map(Into::into),
        }
    }

    #[tokio::test]
    async fn taken_slug_gets_a_numbered_suffix() {
        let mut repo = MockClientRepository::new();
        repo.expect_client_slug_exists().with(eq("sari-budi")).returning(|_| Ok(true));
        repo.expect_client_slug_exists().with(eq("sari-budi-2")).returning(|_| Ok(true));
        repo.expect_client_slug_exists().with(eq("sari-budi-3")).returning(|_| Ok(false));
        repo.expect_create_client().returning(|c| Ok(c.clone()));

        let handler = ClientHandler::new(Arc::new(repo));
        let response = handler.create_client(request("Sari & Budi", Some("rahasia"))).await.unwrap();

        assert_eq!(response.slug, "sari-budi-3");
        assert_eq!(response.original_slug, "sari-budi");
        assert!(response.was_modified);
        assert!(response.generated_password.is_none());
        let hash = response.client.password_hash.unwrap();
        assert!(verify_password("rahasia", &hash).unwrap());
    }

    #[tokio::test]
    async fn missing_password_is_generated_and_returned_once() {
        let mut repo = MockClientRepository::new();
        repo.expect_client_slug_exists().returning(|_| Ok(false));
        repo.expect_create_client().returning(|c| Ok(c.clone()));

        let handler = ClientHandler::new(Arc::new(repo));
        let response = handler.create_client(request("ayu-dimas", None)).await.unwrap();

        assert!(!response.was_modified);
        let generated = response.generated_password.unwrap();
        assert!(verify_password(&generated, response.client.password_hash.as_deref().unwrap()).unwrap());
    }

    #[tokio::test]
    async fn slug_without_word_characters_is_rejected() {
        let handler = ClientHandler::new(Arc::new(MockClientRepository::new()));
        let err = handler.create_client(request("!!!", None)).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn deleting_an_unknown_client_is_not_found() {
        let mut repo = MockClientRepository::new();
        repo.expect_delete_client().returning(|_| Ok(false));

        let handler = ClientHandler::new(Arc::new(repo));
        assert!(matches!(handler.delete_client("ghost").await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn concurrent_creates_of_one_slug_both_succeed() {
        let repo = InterleavedLookups {
            store: MemoryStore::new(),
            barrier: Barrier::new(2),
            lookups: AtomicUsize::new(0),
        };
        let handler = ClientHandler::new(Arc::new(repo));

        let (first, second) = tokio::join!(
            handler.create_client(request("sari-budi", Some("rahasia"))),
            handler.create_client(request("sari-budi", Some("rahasia"))),
        );
        let (first, second) = (first.unwrap(), second.unwrap());

        let mut slugs = vec![first.slug.clone(), second.slug.clone()];
        slugs.sort();
        assert_eq!(slugs, ["sari-budi", "sari-budi-2"]);
        assert!(first.was_modified != second.was_modified);
    }

    #[tokio::test]
    async fn persistent_conflicts_give_up_after_bounded_attempts() {
        let mut repo = MockClientRepository::new();
        repo.expect_client_slug_exists().returning(|_| Ok(false));
        repo.expect_create_client()
            .times(MAX_CREATE_ATTEMPTS as usize)
            .returning(|_| Err(AppError::Conflict("Slug already exists".into())));

        let handler = ClientHandler::new(Arc::new(repo));
        let err = handler.create_client(request("sari-budi", Some("rahasia"))).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}

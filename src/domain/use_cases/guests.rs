use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{
        guestbook::{GuestbookEntry, NewGuestbookEntry},
        rsvp::{NewRsvpRequest, Rsvp, RsvpSummary},
    },
    errors::AppError,
    limiter::rate_limiter::SubmissionLimiter,
    repositories::{client::ClientRepository, guestbook::GuestbookRepository, rsvp::RsvpRepository},
};

#[derive(Debug, Serialize)]
pub struct RsvpListing {
    pub rsvps: Vec<Rsvp>,
    pub summary: RsvpSummary,
}

/// Public guest submissions (guestbook and RSVP), rate-limited per IP.
pub struct GuestHandler {
    guestbook: Arc<dyn GuestbookRepository>,
    rsvps: Arc<dyn RsvpRepository>,
    clients: Arc<dyn ClientRepository>,
    limiter: SubmissionLimiter,
}

impl GuestHandler {
    pub fn new(
        guestbook: Arc<dyn GuestbookRepository>,
        rsvps: Arc<dyn RsvpRepository>,
        clients: Arc<dyn ClientRepository>,
        limiter: SubmissionLimiter,
    ) -> Self {
        GuestHandler { guestbook, rsvps, clients, limiter }
    }

    pub async fn sign_guestbook(&self, request: NewGuestbookEntry, client_ip: &str) -> Result<GuestbookEntry, AppError> {
        request.validate()?;
        self.admit(client_ip)?;
        self.ensure_client(&request.client_slug).await?;

        let entry = request
            .into_entry(Utc::now())
            .ok_or_else(|| AppError::InvalidInput("Name and message cannot be empty".into()))?;
        let entry = self.guestbook.create_entry(&entry).await?;
        info!(slug = %entry.client_slug, "guestbook entry added");
        Ok(entry)
    }

    pub async fn list_guestbook(&self, client_slug: &str) -> Result<Vec<GuestbookEntry>, AppError> {
        self.guestbook.list_entries(client_slug).await
    }

    pub async fn delete_guestbook_entry(&self, id: Uuid) -> Result<(), AppError> {
        if !self.guestbook.delete_entry(id).await? {
            return Err(AppError::NotFound("Guestbook entry not found".into()));
        }
        Ok(())
    }

    pub async fn submit_rsvp(&self, request: NewRsvpRequest, client_ip: &str) -> Result<Rsvp, AppError> {
        request.validate()?;
        self.admit(client_ip)?;
        self.ensure_client(&request.client_slug).await?;

        let rsvp = request
            .into_rsvp(Utc::now())
            .ok_or_else(|| AppError::InvalidInput("Name cannot be empty".into()))?;
        let rsvp = self.rsvps.create_rsvp(&rsvp).await?;
        info!(slug = %rsvp.client_slug, attendance = %rsvp.attendance, "rsvp received");
        Ok(rsvp)
    }

    pub async fn list_rsvps(&self, client_slug: &str) -> Result<RsvpListing, AppError> {
        let rsvps = self.rsvps.list_rsvps(client_slug).await?;
        let summary = RsvpSummary::from_rsvps(&rsvps);
        Ok(RsvpListing { rsvps, summary })
    }

    pub async fn delete_rsvp(&self, id: Uuid) -> Result<(), AppError> {
        if !self.rsvps.delete_rsvp(id).await? {
            return Err(AppError::NotFound("RSVP not found".into()));
        }
        Ok(())
    }

    fn admit(&self, client_ip: &str) -> Result<(), AppError> {
        self.limiter.check(client_ip).map_err(|retry_after| {
            warn!(client_ip, retry_after, "submission rate limit hit");
            AppError::RateLimited(format!("Too many submissions. Try again in {} seconds", retry_after))
        })
    }

    async fn ensure_client(&self, slug: &str) -> Result<(), AppError> {
        if !self.clients.client_slug_exists(slug).await? {
            return Err(AppError::NotFound("Client not found".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entities::rsvp::Attendance,
        repositories::{client::MockClientRepository, guestbook::MockGuestbookRepository, rsvp::MockRsvpRepository},
    };
    use std::time::Duration;

    fn handler(guestbook: MockGuestbookRepository, rsvps: MockRsvpRepository, limit: u64) -> GuestHandler {
        let mut clients = MockClientRepository::new();
        clients.expect_client_slug_exists().returning(|slug| Ok(slug == "sari-budi"));
        GuestHandler::new(
            Arc::new(guestbook),
            Arc::new(rsvps),
            Arc::new(clients),
            SubmissionLimiter::new(limit, Duration::from_secs(60)),
        )
    }

    fn entry(slug: &str) -> NewGuestbookEntry {
        NewGuestbookEntry { client_slug: slug.into(), name: "Rina".into(), message: "Selamat menempuh hidup baru".into() }
    }

    #[tokio::test]
    async fn submissions_beyond_the_limit_are_refused() {
        let mut guestbook = MockGuestbookRepository::new();
        guestbook.expect_create_entry().times(2).returning(|e| Ok(e.clone()));
        let handler = handler(guestbook, MockRsvpRepository::new(), 2);

        handler.sign_guestbook(entry("sari-budi"), "10.0.0.1").await.unwrap();
        handler.sign_guestbook(entry("sari-budi"), "10.0.0.1").await.unwrap();
        let err = handler.sign_guestbook(entry("sari-budi"), "10.0.0.1").await.unwrap_err();

        assert!(matches!(err, AppError::RateLimited(_)));
    }

    #[tokio::test]
    async fn unknown_client_is_not_found() {
        let handler = handler(MockGuestbookRepository::new(), MockRsvpRepository::new(), 5);
        let err = handler.sign_guestbook(entry("ghost"), "10.0.0.2").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn markup_only_message_is_rejected() {
        let mut guestbook = MockGuestbookRepository::new();
        guestbook.expect_create_entry().never();
        let handler = handler(guestbook, MockRsvpRepository::new(), 5);

        let mut request = entry("sari-budi");
        request.message = "<script>alert(1)</script>".into();
        assert!(matches!(handler.sign_guestbook(request, "10.0.0.3").await, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn listing_carries_a_summary() {
        let mut rsvps = MockRsvpRepository::new();
        rsvps.expect_list_rsvps().returning(|slug| {
            let rsvp = NewRsvpRequest {
                client_slug: slug.into(),
                name: "Tamu".into(),
                attendance: Attendance::Attending,
                guest_count: 3,
                message: None,
            }
            .into_rsvp(Utc::now())
            .unwrap();
            Ok(vec![rsvp])
        });
        let handler = handler(MockGuestbookRepository::new(), rsvps, 5);

        let listing = handler.list_rsvps("sari-budi").await.unwrap();
        assert_eq!(listing.summary.expected_guests, 3);
        assert_eq!(listing.rsvps.len(), 1);
    }
}

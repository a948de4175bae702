use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::utils::markdown::strip_all_tags;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GuestbookEntry {
    pub id: Uuid,
    pub client_slug: String,
    pub name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewGuestbookEntry {
    #[validate(length(min = 1, max = 100, message = "Client slug is required"))]
    pub client_slug: String,

    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, max = 1000, message = "Message must be between 1 and 1000 characters"))]
    pub message: String,
}

impl NewGuestbookEntry {
    /// Strips markup; fails when nothing printable is left.
    pub fn into_entry(self, now: DateTime<Utc>) -> Option<GuestbookEntry> {
        let name = strip_all_tags(&self.name).trim().to_string();
        let message = strip_all_tags(&self.message).trim().to_string();
        if name.is_empty() || message.is_empty() {
            return None;
        }
        Some(GuestbookEntry {
            id: Uuid::new_v4(),
            client_slug: self.client_slug,
            name,
            message,
            created_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_is_stripped() {
        let entry = NewGuestbookEntry {
            client_slug: "sari-budi".into(),
            name: "<b>Rina</b>".into(),
            message: "Selamat! <script>alert(1)</script>".into(),
        }
        .into_entry(Utc::now())
        .unwrap();

        assert_eq!(entry.name, "Rina");
        assert_eq!(entry.message, "Selamat!");
    }

    #[test]
    fn markup_only_message_is_refused() {
        let entry = NewGuestbookEntry {
            client_slug: "sari-budi".into(),
            name: "Rina".into(),
            message: "<img src=x>".into(),
        }
        .into_entry(Utc::now());
        assert!(entry.is_none());
    }
}

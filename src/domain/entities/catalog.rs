use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::entities::{option_fields::OptionField, validation::validate_http_url};

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CatalogTemplate {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    /// Whole currency units.
    pub price: i64,
    pub url: String,
    pub badge: Option<String>,
    pub image_base64: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCatalogTemplateRequest {
    #[validate(length(min = 1, max = 150, message = "Title is required"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,

    #[validate(length(min = 1, max = 50, message = "Category is required"))]
    pub category: String,

    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price: i64,

    #[validate(custom(function = "validate_http_url"))]
    pub url: String,

    #[validate(length(min = 1, max = 30))]
    pub badge: Option<String>,

    #[validate(length(min = 1, message = "Template image is required"))]
    pub image_base64: String,
}

impl NewCatalogTemplateRequest {
    pub fn into_template(self, now: DateTime<Utc>) -> CatalogTemplate {
        CatalogTemplate {
            id: Uuid::new_v4(),
            title: self.title.trim().to_string(),
            description: self.description,
            category: self.category.trim().to_lowercase(),
            price: self.price,
            url: self.url,
            badge: self.badge,
            image_base64: self.image_base64,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCatalogTemplateRequest {
    pub id: Uuid,

    #[validate(length(min = 1, max = 150, message = "Title cannot be empty"))]
    pub title: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Category cannot be empty"))]
    pub category: Option<String>,

    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price: Option<i64>,

    #[validate(custom(function = "validate_http_url"))]
    pub url: Option<String>,

    #[serde(default)]
    pub badge: OptionField<String>,

    #[validate(length(min = 1, message = "Template image cannot be empty"))]
    pub image_base64: Option<String>,
}

impl UpdateCatalogTemplateRequest {
    pub fn apply_to(self, template: &mut CatalogTemplate, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            template.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            template.description = description;
        }
        if let Some(category) = self.category {
            template.category = category.trim().to_lowercase();
        }
        if let Some(price) = self.price {
            template.price = price;
        }
        if let Some(url) = self.url {
            template.url = url;
        }
        template.badge = self.badge.apply_to(template.badge.take());
        if let Some(image) = self.image_base64 {
            template.image_base64 = image;
        }
        template.updated_at = now;
    }

    /// Badge length is checked here since `OptionField` has no validator impl.
    pub fn badge_is_valid(&self) -> bool {
        self.badge
            .flatten_str()
            .is_none_or(|badge| !badge.trim().is_empty() && badge.chars().count() <= 30)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: u32,
    pub per_page: u32,
}

impl CatalogTemplate {
    pub fn matches(&self, filter: &CatalogFilter) -> bool {
        let category_ok = filter
            .category
            .as_deref()
            .is_none_or(|c| self.category.eq_ignore_ascii_case(c));
        let search_ok = filter.search.as_deref().is_none_or(|term| {
            let term = term.to_lowercase();
            self.title.to_lowercase().contains(&term) || self.description.to_lowercase().contains(&term)
        });
        category_ok && search_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn template() -> CatalogTemplate {
        NewCatalogTemplateRequest {
            title: "Javanese Gold".into(),
            description: "Elegant batik motif".into(),
            category: " Premium ".into(),
            price: 150_000,
            url: "https://demo.example.com/javanese-gold".into(),
            badge: Some("New".into()),
            image_base64: "/images/catalog/javanese.jpg".into(),
        }
        .into_template(Utc::now())
    }

    #[test]
    fn category_is_normalized_and_filterable() {
        let t = template();
        assert_eq!(t.category, "premium");

        let filter = CatalogFilter { category: Some("PREMIUM".into()), search: Some("batik".into()), ..Default::default() };
        assert!(t.matches(&filter));

        let other = CatalogFilter { category: Some("basic".into()), ..Default::default() };
        assert!(!t.matches(&other));
    }

    #[test]
    fn badge_can_be_cleared_with_null() {
        let mut t = template();
        let update: UpdateCatalogTemplateRequest =
            serde_json::from_value(json!({ "id": t.id, "badge": null })).unwrap();
        assert!(update.badge_is_valid());
        update.apply_to(&mut t, Utc::now());
        assert_eq!(t.badge, None);
        assert_eq!(t.title, "Javanese Gold");
    }
}

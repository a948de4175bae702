use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::entities::section::Section;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct OrnamentPosition {
    /// Percent of the section height.
    #[validate(range(min = -50.0, max = 150.0, message = "top must be between -50 and 150"))]
    pub top: f64,
    /// Percent of the section width.
    #[validate(range(min = -50.0, max = 150.0, message = "left must be between -50 and 150"))]
    pub left: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct OrnamentTransform {
    #[validate(range(min = 0.5, max = 3.0, message = "scale must be between 0.5 and 3"))]
    pub scale: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "rotate must be between -180 and 180"))]
    pub rotate: f64,
}

impl Default for OrnamentTransform {
    fn default() -> Self {
        Self { scale: 1.0, rotate: 0.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrnamentStyle {
    #[validate(range(min = 50, max = 500, message = "width must be between 50 and 500"))]
    pub width: u32,
    #[validate(range(min = 1, max = 2000))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[validate(range(min = 0.0, max = 1.0, message = "opacity must be between 0 and 1"))]
    pub opacity: f64,
    #[validate(range(min = 5, max = 20, message = "zIndex must be between 5 and 20"))]
    pub z_index: i32,
}

/// Where an ornament sits relative to section content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OrnamentLayer {
    Behind,
    Middle,
    Front,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ornament {
    pub id: String,
    pub section: Section,
    pub name: String,
    pub image: String,
    pub position: OrnamentPosition,
    pub transform: OrnamentTransform,
    pub style: OrnamentStyle,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
}

impl Ornament {
    pub fn layer(&self) -> OrnamentLayer {
        match self.style.z_index {
            z if z < 10 => OrnamentLayer::Behind,
            z if z >= 15 => OrnamentLayer::Front,
            _ => OrnamentLayer::Middle,
        }
    }

    /// Inline style for an absolutely positioned ornament.
    pub fn css(&self) -> String {
        let mut css = format!(
            "position: absolute; top: {}%; left: {}%; width: {}px; ",
            self.position.top, self.position.left, self.style.width
        );
        if let Some(height) = self.style.height {
            css.push_str(&format!("height: {}px; ", height));
        }
        css.push_str(&format!(
            "opacity: {}; z-index: {}; transform: scale({}) rotate({}deg); pointer-events: none;",
            self.style.opacity, self.style.z_index, self.transform.scale, self.transform.rotate
        ));
        css
    }
}

/// Ornament as submitted by the editor. Image size is checked separately.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrnamentInput {
    #[serde(default)]
    #[validate(length(min = 1, max = 64))]
    pub id: Option<String>,

    pub section: Section,

    #[validate(length(min = 1, max = 100, message = "Ornament name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Ornament image is required"))]
    pub image: String,

    #[validate(nested)]
    pub position: OrnamentPosition,

    #[serde(default)]
    #[validate(nested)]
    pub transform: OrnamentTransform,

    #[validate(nested)]
    pub style: OrnamentStyle,

    #[serde(default = "default_visible")]
    pub is_visible: bool,
}

fn default_visible() -> bool {
    true
}

impl OrnamentInput {
    pub fn into_ornament(self, now: DateTime<Utc>) -> Ornament {
        Ornament {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            section: self.section,
            name: self.name.trim().to_string(),
            image: self.image,
            position: self.position,
            transform: self.transform,
            style: self.style,
            is_visible: self.is_visible,
            created_at: now,
        }
    }

    /// Replaces `existing` in place, keeping its id and creation time.
    pub fn replace(self, existing: &Ornament) -> Ornament {
        let mut ornament = self.into_ornament(existing.created_at);
        ornament.id = existing.id.clone();
        ornament
    }
}

#[cfg(test)]
pub(crate) fn sample_input(section: Section, z_index: i32) -> OrnamentInput {
    OrnamentInput {
        id: None,
        section,
        name: "Rose corner".into(),
        image: "/images/ornaments/rose.png".into(),
        position: OrnamentPosition { top: 10.0, left: 90.0 },
        transform: OrnamentTransform { scale: 1.5, rotate: -45.0 },
        style: OrnamentStyle { width: 120, height: None, opacity: 0.8, z_index },
        is_visible: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn layer_follows_z_index() {
        let now = Utc::now();
        let behind = sample_input(Section::Hero, 5).into_ornament(now);
        let middle = sample_input(Section::Hero, 12).into_ornament(now);
        let front = sample_input(Section::Hero, 15).into_ornament(now);

        assert_eq!(behind.layer(), OrnamentLayer::Behind);
        assert_eq!(middle.layer(), OrnamentLayer::Middle);
        assert_eq!(front.layer(), OrnamentLayer::Front);
    }

    #[test]
    fn css_reflects_position_and_transform() {
        let ornament = sample_input(Section::Couple, 15).into_ornament(Utc::now());
        let css = ornament.css();

        assert!(css.contains("top: 10%; left: 90%; width: 120px;"));
        assert!(css.contains("opacity: 0.8; z-index: 15;"));
        assert!(css.contains("transform: scale(1.5) rotate(-45deg);"));
        assert!(!css.contains("height"));
    }

    #[test]
    fn out_of_range_values_fail_validation() {
        let input: OrnamentInput = serde_json::from_value(json!({
            "section": "hero",
            "name": "Leaf",
            "image": "/images/leaf.png",
            "position": { "top": 10, "left": 10 },
            "transform": { "scale": 4, "rotate": 200 },
            "style": { "width": 40, "opacity": 1.5, "zIndex": 25 }
        }))
        .unwrap();

        let errors = crate::errors::AppError::from(input.validate().unwrap_err());
        let crate::errors::AppError::ValidationError(fields) = errors else {
            panic!("expected validation error");
        };
        let paths: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
        for expected in ["transform.scale", "transform.rotate", "style.width", "style.opacity"] {
            assert!(paths.contains(&expected), "missing {expected} in {paths:?}");
        }
        assert!(paths.iter().any(|p| p.starts_with("style.z")), "missing zIndex in {paths:?}");
    }

    #[test]
    fn replace_keeps_identity() {
        let now = Utc::now();
        let existing = sample_input(Section::Hero, 5).into_ornament(now);
        let mut edit = sample_input(Section::Closing, 18);
        edit.id = Some("ignored".into());

        let replaced = edit.replace(&existing);
        assert_eq!(replaced.id, existing.id);
        assert_eq!(replaced.created_at, existing.created_at);
        assert_eq!(replaced.section, Section::Closing);
    }
}

//! Compiled-in color and background themes.
//!
//! Built-ins are immutable. `original` must always be present in both maps,
//! it is where every unresolved theme reference ends up.

use once_cell::sync::Lazy;

use crate::{
    constants::ORIGINAL_THEME_ID,
    entities::{
        background_theme::{BackgroundTheme, CoupleImages, SectionBackgrounds, ThemeImages},
        color_theme::{ColorTheme, CustomStyles, ThemeColors},
        unified_theme::UnifiedTheme,
    },
};

#[allow(clippy::too_many_arguments)]
fn palette(
    primary: &str,
    primarylight: &str,
    darkprimary: &str,
    textprimary: &str,
    gold: &str,
    lightblue: &str,
    secondary: &str,
    accent: &str,
) -> ThemeColors {
    ThemeColors {
        primary: primary.into(),
        primarylight: primarylight.into(),
        darkprimary: darkprimary.into(),
        textprimary: textprimary.into(),
        gold: gold.into(),
        lightblue: lightblue.into(),
        secondary: secondary.into(),
        accent: accent.into(),
    }
}

fn styles(border_radius: &str, box_shadow: &str, gradient: &str) -> CustomStyles {
    CustomStyles {
        border_radius: border_radius.into(),
        box_shadow: box_shadow.into(),
        gradient: gradient.into(),
    }
}

fn builtin_color(id: &str, name: &str, description: &str, colors: ThemeColors, custom_styles: CustomStyles) -> ColorTheme {
    ColorTheme {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        colors,
        custom_styles,
    }
}

static COLOR_THEMES: Lazy<Vec<ColorTheme>> = Lazy::new(|| {
    vec![
        builtin_color(
            ORIGINAL_THEME_ID,
            "Original",
            "Warm brown and gold, the default invitation look",
            palette("#8B7355", "#D4C4B0", "#5C4A3A", "#3E3E3E", "#C9A961", "#E8F4F8", "#F5F0E8", "#B8860B"),
            CustomStyles::default(),
        ),
        builtin_color(
            "sage_garden",
            "Sage Garden",
            "Soft greens for garden and outdoor weddings",
            palette("#87A96B", "#C5D6B8", "#4F6B3A", "#2F3B2A", "#D4AF37", "#EEF5EA", "#F4F1E8", "#6B8E4E"),
            styles("1.25rem", "0 8px 24px rgba(79, 107, 58, 0.15)", "linear-gradient(135deg, #F4F1E8 0%, #EEF5EA 100%)"),
        ),
        builtin_color(
            "dusty_rose",
            "Dusty Rose",
            "Muted pinks with a romantic feel",
            palette("#C08081", "#E8C5C5", "#8E5556", "#4A3535", "#D4A574", "#F9EEEE", "#FBF5F3", "#B56576"),
            styles("1.5rem", "0 10px 30px rgba(142, 85, 86, 0.15)", "linear-gradient(135deg, #FBF5F3 0%, #F9EEEE 100%)"),
        ),
        builtin_color(
            "navy_gold",
            "Navy & Gold",
            "Formal navy with gold accents",
            palette("#1F3A5F", "#8FA6C1", "#0F1F33", "#1A1A2E", "#D4AF37", "#E6EEF7", "#F7F5EF", "#C5A028"),
            styles("0.75rem", "0 12px 32px rgba(15, 31, 51, 0.25)", "linear-gradient(135deg, #0F1F33 0%, #1F3A5F 100%)"),
        ),
        builtin_color(
            "terracotta",
            "Terracotta",
            "Earthy oranges for rustic celebrations",
            palette("#C66B3D", "#E8B598", "#8A4526", "#3D2B22", "#D9A441", "#F6ECE4", "#FAF3EC", "#A0522D"),
            styles("1rem", "0 10px 28px rgba(138, 69, 38, 0.18)", "linear-gradient(135deg, #FAF3EC 0%, #F6ECE4 100%)"),
        ),
    ]
});

fn image_set(dir: &str) -> ThemeImages {
    let base = format!("/images/themes/{}", dir);
    ThemeImages {
        hero: format!("{}/hero.jpg", base),
        background: format!("{}/background.jpg", base),
        gallery: (1..=4).map(|n| format!("{}/gallery-{}.jpg", base, n)).collect(),
        couple: CoupleImages {
            bride: format!("{}/bride.jpg", base),
            groom: format!("{}/groom.jpg", base),
        },
    }
}

static BACKGROUND_THEMES: Lazy<Vec<BackgroundTheme>> = Lazy::new(|| {
    [
        (ORIGINAL_THEME_ID, "Original", "Classic cream paper textures"),
        ("floral", "Floral", "Watercolor flowers and greenery"),
        ("rustic", "Rustic", "Wood, linen and dried flowers"),
        ("minimalist", "Minimalist", "Clean whites with fine line art"),
    ]
    .into_iter()
    .map(|(id, name, description)| BackgroundTheme {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        images: image_set(id),
    })
    .collect()
});

/// Read-only unified themes: (id, color half, background half).
const BUILTIN_PAIRS: [(&str, &str, &str); 5] = [
    (ORIGINAL_THEME_ID, ORIGINAL_THEME_ID, ORIGINAL_THEME_ID),
    ("sage_garden", "sage_garden", "floral"),
    ("dusty_rose", "dusty_rose", "floral"),
    ("navy_gold", "navy_gold", "minimalist"),
    ("terracotta", "terracotta", "rustic"),
];

pub fn color_themes() -> &'static [ColorTheme] {
    &COLOR_THEMES
}

pub fn background_themes() -> &'static [BackgroundTheme] {
    &BACKGROUND_THEMES
}

pub fn color_theme(id: &str) -> Option<&'static ColorTheme> {
    COLOR_THEMES.iter().find(|t| t.id == id)
}

pub fn background_theme(id: &str) -> Option<&'static BackgroundTheme> {
    BACKGROUND_THEMES.iter().find(|t| t.id == id)
}

pub fn original_color_theme() -> &'static ColorTheme {
    &COLOR_THEMES[0]
}

pub fn original_background_theme() -> &'static BackgroundTheme {
    &BACKGROUND_THEMES[0]
}

/// True for any id owned by the built-in registry.
pub fn is_builtin_id(id: &str) -> bool {
    color_theme(id).is_some() || background_theme(id).is_some() || builtin_pair(id).is_some()
}

/// Color and background halves of a built-in unified theme.
pub fn builtin_pair(id: &str) -> Option<(&'static str, &'static str)> {
    BUILTIN_PAIRS
        .iter()
        .find(|(pair_id, _, _)| *pair_id == id)
        .map(|(_, color, background)| (*color, *background))
}

pub fn builtin_unified_themes() -> Vec<UnifiedTheme> {
    BUILTIN_PAIRS
        .iter()
        .filter_map(|(id, _, _)| builtin_unified_theme(id))
        .collect()
}

pub fn builtin_unified_theme(id: &str) -> Option<UnifiedTheme> {
    let (color_id, background_id) = builtin_pair(id)?;
    let color = color_theme(color_id)?;
    let background = background_theme(background_id)?;
    Some(UnifiedTheme {
        id: id.to_string(),
        name: color.name.clone(),
        description: format!("{} with {} backgrounds", color.description, background.name.to_lowercase()),
        colors: color.colors.clone(),
        custom_styles: color.custom_styles.clone(),
        backgrounds: SectionBackgrounds::new(),
        images: Some(background.images.clone()),
        ornaments: Vec::new(),
        is_builtin: true,
        created_at: None,
        updated_at: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn original_resolves_in_both_registries() {
        assert_eq!(original_color_theme().id, ORIGINAL_THEME_ID);
        assert_eq!(original_background_theme().id, ORIGINAL_THEME_ID);
        assert!(color_theme(ORIGINAL_THEME_ID).is_some());
        assert!(background_theme(ORIGINAL_THEME_ID).is_some());
    }

    #[test]
    fn builtin_palettes_pass_color_validation() {
        for theme in color_themes() {
            assert!(theme.colors.validate().is_ok(), "{}", theme.id);
        }
    }

    #[test]
    fn every_builtin_pair_resolves() {
        assert_eq!(builtin_unified_themes().len(), BUILTIN_PAIRS.len());
        let sage = builtin_unified_theme("sage_garden").unwrap();
        assert!(sage.is_builtin);
        assert_eq!(sage.images, Some(background_theme("floral").unwrap().images.clone()));
    }

    #[test]
    fn builtin_ids_are_reserved() {
        assert!(is_builtin_id("floral"));
        assert!(is_builtin_id("navy_gold"));
        assert!(!is_builtin_id("my-theme"));
    }
}

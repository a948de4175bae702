use std::{collections::HashMap, sync::Arc};

use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    entities::{
        background_theme::ThemeImages,
        composed_theme::ComposedTheme,
        content::{
            BankAccount, ComponentSettings, ContentRecord, ContentType, CoupleInfo, EventInfo, Gallery,
            GiftVisibility, LoveStory, Music, Quote, StoryMoment, WeddingGift,
        },
        guestbook::GuestbookEntry,
        ornament::{Ornament, OrnamentLayer},
        rsvp::RsvpSummary,
        section::Section,
    },
    errors::AppError,
    repositories::{
        client::ClientRepository, content::ContentRepository, guestbook::GuestbookRepository, rsvp::RsvpRepository,
    },
    use_cases::composer::ThemeComposer,
    utils::markdown::safe_markdown_to_html,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrnament {
    pub id: String,
    pub name: String,
    pub image: String,
    pub css: String,
}

impl From<&Ornament> for PlacedOrnament {
    fn from(ornament: &Ornament) -> Self {
        PlacedOrnament {
            id: ornament.id.clone(),
            name: ornament.name.clone(),
            image: ornament.image.clone(),
            css: ornament.css(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OrnamentLayers {
    pub behind: Vec<PlacedOrnament>,
    pub middle: Vec<PlacedOrnament>,
    pub front: Vec<PlacedOrnament>,
}

impl OrnamentLayers {
    fn for_section(ornaments: &[Ornament], section: Section) -> Self {
        let mut layers = OrnamentLayers::default();
        for ornament in ornaments.iter().filter(|o| o.section == section && o.is_visible) {
            let layer = match ornament.layer() {
                OrnamentLayer::Behind => &mut layers.behind,
                OrnamentLayer::Middle => &mut layers.middle,
                OrnamentLayer::Front => &mut layers.front,
            };
            layer.push(PlacedOrnament::from(ornament));
        }
        layers
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum SectionContent {
    Names {
        bride_name: Option<String>,
        groom_name: Option<String>,
        date: Option<String>,
    },
    Quote(Quote),
    Couple(CoupleInfo),
    LoveStory {
        html: Option<String>,
        timeline: Vec<StoryMoment>,
    },
    Event {
        akad: EventInfo,
        resepsi: EventInfo,
    },
    Gallery {
        images: Vec<String>,
    },
    Gift {
        accounts: Vec<BankAccount>,
        recipient: Option<String>,
        address: Option<String>,
    },
    Rsvp {
        summary: RsvpSummary,
    },
    Guestbook {
        entries: Vec<GuestbookEntry>,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedSection {
    pub section: Section,
    pub background: Option<String>,
    pub ornaments: OrnamentLayers,
    pub content: SectionContent,
}

/// The page tree of one published invitation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationPage {
    pub slug: String,
    pub theme: ComposedTheme,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music: Option<Music>,
    pub sections: Vec<RenderedSection>,
}

/// Stored blobs of one client, decoded on demand.
struct ClientContent(HashMap<ContentType, ContentRecord>);

impl ClientContent {
    fn decode<T: serde::de::DeserializeOwned + Default>(&self, content_type: ContentType) -> T {
        self.0.get(&content_type).map(|r| r.decode()).unwrap_or_default()
    }

    fn has(&self, content_type: ContentType) -> bool {
        self.0.contains_key(&content_type)
    }
}

pub struct InvitationRenderer {
    clients: Arc<dyn ClientRepository>,
    content: Arc<dyn ContentRepository>,
    guestbook: Arc<dyn GuestbookRepository>,
    rsvps: Arc<dyn RsvpRepository>,
    composer: Arc<ThemeComposer>,
}

impl InvitationRenderer {
    pub fn new(
        clients: Arc<dyn ClientRepository>,
        content: Arc<dyn ContentRepository>,
        guestbook: Arc<dyn GuestbookRepository>,
        rsvps: Arc<dyn RsvpRepository>,
        composer: Arc<ThemeComposer>,
    ) -> Self {
        InvitationRenderer { clients, content, guestbook, rsvps, composer }
    }

    #[instrument(skip(self))]
    pub async fn render(&self, slug: &str) -> Result<InvitationPage, AppError> {
        let client = self
            .clients
            .get_client_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Invitation not found".into()))?;

        let resolved = self.composer.compose_for_client(&client).await;
        let content = ClientContent(
            self.content
                .list_content(slug)
                .await?
                .into_iter()
                .map(|record| (record.content_type, record))
                .collect(),
        );

        let settings: ComponentSettings = content.decode(ContentType::ComponentSettings);
        let mut sections = Vec::new();
        for section in Section::ALL {
            if settings.get(&section) == Some(&false) {
                debug!(slug, %section, "section hidden");
                continue;
            }
            sections.push(RenderedSection {
                section,
                background: section_background(&resolved.theme, section),
                ornaments: OrnamentLayers::for_section(&resolved.ornaments, section),
                content: self.section_content(slug, section, &content, resolved.theme.images.as_ref()).await?,
            });
        }

        let music = content
            .has(ContentType::Music)
            .then(|| content.decode::<Music>(ContentType::Music))
            .filter(|m| m.url.is_some());

        Ok(InvitationPage { slug: client.slug, theme: resolved.theme, music, sections })
    }

    async fn section_content(
        &self,
        slug: &str,
        section: Section,
        content: &ClientContent,
        images: Option<&ThemeImages>,
    ) -> Result<SectionContent, AppError> {
        let rendered = match section {
            Section::Hero | Section::Opening | Section::Closing => {
                let couple: CoupleInfo = content.decode(ContentType::CoupleInfo);
                let akad: EventInfo = content.decode(ContentType::AkadInfo);
                SectionContent::Names { bride_name: couple.bride_name, groom_name: couple.groom_name, date: akad.date }
            }
            Section::Quote => SectionContent::Quote(content.decode(ContentType::Quote)),
            Section::Couple => {
                let mut couple: CoupleInfo = content.decode(ContentType::CoupleInfo);
                if let Some(images) = images {
                    couple.bride_photo.get_or_insert_with(|| images.couple.bride.clone());
                    couple.groom_photo.get_or_insert_with(|| images.couple.groom.clone());
                }
                SectionContent::Couple(couple)
            }
            Section::LoveStory => {
                let story: LoveStory = content.decode(ContentType::LoveStory);
                SectionContent::LoveStory {
                    html: story.markdown.as_deref().map(safe_markdown_to_html),
                    timeline: story.timeline.unwrap_or_default(),
                }
            }
            Section::Event => SectionContent::Event {
                akad: content.decode(ContentType::AkadInfo),
                resepsi: content.decode(ContentType::ResepsiInfo),
            },
            Section::Gallery => {
                let gallery: Gallery = content.decode(ContentType::Gallery);
                let images = match gallery.images {
                    Some(stored) if !stored.is_empty() => stored,
                    _ => images.map(|i| i.gallery.clone()).unwrap_or_default(),
                };
                SectionContent::Gallery { images }
            }
            Section::Gift => {
                let gift: WeddingGift = content.decode(ContentType::WeddingGift);
                let visibility: GiftVisibility = content.decode(ContentType::GiftVisibility);
                let show_address = visibility.show_address.unwrap_or(true);
                SectionContent::Gift {
                    accounts: if visibility.show_accounts.unwrap_or(true) {
                        gift.accounts.unwrap_or_default()
                    } else {
                        Vec::new()
                    },
                    recipient: gift.recipient.filter(|_| show_address),
                    address: gift.address.filter(|_| show_address),
                }
            }
            Section::Rsvp => {
                let rsvps = self.rsvps.list_rsvps(slug).await?;
                SectionContent::Rsvp { summary: RsvpSummary::from_rsvps(&rsvps) }
            }
            Section::Guestbook => SectionContent::Guestbook { entries: self.guestbook.list_entries(slug).await? },
        };
        Ok(rendered)
    }
}

/// Per-section custom background first, then the built-in image set.
fn section_background(theme: &ComposedTheme, section: Section) -> Option<String> {
    theme.backgrounds.get(&section).cloned().or_else(|| {
        theme.images.as_ref().map(|images| match section {
            Section::Hero => images.hero.clone(),
            _ => images.background.clone(),
        })
    })
}

use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// The eleven fixed sections of an invitation page, in render order.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    #[display("hero")]
    Hero,
    #[display("opening")]
    Opening,
    #[display("quote")]
    Quote,
    #[display("couple")]
    Couple,
    #[display("loveStory")]
    LoveStory,
    #[display("event")]
    Event,
    #[display("gallery")]
    Gallery,
    #[display("gift")]
    Gift,
    #[display("rsvp")]
    Rsvp,
    #[display("guestbook")]
    Guestbook,
    #[display("closing")]
    Closing,
}

impl Section {
    pub const ALL: [Section; 11] = [
        Section::Hero,
        Section::Opening,
        Section::Quote,
        Section::Couple,
        Section::LoveStory,
        Section::Event,
        Section::Gallery,
        Section::Gift,
        Section::Rsvp,
        Section::Guestbook,
        Section::Closing,
    ];
}

impl FromStr for Section {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.to_string() == value)
            .ok_or_else(|| format!("Unknown section '{}'", value))
    }
}

//! Share links, Open Graph tags and share-SDK payloads
//!
//! Pure data only; the browser side lives in `platform::share`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tuning::{DifficultyBand, Tuning};

/// Notice shown after the link lands on the clipboard
pub const COPY_SUCCESS_NOTICE: &str = "Link copied! Send it to a friend and challenge them!";

/// Where the URL hash points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Band selection screen
    Landing,
    /// Start the band with this id
    Band(String),
}

impl Route {
    /// Parse a `location.hash` value. Unknown ids fall back to the landing screen.
    pub fn from_hash(hash: &str, tuning: &Tuning) -> Self {
        let id = hash.trim_start_matches('#').trim();
        match tuning.band_by_id(id) {
            Some(band) => Route::Band(band.id.clone()),
            None => Route::Landing,
        }
    }

    pub fn to_hash(&self) -> String {
        match self {
            Route::Landing => String::new(),
            Route::Band(id) => format!("#{id}"),
        }
    }
}

/// Link that reopens `route`; `base` is the page URL without its hash
pub fn shareable_link(base: &str, route: &Route) -> String {
    let base = base.split('#').next().unwrap_or(base);
    format!("{}{}", base, route.to_hash())
}

/// What the page is showing, for OG tags and share text
#[derive(Debug, Clone, Copy)]
pub enum ShareView<'a> {
    Landing,
    Playing {
        band: &'a DifficultyBand,
    },
    Result {
        band: &'a DifficultyBand,
        score: u32,
        total: u32,
    },
}

/// Static share texts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    pub site_title: String,
    pub default_description: String,
    pub result_prefix: String,
    pub button_title: String,
    /// Absolute preview image URL (taken from `og:image` when present)
    pub image_url: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            site_title: "Rocket Math!".to_string(),
            default_description: "Test your arithmetic! Launch rockets at planets by solving problems."
                .to_string(),
            result_prefix: "[Quiz Result]".to_string(),
            button_title: "Play the quiz".to_string(),
            image_url: String::new(),
        }
    }
}

/// `og:title` / `og:description` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OgTags {
    pub title: String,
    pub description: String,
}

pub fn og_tags(view: &ShareView<'_>, config: &ShareConfig) -> OgTags {
    match view {
        ShareView::Landing => OgTags {
            title: config.site_title.clone(),
            description: config.default_description.clone(),
        },
        ShareView::Playing { band } => OgTags {
            title: format!("{} {}", config.result_prefix, band.name),
            description: config.default_description.clone(),
        },
        ShareView::Result { band, score, total } => OgTags {
            title: format!("{} {}", config.result_prefix, band.name),
            description: result_description(*score, *total),
        },
    }
}

pub fn result_description(score: u32, total: u32) -> String {
    format!("I scored {score}/{total}! Can you beat it?")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedLink {
    pub mobile_web_url: String,
    pub web_url: String,
}

impl FeedLink {
    pub fn same(url: &str) -> Self {
        Self {
            mobile_web_url: url.to_string(),
            web_url: url.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedContent {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub link: FeedLink,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedButton {
    pub title: String,
    pub link: FeedLink,
}

/// Feed-type payload for the messaging platform's share API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPayload {
    pub object_type: String,
    pub content: FeedContent,
    pub buttons: Vec<FeedButton>,
}

impl FeedPayload {
    pub fn new(view: &ShareView<'_>, config: &ShareConfig, link: &str) -> Self {
        let tags = og_tags(view, config);
        Self {
            object_type: "feed".to_string(),
            content: FeedContent {
                title: tags.title,
                description: tags.description,
                image_url: config.image_url.clone(),
                link: FeedLink::same(link),
            },
            buttons: vec![FeedButton {
                title: config.button_title.clone(),
                link: FeedLink::same(link),
            }],
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Share failures surfaced to the player
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareError {
    /// SDK script missing or not initialized
    SdkUnavailable,
    /// Clipboard write rejected
    Clipboard(String),
    /// Payload could not be built
    Payload(String),
    NoWindow,
}

impl fmt::Display for ShareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShareError::SdkUnavailable => write!(f, "Sharing is not available right now."),
            ShareError::Clipboard(_) => write!(f, "Couldn't copy the link."),
            ShareError::Payload(_) => write!(f, "Couldn't prepare the share message."),
            ShareError::NoWindow => write!(f, "No browser window available."),
        }
    }
}

impl std::error::Error for ShareError {}

//! Mini-app manifest published alongside the game.

use serde::Serialize;
use tracing::instrument;

/// Domain ownership proof. Left empty until the app is signed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccountAssociation {
    /// Encoded header.
    pub header: String,
    /// Encoded payload.
    pub payload: String,
    /// Signature over header and payload.
    pub signature: String,
}

/// Listing metadata for the mini-app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniAppInfo {
    /// Manifest schema version.
    pub version: String,
    /// App name.
    pub name: String,
    /// Short line under the name.
    pub subtitle: String,
    /// Store description.
    pub description: String,
    /// Screenshot URLs.
    pub screenshot_urls: Vec<String>,
    /// Icon URL.
    pub icon_url: String,
    /// Splash screen image URL.
    pub splash_image_url: String,
    /// Splash background colour.
    pub splash_background_color: String,
    /// Launch URL.
    pub home_url: String,
    /// Webhook endpoint.
    pub webhook_url: String,
    /// Store category.
    pub primary_category: String,
    /// Search tags.
    pub tags: Vec<String>,
    /// Hero image URL.
    pub hero_image_url: String,
    /// Marketing tagline.
    pub tagline: String,
    /// Open Graph title.
    pub og_title: String,
    /// Open Graph description.
    pub og_description: String,
    /// Open Graph image URL.
    pub og_image_url: String,
}

/// Full manifest document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Ownership proof.
    pub account_association: AccountAssociation,
    /// App listing.
    pub miniapp: MiniAppInfo,
}

impl Manifest {
    /// Builds the manifest with every asset URL rooted at `home_url`.
    #[instrument]
    pub fn new(home_url: &str) -> Self {
        let root = home_url.trim_end_matches('/');
        let asset = |name: &str| format!("{root}/{name}");
        let hero = asset("blue-hero.png");

        Self {
            account_association: AccountAssociation::default(),
            miniapp: MiniAppInfo {
                version: "1".to_string(),
                name: "Tic-Tac-Toe Master".to_string(),
                subtitle: "Challenge the Computer".to_string(),
                description: "Play tic-tac-toe against a smart AI opponent and share your victories!"
                    .to_string(),
                screenshot_urls: vec![asset("screenshot-portrait.png")],
                icon_url: asset("blue-icon.png"),
                splash_image_url: hero.clone(),
                splash_background_color: "#1a1a2e".to_string(),
                home_url: root.to_string(),
                webhook_url: asset("api/webhook"),
                primary_category: "social".to_string(),
                tags: ["game", "tic-tac-toe", "ai", "strategy", "competitive"]
                    .map(String::from)
                    .to_vec(),
                hero_image_url: hero.clone(),
                tagline: "Beat the AI, Share Your Victory!".to_string(),
                og_title: "Tic-Tac-Toe Master - Challenge the Computer".to_string(),
                og_description:
                    "Play strategic tic-tac-toe against a smart AI and share your winning streaks with friends!"
                        .to_string(),
                og_image_url: hero,
            },
        }
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

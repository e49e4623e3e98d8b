//! Share text and compose links.

use tictactoe_engine::Outcome;
use tracing::instrument;
use url::Url;

use crate::share::ShareError;
use crate::store::Stats;

/// Post text announcing a finished game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareMessage {
    text: String,
}

impl ShareMessage {
    /// Builds the post for `outcome` with a stats summary and a challenge line.
    #[instrument(skip(stats))]
    pub fn compose(outcome: Outcome, stats: &Stats) -> Self {
        let headline = match outcome {
            Outcome::PlayerWin => "🎉 Just crushed the AI in Tic-Tac-Toe!",
            Outcome::OpponentWin => "🤖 The AI got me this time in Tic-Tac-Toe, but I'll be back!",
            Outcome::Draw => "⚖️ Fought to a draw with the AI in Tic-Tac-Toe!",
        };

        let stats_block = format!(
            "\n\n📊 My Battle Stats:\n🏆 Wins: {}\n🤖 AI Wins: {}\n⚖️ Draws: {}\n📈 Win Rate: {}%\n🎮 Total Games: {}",
            stats.player_wins(),
            stats.opponent_wins(),
            stats.draws(),
            stats.win_rate(),
            stats.games_played(),
        );

        Self {
            text: format!(
                "{headline}{stats_block}\n\n🎯 Think you can beat the AI? Challenge it here!"
            ),
        }
    }

    /// The post body.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Post body followed by a link back to the game, for pasting by hand.
    pub fn with_game_link(&self, home_url: &str) -> String {
        format!("{}\n\nGame: {}", self.text, home_url)
    }

    /// Compose URL pre-filled with this post and an embed of `home_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError`] if `compose_base` is not a valid URL.
    pub fn compose_url(&self, compose_base: &str, home_url: &str) -> Result<Url, ShareError> {
        Url::parse_with_params(
            compose_base,
            &[("text", self.text.as_str()), ("embeds[]", home_url)],
        )
        .map_err(|e| ShareError::new(format!("Invalid compose URL '{}': {}", compose_base, e)))
    }
}

impl std::fmt::Display for ShareMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

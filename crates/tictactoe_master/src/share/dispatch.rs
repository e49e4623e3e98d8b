//! Delivering a share message: open the composer, else copy, else show.

use std::process::Stdio;

use tictactoe_engine::Outcome;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

use crate::share::{ShareError, ShareMessage};
use crate::store::Stats;

/// Something that can open a URL (a browser, a host app).
#[async_trait::async_trait]
pub trait UrlOpener: Send + Sync {
    /// Opens `url`.
    async fn open(&self, url: &str) -> Result<(), ShareError>;
}

/// Something that can take text onto the system clipboard.
#[async_trait::async_trait]
pub trait Clipboard: Send + Sync {
    /// Replaces clipboard contents with `text`.
    async fn write_text(&self, text: &str) -> Result<(), ShareError>;
}

/// Opens URLs by running a program with the URL as its last argument.
#[derive(Debug, Clone)]
pub struct CommandOpener {
    program: String,
    args: Vec<String>,
}

impl CommandOpener {
    /// Parses a whitespace-separated command line such as `xdg-open`.
    pub fn from_command_line(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

#[async_trait::async_trait]
impl UrlOpener for CommandOpener {
    #[instrument(skip(self, url), fields(program = %self.program))]
    async fn open(&self, url: &str) -> Result<(), ShareError> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await?;
        if status.success() {
            Ok(())
        } else {
            Err(ShareError::new(format!("'{}' exited with {}", self.program, status)))
        }
    }
}

/// Copies text by piping it into a program such as `pbcopy` or `xclip`.
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    /// Parses a whitespace-separated command line such as `xclip -selection clipboard`.
    pub fn from_command_line(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

#[async_trait::async_trait]
impl Clipboard for CommandClipboard {
    #[instrument(skip(self, text), fields(program = %self.program))]
    async fn write_text(&self, text: &str) -> Result<(), ShareError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| ShareError::new("Failed to capture clipboard stdin"))?;
        stdin.write_all(text.as_bytes()).await?;
        drop(stdin);

        let status = child.wait().await?;
        if status.success() {
            Ok(())
        } else {
            Err(ShareError::new(format!("'{}' exited with {}", self.program, status)))
        }
    }
}

/// How a share attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareResult {
    /// The composer was opened at this URL.
    Opened(String),
    /// Opening failed; the post was copied. Carries a notice for the user.
    Copied(String),
    /// Both failed; carries text for the user to copy by hand.
    Manual(String),
}

impl ShareResult {
    /// Notice to show the user, if any.
    pub fn notice(&self) -> Option<&str> {
        match self {
            ShareResult::Opened(_) => None,
            ShareResult::Copied(notice) | ShareResult::Manual(notice) => Some(notice.as_str()),
        }
    }
}

/// Runs the share fallback chain.
pub struct Sharer {
    opener: Option<Box<dyn UrlOpener>>,
    clipboard: Option<Box<dyn Clipboard>>,
    compose_base: String,
    home_url: String,
}

impl Sharer {
    /// Creates a sharer. Missing collaborators count as failures and fall through.
    pub fn new(
        opener: Option<Box<dyn UrlOpener>>,
        clipboard: Option<Box<dyn Clipboard>>,
        compose_base: impl Into<String>,
        home_url: impl Into<String>,
    ) -> Self {
        Self {
            opener,
            clipboard,
            compose_base: compose_base.into(),
            home_url: home_url.into(),
        }
    }

    /// Shares the result of a finished game.
    ///
    /// Never fails: each failed step falls through to the next, ending with
    /// text the user can copy themselves.
    #[instrument(skip(self, stats))]
    pub async fn share(&self, outcome: Outcome, stats: &Stats) -> ShareResult {
        let message = ShareMessage::compose(outcome, stats);

        match self.open_composer(&message).await {
            Ok(url) => {
                info!("Composer opened");
                return ShareResult::Opened(url);
            }
            Err(e) => warn!(error = %e, "Failed to open composer"),
        }

        let with_link = message.with_game_link(&self.home_url);
        match &self.clipboard {
            Some(clipboard) => match clipboard.write_text(&with_link).await {
                Ok(()) => {
                    info!("Share text copied to clipboard");
                    return ShareResult::Copied(
                        "📋 Cast text copied to clipboard! Open Warpcast to paste and share your result."
                            .to_string(),
                    );
                }
                Err(e) => warn!(error = %e, "Clipboard failed"),
            },
            None => debug!("No clipboard configured"),
        }

        ShareResult::Manual(format!("❌ Copy this text to share on Warpcast:\n\n{}", with_link))
    }

    async fn open_composer(&self, message: &ShareMessage) -> Result<String, ShareError> {
        let url = message.compose_url(&self.compose_base, &self.home_url)?;
        let opener = self
            .opener
            .as_ref()
            .ok_or_else(|| ShareError::new("No URL opener configured"))?;
        debug!(url = %url, "Opening compose URL");
        opener.open(url.as_str()).await?;
        Ok(url.into())
    }
}

impl std::fmt::Debug for Sharer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sharer")
            .field("opener", &self.opener.is_some())
            .field("clipboard", &self.clipboard.is_some())
            .field("compose_base", &self.compose_base)
            .field("home_url", &self.home_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default, Clone)]
    struct Recorder {
        calls: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl UrlOpener for Recorder {
        async fn open(&self, url: &str) -> Result<(), ShareError> {
            self.calls.lock().expect("lock").push(url.to_string());
            if self.fail {
                Err(ShareError::new("blocked"))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait::async_trait]
    impl Clipboard for Recorder {
        async fn write_text(&self, text: &str) -> Result<(), ShareError> {
            self.calls.lock().expect("lock").push(text.to_string());
            if self.fail {
                Err(ShareError::new("denied"))
            } else {
                Ok(())
            }
        }
    }

    const COMPOSE: &str = "https://warpcast.com/~/compose";
    const HOME: &str = "http://localhost:3000";

    #[tokio::test]
    async fn test_opens_composer_first() {
        let opener = Recorder::default();
        let clipboard = Recorder::default();
        let sharer = Sharer::new(
            Some(Box::new(opener.clone())),
            Some(Box::new(clipboard.clone())),
            COMPOSE,
            HOME,
        );

        let result = sharer.share(Outcome::PlayerWin, &Stats::new(1, 0, 0, 1)).await;
        let ShareResult::Opened(url) = &result else {
            panic!("expected composer to open, got {result:?}");
        };
        assert!(url.starts_with(COMPOSE));
        assert_eq!(opener.calls.lock().expect("lock").len(), 1);
        assert!(clipboard.calls.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn test_falls_back_to_clipboard() {
        let opener = Recorder {
            fail: true,
            ..Recorder::default()
        };
        let clipboard = Recorder::default();
        let sharer = Sharer::new(
            Some(Box::new(opener)),
            Some(Box::new(clipboard.clone())),
            COMPOSE,
            HOME,
        );

        let result = sharer.share(Outcome::Draw, &Stats::new(0, 0, 1, 1)).await;
        assert!(matches!(result, ShareResult::Copied(_)));
        let copied = clipboard.calls.lock().expect("lock");
        assert!(copied[0].ends_with("\n\nGame: http://localhost:3000"));
    }

    #[tokio::test]
    async fn test_manual_text_when_everything_fails() {
        let sharer = Sharer::new(None, None, COMPOSE, HOME);
        let result = sharer.share(Outcome::OpponentWin, &Stats::new(0, 1, 0, 1)).await;
        let ShareResult::Manual(text) = &result else {
            panic!("expected manual fallback, got {result:?}");
        };
        assert!(text.starts_with("❌ Copy this text to share on Warpcast:\n\n🤖"));
        assert!(text.ends_with("Game: http://localhost:3000"));
        assert_eq!(result.notice(), Some(text.as_str()));
    }

    #[test]
    fn test_command_line_parsing() {
        assert!(CommandOpener::from_command_line("   ").is_none());
        let clip = CommandClipboard::from_command_line("xclip -selection clipboard").expect("parsed");
        assert_eq!(clip.program, "xclip");
        assert_eq!(clip.args, vec!["-selection", "clipboard"]);
    }
}

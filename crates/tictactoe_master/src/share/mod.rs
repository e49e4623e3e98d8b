//! Sharing finished games as social posts.

mod dispatch;
mod error;
mod message;

pub use dispatch::{Clipboard, CommandClipboard, CommandOpener, ShareResult, Sharer, UrlOpener};
pub use error::ShareError;
pub use message::ShareMessage;

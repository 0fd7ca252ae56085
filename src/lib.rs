//! Telegram-safe text rendering and delivery for the chat summary bot.
//!
//! Summaries come back from the AI providers as Markdown or HTML, error
//! strings carry arbitrary punctuation, and Telegram's MarkdownV2 dialect
//! rejects anything with an unescaped reserved character. This crate is the
//! single place that turns such text into something Telegram accepts:
//! callers declare a [`ContentType`] and pass the *original* text through
//! [`render`] (or the [`sender`] wrappers, which render internally).
//! Escaping anywhere else double-escapes and is a bug.

pub mod config;
pub mod content;
mod error;
mod escape;
mod markdownify;
mod message_log;
pub mod renderer;
pub mod sender;
pub mod splitter;

pub use content::{ContentType, SafeText, TextPayload};
pub use renderer::render;
pub use splitter::split_message;

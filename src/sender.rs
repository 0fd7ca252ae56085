//! Safe delivery of rendered text to the Telegram Bot API.
//!
//! This is the message-sending collaborator of the renderer and the only
//! place outgoing text is rendered: handlers hand over the original text
//! plus its content type, never pre-escaped strings. If Telegram rejects
//! the MarkdownV2 payload, the original text is re-sent as plain text so
//! the user still gets the content.

use teloxide::payloads::{EditMessageTextSetters, SendMessageSetters};
use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardMarkup, Message, MessageId, ParseMode};
use teloxide::RequestError;

use crate::config::CONFIG;
use crate::content::ContentType;
use crate::message_log::{self, MessageLogRecord};
use crate::renderer;
use crate::splitter;

/// Renders `text`, splits it to fit Telegram's length cap and sends every
/// part with `parse_mode = MarkdownV2`. The reply markup rides on the last
/// part. On a rejected part the original text is re-sent plain.
pub async fn safe_send_message(
    bot: &Bot,
    chat_id: ChatId,
    text: &str,
    content_type: ContentType,
    reply_markup: Option<InlineKeyboardMarkup>,
) -> Result<Vec<Message>, RequestError> {
    let rendered = renderer::render(text, content_type);
    log::debug!(
        "Sending {} payload to chat {} ({} chars rendered)",
        content_type,
        chat_id,
        rendered.as_str().chars().count()
    );

    let parts = splitter::split_message(rendered.as_str(), CONFIG.max_message_length);
    let mut sent = Vec::with_capacity(parts.len());

    for (index, part) in parts.iter().enumerate() {
        let is_last = index + 1 == parts.len();
        let mut request = bot
            .send_message(chat_id, part.as_str())
            .parse_mode(ParseMode::MarkdownV2)
            .disable_web_page_preview(true);
        if is_last {
            if let Some(markup) = reply_markup.clone() {
                request = request.reply_markup(markup);
            }
        }

        match request.await {
            Ok(message) => {
                message_log::log_outgoing(&MessageLogRecord::new(
                    chat_id.0,
                    "send",
                    "MarkdownV2",
                    content_type.as_str(),
                    text,
                    part,
                    "sent".to_string(),
                ));
                sent.push(message);
            }
            Err(e) => {
                log::error!(
                    "MarkdownV2 send to chat {} failed: {}. Failed text:\n{}",
                    chat_id,
                    e,
                    part
                );
                message_log::log_outgoing(&MessageLogRecord::new(
                    chat_id.0,
                    "send",
                    "MarkdownV2",
                    content_type.as_str(),
                    text,
                    part,
                    e.to_string(),
                ));
                return send_plain_fallback(bot, chat_id, text, content_type, reply_markup).await;
            }
        }
    }

    Ok(sent)
}

/// Renders `text` and edits an existing message in place. Edits have no
/// plain-text fallback; API errors propagate to the caller.
pub async fn safe_edit_message_text(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    text: &str,
    content_type: ContentType,
    reply_markup: Option<InlineKeyboardMarkup>,
) -> Result<Message, RequestError> {
    let rendered = renderer::render(text, content_type);
    log::debug!("Editing message {} in chat {}", message_id.0, chat_id);

    let mut request = bot
        .edit_message_text(chat_id, message_id, rendered.as_str())
        .parse_mode(ParseMode::MarkdownV2);
    if let Some(markup) = reply_markup {
        request = request.reply_markup(markup);
    }

    let outcome = request.await;
    message_log::log_outgoing(&MessageLogRecord::new(
        chat_id.0,
        "edit",
        "MarkdownV2",
        content_type.as_str(),
        text,
        rendered.as_str(),
        match &outcome {
            Ok(_) => "sent".to_string(),
            Err(e) => e.to_string(),
        },
    ));

    if let Err(e) = &outcome {
        log::error!(
            "MarkdownV2 edit of message {} in chat {} failed: {}. Failed text:\n{}",
            message_id.0,
            chat_id,
            e,
            rendered.as_str()
        );
    }
    outcome
}

/// Last resort: the original, unrendered text without any parse mode.
async fn send_plain_fallback(
    bot: &Bot,
    chat_id: ChatId,
    original_text: &str,
    content_type: ContentType,
    reply_markup: Option<InlineKeyboardMarkup>,
) -> Result<Vec<Message>, RequestError> {
    log::debug!("Re-sending original text to chat {} as plain text", chat_id);

    let parts = splitter::split_message(original_text, CONFIG.max_message_length);
    let mut sent = Vec::with_capacity(parts.len());

    for (index, part) in parts.iter().enumerate() {
        let is_last = index + 1 == parts.len();
        let mut request = bot
            .send_message(chat_id, part.as_str())
            .disable_web_page_preview(true);
        if is_last {
            if let Some(markup) = reply_markup.clone() {
                request = request.reply_markup(markup);
            }
        }

        let outcome = request.await;
        message_log::log_outgoing(&MessageLogRecord::new(
            chat_id.0,
            "send_fallback",
            "None",
            content_type.as_str(),
            original_text,
            part,
            match &outcome {
                Ok(_) => "sent".to_string(),
                Err(e) => e.to_string(),
            },
        ));
        match outcome {
            Ok(message) => sent.push(message),
            Err(e) => {
                log::error!("Plain-text fallback to chat {} failed too: {}", chat_id, e);
                return Err(e);
            }
        }
    }

    Ok(sent)
}

use teloxide::prelude::*;
use teloxide::types::{MessageId, ParseMode};
use teloxide::{ApiError, RequestError};

use super::manager::{LiveTransport, TransportError};

/// Telegram-backed transport for live sessions.
#[derive(Clone)]
pub struct BotTransport {
    bot: Bot,
}

impl BotTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

impl LiveTransport for BotTransport {
    async fn send(&self, chat_id: ChatId, text: String) -> Result<MessageId, TransportError> {
        let message = self
            .bot
            .send_message(chat_id, text)
            .parse_mode(ParseMode::Html)
            .await
            .map_err(classify)?;
        Ok(message.id)
    }

    async fn edit(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
    ) -> Result<(), TransportError> {
        match self
            .bot
            .edit_message_text(chat_id, message_id, text)
            .parse_mode(ParseMode::Html)
            .await
        {
            Ok(_) => Ok(()),
            // Content identical to the previous tick. Nothing to do.
            Err(RequestError::Api(ApiError::MessageNotModified)) => Ok(()),
            Err(error) => Err(classify(error)),
        }
    }
}

fn classify(error: RequestError) -> TransportError {
    match &error {
        RequestError::Api(ApiError::MessageToEditNotFound)
        | RequestError::Api(ApiError::MessageIdInvalid)
        | RequestError::Api(ApiError::BotBlocked) => TransportError::Gone(error.to_string()),
        _ => TransportError::Transient(error.to_string()),
    }
}

use teloxide::prelude::*;

use crate::config::Config;

/// Owner-only DM policy: the sender must be the configured owner AND the
/// chat must be the owner's private chat. Any config problem fails closed.
pub(crate) fn is_authorized(msg: &Message, config: &Config) -> bool {
    let Some(from) = msg.from() else {
        return false;
    };

    let Ok(owner_chat_id) = config.owner_chat_id() else {
        return false;
    };

    from.id == config.owner_user_id() && msg.chat.id == owner_chat_id
}

use tracing::info;

use crate::events::ChatLine;
use crate::listener;
use crate::listener::ChatListener;

/// Logs every chat line that survived the transform chain ahead of it.
struct ChatLog;

impl ChatListener for ChatLog {
	fn rewrite(&self, line: ChatLine) -> Option<ChatLine> {
		info!(player = %line.player, text = %line.text, "chat");
		Some(line)
	}
}

listener!(chat_log, Chat, "Log chat lines after transforms", &ChatLog);

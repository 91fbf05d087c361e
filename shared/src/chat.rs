use serde::{Deserialize, Serialize};

/// Chat channel a message arrived on. Only clan traffic feeds recency tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatMessageType {
    Public,
    Private,
    FriendsChat,
    ClanChat,
    ClanGuestChat,
    ClanMessage,
    Game,
}

impl ChatMessageType {
    pub const fn is_clan_chat(self) -> bool {
        matches!(self, Self::ClanChat | Self::ClanGuestChat)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(rename = "channel")]
    pub kind: ChatMessageType,
    /// Sender as displayed, possibly carrying icon or colour tags.
    pub name: String,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Id carried by messages that cannot be used as a resumption point.
pub const NO_MESSAGE_ID: i64 = -1;

/// A chat message delivered over the SSE stream.
///
/// Every field is optional on the wire; missing fields fall back to the
/// values of [`ChatMessage::default`]. The frame's `id:` line, when present,
/// takes precedence over the `id` inside the JSON payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatMessage {
    /// Sequence id assigned by the bridge, or [`NO_MESSAGE_ID`]
    pub id: i64,
    /// Channel the message was sent in
    pub channel_id: String,
    /// Platform id of the sender
    pub sender_id: String,
    /// Display name of the sender
    pub sender_name: String,
    /// Message text
    pub message: String,
    /// Send time in milliseconds since the Unix epoch
    pub message_time: i64,
    /// Donation amount, zero for plain chat
    pub pay_amount: u64,
}

impl Default for ChatMessage {
    fn default() -> Self {
        Self {
            id: NO_MESSAGE_ID,
            channel_id: String::new(),
            sender_id: String::new(),
            sender_name: String::new(),
            message: String::new(),
            message_time: 0,
            pay_amount: 0,
        }
    }
}

impl ChatMessage {
    /// Create a plain chat message without an id.
    pub fn new(
        channel_id: impl Into<String>,
        sender_id: impl Into<String>,
        sender_name: impl Into<String>,
        message: impl Into<String>,
        message_time: i64,
    ) -> Self {
        Self {
            channel_id: channel_id.into(),
            sender_id: sender_id.into(),
            sender_name: sender_name.into(),
            message: message.into(),
            message_time,
            ..Self::default()
        }
    }

    /// Set the sequence id.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    /// Set the donation amount.
    pub fn with_pay_amount(mut self, pay_amount: u64) -> Self {
        self.pay_amount = pay_amount;
        self
    }

    /// The sequence id, if this message can be used to resume a stream.
    pub fn id(&self) -> Option<i64> {
        (self.id != NO_MESSAGE_ID).then_some(self.id)
    }

    /// Whether this message is a donation.
    pub fn is_donation(&self) -> bool {
        self.pay_amount > 0
    }

    /// Send time as a UTC timestamp. `None` if out of chrono's range.
    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.message_time)
    }
}

impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sent_at() {
            Some(at) => write!(f, "[{}] ", at.format("%H:%M:%S"))?,
            None => write!(f, "[--:--:--] ")?,
        }
        write!(f, "{}: {}", self.sender_name, self.message)?;
        if self.is_donation() {
            write!(f, " (donation {})", self.pay_amount)?;
        }
        Ok(())
    }
}

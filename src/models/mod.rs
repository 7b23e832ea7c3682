//! Value types exchanged with the bridge API.

mod message;
mod subscription;

pub use message::{ChatMessage, NO_MESSAGE_ID};
pub use subscription::{AuthRequiredBody, SubscriptionOutcome};

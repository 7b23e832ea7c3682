//! Prelude module for convenient imports.
//!
//! ```ignore
//! use chzzk_bridge_client::prelude::*;
//! ```

// Client and configuration
pub use crate::client::BridgeClient;
pub use crate::config::ClientConfig;

// Streaming
pub use crate::session::{ConnectionState, ErrorHandler, SseHandle, StreamSession};
pub use crate::sse::MessageStream;

// Models
pub use crate::models::{ChatMessage, SubscriptionOutcome};

// Errors
pub use crate::error::{BridgeError, BridgeResult, StreamError};

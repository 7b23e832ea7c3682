use serde::{Deserialize, Serialize};

/// Body of a 401 answer to a subscribe request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthRequiredBody {
    /// Opaque state token tying the authorization flow to this channel
    pub state: String,
    /// Where to send the user to grant access
    pub path: String,
}

/// Server's answer to a subscribe request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionOutcome {
    /// A new subscription was created
    Success,
    /// The channel was already subscribed
    AlreadySubscribed,
    /// The user must complete the authorization flow first
    AuthRequired { state: String, path: String },
    /// Any other status
    Error { status: u16 },
}

impl SubscriptionOutcome {
    /// Classify a subscribe response.
    ///
    /// Only a 401 body is decoded; an undecodable one is an error.
    pub fn from_response(status: u16, body: &[u8]) -> Result<Self, serde_json::Error> {
        let outcome = match status {
            200 | 201 => Self::Success,
            204 => Self::AlreadySubscribed,
            401 => {
                let AuthRequiredBody { state, path } = serde_json::from_slice(body)?;
                Self::AuthRequired { state, path }
            }
            status => Self::Error { status },
        };
        Ok(outcome)
    }

    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::AuthRequired { .. })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success | Self::AlreadySubscribed)
    }

    /// Authorization path for [`SubscriptionOutcome::AuthRequired`].
    pub fn auth_path(&self) -> Option<&str> {
        match self {
            Self::AuthRequired { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Authorization state token for [`SubscriptionOutcome::AuthRequired`].
    pub fn auth_state(&self) -> Option<&str> {
        match self {
            Self::AuthRequired { state, .. } => Some(state),
            _ => None,
        }
    }
}

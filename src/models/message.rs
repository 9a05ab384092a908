use serde::{Deserialize, Serialize};

/// Text message as accepted by the WhatsApp gateway `sendText` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatsAppMessage {
    /// Recipient in gateway form, e.g. `5563999998888@c.us`
    pub chat_id: String,
    pub text: String,
    pub session: String,
}

impl WhatsAppMessage {
    pub fn new(chat_id: impl Into<String>, text: impl Into<String>, session: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            text: text.into(),
            session: session.into(),
        }
    }
}

//! Diagnostic attachments produced while running steps

/// Named payload a reporter can embed next to a step result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub media_type: String,
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn text(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            media_type: "text/plain".to_string(),
            data: body.into().into_bytes(),
        }
    }

    /// Payload as UTF-8, lossy
    pub fn body(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}

/// Implemented by worlds that collect attachments
pub trait AttachmentProvider {
    /// Attachments collected since the last clear
    fn attachments(&self) -> Vec<Attachment>;

    fn clear_attachments(&self);
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

const USER_PLACEHOLDER: &str = "{userId}";

/// Storage class for an uploaded file, chosen from its MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Image,
    Video,
}

impl ResourceType {
    /// `video/*` is video; everything else, including a missing type, is image.
    #[must_use]
    pub fn from_mime(mime: Option<&str>) -> Self {
        match mime {
            Some(m) if m.trim().to_ascii_lowercase().starts_with("video/") => ResourceType::Video,
            _ => ResourceType::Image,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceType::Image => "image",
            ResourceType::Video => "video",
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expands the first `{userId}` in `template` to the caller's id.
#[must_use]
pub fn storage_folder(template: &str, user_id: Uuid) -> String {
    template.replacen(USER_PLACEHOLDER, &user_id.to_string(), 1)
}

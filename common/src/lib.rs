use serde::{Deserialize, Deserializer, Serialize};

/// Stable identifier of a job posting.
pub type JobId = i64;

/// Image shown when a posting carries no creatives.
pub const DEFAULT_IMAGE_URL: &str =
    "https://images.pexels.com/photos/3760529/pexels-photo-3760529.jpeg";

/// A job posting as returned by the remote listing API.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Job {
    pub id: JobId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub primary_details: PrimaryDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creatives: Option<Vec<Creative>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_category: Option<String>,
}

/// Named attributes of a posting. Any of them may be missing upstream.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct PrimaryDetails {
    #[serde(rename = "Place", default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    #[serde(rename = "Salary", default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(rename = "Experience", default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(rename = "Qualification", default, skip_serializing_if = "Option::is_none")]
    pub qualification: Option<String>,
    #[serde(rename = "Job_Type", default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
}

/// Image attached to a posting.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Creative {
    #[serde(default, deserialize_with = "null_as_default")]
    pub file: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub thumb_url: String,
}

/// Reads an explicit `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Job {
    pub fn new(id: JobId, title: impl Into<String>, company_name: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            company_name: company_name.into(),
            ..Self::default()
        }
    }

    fn first_creative(&self) -> Option<&Creative> {
        self.creatives.as_ref().and_then(|c| c.first())
    }

    /// Small image for list cards, falling back to the default image.
    pub fn thumbnail(&self) -> &str {
        self.first_creative()
            .map(|c| c.thumb_url.as_str())
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_IMAGE_URL)
    }

    /// Full-size image for the detail view, falling back to the default image.
    pub fn hero_image(&self) -> &str {
        self.first_creative()
            .map(|c| c.file.as_str())
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_IMAGE_URL)
    }
}

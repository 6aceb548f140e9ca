use serde_json::{Map, Value};

use crate::codec::{serde_via_codec, DecodeOptions, FieldReader, FieldWriter, Resource};
use crate::error::DecodeError;

const KEY_ID: &str = "id";
const KEY_USERNAME: &str = "username";
const KEY_NAME: &str = "name";
const KEY_URL: &str = "url";
const KEY_IMAGE_URL: &str = "imageUrl";

/// A Medium user account, typically the authenticated one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct User {
    id: String,
    username: String,
    name: Option<String>,
    url: Option<String>,
    image_url: Option<String>,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        name: Option<String>,
        url: Option<String>,
        image_url: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            name,
            url,
            image_url,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Profile page URL.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Avatar URL.
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }
}

impl Resource for User {
    const KIND: &'static str = "user";

    fn decode(object: &Map<String, Value>, options: &DecodeOptions) -> Result<Self, DecodeError> {
        let fields = FieldReader::new(object, options);
        Ok(Self {
            id: fields.required_str(KEY_ID)?,
            username: fields.required_str(KEY_USERNAME)?,
            name: fields.optional_str(KEY_NAME)?,
            url: fields.optional_str(KEY_URL)?,
            image_url: fields.optional_str(KEY_IMAGE_URL)?,
        })
    }

    fn encode(&self) -> Map<String, Value> {
        FieldWriter::new()
            .str(KEY_ID, &self.id)
            .str(KEY_USERNAME, &self.username)
            .opt_str(KEY_NAME, self.name())
            .opt_str(KEY_URL, self.url())
            .opt_str(KEY_IMAGE_URL, self.image_url())
            .finish()
    }
}

serde_via_codec!(User);

use serde_json::{Map, Value};

use crate::codec::{serde_via_codec, DecodeOptions, FieldReader, FieldWriter, Resource};
use crate::error::DecodeError;

const KEY_ID: &str = "id";
const KEY_NAME: &str = "name";
const KEY_DESCRIPTION: &str = "description";
const KEY_URL: &str = "url";
const KEY_IMAGE_URL: &str = "imageUrl";

/// A publication channel on Medium.
///
/// Every field is optional: listings always fill them in, but a publication
/// assembled locally (for a partial update or a test fixture) need not. Unset
/// fields are left out of the encoded object so they never overwrite values
/// held by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Publication {
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    url: Option<String>,
    image_url: Option<String>,
}

/// Plain field set for constructing a `Publication` in one call.
///
/// ```
/// use medium_core::{Publication, PublicationFields};
///
/// let publication = Publication::from_fields(PublicationFields {
///     id: Some("b969ac62a46b".to_string()),
///     name: Some("About Medium".to_string()),
///     ..Default::default()
/// });
/// assert_eq!(publication.description(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicationFields {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
}

impl Publication {
    pub fn new(
        id: Option<String>,
        name: Option<String>,
        description: Option<String>,
        url: Option<String>,
        image_url: Option<String>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            url,
            image_url,
        }
    }

    pub fn from_fields(fields: PublicationFields) -> Self {
        let PublicationFields {
            id,
            name,
            description,
            url,
            image_url,
        } = fields;
        Self::new(id, name, description, url, image_url)
    }

    pub fn builder() -> PublicationBuilder {
        PublicationBuilder::default()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// URL of the publication's homepage.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// URL of the publication's logo.
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }
}

/// Fluent assembly of a `Publication`. Setting a field twice keeps the last
/// value; `build` consumes the builder.
///
/// ```
/// use medium_core::Publication;
///
/// let publication = Publication::builder().with_id("1").with_name("N").build();
/// assert_eq!(publication.id(), Some("1"));
/// assert_eq!(publication.description(), None);
/// ```
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct PublicationBuilder {
    fields: PublicationFields,
}

impl PublicationBuilder {
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.fields.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.fields.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.fields.description = Some(description.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.fields.url = Some(url.into());
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.fields.image_url = Some(image_url.into());
        self
    }

    pub fn build(self) -> Publication {
        Publication::from_fields(self.fields)
    }
}

impl Resource for Publication {
    const KIND: &'static str = "publication";

    fn decode(object: &Map<String, Value>, options: &DecodeOptions) -> Result<Self, DecodeError> {
        let fields = FieldReader::new(object, options);
        Ok(Self {
            id: fields.optional_str(KEY_ID)?,
            name: fields.optional_str(KEY_NAME)?,
            description: fields.optional_str(KEY_DESCRIPTION)?,
            url: fields.optional_str(KEY_URL)?,
            image_url: fields.optional_str(KEY_IMAGE_URL)?,
        })
    }

    fn encode(&self) -> Map<String, Value> {
        FieldWriter::new()
            .opt_str(KEY_ID, self.id())
            .opt_str(KEY_NAME, self.name())
            .opt_str(KEY_DESCRIPTION, self.description())
            .opt_str(KEY_URL, self.url())
            .opt_str(KEY_IMAGE_URL, self.image_url())
            .finish()
    }
}

serde_via_codec!(Publication);

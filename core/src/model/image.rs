use serde_json::{Map, Value};

use crate::codec::{serde_via_codec, DecodeOptions, FieldReader, FieldWriter, Resource};
use crate::error::DecodeError;

const KEY_URL: &str = "url";
const KEY_MD5: &str = "md5";

/// An image hosted on Medium, as returned by an image upload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Image {
    url: String,
    md5: String,
}

impl Image {
    pub fn new(url: impl Into<String>, md5: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            md5: md5.into(),
        }
    }

    /// Where the image is served from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// MD5 hash of the image data.
    pub fn md5(&self) -> &str {
        &self.md5
    }
}

impl Resource for Image {
    const KIND: &'static str = "image";

    fn decode(object: &Map<String, Value>, options: &DecodeOptions) -> Result<Self, DecodeError> {
        let fields = FieldReader::new(object, options);
        Ok(Self {
            url: fields.required_str(KEY_URL)?,
            md5: fields.required_str(KEY_MD5)?,
        })
    }

    fn encode(&self) -> Map<String, Value> {
        FieldWriter::new()
            .str(KEY_URL, &self.url)
            .str(KEY_MD5, &self.md5)
            .finish()
    }
}

serde_via_codec!(Image);

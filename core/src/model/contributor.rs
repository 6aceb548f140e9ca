use serde_json::{Map, Value};

use crate::codec::{serde_via_codec, DecodeOptions, FieldReader, FieldWriter, Resource};
use crate::error::DecodeError;
use crate::model::Role;

const KEY_PUBLICATION_ID: &str = "publicationId";
const KEY_USER_ID: &str = "userId";
const KEY_ROLE: &str = "role";

/// A Medium user, other than the authenticated one, who contributes to a
/// publication. Both ids are plain references, not embedded resources.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Contributor {
    publication_id: String,
    user_id: String,
    role: Role,
}

impl Contributor {
    pub fn new(publication_id: impl Into<String>, user_id: impl Into<String>, role: Role) -> Self {
        Self {
            publication_id: publication_id.into(),
            user_id: user_id.into(),
            role,
        }
    }

    pub fn publication_id(&self) -> &str {
        &self.publication_id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Role of the user within this publication.
    pub fn role(&self) -> &Role {
        &self.role
    }
}

impl Resource for Contributor {
    const KIND: &'static str = "contributor";

    fn decode(object: &Map<String, Value>, options: &DecodeOptions) -> Result<Self, DecodeError> {
        let fields = FieldReader::new(object, options);
        Ok(Self {
            publication_id: fields.required_str(KEY_PUBLICATION_ID)?,
            user_id: fields.required_str(KEY_USER_ID)?,
            role: fields.required_enum(KEY_ROLE)?,
        })
    }

    fn encode(&self) -> Map<String, Value> {
        FieldWriter::new()
            .str(KEY_PUBLICATION_ID, &self.publication_id)
            .str(KEY_USER_ID, &self.user_id)
            .enumeration(KEY_ROLE, &self.role)
            .finish()
    }
}

serde_via_codec!(Contributor);

use serde_json::{Map, Value};

use crate::codec::{serde_via_codec, DecodeOptions, FieldReader, FieldWriter, Resource};
use crate::error::DecodeError;
use crate::model::{ContentFormat, License, PublishStatus};

const KEY_ID: &str = "id";
const KEY_TITLE: &str = "title";
const KEY_AUTHOR_ID: &str = "authorId";
const KEY_TAGS: &str = "tags";
const KEY_URL: &str = "url";
const KEY_CANONICAL_URL: &str = "canonicalUrl";
const KEY_PUBLISH_STATUS: &str = "publishStatus";
const KEY_PUBLISHED_AT: &str = "publishedAt";
const KEY_LICENSE: &str = "license";
const KEY_LICENSE_URL: &str = "licenseUrl";
const KEY_CONTENT_FORMAT: &str = "contentFormat";
const KEY_CONTENT: &str = "content";
const KEY_NOTIFY_FOLLOWERS: &str = "notifyFollowers";

/// A post as returned after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Post {
    id: String,
    title: String,
    author_id: String,
    tags: Option<Vec<String>>,
    url: Option<String>,
    canonical_url: Option<String>,
    publish_status: Option<PublishStatus>,
    published_at: Option<u64>,
    license: Option<License>,
    license_url: Option<String>,
}

impl Post {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        author_id: impl Into<String>,
        tags: Option<Vec<String>>,
        url: Option<String>,
        canonical_url: Option<String>,
        publish_status: Option<PublishStatus>,
        published_at: Option<u64>,
        license: Option<License>,
        license_url: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author_id: author_id.into(),
            tags,
            url,
            canonical_url,
            publish_status,
            published_at,
            license,
            license_url,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author_id(&self) -> &str {
        &self.author_id
    }

    pub fn tags(&self) -> Option<&[String]> {
        self.tags.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn canonical_url(&self) -> Option<&str> {
        self.canonical_url.as_deref()
    }

    pub fn publish_status(&self) -> Option<&PublishStatus> {
        self.publish_status.as_ref()
    }

    /// Publication time in milliseconds since the Unix epoch. Unset for drafts.
    pub fn published_at(&self) -> Option<u64> {
        self.published_at
    }

    pub fn license(&self) -> Option<&License> {
        self.license.as_ref()
    }

    pub fn license_url(&self) -> Option<&str> {
        self.license_url.as_deref()
    }
}

impl Resource for Post {
    const KIND: &'static str = "post";

    fn decode(object: &Map<String, Value>, options: &DecodeOptions) -> Result<Self, DecodeError> {
        let fields = FieldReader::new(object, options);
        Ok(Self {
            id: fields.required_str(KEY_ID)?,
            title: fields.required_str(KEY_TITLE)?,
            author_id: fields.required_str(KEY_AUTHOR_ID)?,
            tags: fields.optional_str_list(KEY_TAGS)?,
            url: fields.optional_str(KEY_URL)?,
            canonical_url: fields.optional_str(KEY_CANONICAL_URL)?,
            publish_status: fields.optional_enum(KEY_PUBLISH_STATUS)?,
            published_at: fields.optional_u64(KEY_PUBLISHED_AT)?,
            license: fields.optional_enum(KEY_LICENSE)?,
            license_url: fields.optional_str(KEY_LICENSE_URL)?,
        })
    }

    fn encode(&self) -> Map<String, Value> {
        FieldWriter::new()
            .str(KEY_ID, &self.id)
            .str(KEY_TITLE, &self.title)
            .str(KEY_AUTHOR_ID, &self.author_id)
            .opt_str_list(KEY_TAGS, self.tags())
            .opt_str(KEY_URL, self.url())
            .opt_str(KEY_CANONICAL_URL, self.canonical_url())
            .opt_enumeration(KEY_PUBLISH_STATUS, self.publish_status())
            .opt_u64(KEY_PUBLISHED_AT, self.published_at)
            .opt_enumeration(KEY_LICENSE, self.license())
            .opt_str(KEY_LICENSE_URL, self.license_url())
            .finish()
    }
}

/// Payload for creating a post, under a user or a publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    title: String,
    content_format: ContentFormat,
    content: String,
    tags: Option<Vec<String>>,
    canonical_url: Option<String>,
    publish_status: Option<PublishStatus>,
    license: Option<License>,
    notify_followers: Option<bool>,
}

impl NewPost {
    /// Start a new post from its required parts. Optional settings are added
    /// through the returned builder.
    pub fn builder(
        title: impl Into<String>,
        content_format: ContentFormat,
        content: impl Into<String>,
    ) -> NewPostBuilder {
        NewPostBuilder {
            post: NewPost {
                title: title.into(),
                content_format,
                content: content.into(),
                tags: None,
                canonical_url: None,
                publish_status: None,
                license: None,
                notify_followers: None,
            },
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content_format(&self) -> &ContentFormat {
        &self.content_format
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn tags(&self) -> Option<&[String]> {
        self.tags.as_deref()
    }

    pub fn canonical_url(&self) -> Option<&str> {
        self.canonical_url.as_deref()
    }

    pub fn publish_status(&self) -> Option<&PublishStatus> {
        self.publish_status.as_ref()
    }

    pub fn license(&self) -> Option<&License> {
        self.license.as_ref()
    }

    pub fn notify_followers(&self) -> Option<bool> {
        self.notify_followers
    }
}

/// Accumulates the optional settings of a `NewPost`.
#[derive(Debug, Clone)]
#[must_use]
pub struct NewPostBuilder {
    post: NewPost,
}

impl NewPostBuilder {
    /// Up to three tags; Medium drops the rest.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.post.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_canonical_url(mut self, canonical_url: impl Into<String>) -> Self {
        self.post.canonical_url = Some(canonical_url.into());
        self
    }

    pub fn with_publish_status(mut self, publish_status: PublishStatus) -> Self {
        self.post.publish_status = Some(publish_status);
        self
    }

    pub fn with_license(mut self, license: License) -> Self {
        self.post.license = Some(license);
        self
    }

    pub fn with_notify_followers(mut self, notify_followers: bool) -> Self {
        self.post.notify_followers = Some(notify_followers);
        self
    }

    pub fn build(self) -> NewPost {
        self.post
    }
}

impl Resource for NewPost {
    const KIND: &'static str = "new post";

    fn decode(object: &Map<String, Value>, options: &DecodeOptions) -> Result<Self, DecodeError> {
        let fields = FieldReader::new(object, options);
        Ok(Self {
            title: fields.required_str(KEY_TITLE)?,
            content_format: fields.required_enum(KEY_CONTENT_FORMAT)?,
            content: fields.required_str(KEY_CONTENT)?,
            tags: fields.optional_str_list(KEY_TAGS)?,
            canonical_url: fields.optional_str(KEY_CANONICAL_URL)?,
            publish_status: fields.optional_enum(KEY_PUBLISH_STATUS)?,
            license: fields.optional_enum(KEY_LICENSE)?,
            notify_followers: fields.optional_bool(KEY_NOTIFY_FOLLOWERS)?,
        })
    }

    fn encode(&self) -> Map<String, Value> {
        FieldWriter::new()
            .str(KEY_TITLE, &self.title)
            .enumeration(KEY_CONTENT_FORMAT, &self.content_format)
            .str(KEY_CONTENT, &self.content)
            .opt_str_list(KEY_TAGS, self.tags())
            .opt_str(KEY_CANONICAL_URL, self.canonical_url())
            .opt_enumeration(KEY_PUBLISH_STATUS, self.publish_status())
            .opt_enumeration(KEY_LICENSE, self.license())
            .opt_bool(KEY_NOTIFY_FOLLOWERS, self.notify_followers)
            .finish()
    }
}

serde_via_codec!(Post, NewPost);

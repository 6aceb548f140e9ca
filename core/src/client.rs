//! Stateless HTTP request builder and response parser for the Medium API.
//!
//! # Design
//! `MediumClient` holds only its `ClientConfig` and carries no mutable state
//! between calls. Each endpoint is split into a `build_*` method that produces
//! an `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip and adds its own
//! `authorization` header, keeping the core free of I/O and credentials.
//!
//! Medium wraps successful payloads as `{"data": ...}` and failures as
//! `{"errors": [{"message": ..., "code": ...}]}`.

use percent_encoding::{utf8_percent_encode, AsciiSet, PercentEncode, NON_ALPHANUMERIC};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::codec::{decode_list, decode_value, encode_value, DecodeOptions, Resource};
use crate::config::ClientConfig;
use crate::error::{ApiError, DecodeError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::model::{Contributor, Image, NewPost, Post, Publication, User};

/// Image types accepted by the upload endpoint.
pub const IMAGE_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/tiff"];

/// Everything but unreserved characters is escaped in an id segment. Dots
/// are escaped too so an id can never form a `..` segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'~');

const DATA_KEY: &str = "data";
const IMAGE_FIELD: &str = "image";

/// Synchronous, stateless client for the Medium API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediumClient {
    config: ClientConfig,
}

impl MediumClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_config(ClientConfig::new(base_url))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn options(&self) -> &DecodeOptions {
        &self.config.decode
    }

    fn get(&self, path: &str) -> HttpRequest {
        debug!(method = "GET", path, "building request");
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{path}", self.config.base_url),
            headers: vec![("accept".to_string(), "application/json".to_string())],
            body: None,
        }
    }

    fn post(&self, path: &str, content_type: String, body: Vec<u8>) -> HttpRequest {
        debug!(method = "POST", path, body_len = body.len(), "building request");
        HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}{path}", self.config.base_url),
            headers: vec![
                ("accept".to_string(), "application/json".to_string()),
                ("content-type".to_string(), content_type),
            ],
            body: Some(body),
        }
    }

    fn post_json<R: Resource>(&self, path: &str, payload: &R) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_vec(&encode_value(payload))
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.post(path, "application/json".to_string(), body))
    }

    pub fn build_get_current_user(&self) -> HttpRequest {
        self.get("/v1/me")
    }

    pub fn build_list_publications(&self, user_id: &str) -> HttpRequest {
        self.get(&format!("/v1/users/{}/publications", segment(user_id)))
    }

    pub fn build_list_contributors(&self, publication_id: &str) -> HttpRequest {
        self.get(&format!("/v1/publications/{}/contributors", segment(publication_id)))
    }

    pub fn build_create_post(&self, author_id: &str, post: &NewPost) -> Result<HttpRequest, ApiError> {
        self.post_json(&format!("/v1/users/{}/posts", segment(author_id)), post)
    }

    pub fn build_create_publication_post(
        &self,
        publication_id: &str,
        post: &NewPost,
    ) -> Result<HttpRequest, ApiError> {
        self.post_json(&format!("/v1/publications/{}/posts", segment(publication_id)), post)
    }

    /// Build a multipart upload of raw image bytes. `content_type` must be one
    /// of `IMAGE_CONTENT_TYPES`.
    pub fn build_upload_image(&self, content_type: &str, data: &[u8]) -> Result<HttpRequest, ApiError> {
        let extension = image_extension(content_type)
            .ok_or_else(|| ApiError::UnsupportedMediaType(content_type.to_string()))?;
        let boundary = format!("medium-{}", Uuid::new_v4().simple());
        let body = multipart_body(&boundary, content_type, extension, data);
        Ok(self.post(
            "/v1/images",
            format!("multipart/form-data; boundary={boundary}"),
            body,
        ))
    }

    pub fn parse_get_current_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        self.parse_one(response, 200)
    }

    pub fn parse_list_publications(&self, response: HttpResponse) -> Result<Vec<Publication>, ApiError> {
        self.parse_many(response, 200)
    }

    pub fn parse_list_contributors(&self, response: HttpResponse) -> Result<Vec<Contributor>, ApiError> {
        self.parse_many(response, 200)
    }

    pub fn parse_create_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        self.parse_one(response, 201)
    }

    pub fn parse_create_publication_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        self.parse_one(response, 201)
    }

    pub fn parse_upload_image(&self, response: HttpResponse) -> Result<Image, ApiError> {
        self.parse_one(response, 201)
    }

    fn parse_one<R: Resource>(&self, response: HttpResponse, expected: u16) -> Result<R, ApiError> {
        let data = envelope_data(&response, expected)?;
        Ok(decode_value(&data, self.options())?)
    }

    fn parse_many<R: Resource>(&self, response: HttpResponse, expected: u16) -> Result<Vec<R>, ApiError> {
        let data = envelope_data(&response, expected)?;
        Ok(decode_list(&data, self.options())?)
    }
}

fn segment(id: &str) -> PercentEncode<'_> {
    utf8_percent_encode(id, SEGMENT)
}

/// Check the status and unwrap the `data` member of a success envelope.
fn envelope_data(response: &HttpResponse, expected: u16) -> Result<Value, ApiError> {
    check_status(response, expected)?;
    let mut envelope: Value = serde_json::from_str(&response.body)
        .map_err(|e| DecodeError::InvalidJson(e.to_string()))?;
    match envelope.get_mut(DATA_KEY).map(Value::take) {
        None | Some(Value::Null) => Err(DecodeError::MissingField { field: DATA_KEY }.into()),
        Some(data) => Ok(data),
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    match response.status {
        status if status == expected => Ok(()),
        401 => Err(ApiError::Unauthorized),
        404 => Err(ApiError::NotFound),
        status => {
            debug!(status, expected, "unexpected response status");
            Err(ApiError::Http {
                status,
                messages: error_messages(&response.body),
                body: response.body.clone(),
            })
        }
    }
}

/// Pull the `message` strings out of an error envelope. Bodies that are not
/// an error envelope yield no messages.
fn error_messages(body: &str) -> Vec<String> {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return Vec::new();
    };
    value
        .get("errors")
        .and_then(Value::as_array)
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e.get("message").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn image_extension(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/tiff" => Some("tiff"),
        _ => None,
    }
}

fn multipart_body(boundary: &str, content_type: &str, extension: &str, data: &[u8]) -> Vec<u8> {
    let head = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"{IMAGE_FIELD}\"; filename=\"image.{extension}\"\r\n\
         Content-Type: {content_type}\r\n\r\n"
    );
    let tail = format!("\r\n--{boundary}--\r\n");
    let mut body = Vec::with_capacity(head.len() + data.len() + tail.len());
    body.extend_from_slice(head.as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(tail.as_bytes());
    body
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::{ContentFormat, PublishStatus, Role};

    fn client() -> MediumClient {
        MediumClient::new("http://localhost:3000")
    }

    fn response(status: u16, body: Value) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_get_current_user_produces_correct_request() {
        let req = client().build_get_current_user();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/v1/me");
        assert_eq!(req.header("accept"), Some("application/json"));
        assert!(req.body.is_none());
    }

    #[test]
    fn build_list_publications_produces_correct_request() {
        let req = client().build_list_publications("5303d74c64f66366f00cb9b2a94f3251bf5");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.path,
            "http://localhost:3000/v1/users/5303d74c64f66366f00cb9b2a94f3251bf5/publications"
        );
    }

    #[test]
    fn build_list_contributors_produces_correct_request() {
        let req = client().build_list_contributors("b45573563f5a");
        assert_eq!(
            req.path,
            "http://localhost:3000/v1/publications/b45573563f5a/contributors"
        );
    }

    #[test]
    fn ids_are_escaped_as_a_single_path_segment() {
        let req = client().build_list_contributors("b45573563f5a/../../me?x=#y");
        assert_eq!(
            req.path,
            "http://localhost:3000/v1/publications/b45573563f5a%2F%2E%2E%2F%2E%2E%2Fme%3Fx%3D%23y/contributors"
        );

        let post = NewPost::builder("Hello", ContentFormat::Html, "<p>Hi</p>").build();
        let req = client().build_create_post("..", &post).unwrap();
        assert_eq!(req.path, "http://localhost:3000/v1/users/%2E%2E/posts");
        let req = client().build_create_publication_post("a b", &post).unwrap();
        assert_eq!(req.path, "http://localhost:3000/v1/publications/a%20b/posts");
        let req = client().build_list_publications("user_1-x~");
        assert_eq!(req.path, "http://localhost:3000/v1/users/user_1-x~/publications");
    }

    #[test]
    fn build_create_post_produces_correct_request() {
        let post = NewPost::builder("Hello", ContentFormat::Markdown, "# Hello")
            .with_publish_status(PublishStatus::Draft)
            .build();
        let req = client().build_create_post("u1", &post).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/v1/users/u1/posts");
        assert_eq!(req.header("content-type"), Some("application/json"));
        let body: Value = serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"title": "Hello", "contentFormat": "markdown", "content": "# Hello", "publishStatus": "draft"})
        );
    }

    #[test]
    fn build_create_publication_post_targets_publication() {
        let post = NewPost::builder("Hello", ContentFormat::Html, "<p>Hi</p>").build();
        let req = client().build_create_publication_post("p1", &post).unwrap();
        assert_eq!(req.path, "http://localhost:3000/v1/publications/p1/posts");
    }

    #[test]
    fn build_upload_image_wraps_bytes_in_multipart() {
        let data = [0x89, b'P', b'N', b'G'];
        let req = client().build_upload_image("image/png", &data).unwrap();
        assert_eq!(req.path, "http://localhost:3000/v1/images");

        let content_type = req.header("content-type").unwrap();
        let boundary = content_type
            .strip_prefix("multipart/form-data; boundary=")
            .unwrap();
        let body = req.body.as_deref().unwrap();
        let head = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"image.png\"\r\nContent-Type: image/png\r\n\r\n"
        );
        assert!(body.starts_with(head.as_bytes()));
        assert!(body.ends_with(format!("\r\n--{boundary}--\r\n").as_bytes()));
        assert!(body.windows(data.len()).any(|w| w == data));
    }

    #[test]
    fn build_upload_image_rejects_unsupported_type() {
        let err = client().build_upload_image("image/webp", b"RIFF").unwrap_err();
        assert!(matches!(err, ApiError::UnsupportedMediaType(t) if t == "image/webp"));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = MediumClient::new("http://localhost:3000/");
        assert_eq!(client.build_get_current_user().path, "http://localhost:3000/v1/me");
    }

    #[test]
    fn parse_get_current_user_success() {
        let user = client()
            .parse_get_current_user(response(200, json!({"data": {"id": "1", "username": "jamie"}})))
            .unwrap();
        assert_eq!(user.username(), "jamie");
    }

    #[test]
    fn parse_list_publications_success() {
        let publications = client()
            .parse_list_publications(response(
                200,
                json!({"data": [{"id": "b969ac62a46b", "name": "About Medium"}, {"id": "b45573563f5a"}]}),
            ))
            .unwrap();
        assert_eq!(publications.len(), 2);
        assert_eq!(publications[0].name(), Some("About Medium"));
        assert_eq!(publications[1].name(), None);
    }

    #[test]
    fn parse_list_contributors_rejects_unknown_role() {
        let err = client()
            .parse_list_contributors(response(
                200,
                json!({"data": [{"publicationId": "p", "userId": "u", "role": "owner"}]}),
            ))
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Decode(DecodeError::UnknownVariant { field: "role", .. })
        ));
    }

    #[test]
    fn parse_list_contributors_preserves_when_configured() {
        let config = ClientConfig::new("http://localhost:3000")
            .with_decode_options(DecodeOptions::preserving());
        let contributors = MediumClient::with_config(config)
            .parse_list_contributors(response(
                200,
                json!({"data": [{"publicationId": "p", "userId": "u", "role": "owner"}]}),
            ))
            .unwrap();
        assert_eq!(contributors[0].role(), &Role::Unrecognized("owner".to_string()));
    }

    #[test]
    fn parse_create_post_wrong_status() {
        let err = client()
            .parse_create_post(response(
                400,
                json!({"errors": [{"message": "Title is required", "code": 2004}]}),
            ))
            .unwrap_err();
        match err {
            ApiError::Http { status, messages, .. } => {
                assert_eq!(status, 400);
                assert_eq!(messages, vec!["Title is required".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_upload_image_success() {
        let image = client()
            .parse_upload_image(response(
                201,
                json!({"data": {"url": "https://images.medium.com/0*fkfQiTzT7TlUGGyI.png", "md5": "fkfQiTzT7TlUGGyI"}}),
            ))
            .unwrap();
        assert_eq!(image.md5(), "fkfQiTzT7TlUGGyI");
    }

    #[test]
    fn unauthorized_and_not_found_have_dedicated_variants() {
        let err = client().parse_get_current_user(response(401, json!({}))).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
        let err = client()
            .parse_list_contributors(response(404, json!({})))
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn missing_envelope_is_a_decode_error() {
        let err = client()
            .parse_get_current_user(response(200, json!({"id": "1", "username": "u"})))
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Decode(DecodeError::MissingField { field: "data" })
        ));
    }

    #[test]
    fn bad_json_is_a_decode_error() {
        let err = client()
            .parse_get_current_user(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: "not json".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(DecodeError::InvalidJson(_))));
    }

    #[test]
    fn every_accepted_image_type_has_an_extension() {
        for content_type in IMAGE_CONTENT_TYPES {
            assert!(image_extension(content_type).is_some(), "{content_type}");
        }
    }

    #[test]
    fn non_envelope_error_body_has_no_messages() {
        assert!(error_messages("internal error").is_empty());
        assert!(error_messages(r#"{"errors": "nope"}"#).is_empty());
    }
}

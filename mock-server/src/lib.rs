//! In-memory stand-in for the Medium API, used by the core crate's
//! integration tests.
//!
//! The wire types here are defined independently of `medium-core` so that the
//! integration tests catch schema drift between the two. Every endpoint
//! requires `authorization: Bearer <token>` and answers with Medium's
//! `{"data": ...}` / `{"errors": [...]}` envelopes.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const DEFAULT_TOKEN: &str = "test-token";

pub const ME_ID: &str = "5303d74c64f66366f00cb9b2a94f3251bf5";
pub const ABOUT_MEDIUM_ID: &str = "b969ac62a46b";
pub const DEVELOPERS_ID: &str = "b45573563f5a";

const LICENSE_URL: &str = "https://medium.com/policy/9db0094a1e0f";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub name: String,
    pub url: String,
    pub image_url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    pub id: String,
    pub name: String,
    pub description: String,
    pub url: String,
    pub image_url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contributor {
    pub publication_id: String,
    pub user_id: String,
    pub role: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Image {
    pub url: String,
    pub md5: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub author_id: String,
    pub tags: Vec<String>,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    pub publish_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<u64>,
    pub license: String,
    pub license_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePost {
    pub title: String,
    pub content_format: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub canonical_url: Option<String>,
    pub publish_status: Option<String>,
    pub license: Option<String>,
    pub notify_followers: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Everything the server knows. Keyed by user id for publications and by
/// publication id for contributors.
#[derive(Debug, Clone)]
pub struct Store {
    pub token: String,
    pub me: User,
    pub publications: HashMap<String, Vec<Publication>>,
    pub contributors: HashMap<String, Vec<Contributor>>,
    pub posts: Vec<Post>,
    pub images: Vec<Image>,
}

impl Store {
    /// One authenticated user who belongs to two publications.
    pub fn seeded(token: &str) -> Self {
        let me = User {
            id: ME_ID.to_string(),
            username: "majelbstoat".to_string(),
            name: "Jamie Talbot".to_string(),
            url: "https://medium.com/@majelbstoat".to_string(),
            image_url: "https://images.medium.com/0*fkfQiTzT7TlUGGyI.png".to_string(),
        };
        let publications = vec![
            Publication {
                id: ABOUT_MEDIUM_ID.to_string(),
                name: "About Medium".to_string(),
                description: "What is this thing and how does it work?".to_string(),
                url: "https://medium.com/about".to_string(),
                image_url: "https://cdn-images-1.medium.com/fit/c/200/200/0*ae1jbP_od0W6EulE.jpeg"
                    .to_string(),
            },
            Publication {
                id: DEVELOPERS_ID.to_string(),
                name: "Developers".to_string(),
                description: "Medium's Developer resources".to_string(),
                url: "https://medium.com/developers".to_string(),
                image_url: "https://cdn-images-1.medium.com/fit/c/200/200/1*ccokMT4VXmDDO1EoQQHkzg@2x.png"
                    .to_string(),
            },
        ];
        let contributor = |publication_id: &str, user_id: &str, role: &str| Contributor {
            publication_id: publication_id.to_string(),
            user_id: user_id.to_string(),
            role: role.to_string(),
        };
        let contributors = HashMap::from([
            (
                ABOUT_MEDIUM_ID.to_string(),
                vec![contributor(ABOUT_MEDIUM_ID, "13a06af8108a", "editor")],
            ),
            (
                DEVELOPERS_ID.to_string(),
                vec![
                    contributor(DEVELOPERS_ID, "1cc92a84cdc1", "editor"),
                    contributor(DEVELOPERS_ID, "2e3a7d2c5ec7", "writer"),
                ],
            ),
        ]);

        Self {
            token: token.to_string(),
            me,
            publications: HashMap::from([(ME_ID.to_string(), publications)]),
            contributors,
            posts: Vec::new(),
            images: Vec::new(),
        }
    }

    fn has_publication(&self, publication_id: &str) -> bool {
        self.publications
            .values()
            .flatten()
            .any(|p| p.id == publication_id)
    }

    fn create_post(&mut self, input: CreatePost) -> Post {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(12);
        let publish_status = input.publish_status.unwrap_or_else(|| "public".to_string());
        let published_at = (publish_status == "public").then(now_millis);
        let post = Post {
            url: format!("https://medium.com/@{}/{}-{id}", self.me.username, slug(&input.title)),
            id,
            title: input.title,
            author_id: self.me.id.clone(),
            tags: input.tags.into_iter().take(3).collect(),
            canonical_url: input.canonical_url,
            publish_status,
            published_at,
            license: input.license.unwrap_or_else(|| "all-rights-reserved".to_string()),
            license_url: LICENSE_URL.to_string(),
        };
        self.posts.push(post.clone());
        post
    }
}

pub type Db = Arc<RwLock<Store>>;

/// A Medium-style error envelope with its HTTP status.
#[derive(Debug)]
pub struct Failure {
    status: StatusCode,
    code: u32,
    message: String,
}

impl Failure {
    fn new(status: StatusCode, code: u32, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    fn unauthorized(message: &str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, 6000, message)
    }

    fn forbidden(message: &str) -> Self {
        Self::new(StatusCode::FORBIDDEN, 6027, message)
    }

    fn not_found(message: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, 6026, message)
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, 2004, message)
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        debug!(status = %self.status, code = self.code, message = %self.message, "request failed");
        let body = json!({"errors": [{"message": self.message, "code": self.code}]});
        (self.status, Json(body)).into_response()
    }
}

pub fn app() -> Router {
    app_with(Store::seeded(DEFAULT_TOKEN))
}

pub fn app_with(store: Store) -> Router {
    router(Arc::new(RwLock::new(store)))
}

/// Router over shared state the caller keeps a handle to, so tests can
/// inspect what the handlers recorded.
pub fn router(db: Db) -> Router {
    Router::new()
        .route("/v1/me", get(get_me))
        .route("/v1/users/{user_id}/publications", get(list_publications))
        .route("/v1/users/{user_id}/posts", post(create_user_post))
        .route("/v1/publications/{publication_id}/contributors", get(list_contributors))
        .route("/v1/publications/{publication_id}/posts", post(create_publication_post))
        .route("/v1/images", post(upload_image))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, Store::seeded(DEFAULT_TOKEN)).await
}

pub async fn run_with(listener: TcpListener, store: Store) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(store)).await
}

fn authorize(headers: &HeaderMap, store: &Store) -> Result<(), Failure> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match token {
        Some(token) if token == store.token => Ok(()),
        Some(_) => Err(Failure::unauthorized("Token was invalid.")),
        None => Err(Failure::unauthorized("An access token is required.")),
    }
}

fn check_content_format(input: &CreatePost) -> Result<(), Failure> {
    match input.content_format.as_str() {
        "html" | "markdown" => Ok(()),
        other => Err(Failure::bad_request(format!("Unsupported content format {other:?}."))),
    }
}

async fn get_me(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Envelope<User>>, Failure> {
    let store = db.read().await;
    authorize(&headers, &store)?;
    Ok(Json(Envelope {
        data: store.me.clone(),
    }))
}

async fn list_publications(
    State(db): State<Db>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Envelope<Vec<Publication>>>, Failure> {
    let store = db.read().await;
    authorize(&headers, &store)?;
    store
        .publications
        .get(&user_id)
        .cloned()
        .map(|data| Json(Envelope { data }))
        .ok_or_else(|| Failure::not_found("User not found."))
}

async fn list_contributors(
    State(db): State<Db>,
    Path(publication_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Envelope<Vec<Contributor>>>, Failure> {
    let store = db.read().await;
    authorize(&headers, &store)?;
    store
        .contributors
        .get(&publication_id)
        .cloned()
        .map(|data| Json(Envelope { data }))
        .ok_or_else(|| Failure::not_found("Publication not found."))
}

async fn create_user_post(
    State(db): State<Db>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
    Json(input): Json<CreatePost>,
) -> Result<(StatusCode, Json<Envelope<Post>>), Failure> {
    let mut store = db.write().await;
    authorize(&headers, &store)?;
    if user_id != store.me.id {
        return Err(Failure::forbidden("Cannot create a post for another user."));
    }
    check_content_format(&input)?;
    let post = store.create_post(input);
    info!(post_id = %post.id, author_id = %post.author_id, "created post");
    Ok((StatusCode::CREATED, Json(Envelope { data: post })))
}

async fn create_publication_post(
    State(db): State<Db>,
    Path(publication_id): Path<String>,
    headers: HeaderMap,
    Json(input): Json<CreatePost>,
) -> Result<(StatusCode, Json<Envelope<Post>>), Failure> {
    let mut store = db.write().await;
    authorize(&headers, &store)?;
    if !store.has_publication(&publication_id) {
        return Err(Failure::not_found("Publication not found."));
    }
    check_content_format(&input)?;
    let post = store.create_post(input);
    info!(post_id = %post.id, %publication_id, "created publication post");
    Ok((StatusCode::CREATED, Json(Envelope { data: post })))
}

/// Accepts a multipart form with an `image` field. The returned `md5` is an
/// opaque per-upload digest, not a hash of the bytes.
async fn upload_image(
    State(db): State<Db>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Envelope<Image>>), Failure> {
    authorize(&headers, &*db.read().await)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Failure::bad_request(e.body_text()))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        let Some(extension) = image_extension(&content_type) else {
            return Err(Failure::new(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                6018,
                format!("Unsupported image type {content_type:?}."),
            ));
        };
        let data = field
            .bytes()
            .await
            .map_err(|e| Failure::bad_request(e.body_text()))?;
        if data.is_empty() {
            return Err(Failure::bad_request("Image is empty."));
        }

        let digest = Uuid::new_v4().simple().to_string();
        let image = Image {
            url: format!("https://cdn-images-1.medium.com/{digest}.{extension}"),
            md5: digest,
        };
        db.write().await.images.push(image.clone());
        info!(url = %image.url, size = data.len(), "uploaded image");
        return Ok((StatusCode::CREATED, Json(Envelope { data: image })));
    }

    Err(Failure::bad_request("Missing `image` field."))
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

fn slug(title: &str) -> String {
    title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}

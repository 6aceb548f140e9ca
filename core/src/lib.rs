//! Typed resource model and codec for the Medium publishing API.
//!
//! # Overview
//! Immutable resource values (`User`, `Publication`, `Contributor`, `Image`,
//! `Post`) with a hand-written mapping to and from the wire JSON, builders for
//! the optional-heavy ones, and a stateless `MediumClient` that builds
//! `HttpRequest` values and parses `HttpResponse` values without touching the
//! network (host-does-IO pattern).
//!
//! # Design
//! - Wire keys are `const` strings next to each resource; nothing is derived
//!   from Rust field names.
//! - `DecodeOptions` decides whether an unrecognized enum string fails the
//!   decode or is kept as `Unrecognized`. The default rejects.
//! - Unset optional fields are omitted on encode.
//! - `MediumClient` holds only `ClientConfig`; authentication headers are
//!   added by the caller.

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod http;
pub mod model;

pub use client::MediumClient;
pub use codec::{
    decode_list, decode_str, decode_value, encode_value, DecodeOptions, Resource,
    UnknownVariantPolicy, WireEnum,
};
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError, DecodeError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use model::{
    ContentFormat, Contributor, Image, License, NewPost, NewPostBuilder, Post, Publication,
    PublicationBuilder, PublicationFields, PublishStatus, Role, User,
};

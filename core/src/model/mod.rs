//! Immutable Medium resources.
//!
//! # Design
//! Fields are private and exposed through read-only accessors, so a value
//! never changes after construction. Each type owns its wire mapping in a
//! `Resource` impl next to its definition; ids that point at other resources
//! (`publication_id`, `user_id`, `author_id`) are plain strings, never nested
//! objects.

mod contributor;
mod enums;
mod image;
mod post;
mod publication;
mod user;

pub use contributor::Contributor;
pub use enums::{ContentFormat, License, PublishStatus, Role};
pub use image::Image;
pub use post::{NewPost, NewPostBuilder, Post};
pub use publication::{Publication, PublicationBuilder, PublicationFields};
pub use user::User;

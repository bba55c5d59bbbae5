//! Domain entities - the core business objects.

mod document;
mod image;
mod post;
mod signup;

pub use document::{Block, Document, ImageNode};
pub use image::ImageAsset;
pub use post::{NewPost, Post, PostPatch, read_time_label, slugify};
pub use signup::{EmailError, WaitlistSignup};

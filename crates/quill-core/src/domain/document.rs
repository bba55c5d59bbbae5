//! Document model for post content.
//!
//! The rich-text toolkit serializes its tree to HTML; this module holds the
//! minimal block-level view the authoring pipeline needs: opaque HTML runs
//! plus image nodes. Image placeholders carry an explicit `data-upload-id`
//! correlation attribute so an in-flight upload can find its node directly
//! instead of re-scanning the tree by source URL.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An image node inside the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageNode {
    pub src: String,
    /// Tagged while the backing upload is still in flight.
    pub loading: bool,
    /// Correlation id linking the node to its upload attempt.
    pub upload_id: Option<Uuid>,
}

/// A top-level block: either an opaque run of serialized markup, or an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Html(String),
    Image(ImageNode),
}

/// Parsed post content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    /// Parse serialized markup, lifting `<img>` tags into image nodes and
    /// keeping everything else verbatim. Forgiving by design: anything this
    /// parser does not understand round-trips untouched.
    pub fn from_html(html: &str) -> Self {
        let mut blocks = Vec::new();
        let mut rest = html;

        while let Some(start) = rest.find("<img") {
            let (before, tag_on) = rest.split_at(start);
            if !before.is_empty() {
                blocks.push(Block::Html(before.to_string()));
            }
            let Some(end) = tag_on.find('>') else {
                // Truncated tag, keep as-is.
                blocks.push(Block::Html(tag_on.to_string()));
                rest = "";
                break;
            };
            let tag = &tag_on[..=end];
            blocks.push(Block::Image(ImageNode {
                src: attr_value(tag, "src").unwrap_or_default(),
                loading: attr_value(tag, "data-loading").as_deref() == Some("true"),
                upload_id: attr_value(tag, "data-upload-id")
                    .and_then(|v| Uuid::parse_str(&v).ok()),
            }));
            rest = &tag_on[end + 1..];
        }
        if !rest.is_empty() {
            blocks.push(Block::Html(rest.to_string()));
        }

        Self { blocks }
    }

    /// Serialize back to markup.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            match block {
                Block::Html(html) => out.push_str(html),
                Block::Image(img) => {
                    out.push_str("<img src=\"");
                    out.push_str(&escape_attr(&img.src));
                    out.push('"');
                    if let Some(id) = img.upload_id {
                        out.push_str(&format!(" data-upload-id=\"{}\"", id));
                    }
                    if img.loading {
                        out.push_str(" data-loading=\"true\"");
                    }
                    out.push_str(" />");
                }
            }
        }
        out
    }

    /// Append a loading placeholder for an in-flight upload.
    pub fn insert_loading_image(&mut self, upload_id: Uuid, preview_src: &str) {
        self.blocks.push(Block::Image(ImageNode {
            src: preview_src.to_string(),
            loading: true,
            upload_id: Some(upload_id),
        }));
    }

    /// Swap the placeholder for its final public URL and clear the loading
    /// tag. Returns false if the node is gone (deleted during upload); the
    /// caller discards the result in that case.
    pub fn resolve_image(&mut self, upload_id: Uuid, public_url: &str) -> bool {
        match self.image_mut(upload_id) {
            Some(img) => {
                img.src = public_url.to_string();
                img.loading = false;
                img.upload_id = None;
                true
            }
            None => false,
        }
    }

    /// Remove the placeholder for a failed upload entirely.
    pub fn remove_image(&mut self, upload_id: Uuid) -> bool {
        let before = self.blocks.len();
        self.blocks.retain(
            |b| !matches!(b, Block::Image(img) if img.upload_id == Some(upload_id)),
        );
        self.blocks.len() != before
    }

    /// All image nodes, in document order.
    pub fn images(&self) -> impl Iterator<Item = &ImageNode> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Image(img) => Some(img),
            Block::Html(_) => None,
        })
    }

    /// Word count over the text content, with markup stripped.
    pub fn word_count(&self) -> u32 {
        let mut words = 0u32;
        for block in &self.blocks {
            if let Block::Html(html) = block {
                words += strip_tags(html).split_whitespace().count() as u32;
            }
        }
        words
    }

    fn image_mut(&mut self, upload_id: Uuid) -> Option<&mut ImageNode> {
        self.blocks.iter_mut().find_map(|b| match b {
            Block::Image(img) if img.upload_id == Some(upload_id) => Some(img),
            _ => None,
        })
    }
}

fn attr_value(tag: &str, name: &str) -> Option<String> {
    let needle = format!("{}=\"", name);
    let start = tag.find(&needle)? + needle.len();
    let end = tag[start..].find('"')?;
    Some(tag[start..start + end].to_string())
}

fn escape_attr(value: &str) -> String {
    value.replace('"', "&quot;")
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                out.push(' ');
            }
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

//! Post models and their mapping from CMS records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::richtext::RichDocument;

/// Category used when a record carries none
pub const UNCATEGORIZED: &str = "Uncategorized";

/// One blog entry as shown in listings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub category: String,
    pub date: DateTime<Utc>,
    pub slug: String,
    /// Display string such as "3 min read"; `None` means unknown
    pub read_time: Option<String>,
    /// Display image URL
    pub image: Option<String>,
}

impl PostSummary {
    /// Publication month, e.g. "March 2024"
    pub fn display_date(&self) -> String {
        crate::helpers::month_year(&self.date)
    }

    /// Full publication date, e.g. "March 5, 2024"
    pub fn full_date(&self) -> String {
        crate::helpers::full_date(&self.date)
    }

    /// Link to the detail page
    pub fn path(&self) -> String {
        format!("/blog/{}", self.slug)
    }
}

/// A post together with its rich-text body
#[derive(Debug, Clone, PartialEq)]
pub struct RichPost {
    pub summary: PostSummary,
    pub content: RichDocument,
}

impl RichPost {
    /// Render the body
    pub fn render(&self) -> RenderedPost {
        RenderedPost {
            summary: self.summary.clone(),
            html: self.content.render(),
        }
    }
}

/// A post with its body already rendered to HTML
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPost {
    pub summary: PostSummary,
    pub html: String,
}

/// Post record as returned by the CMS
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiPost {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    title: String,
    #[serde(default)]
    excerpt: Option<String>,
    #[serde(default)]
    category: Option<Value>,
    created_at: DateTime<Utc>,
    slug: String,
    #[serde(default)]
    read_time: Option<String>,
    #[serde(default)]
    image: Option<Value>,
    #[serde(default)]
    content: Option<Value>,
}

/// Display label of a category field. Labels come either bare or as a
/// populated `{ name }` relation; an unpopulated relation id or any other
/// shape has no label.
fn category_label(category: &Value) -> Option<&str> {
    let label = match category {
        Value::String(label) if !is_relation_id(label) => label.as_str(),
        Value::Object(relation) => relation.get("name").and_then(Value::as_str)?,
        _ => return None,
    };
    Some(label).filter(|label| !label.trim().is_empty())
}

/// URL of a populated upload relation
fn image_url(image: &Value) -> Option<String> {
    image
        .get("url")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}

/// Unpopulated relations are serialized as 24-digit hex document ids
fn is_relation_id(value: &str) -> bool {
    value.len() == 24 && value.bytes().all(|b| b.is_ascii_hexdigit())
}

fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

/// Estimated read time from the length of a plain-text body
pub fn estimate_read_time(content: &str) -> String {
    let minutes = content.chars().count().div_ceil(1000);
    format!("{} min read", minutes)
}

impl ApiPost {
    pub(crate) fn into_summary(self) -> PostSummary {
        self.split().0
    }

    pub(crate) fn into_rich_post(self) -> RichPost {
        let (summary, content) = self.split();
        let content = content
            .as_ref()
            .map(RichDocument::from_value)
            .unwrap_or_default();
        RichPost { summary, content }
    }

    fn split(self) -> (PostSummary, Option<Value>) {
        let category = self
            .category
            .as_ref()
            .and_then(category_label)
            .unwrap_or(UNCATEGORIZED)
            .to_string();

        let read_time = self
            .read_time
            .filter(|t| !t.trim().is_empty() && t.trim() != "0")
            .or_else(|| match &self.content {
                Some(Value::String(body)) if !body.is_empty() => Some(estimate_read_time(body)),
                _ => None,
            });

        let summary = PostSummary {
            id: self.id,
            title: self.title,
            excerpt: self.excerpt.unwrap_or_default(),
            category,
            date: self.created_at,
            slug: self.slug,
            read_time,
            image: self.image.as_ref().and_then(image_url),
        };

        (summary, self.content)
    }
}

//! Rich-text documents from the CMS editor and their HTML rendering
//!
//! Documents arrive as a JSON tree rooted at `root.children`. Parsing is
//! lenient: any JSON value yields a document, missing or ill-typed fields
//! become absent, and unknown node types are kept as [`Node::Unknown`] so
//! the renderer can skip them without aborting the rest of the tree.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::ops::BitOr;

use crate::helpers::html_escape;

/// Text formatting bitmask carried by every text run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TextFormat(u32);

impl TextFormat {
    pub const PLAIN: Self = Self(0);
    pub const BOLD: Self = Self(1);
    pub const ITALIC: Self = Self(2);
    pub const UNDERLINE: Self = Self(4);
    pub const CODE: Self = Self(8);
    pub const HIGHLIGHT: Self = Self(32);
    pub const ACCENT: Self = Self(64);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True when every bit of `other` is set
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for TextFormat {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Wrappers in application order: each one wraps the output of the
/// previous, so bold ends up innermost and the accent span outermost.
const WRAPPERS: [(TextFormat, &str, &str); 6] = [
    (TextFormat::BOLD, "<strong>", "</strong>"),
    (TextFormat::ITALIC, "<em>", "</em>"),
    (TextFormat::UNDERLINE, "<u>", "</u>"),
    (TextFormat::CODE, "<code>", "</code>"),
    (TextFormat::HIGHLIGHT, r#"<span class="rt-highlight">"#, "</span>"),
    (TextFormat::ACCENT, r#"<span class="rt-accent">"#, "</span>"),
];

/// A leaf run of literal text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub format: TextFormat,
}

impl TextRun {
    pub fn new(text: impl Into<String>, format: TextFormat) -> Self {
        Self {
            text: text.into(),
            format,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, TextFormat::PLAIN)
    }
}

/// List flavours supported by the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Numbered,
    Bulleted,
    Checklist,
}

impl ListKind {
    /// Map the editor's `listType` field
    pub fn from_list_type(list_type: &str) -> Option<Self> {
        match list_type {
            "number" => Some(Self::Numbered),
            "bullet" => Some(Self::Bulleted),
            "check" => Some(Self::Checklist),
            _ => None,
        }
    }
}

/// A node in the document tree.
///
/// `None` children mean the field was missing or not an array, which is
/// distinct from an empty array.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Paragraph {
        children: Option<Vec<Node>>,
    },
    Heading {
        level: Option<u8>,
        children: Option<Vec<Node>>,
    },
    List {
        kind: Option<ListKind>,
        items: Option<Vec<Node>>,
    },
    ListItem {
        checked: bool,
        children: Option<Vec<Node>>,
    },
    Quote {
        children: Option<Vec<Node>>,
    },
    Text(TextRun),
    Unknown(String),
}

impl Node {
    /// Build a node from editor JSON; never fails
    pub fn from_value(value: &Value) -> Self {
        let node_type = value.get("type").and_then(Value::as_str).unwrap_or("");

        match node_type {
            "paragraph" => Node::Paragraph {
                children: children_of(value),
            },
            "heading" => Node::Heading {
                level: value
                    .get("tag")
                    .and_then(Value::as_str)
                    .and_then(heading_level),
                children: children_of(value),
            },
            "list" => Node::List {
                kind: value
                    .get("listType")
                    .and_then(Value::as_str)
                    .and_then(ListKind::from_list_type),
                items: children_of(value),
            },
            "listitem" => Node::ListItem {
                checked: value
                    .get("checked")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                children: children_of(value),
            },
            "quote" => Node::Quote {
                children: children_of(value),
            },
            "text" => {
                let text = value.get("text").and_then(Value::as_str).unwrap_or("");
                let bits = value
                    .get("format")
                    .and_then(Value::as_u64)
                    .and_then(|bits| u32::try_from(bits).ok())
                    .unwrap_or(0);
                Node::Text(TextRun::new(text, TextFormat::from_bits(bits)))
            }
            other => Node::Unknown(other.to_string()),
        }
    }

    /// The editor type tag this node was parsed from
    pub fn type_name(&self) -> &str {
        match self {
            Node::Paragraph { .. } => "paragraph",
            Node::Heading { .. } => "heading",
            Node::List { .. } => "list",
            Node::ListItem { .. } => "listitem",
            Node::Quote { .. } => "quote",
            Node::Text(_) => "text",
            Node::Unknown(name) => name.as_str(),
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Node::from_value(&value))
    }
}

fn children_of(value: &Value) -> Option<Vec<Node>> {
    value
        .get("children")
        .and_then(Value::as_array)
        .map(|children| children.iter().map(Node::from_value).collect())
}

fn heading_level(tag: &str) -> Option<u8> {
    tag.strip_prefix('h')
        .and_then(|level| level.parse::<u8>().ok())
        .filter(|level| (1..=6).contains(level))
}

/// The body of a post
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RichDocument {
    /// Children of the root container; `None` when the root is malformed
    pub children: Option<Vec<Node>>,
}

impl RichDocument {
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            children: Some(children),
        }
    }

    /// Build a document from a `{ "root": { "children": [...] } }` value
    pub fn from_value(value: &Value) -> Self {
        Self {
            children: value.get("root").and_then(children_of),
        }
    }

    /// Render the document to HTML
    pub fn render(&self) -> String {
        render(self)
    }
}

impl<'de> Deserialize<'de> for RichDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(RichDocument::from_value(&value))
    }
}

/// Render a document to HTML.
///
/// Pure function of the tree: the same document always yields the same
/// string. Malformed or unknown nodes render as nothing.
pub fn render(doc: &RichDocument) -> String {
    let Some(children) = doc.children.as_deref() else {
        tracing::warn!("Rich text document has no root children");
        return String::new();
    };

    children.iter().map(render_block).collect()
}

fn render_block(node: &Node) -> String {
    match node {
        Node::Paragraph { children } => render_paragraph(children.as_deref()),
        Node::Heading {
            level: Some(level),
            children: Some(children),
        } => format!(
            r#"<h{level} class="rt-heading rt-h{level}">{}</h{level}>"#,
            plain_text(children)
        ),
        Node::List {
            kind: Some(kind),
            items: Some(items),
        } => render_list(*kind, items),
        Node::Quote {
            children: Some(children),
        } => format!(
            r#"<blockquote class="rt-quote">{}</blockquote>"#,
            plain_text(children)
        ),
        other => {
            tracing::debug!(node = other.type_name(), "Skipping rich text node");
            String::new()
        }
    }
}

fn render_paragraph(children: Option<&[Node]>) -> String {
    match children {
        None | Some([]) => "<p><br></p>".to_string(),
        Some(children) => {
            let inner: String = children
                .iter()
                .map(|child| match child {
                    Node::Text(run) => render_run(run),
                    _ => String::new(),
                })
                .collect();
            format!("<p>{}</p>", inner)
        }
    }
}

fn render_run(run: &TextRun) -> String {
    WRAPPERS
        .iter()
        .filter(|(flag, _, _)| run.format.contains(*flag))
        .fold(html_escape(&run.text), |inner, (_, open, close)| {
            format!("{open}{inner}{close}")
        })
}

/// Concatenated text of the text children, formatting ignored
fn plain_text(children: &[Node]) -> String {
    children
        .iter()
        .map(|child| match child {
            Node::Text(run) => html_escape(&run.text),
            _ => String::new(),
        })
        .collect()
}

fn render_list(kind: ListKind, items: &[Node]) -> String {
    let (tag, class) = match kind {
        ListKind::Numbered => ("ol", "rt-list rt-list-numbered"),
        ListKind::Bulleted => ("ul", "rt-list rt-list-bulleted"),
        ListKind::Checklist => ("ul", "rt-list rt-list-checklist"),
    };

    let mut html = format!(r#"<{tag} class="{class}">"#);
    for item in items {
        let Node::ListItem {
            checked,
            children: Some(children),
        } = item
        else {
            continue;
        };

        let text = plain_text(children);
        if kind == ListKind::Checklist {
            let checked = if *checked { " checked" } else { "" };
            html.push_str(&format!(
                r#"<li class="rt-check-item"><input type="checkbox"{checked} disabled><span>{text}</span></li>"#
            ));
        } else {
            html.push_str(&format!("<li>{text}</li>"));
        }
    }
    html.push_str(&format!("</{tag}>"));
    html
}

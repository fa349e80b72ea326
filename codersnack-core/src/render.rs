//! Turning fetched CMS documents into static-site files.
//!
//! Everything here is pure: callers pass the date stamp in and receive
//! [`RenderedDocument`]s back, which the export pipeline writes to disk.

use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::contract::{ContentItem, SnackEnvelope};
use crate::error::RenderError;

/// One output file, relative to the export's output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub filename: String,
    pub content: String,
}

/// Replace every literal occurrence of `search` in `input`.
pub fn replace_all(input: &str, search: &str, replacement: &str) -> String {
    if search.is_empty() {
        return input.to_owned();
    }
    input.replace(search, replacement)
}

/// Filename-safe form of a title: spaces become hyphens, `:` and `?` are dropped.
pub fn slugify(title: &str) -> String {
    let hyphenated = replace_all(title, " ", "-");
    replace_all(&replace_all(&hyphenated, "?", ""), ":", "")
}

/// Make one filename segment safe to join onto the output directory.
///
/// Path separators and characters reserved on common filesystems become `_`,
/// control characters are dropped, `..` runs collapse to a single dot and
/// leading or trailing dots are trimmed.
pub fn fs_safe_segment(segment: &str) -> String {
    let mut name = segment.replace(&['/', '\\', ':', '*', '?', '"', '<', '>', '|'][..], "_");
    name.retain(|c| !c.is_control());
    while name.contains("..") {
        name = name.replace("..", ".");
    }
    name.trim_matches('.').to_owned()
}

/// Rewrite a leading `http:` scheme to `https:`.
pub fn secure_url(url: &str) -> String {
    match url.strip_prefix("http:") {
        Some(rest) => format!("https:{rest}"),
        None => url.to_owned(),
    }
}

/// Zero-padded `YYYY-MM-DD`, used as the post filename prefix.
pub fn date_stamp(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// YAML-like header block understood by the static-site generator.
#[derive(Debug, Clone)]
pub struct FrontMatter<'a> {
    pub layout: &'a str,
    pub title: &'a str,
    pub date: &'a str,
    pub permalink: String,
    pub icon: &'a str,
    pub categories: &'a str,
    pub exclude: bool,
}

impl FrontMatter<'_> {
    pub fn render(&self) -> String {
        let mut out = String::from("---\n");
        out.push_str(&format!("layout: {}\n", self.layout));
        out.push_str(&format!("title:  {}\n", self.title));
        out.push_str(&format!("date:   {}\n", self.date));
        out.push_str(&format!("permalink: {}\n", self.permalink));
        out.push_str(&format!("icon: {}\n", secure_url(self.icon)));
        out.push_str(&format!("categories: [{}]\n", self.categories));
        if self.exclude {
            out.push_str("exclude: true\n");
        }
        out.push_str("---");
        out
    }
}

fn item_date(item: &ContentItem) -> &str {
    item.updated_at.as_deref().unwrap_or(&item.created_at)
}

/// Digest post for one category: a bullet list linking every snack in it.
///
/// The category is taken from the first envelope; an empty list yields `None`.
pub fn render_category_digest(
    envelopes: &[SnackEnvelope],
    stamp: &str,
) -> Option<RenderedDocument> {
    let category = &envelopes.first()?.codersnacks_category;

    let header = FrontMatter {
        layout: "category-post",
        title: &category.header,
        date: category.updated_at.as_deref().unwrap_or_default(),
        permalink: format!("/{}/", category.key),
        icon: &category.image_url,
        categories: "catpost",
        exclude: true,
    }
    .render();

    let body: String = envelopes
        .iter()
        .map(|e| format!(" * [{}]({}) \n", e.codersnack.header, e.codersnack.weblink))
        .collect();

    Some(RenderedDocument {
        filename: format!("{stamp}-{}.markdown", fs_safe_segment(&category.key)),
        content: format!("{header}\n{body}"),
    })
}

/// Full article post: header, references block, then the snack body.
pub fn render_article(item: &ContentItem, stamp: &str) -> RenderedDocument {
    let title = replace_all(&item.header, ":", "");
    let header = FrontMatter {
        layout: "post",
        title: &title,
        date: item_date(item),
        permalink: format!("/{}/", item.slug),
        icon: &item.featured_image_url,
        categories: "snackpost",
        exclude: false,
    }
    .render();
    let references = format!("\n> Information drawn from \n{}\n", item.references);

    RenderedDocument {
        filename: format!("{stamp}-{}.markdown", fs_safe_segment(&slugify(&item.header))),
        content: format!("{header}\n{references}\n{}", item.explanation),
    }
}

/// Main-content variant of an article, published under `/<slug>/main-content/`.
pub fn render_main_content(item: &ContentItem, stamp: &str) -> RenderedDocument {
    let title = replace_all(&item.header, ":", "");
    let header = FrontMatter {
        layout: "main-content-post",
        title: &title,
        date: item_date(item),
        permalink: format!("/{}/main-content/", item.slug),
        icon: &item.featured_image_url,
        categories: "snack-main-content-post",
        exclude: false,
    }
    .render();

    RenderedDocument {
        filename: format!(
            "{stamp}-{}-MC.markdown",
            fs_safe_segment(&slugify(&item.header))
        ),
        content: format!("{header}\n\n{}", item.explanation),
    }
}

/// `{"count": n}` for a quizzes array.
pub fn quiz_count(quizzes: &Value) -> Result<Value, RenderError> {
    match quizzes {
        Value::Array(items) => Ok(json!({ "count": items.len() })),
        other => Err(RenderError::NotAnArray(json_kind(other))),
    }
}

/// `css.quizzes.json` -> `css.quizzes-count.json`.
pub fn count_filename(name: &str) -> String {
    match name.strip_suffix(".json") {
        Some(stem) => format!("{stem}-count.json"),
        None => format!("{name}-count.json"),
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

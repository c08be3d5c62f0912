use std::collections::HashSet;

use ammonia::Builder;
use once_cell::sync::Lazy;

static ALLOWED_TAGS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "div",
        "p",
        "span",
        "pre",
        "blockquote",
        "h1",
        "h2",
        "h3",
        "h4",
        "h5",
        "h6",
        "table",
        "tbody",
        "tr",
        "td",
    ]
    .into_iter()
    .collect()
});

static ALLOWED_ATTRIBUTES: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["class", "title"].into_iter().collect());

/// Cleans `html` against the elements and attributes a conversion can emit.
pub fn sanitize_html(html: &str) -> String {
    Builder::new()
        .tags(ALLOWED_TAGS.clone())
        .generic_attributes(ALLOWED_ATTRIBUTES.clone())
        .clean(html)
        .to_string()
}

/// Entity for a character that must not appear raw in HTML text.
pub fn entity(ch: char) -> Option<&'static str> {
    match ch {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        _ => None,
    }
}

pub fn escape_attr(text: &str) -> String {
    let mut out = String::new();
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("&quot;"),
            _ => match entity(ch) {
                Some(escaped) => out.push_str(escaped),
                None => out.push(ch),
            },
        }
    }
    out
}

/// ` class="P" title="P"`, or nothing without a prop.
fn class_and_title(prop: Option<&str>) -> String {
    match prop.filter(|prop| !prop.is_empty()) {
        Some(prop) => {
            let prop = escape_attr(prop);
            format!(" class=\"{}\" title=\"{}\"", prop, prop)
        }
        None => String::new(),
    }
}

fn class_only(prop: Option<&str>) -> String {
    prop.filter(|prop| !prop.is_empty())
        .map(|prop| format!(" class=\"{}\"", escape_attr(prop)))
        .unwrap_or_default()
}

pub fn paragraph_open(prop: Option<&str>) -> String {
    format!("<p{}>", class_and_title(prop))
}

pub const PARAGRAPH_CLOSE: &str = "</p>";

pub fn heading_open(level: usize, prop: Option<&str>) -> String {
    format!("<h{}{}>", level, class_and_title(prop))
}

pub fn heading_close(level: usize) -> String {
    format!("</h{}>", level)
}

pub fn pre_open(prop: Option<&str>) -> String {
    format!("<pre{}>", class_only(prop))
}

pub const PRE_CLOSE: &str = "</pre>";

pub fn blockquote_open(prop: Option<&str>) -> String {
    format!("<blockquote{}>", class_only(prop))
}

pub const BLOCKQUOTE_CLOSE: &str = "</blockquote>";

/// Opening wrapper of a character format.
pub fn format_open(class: &str) -> String {
    format!("<span{}>", class_and_title(Some(class)))
}

/// Opening wrapper of a milestone reference.
pub fn milestone_open(prop: Option<&str>) -> String {
    format!("<span{}>", class_only(prop))
}

pub const SPAN_CLOSE: &str = "</span>";

pub const SOFT_HYPHEN_OPEN: &str = "<span class=\"soft-hyphen\">";

/// The 2x2 table skeleton standing in for a divider line.
pub fn divider_html(prop: &str) -> String {
    let prop = escape_attr(prop);
    format!(
        "<table class=\"{p}\" title=\"{p}\"><tr><td class=\"{p}-lefttop\"></td><td class=\"{p}-righttop\"></td></tr><tr><td class=\"{p}-leftbot\"></td><td class=\"{p}-rightbot\"></td></tr></table>",
        p = prop
    )
}

use crate::approved_urls::is_brand_domain;
use crate::models::{
    AnalyzeRequest, ContentType, ExtractedHeading, ExtractedImage, ExtractedLink, SeoMetadata,
};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use scraper::{Html, Node, Selector};
use std::borrow::Cow;

// Markdown patterns, compiled once
static MD_FENCED_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```.*?```").expect("fenced code regex should be valid"));
static MD_INLINE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`[^`]+`").expect("inline code regex should be valid"));
static MD_IMAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").expect("markdown image regex should be valid")
});
// Link text may wrap an image, as in `[![badge](img)](url)`
static MD_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[((?:!\[[^\]]*\]\([^)]*\)|[^\]])*)\]\(([^)]+)\)")
        .expect("markdown link regex should be valid")
});
static MD_HEADING_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#+\s*").expect("heading marker regex should be valid"));
static MD_HEADING_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").expect("heading line regex should be valid"));
static MD_EMPHASIS: Lazy<[Regex; 4]> = Lazy::new(|| {
    [
        r"\*\*([^*]+)\*\*",
        r"\*([^*]+)\*",
        r"__([^_]+)__",
        r"_([^_]+)_",
    ]
    .map(|pattern| Regex::new(pattern).expect("emphasis regex should be valid"))
});

// HTML selectors, parsed once
static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("a[href] selector should be valid"));
static HEADING_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6").expect("heading selector should be valid")
});
static IMG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("img selector should be valid"));

/// Elements whose text never counts as prose.
const NON_PROSE_ELEMENTS: &[&str] = &["script", "style", "pre", "code"];

/// Everything the category analyzers need, extracted once per request.
#[derive(Debug, Clone)]
pub struct AnalyzerContext {
    pub content: String,
    pub content_type: ContentType,
    pub seo_metadata: Option<SeoMetadata>,
    pub text_content: String,
    pub word_count: usize,
    pub links: Vec<ExtractedLink>,
    pub headings: Vec<ExtractedHeading>,
    pub images: Vec<ExtractedImage>,
}

impl AnalyzerContext {
    pub fn new(content: &str, content_type: ContentType, seo_metadata: Option<SeoMetadata>) -> Self {
        let (text_content, links, headings, images) = match content_type {
            ContentType::Markdown => {
                let masked = without_fenced_code(content);
                (
                    markdown_text(content),
                    markdown_links(&masked),
                    markdown_headings(&masked),
                    markdown_images(&masked),
                )
            }
            ContentType::Html => {
                let document = Html::parse_document(content);
                (
                    html_text(&document),
                    html_links(&document),
                    html_headings(&document),
                    html_images(&document),
                )
            }
        };
        let word_count = text_content.split_whitespace().count();

        Self {
            content: content.to_string(),
            content_type,
            seo_metadata,
            text_content,
            word_count,
            links,
            headings,
            images,
        }
    }

    pub fn from_request(request: &AnalyzeRequest) -> Self {
        Self::new(
            &request.content,
            request.content_type,
            request.seo_metadata.clone(),
        )
    }

    pub fn metadata(&self) -> Option<&SeoMetadata> {
        self.seo_metadata.as_ref()
    }
}

/// 1-based line number of a byte offset.
fn line_of(content: &str, offset: usize) -> usize {
    content[..offset].matches('\n').count() + 1
}

/// Drops a trailing link title: `(url "title")` yields `url`.
fn link_target(raw: &str) -> &str {
    raw.split_whitespace().next().unwrap_or("")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Blanks out fenced code blocks, keeping their newlines so line numbers still line up.
/// Markdown links, images, and headings inside a fence are never extracted.
fn without_fenced_code(content: &str) -> Cow<'_, str> {
    MD_FENCED_CODE.replace_all(content, |caps: &Captures| {
        "\n".repeat(caps[0].matches('\n').count())
    })
}

pub fn extract_text(content: &str, content_type: ContentType) -> String {
    match content_type {
        ContentType::Markdown => markdown_text(content),
        ContentType::Html => html_text(&Html::parse_document(content)),
    }
}

pub fn extract_links(content: &str, content_type: ContentType) -> Vec<ExtractedLink> {
    match content_type {
        ContentType::Markdown => markdown_links(&without_fenced_code(content)),
        ContentType::Html => html_links(&Html::parse_document(content)),
    }
}

pub fn extract_headings(content: &str, content_type: ContentType) -> Vec<ExtractedHeading> {
    match content_type {
        ContentType::Markdown => markdown_headings(&without_fenced_code(content)),
        ContentType::Html => html_headings(&Html::parse_document(content)),
    }
}

pub fn extract_images(content: &str, content_type: ContentType) -> Vec<ExtractedImage> {
    match content_type {
        ContentType::Markdown => markdown_images(&without_fenced_code(content)),
        ContentType::Html => html_images(&Html::parse_document(content)),
    }
}

fn markdown_text(content: &str) -> String {
    let text = MD_FENCED_CODE.replace_all(content, "");
    let text = MD_INLINE_CODE.replace_all(&text, "");
    let text = MD_IMAGE.replace_all(&text, "");
    let text = MD_LINK.replace_all(&text, "${1}");
    let mut text = MD_HEADING_MARKER.replace_all(&text, "").into_owned();

    for emphasis in MD_EMPHASIS.iter() {
        text = emphasis.replace_all(&text, "${1}").into_owned();
    }

    text
}

fn markdown_links(content: &str) -> Vec<ExtractedLink> {
    MD_LINK
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            // `![alt](src)` is an image, not a link
            if content[..whole.start()].ends_with('!') {
                return None;
            }

            let url = link_target(&caps[2]);
            url.starts_with("http").then(|| ExtractedLink {
                url: url.to_string(),
                text: MD_IMAGE.replace_all(&caps[1], "${1}").trim().to_string(),
                line: Some(line_of(content, whole.start())),
                is_external: !is_brand_domain(url),
                has_noopener: false,
            })
        })
        .collect()
}

fn markdown_headings(content: &str) -> Vec<ExtractedHeading> {
    content
        .split('\n')
        .enumerate()
        .filter_map(|(idx, line)| {
            let caps = MD_HEADING_LINE.captures(line)?;
            let text = caps[2].trim();
            (!text.is_empty()).then(|| ExtractedHeading {
                level: caps[1].len() as u8,
                text: text.to_string(),
                id: None,
                line: Some(idx + 1),
            })
        })
        .collect()
}

fn markdown_images(content: &str) -> Vec<ExtractedImage> {
    MD_IMAGE
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let alt = &caps[1];
            Some(ExtractedImage {
                src: link_target(&caps[2]).to_string(),
                alt: (!alt.is_empty()).then(|| alt.to_string()),
                line: Some(line_of(content, whole.start())),
            })
        })
        .collect()
}

fn html_text(document: &Html) -> String {
    let mut pieces = Vec::new();

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let inside_non_prose = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| NON_PROSE_ELEMENTS.contains(&element.name()))
        });

        if !inside_non_prose {
            pieces.push(&**text);
        }
    }

    // Tag boundaries separate words
    pieces.join(" ")
}

fn html_links(document: &Html) -> Vec<ExtractedLink> {
    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|element| {
            let url = element.value().attr("href")?.trim();
            if !url.starts_with("http") {
                return None;
            }

            let has_noopener = element.value().attr("rel").is_some_and(|rel| {
                rel.split_whitespace()
                    .any(|token| token.eq_ignore_ascii_case("noopener"))
            });

            Some(ExtractedLink {
                url: url.to_string(),
                text: collapse_whitespace(&element.text().collect::<String>()),
                line: None,
                is_external: !is_brand_domain(url),
                has_noopener,
            })
        })
        .collect()
}

fn html_headings(document: &Html) -> Vec<ExtractedHeading> {
    document
        .select(&HEADING_SELECTOR)
        .filter_map(|element| {
            let level = element.value().name().strip_prefix('h')?.parse::<u8>().ok()?;
            let text = collapse_whitespace(&element.text().collect::<String>());
            if text.is_empty() {
                return None;
            }

            Some(ExtractedHeading {
                level,
                text,
                id: element.value().attr("id").map(str::to_string),
                line: None,
            })
        })
        .collect()
}

fn html_images(document: &Html) -> Vec<ExtractedImage> {
    document
        .select(&IMG_SELECTOR)
        .filter_map(|element| {
            let src = element.value().attr("src")?.trim();
            if src.is_empty() {
                return None;
            }

            Some(ExtractedImage {
                src: src.to_string(),
                alt: element
                    .value()
                    .attr("alt")
                    .filter(|alt| !alt.is_empty())
                    .map(str::to_string),
                line: None,
            })
        })
        .collect()
}

//! Embeds the images of a rendered body as inline resources

use std::{collections::HashSet, sync::Arc};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

use crate::domain::{
    communication::mailer::ResolvedResource,
    notifications::{
        errors::InlineError,
        mime::{self, ResourceKind},
        resolver::ResourceResolver,
    },
};

lazy_static! {
    static ref IMG_SELECTOR: Selector = Selector::parse("img[src]").unwrap();
    static ref TAG_REGEX: Regex = Regex::new(
        r#"(?is)<!--.*?-->|<script\b.*?</script\s*>|<style\b.*?</style\s*>|<img\b(?:[^>"']|"[^"]*"|'[^']*')*>"#
    )
    .unwrap();
    static ref ATTRIBUTE_REGEX: Regex =
        Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#).unwrap();
}

/// The prefix of a content-id reference
const CID_PREFIX: &str = "cid:";

/// The opening of an image tag
const IMG_OPEN: &str = "<img";

/// A rendered body with its images replaced by content-id references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlinedHtml {
    /// The rewritten HTML
    pub html: String,

    /// One resource per distinct rewritten reference, in document order
    pub resources: Vec<ResolvedResource>,
}

/// The `src` of an image tag and where its raw value starts in the body
#[derive(Debug, Clone, PartialEq, Eq)]
struct ImageSource {
    value: String,
    offset: usize,
}

/// Rewrites `<img src>` references into inline resources
#[derive(Debug, Clone)]
pub struct ResourceInliner<R>
where
    R: ResourceResolver,
{
    resolver: Arc<R>,
}

impl<R> ResourceInliner<R>
where
    R: ResourceResolver,
{
    /// Creates a new inliner reading local resources through `resolver`
    pub fn new(resolver: Arc<R>) -> Self {
        Self { resolver }
    }

    /// Embeds every local and data URI image of `html`.
    ///
    /// Remote and `cid:` references are left alone. Each distinct reference is
    /// resolved once and rewritten to `cid:<reference>`; every other byte of
    /// `html` is kept as is. Any failure aborts the whole operation, so a body
    /// is never returned with only part of its images embedded.
    pub async fn inline(&self, html: &str) -> Result<InlinedHtml, InlineError> {
        let sources = image_sources(html);

        let mut seen = HashSet::new();
        let mut resources = Vec::new();

        for source in &sources {
            if !seen.insert(source.value.as_str()) {
                continue;
            }

            if let Some(resource) = self.resolve(&source.value).await? {
                resources.push(resource);
            }
        }

        let resolved: HashSet<&str> = resources
            .iter()
            .map(|resource| resource.reference_id.as_str())
            .collect();

        let html = splice_content_ids(html, &sources, &resolved);

        debug!("embedded {} inline resources", resources.len());

        Ok(InlinedHtml { html, resources })
    }

    async fn resolve(&self, reference: &str) -> Result<Option<ResolvedResource>, InlineError> {
        let (bytes, content_type) = match mime::classify(reference) {
            ResourceKind::Remote => return Ok(None),
            ResourceKind::DataUri(mime_type) => {
                let bytes = STANDARD
                    .decode(mime::data_uri_payload(reference))
                    .map_err(|source| InlineError::DataUriDecode {
                        reference: reference.to_string(),
                        source,
                    })?;

                (bytes, mime_type)
            }
            ResourceKind::LocalPath => (
                self.resolver.read(reference).await?,
                mime::content_type_for_path(reference),
            ),
        };

        Ok(Some(ResolvedResource {
            reference_id: reference.to_string(),
            bytes,
            content_type,
        }))
    }
}

/// Returns the non-empty `src` of every image tag, in document order.
///
/// Comments, scripts and stylesheets are skipped.
fn image_sources(html: &str) -> Vec<ImageSource> {
    TAG_REGEX
        .find_iter(html)
        .filter(|tag| {
            tag.as_str()
                .get(..IMG_OPEN.len())
                .is_some_and(|open| open.eq_ignore_ascii_case(IMG_OPEN))
        })
        .filter_map(|tag| {
            tag_source(tag.as_str()).map(|(offset, value)| ImageSource {
                value,
                offset: tag.start() + offset,
            })
        })
        .collect()
}

/// Decodes the `src` of a single image tag and locates its raw value
fn tag_source(tag: &str) -> Option<(usize, String)> {
    let value = Html::parse_fragment(tag)
        .select(&IMG_SELECTOR)
        .next()?
        .value()
        .attr("src")?
        .to_string();

    if value.trim().is_empty() {
        return None;
    }

    let attributes = &tag[IMG_OPEN.len()..];

    // The first `src` wins, as it does for the parser.
    let captures = ATTRIBUTE_REGEX
        .captures_iter(attributes)
        .find(|captures| captures[1].eq_ignore_ascii_case("src"))?;

    let raw = captures
        .get(2)
        .or_else(|| captures.get(3))
        .or_else(|| captures.get(4))?;

    Some((IMG_OPEN.len() + raw.start(), value))
}

/// Inserts `cid:` in front of every source found in `resolved`
fn splice_content_ids(html: &str, sources: &[ImageSource], resolved: &HashSet<&str>) -> String {
    let mut spliced = String::with_capacity(html.len() + sources.len() * CID_PREFIX.len());
    let mut last = 0;

    for source in sources
        .iter()
        .filter(|source| resolved.contains(source.value.as_str()))
    {
        spliced.push_str(&html[last..source.offset]);
        spliced.push_str(CID_PREFIX);
        last = source.offset;
    }

    spliced.push_str(&html[last..]);

    spliced
}

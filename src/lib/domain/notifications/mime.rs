//! Resource reference classification and content-type inference

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DATA_URI_REGEX: Regex =
        Regex::new(r"(?i)^data:([a-z0-9!#$&^_.+-]+/[a-z0-9!#$&^_.+-]+)(?:;[^,]*)?,").unwrap();
    static ref DATA_URI_PREFIX_REGEX: Regex = Regex::new(r"(?i)^data:[^,]*,").unwrap();
}

/// Prefixes of references that are never inlined
const REMOTE_PREFIXES: [&str; 2] = ["http", "cid:"];

/// Suffixes whose content type takes priority over [`mime_guess`]
const CONTENT_TYPE_OVERRIDES: [(&str, &str); 1] = [(".png", "image/png")];

/// What a resource reference points at
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    /// A remote URL or an existing content-id, left untouched
    Remote,

    /// An embedded data URI with its declared, lower-cased MIME type (empty if undeclared)
    DataUri(String),

    /// A file relative to the resource root
    LocalPath,
}

/// Classifies a resource reference
pub fn classify(reference: &str) -> ResourceKind {
    if REMOTE_PREFIXES
        .iter()
        .any(|prefix| starts_with_ignore_case(reference, prefix))
    {
        return ResourceKind::Remote;
    }

    if starts_with_ignore_case(reference, "data:") {
        let mime_type = DATA_URI_REGEX
            .captures(reference)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_ascii_lowercase())
            .unwrap_or_default();

        return ResourceKind::DataUri(mime_type);
    }

    ResourceKind::LocalPath
}

/// Infers the content type of a local file from its name, empty if unknown
pub fn content_type_for_path(path: &str) -> String {
    let lower = path.to_ascii_lowercase();

    if let Some((_, content_type)) = CONTENT_TYPE_OVERRIDES
        .iter()
        .find(|(suffix, _)| lower.ends_with(suffix))
    {
        return content_type.to_string();
    }

    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_default()
}

/// Strips everything up to and including the first comma of a data URI.
///
/// Tolerates a missing `;base64` marker. A reference without a comma is
/// returned unchanged.
pub fn data_uri_payload(reference: &str) -> &str {
    match DATA_URI_PREFIX_REGEX.find(reference) {
        Some(prefix) => &reference[prefix.end()..],
        None => reference,
    }
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_references_are_remote() {
        assert_eq!(classify("http://example.com/a.png"), ResourceKind::Remote);
        assert_eq!(classify("https://example.com/a.png"), ResourceKind::Remote);
        assert_eq!(classify("HTTPS://EXAMPLE.COM/A.PNG"), ResourceKind::Remote);
    }

    #[test]
    fn test_content_ids_are_remote() {
        assert_eq!(classify("cid:images/logo.png"), ResourceKind::Remote);
    }

    #[test]
    fn test_data_uri_declared_type_is_lower_cased() {
        assert_eq!(
            classify("data:Image/PNG;base64,iVBORw0KGgo="),
            ResourceKind::DataUri("image/png".to_string())
        );
    }

    #[test]
    fn test_data_uri_parameters_are_skipped() {
        assert_eq!(
            classify("data:image/svg+xml;charset=utf-8;base64,PHN2Zz4="),
            ResourceKind::DataUri("image/svg+xml".to_string())
        );
    }

    #[test]
    fn test_data_uri_without_declared_type_has_empty_mime_type() {
        assert_eq!(
            classify("data:;base64,AAAA"),
            ResourceKind::DataUri(String::new())
        );
        assert_eq!(classify("data:garbage"), ResourceKind::DataUri(String::new()));
    }

    #[test]
    fn test_everything_else_is_local() {
        assert_eq!(classify("images/logo.png"), ResourceKind::LocalPath);
        assert_eq!(classify("logo.gif"), ResourceKind::LocalPath);
        assert_eq!(classify("ftp"), ResourceKind::LocalPath);
    }

    #[test]
    fn test_png_override_wins() {
        assert_eq!(content_type_for_path("images/logo.png"), "image/png");
        assert_eq!(content_type_for_path("images/LOGO.PNG"), "image/png");
    }

    #[test]
    fn test_content_type_falls_back_to_guess() {
        assert_eq!(content_type_for_path("photo.jpg"), "image/jpeg");
        assert_eq!(content_type_for_path("anim.gif"), "image/gif");
    }

    #[test]
    fn test_unknown_extension_yields_empty_content_type() {
        assert_eq!(content_type_for_path("blob.unknownext"), "");
        assert_eq!(content_type_for_path("no_extension"), "");
    }

    #[test]
    fn test_data_uri_payload_strips_prefix() {
        assert_eq!(data_uri_payload("data:image/png;base64,AAAA"), "AAAA");
        assert_eq!(data_uri_payload("data:image/png,AAAA"), "AAAA");
        assert_eq!(data_uri_payload("data:,AAAA"), "AAAA");
        assert_eq!(data_uri_payload("data:image/png;base64"), "data:image/png;base64");
    }
}

//! Resource classification for fetched URLs
//!
//! Maps a URL/content-type pair to a semantic resource kind and a
//! storage-relative path. The kind decides whether a fetched body is
//! scanned for further links (only HTML is), and the path is where the
//! mirror sink stores the body on disk.

use serde::{Deserialize, Serialize};
use url::Url;

/// Image file extensions recognized by the classifier
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "ico", "webp", "avif"];

/// The semantic kind of a fetched resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Html,
    Stylesheet,
    Script,
    Image,
    Other,
}

impl ResourceKind {
    /// Returns true if bodies of this kind are scanned for further links
    pub fn is_scannable(&self) -> bool {
        matches!(self, Self::Html)
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Html => "html",
            Self::Stylesheet => "stylesheet",
            Self::Script => "script",
            Self::Image => "image",
            Self::Other => "other",
        };
        write!(f, "{}", name)
    }
}

/// Classifies a URL into a resource kind and a storage-relative path.
///
/// # Rule Order
///
/// 1. Explicit extension match: `.css` → stylesheet, `.js`/`.mjs` →
///    script, image extensions → image
/// 2. Empty or directory-like path → html, stored as `index.html`
/// 3. No extension and content type containing "html" or absent → html,
///    path-derived name
/// 4. Anything else → other, path-derived name
///
/// Path-derived names flatten `/` into `_` so every resource of a kind
/// lands in one directory (`css/`, `js/`, `images/`, or the mirror root).
///
/// # Arguments
///
/// * `url` - The resource URL
/// * `content_type` - The Content-Type header value, if any
///
/// # Examples
///
/// ```
/// use url::Url;
/// use linkscout::resources::{classify, ResourceKind};
///
/// let url = Url::parse("https://example.com/styles/site.css").unwrap();
/// let (kind, path) = classify(&url, None);
/// assert_eq!(kind, ResourceKind::Stylesheet);
/// assert_eq!(path, "css/site.css");
/// ```
pub fn classify(url: &Url, content_type: Option<&str>) -> (ResourceKind, String) {
    let path = url.path().trim_matches('/');

    if path.is_empty() || url.path().ends_with('/') {
        return (ResourceKind::Html, "index.html".to_string());
    }

    let file_name = path.rsplit('/').next().unwrap_or(path);
    let extension = file_name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase());

    match extension.as_deref() {
        Some("css") => (
            ResourceKind::Stylesheet,
            format!("css/{}", file_name),
        ),
        Some("js") | Some("mjs") => (ResourceKind::Script, format!("js/{}", file_name)),
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext) => {
            (ResourceKind::Image, format!("images/{}", file_name))
        }
        Some(_) => {
            // Extension we don't recognize: trust an HTML content type,
            // otherwise file it as opaque.
            if content_type.is_some_and(|ct| ct.to_lowercase().contains("html")) {
                (ResourceKind::Html, format!("{}.html", flatten(path)))
            } else {
                (ResourceKind::Other, flatten(path))
            }
        }
        None => {
            let html = match content_type {
                Some(ct) => ct.to_lowercase().contains("html"),
                None => true,
            };
            if html {
                (ResourceKind::Html, format!("{}.html", flatten(path)))
            } else {
                (ResourceKind::Other, flatten(path))
            }
        }
    }
}

/// Flattens a URL path into a single file-name component
fn flatten(path: &str) -> String {
    path.replace('/', "_")
}

use std::collections::HashSet;

use ammonia::Builder;
use url::Url;

/// URL schemes allowed in links and images.
pub const ALLOWED_PROTOCOLS: [&str; 3] = ["http", "https", "mailto"];

/// True for absolute `http:`, `https:` and `mailto:` URLs.
pub fn is_allowed_url(url: &str) -> bool {
    Url::parse(url.trim()).is_ok_and(|u| ALLOWED_PROTOCOLS.contains(&u.scheme()))
}

/// Strips everything outside the allow-list: script and style elements with their
/// content, event-handler attributes, and links or images with other URL schemes.
pub fn sanitize_html(html: &str) -> String {
    let mut builder = Builder::default();
    builder
        .url_schemes(HashSet::from(ALLOWED_PROTOCOLS))
        .add_tags(&["input"])
        .add_tag_attributes("input", &["type", "checked", "disabled"])
        .add_tag_attributes("code", &["class"]);
    builder.clean(html).to_string()
}

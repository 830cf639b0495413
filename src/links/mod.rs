//! Link metadata resolution
//!
//! When a link is bookmarked on a project we try to enrich it with a title,
//! a description and a preview image. Resolution is best-effort: a resolver
//! may fail, but [`fetch_preview`] always produces a usable preview.

mod http;

pub use http::HttpResolver;

use chrono::{DateTime, Utc};
use url::Url;

use crate::config::settings::{LinkPreviewMode, LinkPreviewSettings};
use crate::error::FolioResult;
use crate::models::{LinkId, ProjectLink};

/// Description used when no metadata could be resolved
pub const UNAVAILABLE_DESCRIPTION: &str = "Link preview unavailable";

/// Metadata a resolver found for a page; any field may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Looks up metadata for a normalized URL
pub trait LinkResolver {
    fn resolve(&self, url: &str) -> FolioResult<LinkMetadata>;
}

/// Offline resolver that guesses metadata from the hostname
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicResolver;

impl LinkResolver for HeuristicResolver {
    fn resolve(&self, url: &str) -> FolioResult<LinkMetadata> {
        Ok(heuristic_metadata(&domain_name(url)))
    }
}

pub(crate) fn heuristic_metadata(domain: &str) -> LinkMetadata {
    let (title, description, image) = if domain.contains("github") {
        (
            "GitHub Repository".to_string(),
            "Code repository and version control".to_string(),
            "https://github.githubassets.com/images/modules/logos_page/GitHub-Mark.png".to_string(),
        )
    } else if domain.contains("youtube") {
        (
            "YouTube Video".to_string(),
            "Video content on YouTube".to_string(),
            "https://www.youtube.com/img/desktop/yt_1200.png".to_string(),
        )
    } else if domain.contains("docs.google") {
        (
            "Google Docs".to_string(),
            "Document or spreadsheet".to_string(),
            "https://ssl.gstatic.com/docs/documents/images/kix-favicon7.ico".to_string(),
        )
    } else {
        (
            format!("{} Website", capitalize(domain)),
            format!("Content from {}", domain),
            format!("https://www.google.com/s2/favicons?domain={}&sz=128", domain),
        )
    };

    LinkMetadata {
        title: Some(title),
        description: Some(description),
        image: Some(image),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Build the resolver selected in settings
pub fn resolver_from_settings(settings: &LinkPreviewSettings) -> FolioResult<Box<dyn LinkResolver>> {
    Ok(match settings.mode {
        LinkPreviewMode::Offline => Box::new(HeuristicResolver),
        LinkPreviewMode::Network => Box::new(HttpResolver::new(settings)?),
    })
}

/// A resolved link, ready to be attached to a project
#[derive(Debug, Clone, PartialEq)]
pub struct LinkPreview {
    pub url: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub added_at: DateTime<Utc>,
}

impl LinkPreview {
    pub fn into_link(self) -> ProjectLink {
        fn non_empty(s: String) -> Option<String> {
            if s.is_empty() {
                None
            } else {
                Some(s)
            }
        }

        ProjectLink {
            id: LinkId::new(),
            url: self.url,
            title: non_empty(self.title),
            description: non_empty(self.description),
            image: non_empty(self.image),
            added_at: self.added_at,
        }
    }
}

/// Prefix scheme-less input with `https://`
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

/// Hostname without a leading `www.`, or the input itself when it does not parse
pub fn domain_name(url: &str) -> String {
    match Url::parse(url).ok().as_ref().and_then(Url::host_str) {
        Some(host) => host.strip_prefix("www.").unwrap_or(host).to_string(),
        None => url.to_string(),
    }
}

/// Resolve a preview for `url`; never fails
///
/// A missing title falls back to the domain name. If the resolver errors the
/// placeholder preview is returned instead.
pub fn fetch_preview(resolver: &dyn LinkResolver, url: &str) -> LinkPreview {
    let url = normalize_url(url);
    let domain = domain_name(&url);

    match resolver.resolve(&url) {
        Ok(metadata) => LinkPreview {
            title: metadata
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| domain.clone()),
            description: metadata.description.unwrap_or_default(),
            image: metadata.image.unwrap_or_default(),
            url,
            added_at: Utc::now(),
        },
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Link preview failed, using placeholder");
            LinkPreview {
                title: domain,
                description: UNAVAILABLE_DESCRIPTION.to_string(),
                image: String::new(),
                url,
                added_at: Utc::now(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FolioError;

    struct FailingResolver;

    impl LinkResolver for FailingResolver {
        fn resolve(&self, _url: &str) -> FolioResult<LinkMetadata> {
            Err(FolioError::LinkPreview("offline".into()))
        }
    }

    struct TitleOnly(Option<String>);

    impl LinkResolver for TitleOnly {
        fn resolve(&self, _url: &str) -> FolioResult<LinkMetadata> {
            Ok(LinkMetadata {
                title: self.0.clone(),
                ..Default::default()
            })
        }
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
        assert_eq!(normalize_url("https://example.com/a"), "https://example.com/a");
    }

    #[test]
    fn test_domain_name() {
        assert_eq!(domain_name("https://www.github.com/acme"), "github.com");
        assert_eq!(domain_name("https://docs.google.com/x"), "docs.google.com");
        assert_eq!(domain_name("not a url"), "not a url");
    }

    #[test]
    fn test_heuristic_known_hosts() {
        let preview = fetch_preview(&HeuristicResolver, "github.com/acme/site");
        assert_eq!(preview.url, "https://github.com/acme/site");
        assert_eq!(preview.title, "GitHub Repository");

        let preview = fetch_preview(&HeuristicResolver, "https://docs.google.com/document/d/1");
        assert_eq!(preview.title, "Google Docs");
        assert_eq!(preview.description, "Document or spreadsheet");
    }

    #[test]
    fn test_heuristic_generic_host() {
        let preview = fetch_preview(&HeuristicResolver, "https://www.example.com/page");
        assert_eq!(preview.title, "Example.com Website");
        assert_eq!(preview.description, "Content from example.com");
        assert_eq!(
            preview.image,
            "https://www.google.com/s2/favicons?domain=example.com&sz=128"
        );
    }

    #[test]
    fn test_failing_resolver_gives_placeholder() {
        let preview = fetch_preview(&FailingResolver, "www.example.org/x");
        assert_eq!(preview.url, "https://www.example.org/x");
        assert_eq!(preview.title, "example.org");
        assert_eq!(preview.description, UNAVAILABLE_DESCRIPTION);

        let link = preview.into_link();
        assert!(link.image.is_none());
        assert_eq!(link.title.as_deref(), Some("example.org"));
    }

    #[test]
    fn test_missing_title_falls_back_to_domain() {
        let preview = fetch_preview(&TitleOnly(None), "https://news.example.net");
        assert_eq!(preview.title, "news.example.net");
        assert!(preview.description.is_empty());

        let preview = fetch_preview(&TitleOnly(Some("Front page".into())), "news.example.net");
        assert_eq!(preview.title, "Front page");
    }

    #[test]
    fn test_resolver_from_settings() {
        let settings = LinkPreviewSettings::default();
        let resolver = resolver_from_settings(&settings).unwrap();
        let metadata = resolver.resolve("https://youtube.com/watch").unwrap();
        assert_eq!(metadata.title.as_deref(), Some("YouTube Video"));
    }
}

//! Networked link resolver

use std::io::Read;
use std::time::Duration;

use regex::Regex;

use super::{domain_name, heuristic_metadata, LinkMetadata, LinkResolver};
use crate::config::settings::LinkPreviewSettings;
use crate::error::{FolioError, FolioResult};

/// Only the head of a page is scanned for metadata
const MAX_PAGE_BYTES: u64 = 256 * 1024;

/// Fetches the page and reads its Open Graph and HTML metadata tags
pub struct HttpResolver {
    agent: ureq::Agent,
    patterns: MetaPatterns,
}

struct MetaPatterns {
    og_title: Regex,
    title: Regex,
    og_description: Regex,
    description: Regex,
    og_image: Regex,
}

impl MetaPatterns {
    fn new() -> FolioResult<Self> {
        Ok(Self {
            og_title: meta_pattern("property", "og:title")?,
            title: compile(r"(?is)<title[^>]*>(.*?)</title>")?,
            og_description: meta_pattern("property", "og:description")?,
            description: meta_pattern("name", "description")?,
            og_image: meta_pattern("property", "og:image")?,
        })
    }
}

/// `<meta {attr}="{value}" content="...">`, in either attribute order
fn meta_pattern(attr: &str, value: &str) -> FolioResult<Regex> {
    let value = regex::escape(value);
    let pattern = format!(
        r#"(?is)<meta[^>]*?(?:{attr}\s*=\s*["']{value}["'][^>]*?content\s*=\s*["']([^"']*)["']|content\s*=\s*["']([^"']*)["'][^>]*?{attr}\s*=\s*["']{value}["'])"#,
        attr = attr,
        value = value
    );
    compile(&pattern)
}

fn compile(pattern: &str) -> FolioResult<Regex> {
    Regex::new(pattern).map_err(|e| FolioError::LinkPreview(format!("bad pattern: {}", e)))
}

fn capture(pattern: &Regex, html: &str) -> Option<String> {
    let caps = pattern.captures(html)?;
    let text = caps.iter().skip(1).flatten().next()?.as_str();
    let text = decode_entities(text.trim());
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn decode_entities(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}

impl HttpResolver {
    pub fn new(settings: &LinkPreviewSettings) -> FolioResult<Self> {
        let timeout = Duration::from_millis(settings.timeout_ms);
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .user_agent(&settings.user_agent)
            .build();
        Ok(Self {
            agent,
            patterns: MetaPatterns::new()?,
        })
    }

    /// Extract metadata from page markup, filling gaps from the hostname heuristic
    fn extract(&self, url: &str, html: &str) -> LinkMetadata {
        let p = &self.patterns;
        let fallback = heuristic_metadata(&domain_name(url));

        LinkMetadata {
            title: capture(&p.og_title, html)
                .or_else(|| capture(&p.title, html))
                .or(fallback.title),
            description: capture(&p.og_description, html)
                .or_else(|| capture(&p.description, html))
                .or(fallback.description),
            image: capture(&p.og_image, html).or(fallback.image),
        }
    }
}

impl LinkResolver for HttpResolver {
    fn resolve(&self, url: &str) -> FolioResult<LinkMetadata> {
        let response = match self.agent.get(url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => {
                return Err(FolioError::LinkPreview(format!(
                    "{} returned http status {}",
                    url, code
                )))
            }
            Err(ureq::Error::Transport(err)) => {
                return Err(FolioError::LinkPreview(format!(
                    "transport error for {}: {}",
                    url, err
                )))
            }
        };

        let mut body = Vec::new();
        response
            .into_reader()
            .take(MAX_PAGE_BYTES)
            .read_to_end(&mut body)?;
        let html = String::from_utf8_lossy(&body);

        Ok(self.extract(url, &html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> HttpResolver {
        HttpResolver::new(&LinkPreviewSettings::default()).unwrap()
    }

    #[test]
    fn test_extract_open_graph() {
        let html = r#"<html><head>
            <title>Plain title</title>
            <meta property="og:title" content="Rich &amp; Title">
            <meta content="A description" name="description">
            <meta property="og:image" content="https://example.com/i.png" />
            </head></html>"#;

        let metadata = resolver().extract("https://example.com", html);
        assert_eq!(metadata.title.as_deref(), Some("Rich & Title"));
        assert_eq!(metadata.description.as_deref(), Some("A description"));
        assert_eq!(metadata.image.as_deref(), Some("https://example.com/i.png"));
    }

    #[test]
    fn test_extract_falls_back_per_field() {
        let html = "<html><head><TITLE>Only a title</TITLE></head></html>";

        let metadata = resolver().extract("https://www.example.com", html);
        assert_eq!(metadata.title.as_deref(), Some("Only a title"));
        assert_eq!(metadata.description.as_deref(), Some("Content from example.com"));
        assert!(metadata.image.unwrap().contains("domain=example.com"));
    }

    #[test]
    fn test_unreachable_host_is_an_error() {
        let settings = LinkPreviewSettings {
            timeout_ms: 200,
            ..Default::default()
        };
        let resolver = HttpResolver::new(&settings).unwrap();
        assert!(resolver.resolve("http://127.0.0.1:1/").is_err());
    }

    #[test]
    fn test_slow_body_is_cut_off_by_total_timeout() {
        use std::io::{Read, Write};
        use std::net::TcpListener;
        use std::time::Instant;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 1024];
            let _ = stream.read(&mut request);
            let _ = stream.write_all(
                b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 100000\r\n\r\n",
            );
            // One byte at a time, each well inside the per-read timeout
            for _ in 0..200 {
                if stream.write_all(b"<").is_err() {
                    break;
                }
                std::thread::sleep(Duration::from_millis(50));
            }
        });

        let settings = LinkPreviewSettings {
            timeout_ms: 300,
            ..Default::default()
        };
        let resolver = HttpResolver::new(&settings).unwrap();
        let started = Instant::now();
        let result = resolver.resolve(&format!("http://{}/", addr));

        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_secs(3));
    }
}

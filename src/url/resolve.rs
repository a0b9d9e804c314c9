use url::Url;

/// Resolves raw href values against a page's base URL
///
/// # Resolution Rules
///
/// For each href, in order:
/// - surrounding whitespace is trimmed; empty hrefs are skipped
/// - fragment-only hrefs (`#section`) are skipped, they point back at the
///   page they were found on
/// - the href is parsed as a URL reference relative to `base_url`; absolute
///   hrefs keep their own scheme and host
/// - hrefs that fail to parse are dropped silently
/// - only `http` and `https` results are kept (`javascript:`, `mailto:`,
///   `tel:`, `data:` and every other scheme are dropped)
///
/// No further canonicalization is applied. Duplicates are kept; admission
/// to the crawl deduplicates later.
///
/// # Arguments
///
/// * `hrefs` - Raw href attribute values, in document order
/// * `base_url` - The final URL of the page after redirects
///
/// # Example
///
/// ```
/// use sumi_crawl::url::resolve_links;
/// use url::Url;
///
/// let base = Url::parse("http://site/p").unwrap();
/// let links = resolve_links(["/a", "http://x/y", "javascript:void(0)", "#frag"], &base);
/// let links: Vec<&str> = links.iter().map(|u| u.as_str()).collect();
/// assert_eq!(links, ["http://site/a", "http://x/y"]);
/// ```
pub fn resolve_links<I, S>(hrefs: I, base_url: &Url) -> Vec<Url>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    hrefs
        .into_iter()
        .filter_map(|href| resolve_link(href.as_ref(), base_url))
        .collect()
}

/// Resolves a single href, returning `None` if it should be dropped
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute) if is_crawlable_scheme(&absolute) => Some(absolute),
        Ok(absolute) => {
            tracing::trace!("Dropping non-http(s) link {}", absolute);
            None
        }
        Err(e) => {
            tracing::trace!("Dropping malformed link {:?}: {}", href, e);
            None
        }
    }
}

/// Returns true if the URL uses a scheme the crawler can fetch
pub fn is_crawlable_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

//! Markdown rendering and reference-link rewriting.
//!
//! Articles link to each other with the `ref:` pseudo-scheme, e.g.
//! `[see also](ref:rust-notes)`. After the markdown has been converted to
//! HTML, [`rewrite_ref_links`] turns every `<a href="ref:<id>" ...>text</a>`
//! into `<a href="/<id>" ...>Title</a>`, where `Title` is the referenced
//! article's current title as reported by a [`TitleResolver`].

use async_trait::async_trait;
use pulldown_cmark::{html, Options, Parser};

/// Literal that opens a reference anchor in rendered HTML.
pub const REF_LINK_PREFIX: &str = "<a href=\"ref:";

/// The part of [`REF_LINK_PREFIX`] that is kept when rewriting.
const HREF_OPEN: &str = "<a href=\"";

/// Looks up the display title of an article by id.
///
/// Implementations must return only the title; they must not render the
/// referenced article's body.
#[async_trait]
pub trait TitleResolver: Send + Sync {
    type Error: Send;

    async fn resolve_title(&self, id: &str) -> Result<String, Self::Error>;
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Convert markdown to HTML with the common extensions enabled.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Render markdown to HTML and resolve its reference links.
pub async fn render_markdown<R>(markdown: &str, resolver: &R) -> Result<String, R::Error>
where
    R: TitleResolver + ?Sized,
{
    let html = markdown_to_html(markdown);
    rewrite_ref_links(&html, resolver).await
}

// ---------------------------------------------------------------------------
// Reference-link rewriting
// ---------------------------------------------------------------------------

/// A fully delimited reference anchor found in the input.
#[derive(Debug, PartialEq, Eq)]
struct RefLink<'a> {
    /// Referenced article id (between `ref:` and the closing quote).
    id: &'a str,
    /// From the closing quote of the href through the `>` ending the tag.
    tag_tail: &'a str,
    /// Offset of the `<` that ends the link text.
    text_end: usize,
}

/// Match a reference anchor starting exactly at `start`.
///
/// Extraction runs in three phases: the id up to the next `"`, the rest of
/// the opening tag up to the next `>`, and the link text up to the next `<`.
/// Returns `None` if the prefix does not match or any delimiter is missing.
fn scan_ref_link(html: &str, start: usize) -> Option<RefLink<'_>> {
    if !html[start..].starts_with(REF_LINK_PREFIX) {
        return None;
    }

    let id_start = start + REF_LINK_PREFIX.len();
    let quote = id_start + html[id_start..].find('"')?;
    let tag_end = quote + html[quote..].find('>')?;
    let text_end = tag_end + html[tag_end..].find('<')?;

    Some(RefLink {
        id: &html[id_start..quote],
        tag_tail: &html[quote..=tag_end],
        text_end,
    })
}

/// Rewrite every reference anchor in `html`.
///
/// The scan is a single left-to-right pass. Anything that is not a complete
/// reference anchor is copied through unchanged; a truncated anchor emits its
/// `<` and scanning resumes one byte later. Only resolver failures are errors.
pub async fn rewrite_ref_links<R>(html: &str, resolver: &R) -> Result<String, R::Error>
where
    R: TitleResolver + ?Sized,
{
    let mut out = String::with_capacity(html.len());
    let mut cursor = 0;

    while cursor < html.len() {
        match html[cursor..].find('<') {
            Some(offset) => {
                out.push_str(&html[cursor..cursor + offset]);
                cursor += offset;
            }
            None => {
                out.push_str(&html[cursor..]);
                break;
            }
        }

        match scan_ref_link(html, cursor) {
            Some(link) => {
                let title = resolver.resolve_title(link.id).await?;
                out.push_str(HREF_OPEN);
                out.push('/');
                out.push_str(link.id);
                out.push_str(link.tag_tail);
                out.push_str(&escape_html(&title));
                cursor = link.text_end;
            }
            None => {
                out.push('<');
                cursor += 1;
            }
        }
    }

    Ok(out)
}

/// Escape the five HTML-special characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&#34;"),
            other => out.push(other),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::convert::Infallible;
    use std::sync::Mutex;

    use super::*;

    /// Resolver over a fixed title map; unknown ids resolve to themselves,
    /// like an article that has not been written yet.
    #[derive(Default)]
    struct MapResolver {
        titles: HashMap<String, String>,
        calls: Mutex<Vec<String>>,
    }

    impl MapResolver {
        fn with(id: &str, title: &str) -> Self {
            let mut resolver = Self::default();
            resolver.titles.insert(id.to_string(), title.to_string());
            resolver
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TitleResolver for MapResolver {
        type Error = Infallible;

        async fn resolve_title(&self, id: &str) -> Result<String, Infallible> {
            self.calls.lock().unwrap().push(id.to_string());
            Ok(self.titles.get(id).cloned().unwrap_or_else(|| id.to_string()))
        }
    }

    struct FailingResolver;

    #[async_trait]
    impl TitleResolver for FailingResolver {
        type Error = String;

        async fn resolve_title(&self, id: &str) -> Result<String, String> {
            Err(format!("store unavailable while resolving {id}"))
        }
    }

    async fn rewrite(html: &str, resolver: &MapResolver) -> String {
        rewrite_ref_links(html, resolver).await.unwrap()
    }

    // -- rewriting -----------------------------------------------------------

    #[tokio::test]
    async fn missing_article_is_labelled_with_its_id() {
        let resolver = MapResolver::default();
        let out = rewrite(r#"<a href="ref:foo">click</a>"#, &resolver).await;
        assert_eq!(out, r#"<a href="/foo">foo</a>"#);
    }

    #[tokio::test]
    async fn existing_title_is_escaped() {
        let resolver = MapResolver::with("foo", "Hello & World");
        let out = rewrite(r#"<a href="ref:foo">click</a>"#, &resolver).await;
        assert_eq!(out, r#"<a href="/foo">Hello &amp; World</a>"#);
    }

    #[tokio::test]
    async fn remaining_tag_attributes_are_kept() {
        let resolver = MapResolver::with("foo", "Foo");
        let out = rewrite(
            r#"<p>see <a href="ref:foo" title="more">here</a>.</p>"#,
            &resolver,
        )
        .await;
        assert_eq!(out, r#"<p>see <a href="/foo" title="more">Foo</a>.</p>"#);
    }

    #[tokio::test]
    async fn multiple_links_resolve_in_order() {
        let resolver = MapResolver::with("a", "Alpha");
        let out = rewrite(
            r#"<a href="ref:a">x</a> und <a href="ref:b">y</a> — fin"#,
            &resolver,
        )
        .await;
        assert_eq!(
            out,
            r#"<a href="/a">Alpha</a> und <a href="/b">b</a> — fin"#
        );
        assert_eq!(resolver.calls(), vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn ordinary_html_passes_through() {
        let resolver = MapResolver::default();
        let html = "<p>caf\u{e9} <a href=\"https://example.com\">ext</a> <em>x</em></p>\n";
        assert_eq!(rewrite(html, &resolver).await, html);
        assert!(resolver.calls().is_empty());
    }

    // -- malformed input -----------------------------------------------------

    #[tokio::test]
    async fn bare_prefix_is_unchanged() {
        let resolver = MapResolver::default();
        assert_eq!(rewrite(REF_LINK_PREFIX, &resolver).await, REF_LINK_PREFIX);
        assert!(resolver.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_quote_is_unchanged() {
        let resolver = MapResolver::default();
        let html = "text <a href=\"ref:abc and more";
        assert_eq!(rewrite(html, &resolver).await, html);
    }

    #[tokio::test]
    async fn missing_tag_end_is_unchanged() {
        let resolver = MapResolver::default();
        let html = "<a href=\"ref:abc\" class=\"x";
        assert_eq!(rewrite(html, &resolver).await, html);
        assert!(resolver.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_closing_tag_is_unchanged() {
        let resolver = MapResolver::default();
        let html = "<a href=\"ref:abc\">dangling text";
        assert_eq!(rewrite(html, &resolver).await, html);
    }

    #[tokio::test]
    async fn unterminated_id_swallows_the_next_anchor() {
        let resolver = MapResolver::with("b", "Bee");
        let html = "<a href=\"ref:a<a href=\"ref:b\">x</a>";
        // The first id runs up to the second anchor's opening quote.
        let out = rewrite(html, &resolver).await;
        assert_eq!(out, "<a href=\"/a<a href=\"ref:b\">a&lt;a href=</a>");
        assert_eq!(resolver.calls(), vec!["a<a href=".to_string()]);
    }

    #[tokio::test]
    async fn resolver_errors_propagate() {
        let err = rewrite_ref_links(r#"<a href="ref:x">y</a>"#, &FailingResolver)
            .await
            .unwrap_err();
        assert!(err.contains("resolving x"));
    }

    // -- rendering -----------------------------------------------------------

    #[tokio::test]
    async fn render_resolves_markdown_ref_links() {
        let resolver = MapResolver::with("foo", "Hello & World");
        let html = render_markdown("Read [this](ref:foo) first.", &resolver)
            .await
            .unwrap();
        assert_eq!(
            html,
            "<p>Read <a href=\"/foo\">Hello &amp; World</a> first.</p>\n"
        );
    }

    #[test]
    fn markdown_tables_are_enabled() {
        let html = markdown_to_html("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
    }

    #[test]
    fn escape_covers_all_specials() {
        assert_eq!(
            escape_html(r#"<a href='x'>"&"</a>"#),
            "&lt;a href=&#39;x&#39;&gt;&#34;&amp;&#34;&lt;/a&gt;"
        );
    }
}

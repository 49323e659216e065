//! HTML enhancement before display
//!
//! The enhanced path rewrites a fetched document in two ways before handing
//! it to the surface as raw content: a `<base>` tag so relative links keep
//! resolving against the true origin rather than wherever the surface stages
//! the bytes, and the utility stylesheet from [`crate::css`]. Raw-content
//! loading is inherently less reliable than direct URL loading, so any
//! failure on the enhanced path falls back to one direct load attempt.

use nimbus_fetch::FetchResult;

use crate::css::UTILITY_CSS;
use crate::surface::RenderSurface;
use crate::Result;

/// Which path actually put the page on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Direct URL load; enhancement disabled or not applicable.
    Direct,
    /// Rewritten content accepted by the surface.
    Enhanced,
    /// Enhanced path failed; the direct retry succeeded.
    Fallback,
}

pub struct EnhancementPipeline {
    css_enhancement_enabled: bool,
    debug_mode: bool,
}

impl EnhancementPipeline {
    pub fn new(css_enhancement_enabled: bool, debug_mode: bool) -> Self {
        Self {
            css_enhancement_enabled,
            debug_mode,
        }
    }

    /// Put a fetched page on the surface.
    ///
    /// The fallback is unconditional: when the enhanced path errors, exactly
    /// one direct `load_url` retry is made, and only a failure of that retry
    /// surfaces to the caller.
    pub fn render(&self, surface: &dyn RenderSurface, fetched: &FetchResult) -> Result<RenderOutcome> {
        if !self.css_enhancement_enabled || !fetched.is_html() {
            surface.load_url(&fetched.final_url)?;
            if self.debug_mode {
                tracing::debug!(url = %fetched.final_url, "direct load");
            }
            return Ok(RenderOutcome::Direct);
        }

        let rewritten = rewrite_document(&fetched.body, &fetched.final_url);
        match surface.load_raw_content(&rewritten, &fetched.final_url) {
            Ok(()) => {
                if self.debug_mode {
                    tracing::debug!(url = %fetched.final_url, "enhanced load");
                }
                Ok(RenderOutcome::Enhanced)
            }
            Err(err) => {
                if self.debug_mode {
                    tracing::debug!(
                        url = %fetched.final_url,
                        error = %err,
                        "enhanced load failed, retrying with direct load"
                    );
                }
                surface.load_url(&fetched.final_url)?;
                Ok(RenderOutcome::Fallback)
            }
        }
    }
}

/// Insert the base declaration and utility stylesheet into the document
/// head, synthesizing one when the markup has none.
fn rewrite_document(html: &str, base_url: &str) -> String {
    let fragment = format!(
        "<base href=\"{}\">\n<style>\n{}</style>\n",
        attribute_escape(base_url),
        UTILITY_CSS
    );

    let lowered = html.to_ascii_lowercase();

    if let Some(idx) = lowered.find("</head>") {
        let mut out = String::with_capacity(html.len() + fragment.len());
        out.push_str(&html[..idx]);
        out.push_str(&fragment);
        out.push_str(&html[idx..]);
        return out;
    }

    if let Some(open) = lowered.find("<head") {
        if let Some(end) = lowered[open..].find('>') {
            let idx = open + end + 1;
            let mut out = String::with_capacity(html.len() + fragment.len());
            out.push_str(&html[..idx]);
            out.push_str(&fragment);
            out.push_str(&html[idx..]);
            return out;
        }
    }

    if let Some(open) = lowered.find("<html") {
        if let Some(end) = lowered[open..].find('>') {
            let idx = open + end + 1;
            let mut out = String::with_capacity(html.len() + fragment.len() + 16);
            out.push_str(&html[..idx]);
            out.push_str("<head>");
            out.push_str(&fragment);
            out.push_str("</head>");
            out.push_str(&html[idx..]);
            return out;
        }
    }

    format!("<head>{fragment}</head>{html}")
}

fn attribute_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use nimbus_fetch::FetchResult;

    use super::*;
    use crate::error::RenderError;
    use crate::surface::{HeadlessSurface, SurfaceLoad};

    fn html_page(body: &str) -> FetchResult {
        FetchResult {
            final_url: "https://example.com/page".to_string(),
            body: body.to_string(),
            content_type: Some("text/html".to_string()),
        }
    }

    /// Surface whose raw-content entry point always errors.
    #[derive(Default)]
    struct BrokenRawSurface {
        url_loads: AtomicUsize,
        raw_attempts: AtomicUsize,
    }

    impl RenderSurface for BrokenRawSurface {
        fn load_url(&self, _url: &str) -> Result<()> {
            self.url_loads.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn load_raw_content(&self, _html: &str, _base_url: &str) -> Result<()> {
            self.raw_attempts.fetch_add(1, Ordering::SeqCst);
            Err(RenderError::Surface("raw content unsupported".to_string()))
        }
    }

    /// Surface where both entry points fail.
    struct DeadSurface;

    impl RenderSurface for DeadSurface {
        fn load_url(&self, _url: &str) -> Result<()> {
            Err(RenderError::Surface("gone".to_string()))
        }

        fn load_raw_content(&self, _html: &str, _base_url: &str) -> Result<()> {
            Err(RenderError::Surface("gone".to_string()))
        }
    }

    #[test]
    fn disabled_enhancement_loads_url_directly() {
        let surface = HeadlessSurface::new();
        let pipeline = EnhancementPipeline::new(false, false);

        let outcome = pipeline
            .render(&surface, &html_page("<html><head></head></html>"))
            .unwrap();

        assert_eq!(outcome, RenderOutcome::Direct);
        assert_eq!(
            surface.loads(),
            vec![SurfaceLoad::Url("https://example.com/page".to_string())]
        );
    }

    #[test]
    fn enabled_enhancement_rewrites_and_loads_raw() {
        let surface = HeadlessSurface::new();
        let pipeline = EnhancementPipeline::new(true, false);

        let outcome = pipeline
            .render(&surface, &html_page("<html><head><title>T</title></head><body></body></html>"))
            .unwrap();

        assert_eq!(outcome, RenderOutcome::Enhanced);
        let loads = surface.loads();
        let SurfaceLoad::RawContent { html, base_url } = &loads[0] else {
            panic!("expected raw content load");
        };
        assert_eq!(base_url, "https://example.com/page");
        assert!(html.contains("<base href=\"https://example.com/page\">"));
        assert!(html.contains(".bg-primary"));
        // Injected before the closing head tag, after the title.
        assert!(html.find("<title>").unwrap() < html.find("<base ").unwrap());
    }

    #[test]
    fn non_html_content_always_goes_direct() {
        let surface = HeadlessSurface::new();
        let pipeline = EnhancementPipeline::new(true, false);

        let fetched = FetchResult {
            final_url: "https://example.com/data.json".to_string(),
            body: "{}".to_string(),
            content_type: Some("application/json".to_string()),
        };

        let outcome = pipeline.render(&surface, &fetched).unwrap();
        assert_eq!(outcome, RenderOutcome::Direct);
    }

    #[test]
    fn enhanced_failure_falls_back_to_exactly_one_direct_load() {
        let surface = BrokenRawSurface::default();
        let pipeline = EnhancementPipeline::new(true, true);

        let outcome = pipeline.render(&surface, &html_page("<html></html>")).unwrap();

        assert_eq!(outcome, RenderOutcome::Fallback);
        assert_eq!(surface.raw_attempts.load(Ordering::SeqCst), 1);
        assert_eq!(surface.url_loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn fallback_failure_surfaces_the_error() {
        let pipeline = EnhancementPipeline::new(true, false);
        let err = pipeline.render(&DeadSurface, &html_page("<html></html>"));
        assert!(err.is_err());
    }

    #[test]
    fn rewrite_synthesizes_a_head_when_missing() {
        let out = rewrite_document("<html><body>hi</body></html>", "https://a.example/");
        assert!(out.contains("<html><head><base href=\"https://a.example/\">"));

        let bare = rewrite_document("<p>hi</p>", "https://a.example/");
        assert!(bare.starts_with("<head><base href=\"https://a.example/\">"));
        assert!(bare.ends_with("</head><p>hi</p>"));
    }

    #[test]
    fn rewrite_handles_uppercase_markup() {
        let out = rewrite_document("<HTML><HEAD></HEAD></HTML>", "https://a.example/");
        let base_at = out.find("<base ").unwrap();
        assert!(base_at < out.find("</HEAD>").unwrap());
    }
}

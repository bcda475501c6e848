//! Headless-renderer capability consumed by the runtime strategy
//!
//! The engine never drives a browser itself; it consumes a rendering
//! capability through the [`Renderer`] trait and obtains one isolated
//! browsing context per crawl target from a [`RendererProvider`].
//! Response interception is not an ambient event log: every navigation
//! returns the responses captured while it settled, scoped to that
//! navigation alone.

use crate::RenderError;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// A network response captured while a navigation settled
#[derive(Debug, Clone)]
pub struct CapturedResponse {
    /// The response URL
    pub url: String,

    /// Content-Type header value, if present
    pub content_type: Option<String>,

    /// Response body decoded as text
    pub body: String,
}

impl CapturedResponse {
    /// Returns true if this response is worth mining for route data.
    ///
    /// Script and JSON payloads, and anything served from an `/api/`
    /// path, routinely embed navigable slugs that never appear as
    /// anchors.
    pub fn is_data_like(&self) -> bool {
        if let Some(ct) = &self.content_type {
            let ct = ct.to_lowercase();
            if ct.contains("json") || ct.contains("javascript") {
                return true;
            }
        }
        let url = self.url.to_lowercase();
        url.ends_with(".js") || url.ends_with(".json") || url.contains("/api/")
    }
}

/// The outcome of one completed navigation
#[derive(Debug, Clone)]
pub struct NavigationRecord {
    /// URL the renderer ended up on after redirects
    pub final_url: String,

    /// HTTP status of the main document, when the renderer reports one
    pub status: Option<u16>,

    /// Responses captured while this navigation settled
    pub responses: Vec<CapturedResponse>,
}

/// A visible element eligible for interactive probing
#[derive(Debug, Clone)]
pub struct InteractiveElement {
    /// The element's full class attribute, used as a repetition signature
    pub class_signature: String,

    /// Position of this element among those sharing its signature
    pub index: usize,

    /// Whether the element currently has a nonzero layout box
    pub visible: bool,
}

/// The observed result of clicking one element
#[derive(Debug, Clone)]
pub struct ClickOutcome {
    /// Destination URL if the click caused location or history-API
    /// navigation; `None` for clicks that changed nothing
    pub navigated_to: Option<String>,
}

/// A controllable headless browsing context.
///
/// One context serves one crawl target; implementations must not share
/// DOM or history state between contexts.
#[async_trait]
pub trait Renderer: Send {
    /// Navigates to a URL, waits for the load to settle, and returns the
    /// navigation record including intercepted responses
    async fn navigate(&mut self, url: &Url, timeout: Duration)
        -> Result<NavigationRecord, RenderError>;

    /// Waits until the page has gone network-idle, up to the timeout
    async fn wait_for_idle(&mut self, timeout: Duration) -> Result<(), RenderError>;

    /// Returns navigation targets read from the live DOM: `a[href]`
    /// values plus `data-href`, `data-url`, `data-link`, `data-path`,
    /// and `data-route` attributes
    async fn anchor_targets(&mut self) -> Result<Vec<String>, RenderError>;

    /// Returns the clickable elements currently in the DOM with their
    /// class signatures
    async fn interactive_elements(&mut self) -> Result<Vec<InteractiveElement>, RenderError>;

    /// Clicks the `index`-th element carrying `class_signature` and
    /// reports any resulting navigation
    async fn click(
        &mut self,
        class_signature: &str,
        index: usize,
        timeout: Duration,
    ) -> Result<ClickOutcome, RenderError>;

    /// Returns to the previous history entry
    async fn go_back(&mut self, timeout: Duration) -> Result<(), RenderError>;

    /// Returns the URL the context is currently on
    async fn current_url(&mut self) -> Result<String, RenderError>;
}

/// Hands out isolated browsing contexts.
///
/// The frontier asks for a fresh context per target that escalates to
/// runtime extraction, so concurrent targets never observe each other's
/// DOM or history state.
#[async_trait]
pub trait RendererProvider: Send + Sync {
    /// Opens a new, isolated browsing context
    async fn new_context(&self) -> Result<Box<dyn Renderer>, RenderError>;
}

//! Shared test doubles and helpers

use async_trait::async_trait;
use linkscout::config::Config;
use linkscout::render::{
    CapturedResponse, ClickOutcome, InteractiveElement, NavigationRecord, Renderer,
    RendererProvider,
};
use linkscout::RenderError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use url::Url;

/// A test configuration with short timeouts
pub fn test_config(max_depth: u32) -> Config {
    let mut config = Config::default();
    config.crawler.max_depth = max_depth;
    config.http.request_timeout_secs = 5;
    config.http.connect_timeout_secs = 2;
    config
}

/// A renderer double that reports a fixed set of DOM anchors
pub struct ScriptedRenderer {
    pub anchors: Vec<String>,
    pub responses: Vec<CapturedResponse>,
    current: String,
}

#[async_trait]
impl Renderer for ScriptedRenderer {
    async fn navigate(
        &mut self,
        url: &Url,
        _timeout: Duration,
    ) -> Result<NavigationRecord, RenderError> {
        self.current = url.to_string();
        Ok(NavigationRecord {
            final_url: url.to_string(),
            status: Some(200),
            responses: self.responses.clone(),
        })
    }

    async fn wait_for_idle(&mut self, _timeout: Duration) -> Result<(), RenderError> {
        Ok(())
    }

    async fn anchor_targets(&mut self) -> Result<Vec<String>, RenderError> {
        Ok(self.anchors.clone())
    }

    async fn interactive_elements(&mut self) -> Result<Vec<InteractiveElement>, RenderError> {
        Ok(vec![])
    }

    async fn click(
        &mut self,
        _class_signature: &str,
        _index: usize,
        _timeout: Duration,
    ) -> Result<ClickOutcome, RenderError> {
        Ok(ClickOutcome { navigated_to: None })
    }

    async fn go_back(&mut self, _timeout: Duration) -> Result<(), RenderError> {
        Ok(())
    }

    async fn current_url(&mut self) -> Result<String, RenderError> {
        Ok(self.current.clone())
    }
}

/// Provider handing out scripted contexts and counting them
pub struct ScriptedProvider {
    pub anchors: Vec<String>,
    pub contexts: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(anchors: Vec<String>) -> Self {
        Self {
            anchors,
            contexts: AtomicUsize::new(0),
        }
    }

    pub fn contexts_opened(&self) -> usize {
        self.contexts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RendererProvider for ScriptedProvider {
    async fn new_context(&self) -> Result<Box<dyn Renderer>, RenderError> {
        self.contexts.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedRenderer {
            anchors: self.anchors.clone(),
            responses: vec![],
            current: String::new(),
        }))
    }
}

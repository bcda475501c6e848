use serde::Deserialize;

/// Main configuration structure for linkscout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub strategies: StrategyConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawl frontier behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum depth to crawl from the seed URL
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Maximum number of concurrent fetch+extract operations per depth
    #[serde(rename = "concurrency", default = "default_concurrency")]
    pub concurrency: u32,

    /// Hard cap on targets processed at one depth; surplus is dropped
    #[serde(rename = "max-urls-per-depth", default = "default_max_urls_per_depth")]
    pub max_urls_per_depth: u32,

    /// Also download same-origin stylesheets/scripts/images
    #[serde(rename = "mirror-assets", default)]
    pub mirror_assets: bool,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Total request timeout in seconds
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// Link-extraction strategy configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StrategyConfig {
    /// Minimum link yield below which the next strategy tier runs
    #[serde(rename = "min-link-threshold", default = "default_min_link_threshold")]
    pub min_link_threshold: usize,

    /// Maximum number of external script payloads fetched for bundle scanning
    #[serde(rename = "max-scripts", default = "default_max_scripts")]
    pub max_scripts: usize,

    /// Maximum repeated-class-signature groups probed by the runtime strategy
    #[serde(rename = "max-probe-groups", default = "default_max_probe_groups")]
    pub max_probe_groups: usize,

    /// Maximum representative elements clicked per signature group
    #[serde(rename = "max-clicks-per-group", default = "default_max_clicks_per_group")]
    pub max_clicks_per_group: usize,

    /// Hard cap on clicks across all groups for one page
    #[serde(rename = "max-total-clicks", default = "default_max_total_clicks")]
    pub max_total_clicks: usize,

    /// Timeout for renderer navigation and settle operations, in seconds
    #[serde(rename = "render-timeout-secs", default = "default_render_timeout")]
    pub render_timeout_secs: u64,

    /// Per-click timeout in milliseconds
    #[serde(rename = "click-timeout-millis", default = "default_click_timeout")]
    pub click_timeout_millis: u64,
}

/// Output configuration for the CLI binary
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the JSON summary written at session end
    #[serde(rename = "summary-path", default = "default_summary_path")]
    pub summary_path: String,

    /// Directory the mirror sink writes downloaded resources into
    #[serde(rename = "mirror-dir", default = "default_mirror_dir")]
    pub mirror_dir: String,
}

fn default_max_depth() -> u32 {
    2
}

fn default_concurrency() -> u32 {
    5
}

fn default_max_urls_per_depth() -> u32 {
    50
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_min_link_threshold() -> usize {
    5
}

fn default_max_scripts() -> usize {
    20
}

fn default_max_probe_groups() -> usize {
    5
}

fn default_max_clicks_per_group() -> usize {
    3
}

fn default_max_total_clicks() -> usize {
    10
}

fn default_render_timeout() -> u64 {
    20
}

fn default_click_timeout() -> u64 {
    2000
}

fn default_summary_path() -> String {
    "./crawl_summary.json".to_string()
}

fn default_mirror_dir() -> String {
    "./site_mirror".to_string()
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            concurrency: default_concurrency(),
            max_urls_per_depth: default_max_urls_per_depth(),
            mirror_assets: false,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            min_link_threshold: default_min_link_threshold(),
            max_scripts: default_max_scripts(),
            max_probe_groups: default_max_probe_groups(),
            max_clicks_per_group: default_max_clicks_per_group(),
            max_total_clicks: default_max_total_clicks(),
            render_timeout_secs: default_render_timeout(),
            click_timeout_millis: default_click_timeout(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            summary_path: default_summary_path(),
            mirror_dir: default_mirror_dir(),
        }
    }
}

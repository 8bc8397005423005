//! Browser session control for headless testing.
//!
//! With the `browser` feature enabled, this module drives a real Chromium
//! via the Chrome DevTools Protocol (chromiumoxide). Without the feature it
//! provides a mock `Browser`/`Page` pair with the same async API and
//! settable page state, so the page abstraction is unit-testable without a
//! browser process.
//!
//! Exactly one `Browser` owns the Chromium process; `Page` handles borrow
//! the session and never outlive its teardown. Dropping the `Browser`
//! kills the process, so cleanup holds on every exit path.

use crate::result::IngresoResult;

/// Browser configuration
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Window width
    pub window_width: u32,
    /// Window height
    pub window_height: u32,
    /// Path to chromium binary (None = `CHROMIUM_PATH` env, then auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Create a config with headless defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set window dimensions
    #[must_use]
    pub const fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }

    /// Resolve the chromium executable: explicit path, then `CHROMIUM_PATH`
    #[must_use]
    pub fn resolved_chromium_path(&self) -> Option<String> {
        self.chromium_path
            .clone()
            .or_else(|| std::env::var("CHROMIUM_PATH").ok())
    }
}

// ============================================================================
// Real CDP implementation (when the `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
mod cdp {
    use super::BrowserConfig;
    use crate::locator::{Locator, Readiness};
    use crate::result::{IngresoError, IngresoResult};
    use crate::wait::{UrlPattern, WaitOptions};
    use base64::Engine;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::page::{
        CaptureScreenshotFormat, CaptureScreenshotParams,
    };
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use std::sync::Arc;
    use std::time::Instant;
    use tokio::sync::Mutex;
    use tracing::{debug, warn};

    /// A managed Chromium session
    #[derive(Debug)]
    pub struct Browser {
        inner: Arc<Mutex<CdpBrowser>>,
        #[allow(dead_code)]
        handle: tokio::task::JoinHandle<()>,
    }

    impl Browser {
        /// Launch a Chromium process and connect over CDP
        pub async fn launch(config: BrowserConfig) -> IngresoResult<Self> {
            let mut builder = CdpConfig::builder()
                .window_size(config.window_width, config.window_height);

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(path) = config.resolved_chromium_path() {
                builder = builder.chrome_executable(path);
            }

            // Unique profile directory per launch so parallel suites don't
            // trip over Chromium's ProcessSingleton lock
            let profile_dir = std::env::temp_dir()
                .join(format!("ingreso-{}", uuid::Uuid::new_v4()));
            builder = builder.user_data_dir(&profile_dir);

            let cdp_config = builder
                .build()
                .map_err(|message| IngresoError::BrowserLaunch { message })?;

            debug!(headless = config.headless, "launching browser");

            let (browser, mut handler) =
                CdpBrowser::launch(cdp_config)
                    .await
                    .map_err(|e| IngresoError::BrowserLaunch {
                        message: e.to_string(),
                    })?;

            // Drive CDP events for the lifetime of the session
            let handle = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if let Err(e) = event {
                        warn!("browser handler error: {e}");
                        break;
                    }
                }
            });

            Ok(Self {
                inner: Arc::new(Mutex::new(browser)),
                handle,
            })
        }

        /// Create a new page (tab)
        pub async fn new_page(&self) -> IngresoResult<Page> {
            let browser = self.inner.lock().await;
            let cdp_page =
                browser
                    .new_page("about:blank")
                    .await
                    .map_err(|e| IngresoError::Connection {
                        message: e.to_string(),
                    })?;

            Ok(Page {
                inner: Arc::new(cdp_page),
            })
        }

        /// Close the browser and terminate the Chromium process.
        ///
        /// Prefer this over relying on Drop; Drop still kills the process
        /// if a scenario panics before reaching close.
        pub async fn close(self) -> IngresoResult<()> {
            debug!("closing browser");
            let mut browser = self.inner.lock().await;
            browser
                .close()
                .await
                .map_err(|e| IngresoError::Connection {
                    message: e.to_string(),
                })?;
            Ok(())
        }
    }

    /// A browser page driven over CDP
    #[derive(Debug, Clone)]
    pub struct Page {
        inner: Arc<CdpPage>,
    }

    impl Page {
        /// Navigate to a URL. No readiness wait: callers must not assume
        /// the destination is interactive until a subsequent wait succeeds.
        pub async fn goto(&self, url: &str) -> IngresoResult<()> {
            debug!(url, "navigating");
            self.inner
                .goto(url)
                .await
                .map_err(|e| IngresoError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        }

        /// Evaluate a JavaScript expression and deserialize the result
        async fn evaluate<T: serde::de::DeserializeOwned>(
            &self,
            script: &str,
        ) -> IngresoResult<T> {
            let result =
                self.inner
                    .evaluate(script)
                    .await
                    .map_err(|e| IngresoError::Script {
                        message: e.to_string(),
                    })?;
            result.into_value().map_err(|e| IngresoError::Script {
                message: e.to_string(),
            })
        }

        /// Current document title
        pub async fn title(&self) -> IngresoResult<String> {
            self.evaluate("document.title").await
        }

        /// Current URL, observed live so redirects are visible
        pub async fn url(&self) -> IngresoResult<String> {
            self.evaluate("window.location.href").await
        }

        /// Poll until the locator's element satisfies the readiness
        /// condition, within the locator's bounded wait.
        pub async fn wait_for(
            &self,
            locator: &Locator,
            readiness: Readiness,
        ) -> IngresoResult<()> {
            let query = locator.selector.readiness_query(readiness);
            let start = Instant::now();

            loop {
                // Transient evaluation errors (e.g., mid-navigation) count
                // as "not ready yet"
                if self.evaluate::<bool>(&query).await.unwrap_or(false) {
                    return Ok(());
                }

                if start.elapsed() >= locator.options.timeout() {
                    return Err(IngresoError::Timeout {
                        condition: format!(
                            "{} of {}",
                            readiness.describe(),
                            locator.selector
                        ),
                        ms: locator.options.timeout_ms,
                    });
                }

                tokio::time::sleep(locator.options.poll_interval()).await;
            }
        }

        /// Wait for the element to be visible, then write `value` into it
        pub async fn type_text(&self, locator: &Locator, value: &str) -> IngresoResult<()> {
            self.wait_for(locator, Readiness::Visible).await?;
            let lookup = locator.selector.to_query();
            let script = format!(
                "(() => {{ \
                    const el = {lookup}; \
                    el.value = {value:?}; \
                    el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
                    el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
                    return true; \
                }})()"
            );
            let _: bool = self.evaluate(&script).await?;
            Ok(())
        }

        /// Wait for the element to be clickable, then click it
        pub async fn click(&self, locator: &Locator) -> IngresoResult<()> {
            self.wait_for(locator, Readiness::Clickable).await?;
            let lookup = locator.selector.to_query();
            let script = format!("(() => {{ {lookup}.click(); return true; }})()");
            let _: bool = self.evaluate(&script).await?;
            Ok(())
        }

        /// Wait for the element to be visible, then return its trimmed text
        pub async fn text(&self, locator: &Locator) -> IngresoResult<String> {
            self.wait_for(locator, Readiness::Visible).await?;
            let lookup = locator.selector.to_query();
            let script =
                format!("(() => {{ return ({lookup}.textContent || '').trim(); }})()");
            self.evaluate(&script).await
        }

        /// Poll the live URL until it matches the pattern
        pub async fn wait_for_url(
            &self,
            pattern: &UrlPattern,
            options: &WaitOptions,
        ) -> IngresoResult<()> {
            let start = Instant::now();

            loop {
                if let Ok(url) = self.url().await {
                    if pattern.matches(&url) {
                        return Ok(());
                    }
                }

                if start.elapsed() >= options.timeout() {
                    return Err(IngresoError::Timeout {
                        condition: pattern.describe(),
                        ms: options.timeout_ms,
                    });
                }

                tokio::time::sleep(options.poll_interval()).await;
            }
        }

        /// Capture the current page state as PNG bytes
        pub async fn screenshot(&self) -> IngresoResult<Vec<u8>> {
            let params = CaptureScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .build();

            let response =
                self.inner
                    .execute(params)
                    .await
                    .map_err(|e| IngresoError::Screenshot {
                        message: e.to_string(),
                    })?;

            base64::engine::general_purpose::STANDARD
                .decode(&response.data)
                .map_err(|e| IngresoError::Screenshot {
                    message: e.to_string(),
                })
        }
    }
}

// ============================================================================
// Mock implementation (when the `browser` feature is NOT enabled)
// ============================================================================

#[cfg(not(feature = "browser"))]
mod mock {
    use super::BrowserConfig;
    use crate::locator::{Locator, Readiness, Selector};
    use crate::result::IngresoResult;
    use crate::wait::{wait_until, UrlPattern, WaitOptions};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// State of one mock element
    #[derive(Debug, Clone)]
    pub struct MockElement {
        /// Rendered and not hidden
        pub visible: bool,
        /// Not disabled
        pub enabled: bool,
        /// Text content
        pub text: String,
        /// Field value written by `type_text`
        pub value: String,
        /// Number of clicks received
        pub clicks: u32,
    }

    impl Default for MockElement {
        fn default() -> Self {
            Self {
                visible: false,
                enabled: true,
                text: String::new(),
                value: String::new(),
                clicks: 0,
            }
        }
    }

    impl MockElement {
        /// A visible element with the given text
        #[must_use]
        pub fn visible_with_text(text: impl Into<String>) -> Self {
            Self {
                visible: true,
                text: text.into(),
                ..Self::default()
            }
        }

        /// A visible, enabled, empty element
        #[must_use]
        pub fn visible() -> Self {
            Self {
                visible: true,
                ..Self::default()
            }
        }
    }

    #[derive(Debug, Default)]
    struct MockState {
        url: String,
        title: String,
        elements: HashMap<String, MockElement>,
    }

    /// Browser instance (mock when the `browser` feature is disabled)
    #[derive(Debug)]
    pub struct Browser {
        #[allow(dead_code)]
        config: BrowserConfig,
    }

    impl Browser {
        /// "Launch" a mock browser
        pub async fn launch(config: BrowserConfig) -> IngresoResult<Self> {
            Ok(Self { config })
        }

        /// Create a new mock page
        pub async fn new_page(&self) -> IngresoResult<Page> {
            Ok(Page::default())
        }

        /// Close the mock browser
        pub async fn close(self) -> IngresoResult<()> {
            Ok(())
        }
    }

    /// A mock page with settable state
    #[derive(Debug, Clone, Default)]
    pub struct Page {
        state: Arc<Mutex<MockState>>,
    }

    impl Page {
        fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
            self.state.lock().expect("mock page state poisoned")
        }

        /// Navigate to a URL
        pub async fn goto(&self, url: &str) -> IngresoResult<()> {
            self.lock().url = url.to_string();
            Ok(())
        }

        /// Current document title
        pub async fn title(&self) -> IngresoResult<String> {
            Ok(self.lock().title.clone())
        }

        /// Current URL
        pub async fn url(&self) -> IngresoResult<String> {
            Ok(self.lock().url.clone())
        }

        fn is_ready(&self, selector: &Selector, readiness: Readiness) -> bool {
            self.lock()
                .elements
                .get(&selector.to_string())
                .is_some_and(|el| {
                    el.visible && (readiness == Readiness::Visible || el.enabled)
                })
        }

        /// Poll until the locator's element satisfies the readiness
        /// condition, within the locator's bounded wait.
        pub async fn wait_for(
            &self,
            locator: &Locator,
            readiness: Readiness,
        ) -> IngresoResult<()> {
            let condition =
                format!("{} of {}", readiness.describe(), locator.selector);
            wait_until(
                || self.is_ready(&locator.selector, readiness),
                &locator.options,
                &condition,
            )
        }

        /// Wait for the element to be visible, then write `value` into it
        pub async fn type_text(&self, locator: &Locator, value: &str) -> IngresoResult<()> {
            self.wait_for(locator, Readiness::Visible).await?;
            let mut state = self.lock();
            let el = state
                .elements
                .entry(locator.selector.to_string())
                .or_default();
            el.value = value.to_string();
            Ok(())
        }

        /// Wait for the element to be clickable, then click it
        pub async fn click(&self, locator: &Locator) -> IngresoResult<()> {
            self.wait_for(locator, Readiness::Clickable).await?;
            let mut state = self.lock();
            let el = state
                .elements
                .entry(locator.selector.to_string())
                .or_default();
            el.clicks += 1;
            Ok(())
        }

        /// Wait for the element to be visible, then return its text
        pub async fn text(&self, locator: &Locator) -> IngresoResult<String> {
            self.wait_for(locator, Readiness::Visible).await?;
            Ok(self
                .lock()
                .elements
                .get(&locator.selector.to_string())
                .map(|el| el.text.trim().to_string())
                .unwrap_or_default())
        }

        /// Poll the URL until it matches the pattern
        pub async fn wait_for_url(
            &self,
            pattern: &UrlPattern,
            options: &WaitOptions,
        ) -> IngresoResult<()> {
            wait_until(
                || pattern.matches(&self.lock().url),
                options,
                &pattern.describe(),
            )
        }

        /// Capture a screenshot (empty bytes in mock mode)
        pub async fn screenshot(&self) -> IngresoResult<Vec<u8>> {
            Ok(Vec::new())
        }

        // Test hooks

        /// Set the document title (for testing)
        pub fn set_title(&self, title: impl Into<String>) {
            self.lock().title = title.into();
        }

        /// Set an element's state (for testing)
        pub fn set_element(&self, selector: &Selector, element: MockElement) {
            let _ = self
                .lock()
                .elements
                .insert(selector.to_string(), element);
        }

        /// Read an element's state back (for testing)
        #[must_use]
        pub fn element(&self, selector: &Selector) -> Option<MockElement> {
            self.lock().elements.get(&selector.to_string()).cloned()
        }
    }
}

// Re-export based on feature
#[cfg(feature = "browser")]
pub use cdp::{Browser, Page};

#[cfg(not(feature = "browser"))]
pub use mock::{Browser, MockElement, Page};

/// Launch a browser with the default headless configuration
pub async fn launch_default() -> IngresoResult<Browser> {
    Browser::launch(BrowserConfig::default()).await
}

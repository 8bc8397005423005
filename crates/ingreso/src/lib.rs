//! Ingreso: browser-based UI test suite for a login form.
//!
//! Ingreso (Spanish: "login/entry") wraps a headless Chromium session
//! behind a page-object abstraction and drives four login scenarios
//! against it: page load, successful login, wrong credentials, and empty
//! fields.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Ingreso Architecture                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐         │
//! │   │ Scenarios  │    │ LoginPage  │    │ Headless   │         │
//! │   │ (tests/)   │───►│ (page      │───►│ Browser    │         │
//! │   │            │    │  object)   │    │ (chromium) │         │
//! │   └────────────┘    └────────────┘    └────────────┘         │
//! │         │                                   │                │
//! │         └──── ScenarioRunner ── screenshot ─┘                │
//! │                   on failure                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Real browser control requires the `browser` feature; without it a mock
//! transport with the same API backs the unit tests.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints]

/// Browser session control (CDP behind the `browser` feature, mock otherwise)
pub mod browser;

/// Element locators and readiness conditions
pub mod locator;

/// Page abstraction for the login form
pub mod login_page;

/// Result and error types
pub mod result;

/// Scenario outcome accounting and the failure-screenshot hook
pub mod scenario;

/// Bounded waits and URL observation
pub mod wait;

#[cfg(not(feature = "browser"))]
pub use browser::MockElement;
pub use browser::{launch_default, Browser, BrowserConfig, Page};
pub use locator::{Locator, Readiness, Selector};
pub use login_page::{LoginForm, LoginPage};
pub use result::{IngresoError, IngresoResult};
pub use scenario::{ensure, ensure_eq, ScenarioResult, ScenarioRunner, SuiteReport};
pub use wait::{
    UrlPattern, WaitOptions, DEFAULT_POLL_INTERVAL_MS, INTERACT_TIMEOUT_MS, PRESENCE_TIMEOUT_MS,
};

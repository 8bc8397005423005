//! Element locators and readiness conditions.
//!
//! A locator is an immutable strategy+identifier pair plus the bounded-wait
//! policy to apply before touching the element. Locators never interact with
//! an element until its readiness condition holds.

use crate::wait::WaitOptions;
use std::fmt;

/// Selector strategy for locating one element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Lookup by element id (e.g., "email")
    Id(String),
    /// CSS selector (e.g., "button[type='submit']")
    Css(String),
}

impl Selector {
    /// Create an id selector
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Convert to a JavaScript lookup expression.
    ///
    /// The identifier is interpolated as a quoted, escaped string literal
    /// so it cannot break out of the expression.
    #[must_use]
    pub fn to_query(&self) -> String {
        match self {
            Self::Id(id) => format!("document.getElementById({id:?})"),
            Self::Css(css) => format!("document.querySelector({css:?})"),
        }
    }

    /// Build a boolean expression checking a readiness condition.
    #[must_use]
    pub fn readiness_query(&self, readiness: Readiness) -> String {
        let lookup = self.to_query();
        let clickable_clause = match readiness {
            Readiness::Visible => "",
            Readiness::Clickable => " && !el.disabled",
        };
        format!(
            "(() => {{ \
                const el = {lookup}; \
                if (!el) return false; \
                const style = window.getComputedStyle(el); \
                const rect = el.getBoundingClientRect(); \
                return style.display !== 'none' \
                    && style.visibility !== 'hidden' \
                    && rect.width > 0 && rect.height > 0{clickable_clause}; \
            }})()"
        )
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Css(css) => write!(f, "{css}"),
        }
    }
}

/// Readiness condition an element must satisfy before interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Rendered with a non-empty box and not hidden
    Visible,
    /// Visible and not disabled
    Clickable,
}

impl Readiness {
    /// Human-readable name for timeout errors
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Visible => "visibility",
            Self::Clickable => "clickability",
        }
    }
}

/// A selector paired with its bounded-wait policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    /// The selector for finding the element
    pub selector: Selector,
    /// Wait policy applied before interacting
    pub options: WaitOptions,
}

impl Locator {
    /// Create a locator with the interaction wait policy
    #[must_use]
    pub fn new(selector: Selector) -> Self {
        Self {
            selector,
            options: WaitOptions::default(),
        }
    }

    /// Override the wait policy
    #[must_use]
    pub const fn with_options(mut self, options: WaitOptions) -> Self {
        self.options = options;
        self
    }
}

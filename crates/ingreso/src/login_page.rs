//! Page abstraction for the login form.
//!
//! `LoginPage` hides the form's locators and readiness waits behind named
//! operations, so scenarios read as intent ("set the email, click login")
//! rather than element plumbing. It borrows the session's [`Page`] and owns
//! nothing else.
//!
//! Failure policy: every operation that requires the element to exist
//! propagates its bounded-wait timeout to the caller, failing the scenario
//! loudly. The one exception is [`LoginPage::is_error_displayed`], which
//! probes for the banner with the shorter presence timeout and maps any
//! failure to `false`: an absent banner is an expected outcome callers
//! branch on, not an error.

use crate::browser::Page;
use crate::locator::{Locator, Readiness, Selector};
use crate::result::IngresoResult;
use crate::wait::WaitOptions;
use async_trait::async_trait;

/// The five named operations of a login form.
///
/// Scenarios depend on this interface, so the abstraction can be swapped
/// for a different locator scheme without touching the scenarios.
#[async_trait]
pub trait LoginForm {
    /// Navigate to the login address. No readiness wait.
    async fn open(&self, url: &str) -> IngresoResult<()>;

    /// Wait for the email field to be visible, then write `email` into it
    async fn set_email(&self, email: &str) -> IngresoResult<()>;

    /// Wait for the password field to be visible, then write `password` into it
    async fn set_password(&self, password: &str) -> IngresoResult<()>;

    /// Wait for the submit control to be clickable, then trigger it
    async fn click_login(&self) -> IngresoResult<()>;

    /// Wait for the error banner to be visible, then return its text verbatim
    async fn error_message(&self) -> IngresoResult<String>;
}

/// Page object for the login form
#[derive(Debug)]
pub struct LoginPage<'a> {
    page: &'a Page,
    email_input: Locator,
    password_input: Locator,
    login_button: Locator,
    error_banner: Locator,
    presence_options: WaitOptions,
}

impl<'a> LoginPage<'a> {
    /// Bind a login page to a session with the standard wait policies
    #[must_use]
    pub fn new(page: &'a Page) -> Self {
        Self::with_wait_options(page, WaitOptions::new(), WaitOptions::presence())
    }

    /// Bind with custom interaction and presence wait policies.
    ///
    /// The two policies are deliberately distinct: `interact` guards
    /// elements the test requires, `presence` guards the quick
    /// may-or-may-not-exist probe.
    #[must_use]
    pub fn with_wait_options(
        page: &'a Page,
        interact: WaitOptions,
        presence: WaitOptions,
    ) -> Self {
        Self {
            page,
            email_input: Locator::new(Selector::id("email")).with_options(interact),
            password_input: Locator::new(Selector::id("password")).with_options(interact),
            login_button: Locator::new(Selector::id("login-button")).with_options(interact),
            error_banner: Locator::new(Selector::id("error-message")).with_options(interact),
            presence_options: presence,
        }
    }

    /// Probe whether the error banner becomes visible within the presence
    /// timeout. Never raises: any failure during the wait means "absent".
    pub async fn is_error_displayed(&self) -> bool {
        let probe = self
            .error_banner
            .clone()
            .with_options(self.presence_options);
        self.page.wait_for(&probe, Readiness::Visible).await.is_ok()
    }
}

#[async_trait]
impl LoginForm for LoginPage<'_> {
    async fn open(&self, url: &str) -> IngresoResult<()> {
        self.page.goto(url).await
    }

    async fn set_email(&self, email: &str) -> IngresoResult<()> {
        self.page.type_text(&self.email_input, email).await
    }

    async fn set_password(&self, password: &str) -> IngresoResult<()> {
        self.page.type_text(&self.password_input, password).await
    }

    async fn click_login(&self) -> IngresoResult<()> {
        self.page.click(&self.login_button).await
    }

    async fn error_message(&self) -> IngresoResult<String> {
        self.page.text(&self.error_banner).await
    }
}

#[cfg(all(test, not(feature = "browser")))]
mod tests {
    use super::*;
    use crate::browser::MockElement;
    use crate::result::IngresoError;

    const WRONG_CREDENTIALS: &str = "Nhập email và mật khẩu sai.";

    fn fast_page(page: &Page) -> LoginPage<'_> {
        let interact = WaitOptions::new().with_timeout(100).with_poll_interval(5);
        let presence = WaitOptions::new().with_timeout(50).with_poll_interval(5);
        LoginPage::with_wait_options(page, interact, presence)
    }

    fn banner() -> Selector {
        Selector::id("error-message")
    }

    #[tokio::test]
    async fn test_open_navigates_and_is_idempotent() {
        let page = Page::default();
        let form = fast_page(&page);
        form.open("http://127.0.0.1:5500/login.html").await.unwrap();
        form.open("http://127.0.0.1:5500/login.html").await.unwrap();
        assert_eq!(
            page.url().await.unwrap(),
            "http://127.0.0.1:5500/login.html"
        );
    }

    #[tokio::test]
    async fn test_set_email_times_out_when_field_never_visible() {
        let page = Page::default();
        let form = fast_page(&page);
        let result = form.set_email("test@example.com").await;
        assert!(matches!(result, Err(IngresoError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_set_fields_write_through_to_the_page() {
        let page = Page::default();
        page.set_element(&Selector::id("email"), MockElement::visible());
        page.set_element(&Selector::id("password"), MockElement::visible());
        let form = fast_page(&page);

        form.set_email("test@example.com").await.unwrap();
        form.set_password("password123").await.unwrap();

        assert_eq!(
            page.element(&Selector::id("email")).unwrap().value,
            "test@example.com"
        );
        assert_eq!(
            page.element(&Selector::id("password")).unwrap().value,
            "password123"
        );
    }

    #[tokio::test]
    async fn test_click_login_requires_enabled_button() {
        let page = Page::default();
        page.set_element(
            &Selector::id("login-button"),
            MockElement {
                visible: true,
                enabled: false,
                ..MockElement::default()
            },
        );
        let form = fast_page(&page);
        let result = form.click_login().await;
        assert!(matches!(result, Err(IngresoError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_click_login_clicks_exactly_once() {
        let page = Page::default();
        page.set_element(&Selector::id("login-button"), MockElement::visible());
        let form = fast_page(&page);
        form.click_login().await.unwrap();
        assert_eq!(
            page.element(&Selector::id("login-button")).unwrap().clicks,
            1
        );
    }

    #[tokio::test]
    async fn test_error_message_returns_banner_text_verbatim() {
        let page = Page::default();
        page.set_element(&banner(), MockElement::visible_with_text(WRONG_CREDENTIALS));
        let form = fast_page(&page);
        assert_eq!(form.error_message().await.unwrap(), WRONG_CREDENTIALS);
    }

    #[tokio::test]
    async fn test_error_message_times_out_when_banner_absent() {
        let page = Page::default();
        let form = fast_page(&page);
        let result = form.error_message().await;
        assert!(matches!(result, Err(IngresoError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_is_error_displayed_false_on_absent_banner() {
        let page = Page::default();
        let form = fast_page(&page);
        assert!(!form.is_error_displayed().await);
    }

    #[tokio::test]
    async fn test_is_error_displayed_false_on_hidden_banner() {
        let page = Page::default();
        page.set_element(&banner(), MockElement::default());
        let form = fast_page(&page);
        assert!(!form.is_error_displayed().await);
    }

    #[tokio::test]
    async fn test_is_error_displayed_true_when_banner_visible() {
        let page = Page::default();
        page.set_element(&banner(), MockElement::visible_with_text(WRONG_CREDENTIALS));
        let form = fast_page(&page);
        assert!(form.is_error_displayed().await);
    }
}

//! Anti-automation masking script.
//!
//! Executed once per session, immediately after creation and before any
//! navigation. Hides the most common automation signals checked by
//! interstitial challenge scripts.

/// Masks `navigator.webdriver` and fills in plugin/language lists that are
/// empty under headless Chrome. Idempotent; safe to run more than once.
pub const STEALTH_SCRIPT: &str = r#"
(() => {
    try {
        Object.defineProperty(Navigator.prototype, 'webdriver', {
            get: () => undefined,
            configurable: true,
        });
    } catch (e) {}
    try { delete navigator.webdriver; } catch (e) {}
    try {
        Object.defineProperty(navigator, 'plugins', { get: () => [1, 2, 3, 4, 5] });
    } catch (e) {}
    try {
        Object.defineProperty(navigator, 'languages', { get: () => ['en-US', 'en'] });
    } catch (e) {}
})();
"#;

//! Shared browser helpers.

/// Native confirmation dialog; destructive actions are gated on it.
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}

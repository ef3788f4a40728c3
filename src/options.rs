//! Encoding context threaded through every nested encode call.
//!
//! An encode call carries a [`Purpose`] tag and an arbitrary key/value bag.
//! The encoder passes both through unchanged to every nested container and
//! never interprets them itself; they exist so that collaborator `Serialize`
//! implementations can vary behavior contextually, e.g. omit a field that is
//! not meant to be persisted locally.
//!
//! Because the serde traits offer no side channel, the options are also made
//! visible through a thread-local scope for the duration of the encode. A
//! `Serialize` implementation reads them with [`current_options`]:
//!
//! ```rust
//! use serde::ser::{Serialize, SerializeStruct, Serializer};
//! use serde_prune::{current_options, to_string_with_options, Options, Purpose};
//!
//! struct Session { token: String }
//!
//! impl Serialize for Session {
//!     fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
//!         let persisting = current_options(|o| o.purpose == Purpose::SaveLocally);
//!         let mut state = serializer.serialize_struct("Session", 1)?;
//!         if persisting == Some(true) {
//!             state.serialize_field("token", &self.token)?;
//!         }
//!         state.end()
//!     }
//! }
//!
//! let session = Session { token: "abc".into() };
//! let options = Options::new().with_purpose(Purpose::Transfer);
//! // The lone field is withheld, so the whole value cancels.
//! assert_eq!(to_string_with_options(&session, options).unwrap(), None);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;

/// Why an encoding is happening.
///
/// The encoder itself never branches on this; it is contextual information
/// for collaborator `Serialize` implementations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Purpose {
    /// Encoding for local persistence.
    #[default]
    SaveLocally,
    /// Encoding for transfer to another party.
    Transfer,
}

/// Configuration accepted by every encode entry point.
///
/// # Examples
///
/// ```rust
/// use serde_prune::{Options, Purpose};
///
/// let options = Options::new()
///     .with_purpose(Purpose::Transfer)
///     .with_user_info("schema_version", serde_json::json!(3));
/// assert_eq!(options.purpose, Purpose::Transfer);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Options {
    pub purpose: Purpose,
    /// Arbitrary side-channel values, passed through uninterpreted.
    pub user_info: HashMap<String, serde_json::Value>,
}

impl Options {
    /// Creates default options (purpose [`Purpose::SaveLocally`], empty bag).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the purpose tag.
    #[must_use]
    pub fn with_purpose(mut self, purpose: Purpose) -> Self {
        self.purpose = purpose;
        self
    }

    /// Adds one side-channel entry.
    #[must_use]
    pub fn with_user_info(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.user_info.insert(key.into(), value);
        self
    }
}

thread_local! {
    // A stack, so an encode started from inside another encode's Serialize
    // impl sees its own options.
    static CURRENT: RefCell<Vec<Options>> = const { RefCell::new(Vec::new()) };
}

/// Reads the options of the innermost encode in progress on this thread.
///
/// Returns `None` outside of an encode call.
pub fn current_options<T>(f: impl FnOnce(&Options) -> T) -> Option<T> {
    CURRENT.with(|stack| stack.borrow().last().map(f))
}

/// Makes a set of options visible via [`current_options`] until dropped.
pub(crate) struct OptionsScope;

impl OptionsScope {
    pub(crate) fn enter(options: Options) -> Self {
        CURRENT.with(|stack| stack.borrow_mut().push(options));
        OptionsScope
    }
}

impl Drop for OptionsScope {
    fn drop(&mut self) {
        CURRENT.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_options_outside_encode() {
        assert_eq!(current_options(|o| o.purpose), None);
    }

    #[test]
    fn scope_nests_and_restores() {
        let outer = OptionsScope::enter(Options::new());
        assert_eq!(current_options(|o| o.purpose), Some(Purpose::SaveLocally));
        {
            let _inner =
                OptionsScope::enter(Options::new().with_purpose(Purpose::Transfer));
            assert_eq!(current_options(|o| o.purpose), Some(Purpose::Transfer));
        }
        assert_eq!(current_options(|o| o.purpose), Some(Purpose::SaveLocally));
        drop(outer);
        assert_eq!(current_options(|o| o.purpose), None);
    }

    #[test]
    fn user_info_round_trips() {
        let options = Options::new().with_user_info("k", serde_json::json!("v"));
        let _scope = OptionsScope::enter(options);
        let seen = current_options(|o| o.user_info.get("k").cloned()).flatten();
        assert_eq!(seen, Some(serde_json::json!("v")));
    }
}

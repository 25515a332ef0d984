//! User-defined rules: both operations are forwarded to callbacks registered on the host.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

use crate::augend::{AddResult, Augend, AugendError, TextRange};

/// Host side of user-defined rules.
///
/// Each call is a full round trip: the host invokes the callback named `func` and returns its
/// structured answer, or an [`AugendError::Callback`] if the callback failed or timed out.
pub trait CallbackHost {
    /// Invoke a `find` callback.
    fn call_find(
        &self,
        func: &str,
        line: &str,
        cursor: Option<usize>,
    ) -> Result<Option<TextRange>, AugendError>;

    /// Invoke an `add` callback.
    fn call_add(
        &self,
        func: &str,
        text: &str,
        addend: i64,
        cursor: Option<usize>,
    ) -> Result<AddResult, AugendError>;
}

/// Options for [`UserAugend`]: identifiers of the two host callbacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserOptions {
    /// Callback implementing `find`.
    pub find: String,
    /// Callback implementing `add`.
    pub add: String,
}

/// Pass-through rule backed by host callbacks.
pub struct UserAugend {
    options: UserOptions,
    host: Rc<dyn CallbackHost>,
}

impl UserAugend {
    /// Create a rule forwarding to `host`.
    pub fn new(options: UserOptions, host: Rc<dyn CallbackHost>) -> Self {
        Self { options, host }
    }
}

impl fmt::Debug for UserAugend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserAugend")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Augend for UserAugend {
    fn find(&self, line: &str, cursor: Option<usize>) -> Result<Option<TextRange>, AugendError> {
        self.host.call_find(&self.options.find, line, cursor)
    }

    fn add(
        &mut self,
        text: &str,
        addend: i64,
        cursor: Option<usize>,
    ) -> Result<AddResult, AugendError> {
        self.host.call_add(&self.options.add, text, addend, cursor)
    }
}

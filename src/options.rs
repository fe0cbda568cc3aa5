//! Configuration for encoding and decoding.
//!
//! [`EncodeOptions`] controls row deduplication and the namespace baked into
//! record table keys; [`DecodeOptions`] controls how missing columns are
//! treated.
//!
//! ```rust
//! use serde_csvt::{DecodeOptions, EncodeOptions};
//!
//! let encode = EncodeOptions::new()
//!     .with_compact(false)
//!     .with_namespace("myapp::models");
//!
//! let decode = DecodeOptions::new().with_strict(true);
//! assert!(decode.strict);
//! assert!(!encode.compact);
//! ```

/// Options for [`to_string_with_options`](crate::to_string_with_options) and
/// friends.
#[derive(Clone, Debug)]
pub struct EncodeOptions {
    /// When set, identical serialized rows are written once and every
    /// further occurrence is replaced by a pointer to the first.
    pub compact: bool,
    /// Namespace hashed into record table keys (`Name&sha1(namespace)`).
    ///
    /// The digest only has to be stable: the decoder locates the root table
    /// by its flag and nested rows by their pointers, never by recomputing
    /// keys.
    pub namespace: String,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            compact: true,
            namespace: String::new(),
        }
    }
}

impl EncodeOptions {
    /// Creates the default options: compact mode on, empty namespace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables row deduplication.
    #[must_use]
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Sets the namespace hashed into record table keys.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
}

/// Options for [`from_str_with_options`](crate::from_str_with_options) and
/// friends.
#[derive(Clone, Debug, Default)]
pub struct DecodeOptions {
    /// When set, decoding fails with
    /// [`Error::MissingField`](crate::Error::MissingField) if the target
    /// declares a field the row has no column for. Otherwise such fields
    /// keep their zero value.
    pub strict: bool,
}

impl DecodeOptions {
    /// Creates the default options: strict mode off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables strict field checking.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

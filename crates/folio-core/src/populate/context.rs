//! Request-scoped population context.

/// Locale selection for one read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locale {
    /// Every locale at once; localized field values arrive as
    /// locale-keyed maps.
    All,
    /// A single locale code.
    Code(String),
}

impl Locale {
    /// Create a single-locale selection.
    pub fn code(code: impl Into<String>) -> Self {
        Self::Code(code.into())
    }

    /// String form used in cache keys.
    pub(crate) fn as_key_str(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Code(code) => code,
        }
    }
}

/// Immutable per-request state threaded explicitly through the engine.
///
/// One value is built at the top of a document read and shared by every
/// population task it spawns; nothing here is ambient or global.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Transaction the read runs under, if any.
    pub transaction_id: Option<String>,
    /// Requested population depth.
    pub depth: u32,
    /// Locale selection; `None` reads the default locale.
    pub locale: Option<Locale>,
    /// Fallback locale code.
    pub fallback_locale: Option<String>,
    /// Skip access control on nested reads.
    pub override_access: bool,
    /// Include hidden fields on nested reads.
    pub show_hidden_fields: bool,
}

impl RequestContext {
    /// Create a context with the given population depth.
    pub fn new(depth: u32) -> Self {
        Self {
            transaction_id: None,
            depth,
            locale: None,
            fallback_locale: None,
            override_access: false,
            show_hidden_fields: false,
        }
    }

    /// Set the transaction id.
    pub fn with_transaction_id(mut self, transaction_id: impl Into<String>) -> Self {
        self.transaction_id = Some(transaction_id.into());
        self
    }

    /// Set the locale selection.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    /// Set the fallback locale.
    pub fn with_fallback_locale(mut self, fallback: impl Into<String>) -> Self {
        self.fallback_locale = Some(fallback.into());
        self
    }

    /// Skip access control on nested reads.
    pub fn with_override_access(mut self, override_access: bool) -> Self {
        self.override_access = override_access;
        self
    }

    /// Include hidden fields on nested reads.
    pub fn with_show_hidden_fields(mut self, show_hidden_fields: bool) -> Self {
        self.show_hidden_fields = show_hidden_fields;
        self
    }

    /// Whether the caller requested every locale at once.
    pub fn all_locales(&self) -> bool {
        matches!(self.locale, Some(Locale::All))
    }

    /// Locale string as it appears in cache keys.
    pub(crate) fn locale_key(&self) -> Option<&str> {
        self.locale.as_ref().map(Locale::as_key_str)
    }
}

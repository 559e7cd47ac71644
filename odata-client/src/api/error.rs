//! Error types for protocol negotiation and metadata resolution

use std::fmt;

/// Kind of schema element a resolution query was looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectCategory {
    EntitySet,
    EntityType,
    StructuralProperty,
    NavigationProperty,
    Function,
}

impl fmt::Display for ObjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ObjectCategory::EntitySet => "Entity set",
            ObjectCategory::EntityType => "Entity type",
            ObjectCategory::StructuralProperty => "Structural property",
            ObjectCategory::NavigationProperty => "Navigation property",
            ObjectCategory::Function => "Function",
        };
        f.write_str(label)
    }
}

/// Failure to turn a metadata document into a schema graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaParseError {
    pub message: String,
    /// 1-based (row, column) in the source document, when known
    pub position: Option<(u32, u32)>,
}

impl SchemaParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
        }
    }

    pub fn at(message: impl Into<String>, row: u32, col: u32) -> Self {
        Self {
            message: message.into(),
            position: Some((row, col)),
        }
    }
}

impl fmt::Display for SchemaParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some((row, col)) => write!(f, "{} (line {}, column {})", self.message, row, col),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for SchemaParseError {}

impl From<roxmltree::Error> for SchemaParseError {
    fn from(err: roxmltree::Error) -> Self {
        let pos = err.pos();
        SchemaParseError::at(err.to_string(), pos.row, pos.col)
    }
}

/// Errors raised by the negotiation and resolution layer
///
/// Every variant is terminal for the operation that produced it.
#[derive(Debug)]
pub enum ODataError {
    /// Neither version header was present, or the document has no `Version` attribute
    VersionUndeterminable,
    /// A version was reported but no adapter family supports it
    UnsupportedProtocol { tokens: Vec<String> },
    /// A name or path resolved to nothing
    ObjectNotFound {
        identifier: String,
        category: ObjectCategory,
    },
    /// More than one schema element matched; the schema is malformed
    AmbiguousMatch {
        identifier: String,
        category: ObjectCategory,
        candidates: Vec<String>,
    },
    /// The metadata document could not be parsed
    SchemaParse(SchemaParseError),
    /// The metadata request failed in the transport
    Transport(Box<dyn std::error::Error + Send + Sync>),
    /// The metadata request was cancelled before completion
    Cancelled,
}

impl ODataError {
    pub fn not_found(identifier: impl Into<String>, category: ObjectCategory) -> Self {
        ODataError::ObjectNotFound {
            identifier: identifier.into(),
            category,
        }
    }

    /// True for resolution misses, which callers probing for optional names may want to branch on
    pub fn is_not_found(&self) -> bool {
        matches!(self, ODataError::ObjectNotFound { .. })
    }
}

impl fmt::Display for ODataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ODataError::VersionUndeterminable => {
                write!(f, "Unable to identify OData protocol version")
            }
            ODataError::UnsupportedProtocol { tokens } => {
                write!(f, "OData protocol {} is not supported", tokens.join(";"))
            }
            ODataError::ObjectNotFound {
                identifier,
                category,
            } => write!(f, "{} {} not found", category, identifier),
            ODataError::AmbiguousMatch {
                identifier,
                category,
                candidates,
            } => write!(
                f,
                "{} {} is ambiguous, it matches {}",
                category,
                identifier,
                candidates.join(", ")
            ),
            ODataError::SchemaParse(err) => write!(f, "Failed to parse metadata: {}", err),
            ODataError::Transport(err) => write!(f, "Metadata request failed: {}", err),
            ODataError::Cancelled => write!(f, "Metadata request was cancelled"),
        }
    }
}

impl std::error::Error for ODataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ODataError::SchemaParse(err) => Some(err),
            ODataError::Transport(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<SchemaParseError> for ODataError {
    fn from(err: SchemaParseError) -> Self {
        ODataError::SchemaParse(err)
    }
}

impl From<reqwest::Error> for ODataError {
    fn from(err: reqwest::Error) -> Self {
        ODataError::Transport(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, ODataError>;

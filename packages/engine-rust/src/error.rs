//! Error types for descriptor compilation and record-type registration.

/// Why a single filter or sort descriptor could not be compiled.
///
/// Contained at descriptor granularity: the offending term is dropped and
/// the rest of the request proceeds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("unknown property '{property}' on {record}")]
    UnknownProperty {
        record: &'static str,
        property: String,
    },
    #[error("cannot parse {raw} as {target}: {reason}")]
    UnparsableValue {
        raw: String,
        target: String,
        reason: String,
    },
    #[error("operation '{operation}' is not defined for {declared}")]
    IncompatibleOperandTypes { operation: String, declared: String },
    #[error("unsupported operation '{token}'")]
    UnsupportedOperation { token: String },
}

impl CompileError {
    #[must_use]
    pub const fn kind(&self) -> CompileErrorKind {
        match self {
            Self::UnknownProperty { .. } => CompileErrorKind::UnknownProperty,
            Self::UnparsableValue { .. } => CompileErrorKind::UnparsableValue,
            Self::IncompatibleOperandTypes { .. } => CompileErrorKind::IncompatibleOperandTypes,
            Self::UnsupportedOperation { .. } => CompileErrorKind::UnsupportedOperation,
        }
    }
}

/// Discriminant of [`CompileError`], for counting and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompileErrorKind {
    UnknownProperty,
    UnparsableValue,
    IncompatibleOperandTypes,
    UnsupportedOperation,
}

/// Errors from registering record types with the engine.
///
/// Unlike [`CompileError`] these are fatal and surface at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("record type {record} has no members")]
    EmptySchema { record: &'static str },
    #[error("record type {record} is not registered")]
    NotRegistered { record: &'static str },
}

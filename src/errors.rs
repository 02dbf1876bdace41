//! Closed error-kind taxonomy for the numeric engine and builtin registry,
//! plus the ambient diagnostic slot the evaluator reads to attach source
//! position (spec §7, §4.3).

use std::cell::RefCell;
use std::fmt;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Byte-range source span, reused across the reader and evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub source_id: u32,
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(source_id: u32, start: usize, end: usize) -> Self {
        Span { source_id, start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            source_id: self.source_id,
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    fn as_source_span(self) -> SourceSpan {
        (self.start, self.end.saturating_sub(self.start).max(1)).into()
    }
}

/// The closed set of error kinds the core numeric engine and registry may
/// produce. `io_error`/`internal_error` are reserved for adjacent builtins;
/// the numeric engine itself only ever emits the other four.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxErrorKind {
    ArityError,
    TypeError,
    ArithmeticError,
    ValueError,
    IoError,
    InternalError,
}

impl fmt::Display for AxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AxErrorKind::ArityError => "arity_error",
            AxErrorKind::TypeError => "type_error",
            AxErrorKind::ArithmeticError => "arithmetic_error",
            AxErrorKind::ValueError => "value_error",
            AxErrorKind::IoError => "io_error",
            AxErrorKind::InternalError => "internal_error",
        };
        write!(f, "{s}")
    }
}

/// A diagnostic-carrying failure returned by every builtin and by the
/// numeric engine. Never a host exception/panic — always a value.
#[derive(Debug, Clone, Error, Diagnostic)]
#[error("{kind}: {message}")]
pub struct AxError {
    pub kind: AxErrorKind,
    pub message: String,
    /// Index (within the call's argument slice) the error pertains to,
    /// e.g. "cannot cast arg 1" — filled in by unary type-error sites.
    pub arg_index: Option<usize>,
    #[label("here")]
    pub span: Option<SourceSpan>,
}

impl AxError {
    pub fn new(kind: AxErrorKind, message: impl Into<String>) -> Self {
        let err = AxError {
            kind,
            message: message.into(),
            arg_index: None,
            span: None,
        };
        record_diagnostic(err.clone());
        err
    }

    pub fn with_arg(mut self, index: usize) -> Self {
        self.arg_index = Some(index);
        record_diagnostic(self.clone());
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span.as_source_span());
        record_diagnostic(self.clone());
        self
    }

    pub fn arity(message: impl Into<String>) -> Self {
        Self::new(AxErrorKind::ArityError, message)
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(AxErrorKind::TypeError, message)
    }

    pub fn arithmetic(message: impl Into<String>) -> Self {
        Self::new(AxErrorKind::ArithmeticError, message)
    }

    pub fn value(message: impl Into<String>) -> Self {
        Self::new(AxErrorKind::ValueError, message)
    }

    pub fn divide_by_zero() -> Self {
        Self::arithmetic("Divide by zero")
    }
}

thread_local! {
    /// Ambient thread-scoped slot holding the most recently constructed
    /// diagnostic. The evaluator consults this to attach source position
    /// without threading an extra return channel through every builtin.
    static LAST_DIAGNOSTIC: RefCell<Option<AxError>> = RefCell::new(None);
}

fn record_diagnostic(err: AxError) {
    LAST_DIAGNOSTIC.with(|slot| *slot.borrow_mut() = Some(err));
}

/// Read back the last diagnostic recorded on this thread, if any.
pub fn last_diagnostic() -> Option<AxError> {
    LAST_DIAGNOSTIC.with(|slot| slot.borrow().clone())
}

pub fn clear_diagnostic() {
    LAST_DIAGNOSTIC.with(|slot| *slot.borrow_mut() = None);
}

pub type AxResult<T> = Result<T, AxError>;

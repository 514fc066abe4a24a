//! Translation errors. Every error is fatal: the first one aborts the run
//! and decides the exit code.
use thiserror::Error;

use super::ast::{Expect, OperandKind};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_INVOCATION: i32 = 10;
pub const EXIT_INPUT: i32 = 11;
pub const EXIT_OUTPUT: i32 = 12;
pub const EXIT_HEADER: i32 = 21;
pub const EXIT_OPCODE: i32 = 22;
pub const EXIT_SYNTAX: i32 = 23;
pub const EXIT_INTERNAL: i32 = 99;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("invalid arguments: {0}")]
    Invocation(String),

    #[error("unable to read input: {0}")]
    Input(String),

    #[error("unable to write output: {0}")]
    Output(String),

    #[error("header is missing or incorrect (expected `{expected}`)")]
    Header { expected: &'static str },

    #[error("line {line}: unknown opcode `{opcode}`")]
    UnknownOpcode { line: usize, opcode: String },

    #[error("line {line}: {reason}")]
    Syntax { line: usize, reason: SyntaxError },

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// The process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Invocation(_)        => EXIT_INVOCATION,
            Error::Input(_)             => EXIT_INPUT,
            Error::Output(_)            => EXIT_OUTPUT,
            Error::Header { .. }        => EXIT_HEADER,
            Error::UnknownOpcode { .. } => EXIT_OPCODE,
            Error::Syntax { .. }        => EXIT_SYNTAX,
            Error::Internal(_)          => EXIT_INTERNAL,
        }
    }
}

/// Why a line was rejected as a lexical or syntax error.
/// All of these share one exit code but stay distinguishable.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("too few operands for {opcode}: expected {expected}, found {found}")]
    TooFewOperands { opcode: String, expected: usize, found: usize },

    #[error("too many operands for {opcode}: expected {expected}, found {found}")]
    TooManyOperands { opcode: String, expected: usize, found: usize },

    #[error("expected {expected} operand but `{token}` has no `@`")]
    MissingAt { token: String, expected: Expect },

    #[error("`{0}` is not a frame or constant type")]
    UnknownPrefix(String),

    #[error("expected {expected} operand, found {found} in `{token}`")]
    KindMismatch { token: String, expected: OperandKind, found: OperandKind },

    #[error("`{0}` is not a frame (expected GF, LF or TF)")]
    InvalidFrame(String),

    #[error("empty name in `{0}`")]
    EmptyName(String),

    #[error("name `{0}` starts with a digit")]
    NameStartsWithDigit(String),

    #[error("invalid character `{ch}` in name `{name}`")]
    InvalidNameChar { name: String, ch: char },

    #[error("unexpected `@` in `{0}`")]
    UnexpectedAt(String),

    #[error("`{0}` is not a type (expected int, bool, string or nil)")]
    InvalidType(String),

    #[error("`{0}` is not an integer literal")]
    InvalidInt(String),

    #[error("`{0}` is not a bool literal (expected true or false)")]
    InvalidBool(String),

    #[error("`{0}` is not a nil literal (expected nil)")]
    InvalidNil(String),

    #[error("invalid escape sequence at offset {offset} in `{value}`")]
    InvalidEscape { value: String, offset: usize },

    #[error("character {ch:?} cannot appear in `{value}`")]
    InvalidChar { value: String, ch: char },
}

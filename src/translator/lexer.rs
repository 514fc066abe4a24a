//! This lexer splits IPPcode19 lines into tokens and classifies operands.
//!
//! Tokens are found by scanning, never by building patterns out of
//! previously matched text.
use std::convert::TryFrom;

use super::ast::{Expect, Frame, Operand, OperandKind, TypeName};
use super::error::SyntaxError;

pub const COMMENT: char = '#';

/// Characters allowed in variable names besides letters and digits.
const NAME_SYMBOLS: [char; 8] = ['_', '-', '$', '&', '%', '*', '!', '?'];

/// Returns everything before the first `#`.
pub fn strip_comment(line: &str) -> &str {
    match line.find(COMMENT) {
        Some(idx) => &line[..idx],
        None => line,
    }
}

pub fn has_comment(line: &str) -> bool {
    line.contains(COMMENT)
}

/// True if only whitespace remains once the comment is removed.
pub fn is_blank_or_comment_only(line: &str) -> bool {
    strip_comment(line).trim().is_empty()
}

/// Splits comment-free text on runs of whitespace.
pub fn tokenize(core: &str) -> Vec<&str> {
    core.split_whitespace().collect()
}

/// Splits `prefix@value` at the first `@`.
pub fn split_at_sign(token: &str) -> Option<(&str, &str)> {
    token.split_once('@')
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum EscapeState {
    Normal,
    /// Saw `\`, expecting the first digit.
    Escape1,
    Escape2,
    Escape3,
}

/// Every backslash must be followed by exactly three decimal digits.
pub fn check_escapes(value: &str) -> Result<(), SyntaxError> {
    use EscapeState::*;

    let mut state = Normal;
    let mut start = 0;
    for (offset, c) in value.char_indices() {
        state = match (state, c) {
            (Normal, '\\') => {
                start = offset;
                Escape1
            }
            (Normal, _) => Normal,
            (Escape1, '0'..='9') => Escape2,
            (Escape2, '0'..='9') => Escape3,
            (Escape3, '0'..='9') => Normal,
            _ => return Err(SyntaxError::InvalidEscape { value: value.to_owned(), offset: start }),
        };
    }

    if state != Normal {
        return Err(SyntaxError::InvalidEscape { value: value.to_owned(), offset: start });
    }
    Ok(())
}

/// Classifies a raw operand token against the class its opcode expects.
pub fn classify(token: &str, expect: Expect) -> Result<Operand, SyntaxError> {
    match expect {
        Expect::Symbol => {
            let (prefix, _) = split_at_sign(token).ok_or_else(|| SyntaxError::MissingAt {
                token: token.to_owned(),
                expected: expect,
            })?;
            match prefix_kind(prefix) {
                Some(kind) => classify_kind(token, kind),
                None => Err(SyntaxError::UnknownPrefix(prefix.to_owned())),
            }
        }
        Expect::Exactly(kind) => classify_kind(token, kind),
    }
}

/// The kind selected by the text before `@` in a `symb` operand.
fn prefix_kind(prefix: &str) -> Option<OperandKind> {
    match prefix {
        "GF" | "LF" | "TF" => Some(OperandKind::Var),
        "int"    => Some(OperandKind::Int),
        "bool"   => Some(OperandKind::Bool),
        "string" => Some(OperandKind::String),
        "nil"    => Some(OperandKind::Nil),
        _ => None,
    }
}

fn classify_kind(token: &str, kind: OperandKind) -> Result<Operand, SyntaxError> {
    match kind {
        OperandKind::Var   => classify_var(token),
        OperandKind::Label => classify_label(token),
        OperandKind::Type  => classify_type(token),
        literal => {
            let (prefix, value) = split_at_sign(token).ok_or_else(|| SyntaxError::MissingAt {
                token: token.to_owned(),
                expected: Expect::Exactly(literal),
            })?;
            match prefix_kind(prefix) {
                Some(found) if found == literal => {}
                Some(found) => {
                    return Err(SyntaxError::KindMismatch { token: token.to_owned(), expected: literal, found })
                }
                None => return Err(SyntaxError::UnknownPrefix(prefix.to_owned())),
            }
            match literal {
                OperandKind::Int  => classify_int(value),
                OperandKind::Bool => classify_bool(value),
                OperandKind::Nil  => classify_nil(value),
                _                 => classify_string(value),
            }
        }
    }
}

fn classify_var(token: &str) -> Result<Operand, SyntaxError> {
    let (prefix, name) = split_at_sign(token).ok_or_else(|| SyntaxError::MissingAt {
        token: token.to_owned(),
        expected: Expect::Exactly(OperandKind::Var),
    })?;
    let frame = Frame::try_from(prefix).map_err(|_| SyntaxError::InvalidFrame(prefix.to_owned()))?;
    check_name(name, token)?;
    Ok(Operand::Var(frame, name.to_owned()))
}

fn classify_label(token: &str) -> Result<Operand, SyntaxError> {
    if token.contains('@') {
        return Err(SyntaxError::UnexpectedAt(token.to_owned()));
    }
    check_xml_chars(token)?;
    Ok(Operand::Label(token.to_owned()))
}

fn classify_type(token: &str) -> Result<Operand, SyntaxError> {
    if token.contains('@') {
        return Err(SyntaxError::UnexpectedAt(token.to_owned()));
    }
    match token.parse::<TypeName>() {
        Ok(t) => Ok(Operand::Type(t)),
        Err(_) => Err(SyntaxError::InvalidType(token.to_owned())),
    }
}

/// Base 10 with an optional sign. The text is kept as written.
fn classify_int(value: &str) -> Result<Operand, SyntaxError> {
    let digits = value.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(value);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(SyntaxError::InvalidInt(value.to_owned()));
    }
    Ok(Operand::Int(value.to_owned()))
}

fn classify_bool(value: &str) -> Result<Operand, SyntaxError> {
    match value {
        "true"  => Ok(Operand::Bool(true)),
        "false" => Ok(Operand::Bool(false)),
        _ => Err(SyntaxError::InvalidBool(value.to_owned())),
    }
}

fn classify_nil(value: &str) -> Result<Operand, SyntaxError> {
    match value {
        "nil" => Ok(Operand::Nil),
        _ => Err(SyntaxError::InvalidNil(value.to_owned())),
    }
}

fn classify_string(value: &str) -> Result<Operand, SyntaxError> {
    check_escapes(value)?;
    check_xml_chars(value)?;
    Ok(Operand::Str(value.to_owned()))
}

/// Rejects characters an XML 1.0 document cannot carry, even as references.
fn check_xml_chars(value: &str) -> Result<(), SyntaxError> {
    let bad = value.chars().find(|&c| {
        (c < '\u{20}' && !matches!(c, '\t' | '\n' | '\r')) || c == '\u{FFFE}' || c == '\u{FFFF}'
    });
    match bad {
        Some(ch) => Err(SyntaxError::InvalidChar { value: value.to_owned(), ch }),
        None => Ok(()),
    }
}

/// Letters, digits and `_ - $ & % * ! ?`, not starting with a digit.
fn check_name(name: &str, token: &str) -> Result<(), SyntaxError> {
    match name.chars().next() {
        None => return Err(SyntaxError::EmptyName(token.to_owned())),
        Some(c) if c.is_ascii_digit() => return Err(SyntaxError::NameStartsWithDigit(name.to_owned())),
        Some(_) => {}
    }

    match name.chars().find(|&c| !(c.is_alphabetic() || c.is_ascii_digit() || NAME_SYMBOLS.contains(&c))) {
        Some(ch) => Err(SyntaxError::InvalidNameChar { name: name.to_owned(), ch }),
        None => Ok(()),
    }
}

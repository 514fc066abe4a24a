//! This AST describes a translated IPPcode19 program.
//!
//! Every source line holds at most one instruction.
//! Comments start with a hash (#) and run to the end of the line.
//! The first line must be the `.IPPcode19` header.
//!
//! Operands come in four classes:
//!
//! ```text
//! var    GF@counter      # a variable in the global, local or temporary frame
//! symb   int@-5          # a variable or a constant (int, bool, string, nil)
//! label  loop_start      # a bare label name
//! type   string          # one of int, bool, string, nil
//! ```
//!
//! Example source file:
//!
//! ```text
//! .IPPcode19
//! DEFVAR GF@greeting                       # define a global variable
//! MOVE GF@greeting string@hello\032world   # escapes are \ plus three digits
//! WRITE GF@greeting
//! ```

use std::fmt;

use super::opcode::Opcode;

/// A variable frame.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Frame {
    GF,
    LF,
    TF,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::convert::TryFrom<&str> for Frame {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "GF" => Ok(Frame::GF),
            "LF" => Ok(Frame::LF),
            "TF" => Ok(Frame::TF),
            _ => Err(format!("`{}` is not a frame (expected GF, LF or TF)", value)),
        }
    }
}

/// The concrete kind of an operand, as written to the `type` attribute.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum OperandKind {
    Var,
    Int,
    Bool,
    String,
    Nil,
    Label,
    Type,
}

impl OperandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperandKind::Var    => "var",
            OperandKind::Int    => "int",
            OperandKind::Bool   => "bool",
            OperandKind::String => "string",
            OperandKind::Nil    => "nil",
            OperandKind::Label  => "label",
            OperandKind::Type   => "type",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "var"    => Some(OperandKind::Var),
            "int"    => Some(OperandKind::Int),
            "bool"   => Some(OperandKind::Bool),
            "string" => Some(OperandKind::String),
            "nil"    => Some(OperandKind::Nil),
            "label"  => Some(OperandKind::Label),
            "type"   => Some(OperandKind::Type),
            _ => None,
        }
    }
}

impl fmt::Display for OperandKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an opcode expects in a given operand position.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Expect {
    /// A variable or any constant, decided by the prefix before `@`.
    Symbol,
    Exactly(OperandKind),
}

pub const VAR:   Expect = Expect::Exactly(OperandKind::Var);
pub const LABEL: Expect = Expect::Exactly(OperandKind::Label);
pub const TYPE:  Expect = Expect::Exactly(OperandKind::Type);
pub const SYMB:  Expect = Expect::Symbol;

impl Expect {
    pub fn accepts(&self, kind: OperandKind) -> bool {
        match self {
            Expect::Symbol => matches!(
                kind,
                OperandKind::Var | OperandKind::Int | OperandKind::Bool | OperandKind::String | OperandKind::Nil
            ),
            Expect::Exactly(expected) => *expected == kind,
        }
    }
}

impl fmt::Display for Expect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expect::Symbol => f.write_str("symb"),
            Expect::Exactly(kind) => write!(f, "{}", kind),
        }
    }
}

/// The value of a `type` operand.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TypeName {
    Int,
    Bool,
    String,
    Nil,
}

impl TypeName {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeName::Int    => "int",
            TypeName::Bool   => "bool",
            TypeName::String => "string",
            TypeName::Nil    => "nil",
        }
    }
}

impl std::str::FromStr for TypeName {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int"    => Ok(TypeName::Int),
            "bool"   => Ok(TypeName::Bool),
            "string" => Ok(TypeName::String),
            "nil"    => Ok(TypeName::Nil),
            _ => Err(()),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Operand {
    Var(Frame, String),
    /// The literal exactly as written, sign included.
    Int(String),
    Bool(bool),
    /// Raw string content; escape sequences are validated, not decoded.
    Str(String),
    Nil,
    Label(String),
    Type(TypeName),
}

impl Operand {
    pub fn kind(&self) -> OperandKind {
        match self {
            Operand::Var(_, _) => OperandKind::Var,
            Operand::Int(_)    => OperandKind::Int,
            Operand::Bool(_)   => OperandKind::Bool,
            Operand::Str(_)    => OperandKind::String,
            Operand::Nil       => OperandKind::Nil,
            Operand::Label(_)  => OperandKind::Label,
            Operand::Type(_)   => OperandKind::Type,
        }
    }

    /// The operand text as it appears inside its XML element.
    pub fn value(&self) -> String {
        match self {
            Operand::Var(frame, name) => format!("{}@{}", frame, name),
            Operand::Int(text) | Operand::Str(text) | Operand::Label(text) => text.clone(),
            Operand::Bool(b) => b.to_string(),
            Operand::Nil     => "nil".to_owned(),
            Operand::Type(t) => t.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operand::Var(_, _) | Operand::Label(_) | Operand::Type(_) => f.write_str(&self.value()),
            _ => write!(f, "{}@{}", self.kind(), self.value()),
        }
    }
}

/// One validated instruction. Built once, never mutated.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Instruction {
    pub order: usize,
    pub opcode: Opcode,
    pub operands: Vec<Operand>,
}

impl Instruction {
    /// Operands paired with their 1-based position (`arg1`..`arg3`).
    pub fn args(&self) -> impl Iterator<Item = (usize, &Operand)> {
        self.operands.iter().enumerate().map(|(idx, op)| (idx + 1, op))
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.opcode)?;
        for op in &self.operands {
            write!(f, " {}", op)?;
        }
        Ok(())
    }
}

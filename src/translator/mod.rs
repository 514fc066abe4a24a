//! The Translator module is in charge of taking an
//! IPPcode19 source file and producing a Vec<Instruction>
//! from the AST submodule, along with the statistics
//! gathered on the way.
//!
//! It does this line by line: every line is stripped of
//! its comment, split on whitespace, dispatched on its
//! opcode and each operand classified against the
//! opcode's signature.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod opcode;
pub mod parser;
pub mod stats;

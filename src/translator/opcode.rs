//! The opcode table. Every opcode maps to a fixed operand signature.
use std::fmt;

use super::ast::{self, Expect};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Opcode {
    // Frames and calls
    CREATEFRAME,
    PUSHFRAME,
    POPFRAME,
    DEFVAR,
    CALL,
    RETURN,
    // Data stack
    PUSHS,
    POPS,
    // Arithmetic, relational, boolean and conversion
    MOVE,
    ADD,
    SUB,
    MUL,
    IDIV,
    LT,
    GT,
    EQ,
    AND,
    OR,
    NOT,
    INT2CHAR,
    STRI2INT,
    // I/O
    READ,
    WRITE,
    // Strings
    CONCAT,
    STRLEN,
    GETCHAR,
    SETCHAR,
    // Types
    TYPE,
    // Flow control
    LABEL,
    JUMP,
    JUMPIFEQ,
    JUMPIFNEQ,
    EXIT,
    // Debugging
    DPRINT,
    BREAK,
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Opcode {
    /// Looks up an opcode by name, ignoring case.
    pub fn from_name(name: &str) -> Option<Opcode> {
        use Opcode::*;
        match name.to_ascii_uppercase().as_str() {
            "CREATEFRAME" => Some(CREATEFRAME),
            "PUSHFRAME"   => Some(PUSHFRAME),
            "POPFRAME"    => Some(POPFRAME),
            "DEFVAR"      => Some(DEFVAR),
            "CALL"        => Some(CALL),
            "RETURN"      => Some(RETURN),
            "PUSHS"       => Some(PUSHS),
            "POPS"        => Some(POPS),
            "MOVE"        => Some(MOVE),
            "ADD"         => Some(ADD),
            "SUB"         => Some(SUB),
            "MUL"         => Some(MUL),
            "IDIV"        => Some(IDIV),
            "LT"          => Some(LT),
            "GT"          => Some(GT),
            "EQ"          => Some(EQ),
            "AND"         => Some(AND),
            "OR"          => Some(OR),
            "NOT"         => Some(NOT),
            "INT2CHAR"    => Some(INT2CHAR),
            "STRI2INT"    => Some(STRI2INT),
            "READ"        => Some(READ),
            "WRITE"       => Some(WRITE),
            "CONCAT"      => Some(CONCAT),
            "STRLEN"      => Some(STRLEN),
            "GETCHAR"     => Some(GETCHAR),
            "SETCHAR"     => Some(SETCHAR),
            "TYPE"        => Some(TYPE),
            "LABEL"       => Some(LABEL),
            "JUMP"        => Some(JUMP),
            "JUMPIFEQ"    => Some(JUMPIFEQ),
            "JUMPIFNEQ"   => Some(JUMPIFNEQ),
            "EXIT"        => Some(EXIT),
            "DPRINT"      => Some(DPRINT),
            "BREAK"       => Some(BREAK),
            _ => None,
        }
    }

    /// Returns the operand classes the opcode expects, in order.
    pub fn signature(&self) -> &'static [Expect] {
        use Opcode::*;
        match self {
            CREATEFRAME | PUSHFRAME | POPFRAME |
            RETURN      | BREAK                  => &[],

            DEFVAR | POPS                        => &[ast::VAR],

            CALL | LABEL | JUMP                  => &[ast::LABEL],

            PUSHS | WRITE | EXIT | DPRINT        => &[ast::SYMB],

            MOVE | INT2CHAR | STRLEN |
            TYPE | NOT                           => &[ast::VAR, ast::SYMB],

            READ                                 => &[ast::VAR, ast::TYPE],

            ADD | SUB | MUL | IDIV | LT | GT |
            EQ  | AND | OR  | STRI2INT | CONCAT |
            GETCHAR | SETCHAR                    => &[ast::VAR, ast::SYMB, ast::SYMB],

            JUMPIFEQ | JUMPIFNEQ                 => &[ast::LABEL, ast::SYMB, ast::SYMB],
        }
    }

    /// Counted by the `--jumps` statistic.
    pub fn is_jump(&self) -> bool {
        matches!(self, Opcode::JUMP | Opcode::JUMPIFEQ | Opcode::JUMPIFNEQ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translator::ast::{LABEL, SYMB, TYPE, VAR};

    const ALL: [Opcode; 35] = [
        Opcode::CREATEFRAME, Opcode::PUSHFRAME, Opcode::POPFRAME, Opcode::DEFVAR, Opcode::CALL,
        Opcode::RETURN, Opcode::PUSHS, Opcode::POPS, Opcode::MOVE, Opcode::ADD,
        Opcode::SUB, Opcode::MUL, Opcode::IDIV, Opcode::LT, Opcode::GT,
        Opcode::EQ, Opcode::AND, Opcode::OR, Opcode::NOT, Opcode::INT2CHAR,
        Opcode::STRI2INT, Opcode::READ, Opcode::WRITE, Opcode::CONCAT, Opcode::STRLEN,
        Opcode::GETCHAR, Opcode::SETCHAR, Opcode::TYPE, Opcode::LABEL, Opcode::JUMP,
        Opcode::JUMPIFEQ, Opcode::JUMPIFNEQ, Opcode::EXIT, Opcode::DPRINT, Opcode::BREAK,
    ];

    #[test]
    fn test_from_name() {
        for op in ALL.iter() {
            let name = op.to_string();
            assert_eq!(Opcode::from_name(&name), Some(*op));
            assert_eq!(Opcode::from_name(&name.to_lowercase()), Some(*op));
        }
        assert_eq!(Opcode::from_name("MoVe"), Some(Opcode::MOVE));
        assert_eq!(Opcode::from_name("int2char"), Some(Opcode::INT2CHAR));

        assert_eq!(Opcode::from_name("FOO"), None);
        assert_eq!(Opcode::from_name(""), None);
        assert_eq!(Opcode::from_name(" MOVE"), None);
        assert_eq!(Opcode::from_name("ADDS"), None);
    }

    #[test]
    fn test_signature() {
        assert!(Opcode::BREAK.signature().is_empty());
        assert_eq!(Opcode::DEFVAR.signature(), &[VAR]);
        assert_eq!(Opcode::CALL.signature(), &[LABEL]);
        assert_eq!(Opcode::WRITE.signature(), &[SYMB]);
        assert_eq!(Opcode::NOT.signature(), &[VAR, SYMB]);
        assert_eq!(Opcode::READ.signature(), &[VAR, TYPE]);
        assert_eq!(Opcode::CONCAT.signature(), &[VAR, SYMB, SYMB]);
        assert_eq!(Opcode::JUMPIFNEQ.signature(), &[LABEL, SYMB, SYMB]);

        for op in ALL.iter() {
            assert!(op.signature().len() <= 3);
        }
    }

    #[test]
    fn test_is_jump() {
        let jumps: Vec<Opcode> = ALL.iter().copied().filter(Opcode::is_jump).collect();
        assert_eq!(jumps, vec![Opcode::JUMP, Opcode::JUMPIFEQ, Opcode::JUMPIFNEQ]);
    }
}

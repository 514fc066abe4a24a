//! XML representation of a translated program.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <program language="IPPcode19">
//!     <instruction order="1" opcode="DEFVAR">
//!         <arg1 type="var">GF@x</arg1>
//!     </instruction>
//!     <instruction order="2" opcode="BREAK"/>
//! </program>
//! ```
use std::io::{self, Write};

use regex::Regex;
use thiserror::Error;

use crate::translator::ast::{Expect, Instruction, Operand, OperandKind};
use crate::translator::error::SyntaxError;
use crate::translator::lexer::classify;
use crate::translator::opcode::Opcode;

pub const LANGUAGE: &str = "IPPcode19";
const INDENT: &str = "    ";

/// Writes the whole document, one element per line.
pub fn write_program<W: Write>(out: &mut W, instructions: &[Instruction]) -> io::Result<()> {
    writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(out, r#"<program language="{}">"#, LANGUAGE)?;

    for ins in instructions {
        write!(out, r#"{}<instruction order="{}" opcode="{}""#, INDENT, ins.order, ins.opcode)?;
        if ins.operands.is_empty() {
            writeln!(out, "/>")?;
            continue;
        }
        writeln!(out, ">")?;
        for (pos, op) in ins.args() {
            writeln!(
                out,
                r#"{indent}{indent}<arg{pos} type="{kind}">{text}</arg{pos}>"#,
                indent = INDENT,
                pos = pos,
                kind = op.kind(),
                text = escape(&op.value()),
            )?;
        }
        writeln!(out, "{}</instruction>", INDENT)?;
    }

    writeln!(out, "</program>")?;
    out.flush()
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("missing <program language=\"{}\"> root element", LANGUAGE)]
    Root,

    #[error("instruction has an invalid order `{0}`")]
    Order(String),

    #[error("instruction {order}: unknown opcode `{opcode}`")]
    Opcode { order: usize, opcode: String },

    #[error("instruction {order}: arguments do not match the {opcode} signature")]
    Arguments { order: usize, opcode: Opcode },

    #[error("instruction {order}: unknown argument type `{kind}`")]
    Kind { order: usize, kind: String },

    #[error("instruction {order}: {reason}")]
    Operand { order: usize, reason: SyntaxError },
}

/// Reads a document produced by `write_program` back into instructions.
/// Every operand is validated again on the way in.
pub fn read_program(text: &str) -> Result<Vec<Instruction>, ReadError> {
    let root = Regex::new(r#"<program language="([^"]*)">"#)?;
    let instruction = Regex::new(
        r#"(?s)<instruction order="([^"]*)" opcode="([^"]*)"\s*(?:/>|>(.*?)</instruction>)"#,
    )?;
    let argument = Regex::new(r#"<arg([1-3]) type="([^"]*)">([^<]*)</arg([1-3])>"#)?;

    match root.captures(text) {
        Some(caps) if &caps[1] == LANGUAGE => {}
        _ => return Err(ReadError::Root),
    }

    let mut instructions = Vec::new();
    for caps in instruction.captures_iter(text) {
        let order: usize = caps[1].parse().map_err(|_| ReadError::Order(caps[1].to_owned()))?;
        let opcode = Opcode::from_name(&caps[2])
            .ok_or_else(|| ReadError::Opcode { order, opcode: caps[2].to_owned() })?;
        let signature = opcode.signature();
        let body = caps.get(3).map_or("", |m| m.as_str());

        let mut operands = Vec::with_capacity(signature.len());
        for (idx, arg) in argument.captures_iter(body).enumerate() {
            let pos = (idx + 1).to_string();
            if arg[1] != pos || arg[4] != pos || idx >= signature.len() {
                return Err(ReadError::Arguments { order, opcode });
            }
            let kind = OperandKind::from_name(&arg[2])
                .ok_or_else(|| ReadError::Kind { order, kind: arg[2].to_owned() })?;
            if !signature[idx].accepts(kind) {
                return Err(ReadError::Arguments { order, opcode });
            }
            let operand = read_operand(kind, &unescape(&arg[3]))
                .map_err(|reason| ReadError::Operand { order, reason })?;
            operands.push(operand);
        }

        if operands.len() != signature.len() {
            return Err(ReadError::Arguments { order, opcode });
        }
        instructions.push(Instruction { order, opcode, operands });
    }

    Ok(instructions)
}

fn read_operand(kind: OperandKind, text: &str) -> Result<Operand, SyntaxError> {
    match kind {
        OperandKind::Var | OperandKind::Label | OperandKind::Type => classify(text, Expect::Exactly(kind)),
        literal => classify(&format!("{}@{}", literal, text), Expect::Exactly(literal)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translator::ast::Frame;
    use crate::translator::parser::Parser;

    fn render(instructions: &[Instruction]) -> String {
        let mut out: Vec<u8> = Vec::new();
        write_program(&mut out, instructions).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_write_program() {
        let instructions = vec![
            Instruction {
                order: 1,
                opcode: Opcode::MOVE,
                operands: vec![Operand::Var(Frame::GF, "x".to_owned()), Operand::Str("a<b&\"c\"".to_owned())],
            },
            Instruction { order: 2, opcode: Opcode::BREAK, operands: vec![] },
        ];

        let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<program language="IPPcode19">
    <instruction order="1" opcode="MOVE">
        <arg1 type="var">GF@x</arg1>
        <arg2 type="string">a&lt;b&amp;&quot;c&quot;</arg2>
    </instruction>
    <instruction order="2" opcode="BREAK"/>
</program>
"#;
        assert_eq!(render(&instructions), expected);
    }

    #[test]
    fn test_write_empty_program() {
        assert_eq!(
            render(&[]),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<program language=\"IPPcode19\">\n</program>\n"
        );
    }

    #[test]
    fn test_round_trip() {
        let source = r#".IPPcode19
DEFVAR GF@x
DEFVAR LF@s&t
MOVE GF@x int@-5
MOVE LF@s&t string@<a>&b\032c@d
PUSHS bool@true
PUSHS nil@nil
READ TF@y nil
LABEL end
JUMPIFNEQ end GF@x string@
createframe
"#;
        let program = Parser::new().run(source.as_bytes()).unwrap();
        let reread = read_program(&render(&program.instructions)).unwrap();
        assert_eq!(reread, program.instructions);
    }

    #[test]
    fn test_read_rejects() {
        assert!(matches!(read_program("<program language=\"IPPcode18\">\n</program>"), Err(ReadError::Root)));
        assert!(matches!(read_program(""), Err(ReadError::Root)));

        let doc = |body: &str| format!("<program language=\"IPPcode19\">\n{}\n</program>\n", body);

        assert!(matches!(
            read_program(&doc(r#"<instruction order="1" opcode="FOO"/>"#)),
            Err(ReadError::Opcode { order: 1, .. })
        ));
        assert!(matches!(
            read_program(&doc(r#"<instruction order="x" opcode="BREAK"/>"#)),
            Err(ReadError::Order(_))
        ));
        assert!(matches!(
            read_program(&doc(r#"<instruction order="1" opcode="DEFVAR"/>"#)),
            Err(ReadError::Arguments { order: 1, .. })
        ));
        assert!(matches!(
            read_program(&doc(
                r#"<instruction order="1" opcode="DEFVAR"><arg1 type="int">5</arg1></instruction>"#
            )),
            Err(ReadError::Arguments { order: 1, .. })
        ));
        assert!(matches!(
            read_program(&doc(
                r#"<instruction order="1" opcode="DEFVAR"><arg2 type="var">GF@x</arg2></instruction>"#
            )),
            Err(ReadError::Arguments { order: 1, .. })
        ));
        assert!(matches!(
            read_program(&doc(
                r#"<instruction order="1" opcode="DEFVAR"><arg1 type="var">GF@1x</arg1></instruction>"#
            )),
            Err(ReadError::Operand { order: 1, .. })
        ));
        assert!(matches!(
            read_program(&doc(
                r#"<instruction order="1" opcode="WRITE"><arg1 type="float">1.0</arg1></instruction>"#
            )),
            Err(ReadError::Kind { order: 1, .. })
        ));
    }
}

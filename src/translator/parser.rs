//! The Parser module turns IPPcode19 lines into validated Instructions.
//!
//! Lines are handled independently: the opcode is looked up, the
//! operand count checked against its signature and each operand
//! classified. The first error ends the translation.
use std::io::BufRead;

use super::ast::Instruction;
use super::error::{Error, SyntaxError};
use super::lexer::{classify, has_comment, is_blank_or_comment_only, strip_comment, tokenize};
use super::opcode::Opcode;
use super::stats::{Statistics, StatisticsSnapshot};

pub const HEADER: &str = ".IPPcode19";

/// The result of a successful translation.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Program {
    pub instructions: Vec<Instruction>,
    pub stats: StatisticsSnapshot,
}

pub struct Parser {
    /// Order of the last emitted instruction.
    order: usize,
    /// 1-based number of the last line seen, header included.
    line: usize,
    stats: Statistics,
}

impl Parser {
    pub fn new() -> Self {
        Parser { order: 0, line: 0, stats: Statistics::new() }
    }

    /// Run the parser over every line of the input, consuming itself.
    pub fn run<R: BufRead>(mut self, mut reader: R) -> Result<Program, Error> {
        let mut buf = Vec::with_capacity(128);

        match read_line(&mut reader, &mut buf)? {
            Some(first) => self.header(&first)?,
            None => return Err(Error::Header { expected: HEADER }),
        }
        info!("Found {} header.", HEADER);

        let mut instructions = Vec::new();
        while let Some(line) = read_line(&mut reader, &mut buf)? {
            if let Some(ins) = self.line(&line)? {
                instructions.push(ins);
            }
        }

        let stats = self.stats();
        info!(
            "Translated {} instruction(s) from {} line(s), {} comment(s).",
            stats.instruction_count, self.line, stats.comment_count
        );
        Ok(Program { instructions, stats })
    }

    /// Checks the header line. A trailing comment is allowed.
    pub fn header(&mut self, text: &str) -> Result<(), Error> {
        self.line += 1;
        if has_comment(text) {
            self.stats.record_comment();
        }

        if strip_comment(text).trim() == HEADER {
            Ok(())
        } else {
            Err(Error::Header { expected: HEADER })
        }
    }

    /// Parses one source line. Blank and comment-only lines yield `None`
    /// and do not use up an order number.
    pub fn line(&mut self, text: &str) -> Result<Option<Instruction>, Error> {
        self.line += 1;
        if has_comment(text) {
            self.stats.record_comment();
        }
        if is_blank_or_comment_only(text) {
            return Ok(None);
        }

        let tokens = tokenize(strip_comment(text));
        let (name, args) = match tokens.split_first() {
            Some(split) => split,
            None => return Ok(None),
        };

        let opcode = match Opcode::from_name(name) {
            Some(op) => op,
            None => return Err(Error::UnknownOpcode { line: self.line, opcode: name.to_string() }),
        };

        let signature = opcode.signature();
        if args.len() < signature.len() {
            return Err(self.syntax(SyntaxError::TooFewOperands {
                opcode: opcode.to_string(),
                expected: signature.len(),
                found: args.len(),
            }));
        }
        if args.len() > signature.len() {
            return Err(self.syntax(SyntaxError::TooManyOperands {
                opcode: opcode.to_string(),
                expected: signature.len(),
                found: args.len(),
            }));
        }

        let operands = args
            .iter()
            .zip(signature)
            .map(|(token, expect)| classify(token, *expect))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|reason| self.syntax(reason))?;

        self.order += 1;
        let ins = Instruction { order: self.order, opcode, operands };
        self.stats.record_instruction(&ins);
        debug!("{:>4}: {}", ins.order, ins);

        Ok(Some(ins))
    }

    pub fn stats(&self) -> StatisticsSnapshot {
        self.stats.snapshot()
    }

    fn syntax(&self, reason: SyntaxError) -> Error {
        Error::Syntax { line: self.line, reason }
    }
}

/// Reads one line without its line ending. Bytes that are not valid
/// UTF-8 become U+FFFD, so they only matter inside an operand.
fn read_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> Result<Option<String>, Error> {
    buf.clear();
    let read = reader.read_until(b'\n', buf).map_err(|e| Error::Input(e.to_string()))?;
    if read == 0 {
        return Ok(None);
    }

    if buf.ends_with(b"\n") {
        buf.pop();
        if buf.ends_with(b"\r") {
            buf.pop();
        }
    }
    Ok(Some(String::from_utf8_lossy(buf).into_owned()))
}

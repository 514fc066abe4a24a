//! Statistics gathered while translating.
use std::collections::HashSet;
use std::fmt;
use std::io::{self, Write};

use super::ast::{Instruction, Operand};
use super::opcode::Opcode;

/// Running counters. Always updated; whether they are written
/// anywhere is up to the caller.
#[derive(Default, Debug)]
pub struct Statistics {
    instructions: usize,
    comments: usize,
    jumps: usize,
    labels: HashSet<String>,
}

#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct StatisticsSnapshot {
    pub instruction_count: usize,
    pub comment_count: usize,
    pub distinct_label_count: usize,
    pub jump_count: usize,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called once per source line that contains a `#`.
    pub fn record_comment(&mut self) {
        self.comments += 1;
    }

    /// Called once per emitted instruction.
    pub fn record_instruction(&mut self, ins: &Instruction) {
        self.instructions += 1;

        if ins.opcode.is_jump() {
            self.jumps += 1;
        }

        if ins.opcode == Opcode::LABEL {
            if let Some(Operand::Label(name)) = ins.operands.first() {
                self.labels.insert(name.clone());
            }
        }
    }

    pub fn snapshot(&self) -> StatisticsSnapshot {
        StatisticsSnapshot {
            instruction_count: self.instructions,
            comment_count: self.comments,
            distinct_label_count: self.labels.len(),
            jump_count: self.jumps,
        }
    }
}

/// A counter selectable for the statistics file.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Stat {
    Loc,
    Comments,
    Labels,
    Jumps,
}

impl Stat {
    pub fn flag(&self) -> &'static str {
        match self {
            Stat::Loc      => "loc",
            Stat::Comments => "comments",
            Stat::Labels   => "labels",
            Stat::Jumps    => "jumps",
        }
    }

    pub fn read(&self, snapshot: &StatisticsSnapshot) -> usize {
        match self {
            Stat::Loc      => snapshot.instruction_count,
            Stat::Comments => snapshot.comment_count,
            Stat::Labels   => snapshot.distinct_label_count,
            Stat::Jumps    => snapshot.jump_count,
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "--{}", self.flag())
    }
}

/// Writes one counter per line, in the order requested.
pub fn write_report<W: Write>(out: &mut W, snapshot: &StatisticsSnapshot, stats: &[Stat]) -> io::Result<()> {
    for stat in stats {
        writeln!(out, "{}", stat.read(snapshot))?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ins(opcode: Opcode, operands: Vec<Operand>) -> Instruction {
        Instruction { order: 1, opcode, operands }
    }

    #[test]
    fn test_labels_are_distinct() {
        let mut stats = Statistics::new();
        stats.record_instruction(&ins(Opcode::LABEL, vec![Operand::Label("L1".to_owned())]));
        stats.record_instruction(&ins(Opcode::LABEL, vec![Operand::Label("L1".to_owned())]));
        stats.record_instruction(&ins(Opcode::LABEL, vec![Operand::Label("l1".to_owned())]));

        let snap = stats.snapshot();
        assert_eq!(snap.distinct_label_count, 2);
        assert_eq!(snap.instruction_count, 3);
        assert_eq!(snap.jump_count, 0);
    }

    #[test]
    fn test_jumps_count_every_occurrence() {
        let mut stats = Statistics::new();
        stats.record_instruction(&ins(Opcode::JUMP, vec![Operand::Label("L1".to_owned())]));
        stats.record_instruction(&ins(Opcode::JUMP, vec![Operand::Label("L1".to_owned())]));
        stats.record_instruction(&ins(
            Opcode::JUMPIFEQ,
            vec![Operand::Label("L1".to_owned()), Operand::Nil, Operand::Nil],
        ));
        stats.record_instruction(&ins(Opcode::CALL, vec![Operand::Label("L1".to_owned())]));

        let snap = stats.snapshot();
        assert_eq!(snap.jump_count, 3);
        assert_eq!(snap.distinct_label_count, 0);
        assert_eq!(snap.instruction_count, 4);
    }

    #[test]
    fn test_comments() {
        let mut stats = Statistics::new();
        stats.record_comment();
        stats.record_comment();
        assert_eq!(stats.snapshot().comment_count, 2);
        assert_eq!(stats.snapshot().instruction_count, 0);
    }

    #[test]
    fn test_write_report() {
        let snap = StatisticsSnapshot {
            instruction_count: 7,
            comment_count: 2,
            distinct_label_count: 1,
            jump_count: 3,
        };

        let mut out: Vec<u8> = Vec::new();
        write_report(&mut out, &snap, &[Stat::Jumps, Stat::Loc, Stat::Comments, Stat::Labels]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "3\n7\n2\n1\n");

        let mut out: Vec<u8> = Vec::new();
        write_report(&mut out, &snap, &[]).unwrap();
        assert!(out.is_empty());
    }
}

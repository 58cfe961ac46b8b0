//! The stored program: a sorted line table and its executable flattening.
//!
//! Lines live in a vector sorted by line number; inserting an existing
//! number replaces the old statement. Successor linkage is recomputed
//! rather than stored: flattening walks the lines in order, splicing
//! compound members inline, so "the next statement" is simply the next
//! slot. Jump targets resolve through a line → slot map.

use basic_ir::{DataValue, Statement};
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// One stored line.
#[derive(Clone, Debug)]
pub struct ProgramLine {
    pub number: u32,
    pub stmt: Statement,
}

/// One executable slot of the flattened program.
#[derive(Clone, Debug)]
pub struct Slot {
    /// The line number this slot belongs to (compound members share it).
    pub line: u32,
    pub stmt: Rc<Statement>,
}

/// The program store.
#[derive(Default)]
pub struct Program {
    lines: Vec<ProgramLine>,
    slots: Vec<Slot>,
    line_slots: FxHashMap<u32, usize>,
}

/// Flatten a statement into execution order: compound members in
/// sequence, everything else as a single unit.
pub fn flatten(stmt: &Statement, out: &mut Vec<Rc<Statement>>) {
    match stmt {
        Statement::Compound { statements, .. } => {
            for sub in statements {
                flatten(sub, out);
            }
        }
        _ => out.push(Rc::new(stmt.clone())),
    }
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[ProgramLine] {
        &self.lines
    }

    /// Insert or replace the statement stored under `number`, keeping the
    /// table sorted, then re-link.
    pub fn insert(&mut self, number: u32, stmt: Statement) {
        match self.lines.binary_search_by_key(&number, |l| l.number) {
            Ok(index) => self.lines[index].stmt = stmt,
            Err(index) => self.lines.insert(index, ProgramLine { number, stmt }),
        }
        self.relink();
    }

    /// Drop every line (`NEW`).
    pub fn clear(&mut self) {
        self.lines.clear();
        self.relink();
    }

    /// Recompute the flattened slot list and the line → slot map.
    pub fn relink(&mut self) {
        self.slots.clear();
        self.line_slots.clear();
        for line in &self.lines {
            let first_slot = self.slots.len();
            let mut flat = Vec::new();
            flatten(&line.stmt, &mut flat);
            // A bare line number still occupies a slot so GOTO can land on it.
            if flat.is_empty() {
                flat.push(Rc::new(line.stmt.clone()));
            }
            for stmt in flat {
                self.slots.push(Slot {
                    line: line.number,
                    stmt,
                });
            }
            self.line_slots.insert(line.number, first_slot);
        }
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// The first slot of the given line number.
    pub fn line_slot(&self, number: u32) -> Option<usize> {
        self.line_slots.get(&number).copied()
    }

    /// The canonical rendering of one stored line.
    fn render_line(line: &ProgramLine) -> String {
        format!("{} {}", line.number, line.stmt)
            .trim_end()
            .to_string()
    }

    /// Render every line, newline-separated (`SAVE`).
    pub fn render(&self) -> String {
        self.lines
            .iter()
            .map(Self::render_line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render the lines whose numbers fall in `start..=end` (`LIST`).
    pub fn render_range(&self, start: u32, end: u32) -> String {
        self.lines
            .iter()
            .filter(|l| l.number >= start && l.number <= end)
            .map(Self::render_line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Collect every DATA literal in program order (the RUN-time pool).
    pub fn data_values(&self) -> Vec<DataValue> {
        let mut values = Vec::new();
        for slot in &self.slots {
            if let Statement::Data { values: v, .. } = slot.stmt.as_ref() {
                values.extend(v.iter().cloned());
            }
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basic_parse::parse_line;
    use pretty_assertions::assert_eq;

    fn insert(program: &mut Program, source: &str) {
        let line = match parse_line(source) {
            Ok(line) => line,
            Err(errors) => panic!("parse of {source:?} failed: {errors:?}"),
        };
        let number = match line.number {
            Some(n) => n,
            None => panic!("{source:?} has no line number"),
        };
        program.insert(number, line.stmt);
    }

    #[test]
    fn lines_stay_sorted_and_unique() {
        let mut program = Program::new();
        insert(&mut program, "30 PRINT 3");
        insert(&mut program, "10 PRINT 1");
        insert(&mut program, "20 PRINT 2");
        insert(&mut program, "10 PRINT 99");
        let numbers: Vec<u32> = program.lines().iter().map(|l| l.number).collect();
        assert_eq!(numbers, vec![10, 20, 30]);
        assert_eq!(program.render_range(10, 10), "10 PRINT 99");
    }

    #[test]
    fn compound_lines_flatten_into_consecutive_slots() {
        let mut program = Program::new();
        insert(&mut program, "10 LET A = 1 : LET B = 2");
        insert(&mut program, "20 PRINT A");
        assert_eq!(program.slot_count(), 3);
        assert_eq!(program.line_slot(10), Some(0));
        assert_eq!(program.line_slot(20), Some(2));
        // Compound members share their line number.
        assert_eq!(program.slot(1).map(|s| s.line), Some(10));
    }

    #[test]
    fn traversal_visits_non_decreasing_line_numbers() {
        let mut program = Program::new();
        insert(&mut program, "20 PRINT 2 : PRINT 22");
        insert(&mut program, "10 PRINT 1");
        insert(&mut program, "30 END");
        let mut last = 0;
        for index in 0..program.slot_count() {
            let line = program.slot(index).map(|s| s.line).unwrap_or(0);
            assert!(line >= last);
            last = line;
        }
    }

    #[test]
    fn render_is_the_canonical_listing() {
        let mut program = Program::new();
        insert(&mut program, "10 LET A = 1 : PRINT A");
        insert(&mut program, "20 IF A THEN 10");
        assert_eq!(program.render(), "10 LET A = 1 : PRINT A\n20 IF A THEN 10");
    }

    #[test]
    fn data_pool_collects_in_program_order() {
        let mut program = Program::new();
        insert(&mut program, "30 DATA 3");
        insert(&mut program, "10 DATA 1, 2");
        insert(&mut program, "20 PRINT : DATA \"X\"");
        assert_eq!(
            program.data_values(),
            vec![
                DataValue::Int(1),
                DataValue::Int(2),
                DataValue::Str("X".to_string()),
                DataValue::Int(3),
            ]
        );
    }

    #[test]
    fn bare_numbered_line_still_has_a_slot() {
        let mut program = Program::new();
        insert(&mut program, "10");
        assert_eq!(program.slot_count(), 1);
        assert_eq!(program.line_slot(10), Some(0));
    }
}

//! Sparse decision arena.
//!
//! One boolean decision per eligible `(shift, employee)` pair. Ineligible
//! pairs have no entry and are implicitly false.

use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DecisionId(u32);

impl DecisionId {
    #[inline]
    pub fn new(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize, "decision index overflows u32");
        Self(index as u32)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DecisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decision {
    pub shift: usize,
    pub employee: usize,
}

#[derive(Debug, Clone, Default)]
pub struct DecisionArena {
    decisions: Vec<Decision>,
    by_pair: HashMap<(usize, usize), DecisionId>,
    by_shift: Vec<Vec<DecisionId>>,
    by_employee: Vec<Vec<DecisionId>>,
}

impl DecisionArena {
    pub fn new(num_shifts: usize, num_employees: usize) -> Self {
        Self {
            decisions: Vec::new(),
            by_pair: HashMap::new(),
            by_shift: vec![Vec::new(); num_shifts],
            by_employee: vec![Vec::new(); num_employees],
        }
    }

    /// Adds the decision for `(shift, employee)`, returning the existing id
    /// if it is already present.
    pub fn insert(&mut self, shift: usize, employee: usize) -> DecisionId {
        if let Some(id) = self.by_pair.get(&(shift, employee)) {
            return *id;
        }
        let id = DecisionId::new(self.decisions.len());
        self.decisions.push(Decision { shift, employee });
        self.by_pair.insert((shift, employee), id);
        self.by_shift[shift].push(id);
        self.by_employee[employee].push(id);
        id
    }

    #[inline]
    pub fn get(&self, shift: usize, employee: usize) -> Option<DecisionId> {
        self.by_pair.get(&(shift, employee)).copied()
    }

    #[inline]
    pub fn decision(&self, id: DecisionId) -> Decision {
        self.decisions[id.get()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }

    pub fn for_shift(&self, shift: usize) -> &[DecisionId] {
        &self.by_shift[shift]
    }

    pub fn for_employee(&self, employee: usize) -> &[DecisionId] {
        &self.by_employee[employee]
    }

    pub fn iter(&self) -> impl Iterator<Item = (DecisionId, Decision)> + '_ {
        self.decisions
            .iter()
            .enumerate()
            .map(|(i, d)| (DecisionId::new(i), *d))
    }
}

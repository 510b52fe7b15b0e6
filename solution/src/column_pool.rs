use im::Vector;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::{Column, ColumnOrigin, Solution};

/// The columns a tree node works with.
///
/// Child nodes start from a filtered copy of their parent's pool; `im::Vector`
/// shares the structure, so these copies stay cheap.
#[derive(Clone, Default)]
pub struct ColumnPool {
    columns: Vector<Arc<Column>>,
}

impl ColumnPool {
    pub fn new() -> ColumnPool {
        ColumnPool {
            columns: Vector::new(),
        }
    }

    pub fn push(&mut self, column: Arc<Column>) {
        self.columns.push_back(column);
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&Arc<Column>> {
        self.columns.get(i)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Column>> + '_ {
        self.columns.iter()
    }

    /// columns in pool order, as handed to the master.
    pub fn to_vec(&self) -> Vec<Arc<Column>> {
        self.columns.iter().cloned().collect()
    }

    pub fn contains_solution(&self, solution: &Solution) -> bool {
        self.columns
            .iter()
            .any(|c| c.solution().map(|s| s == solution).unwrap_or(false))
    }

    /// a new pool with the columns satisfying `keep`.
    pub fn filtered(&self, mut keep: impl FnMut(&Column) -> bool) -> ColumnPool {
        ColumnPool {
            columns: self.columns.iter().filter(|c| keep(c)).cloned().collect(),
        }
    }
}

/// Every column generated during the whole run, across all nodes.
#[derive(Default)]
pub struct GlobalColumnPool {
    columns: Vec<Arc<Column>>,
}

impl GlobalColumnPool {
    pub fn new() -> GlobalColumnPool {
        GlobalColumnPool {
            columns: Vec::new(),
        }
    }

    pub fn push(&mut self, column: Arc<Column>) {
        self.columns.push(column);
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Column>> + '_ {
        self.columns.iter()
    }

    pub fn count_by_origin(&self) -> BTreeMap<ColumnOrigin, usize> {
        let mut counts = BTreeMap::new();
        for column in self.columns.iter() {
            *counts.entry(column.origin()).or_insert(0) += 1;
        }
        counts
    }
}

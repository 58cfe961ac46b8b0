//! Fixed-shape multi-dimensional arrays.
//!
//! `DIM A(10)` allocates 11 cells (indices 0..=10). The backing store is
//! flat and row-major: the last dimension varies fastest, so the flat
//! index of `(i1, i2, i3)` in shape `(d1, d2, d3)` is
//! `((i1 * d2) + i2) * d3 + i3`.

use crate::value::Value;
use basic_ir::ValueType;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;

/// Dimension and index vectors; almost all arrays are rank 1 or 2.
pub type Dims = SmallVec<[usize; 4]>;

/// Shared handle to one array's storage.
///
/// Scope lookups clone the handle, not the cells, so `LET A(1) = 2` after
/// `READ A(0)` mutates the one array every reference sees. The
/// interpreter is single-threaded, hence `Rc<RefCell<…>>`.
pub type ArrayRef = Rc<RefCell<ArrayValue>>;

/// One array: element type, shape, flat backing store.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayValue {
    elem: ValueType,
    dims: Dims,
    cells: Vec<Value>,
}

impl ArrayValue {
    /// Allocate with every cell set to the element type's zero.
    ///
    /// `dims` holds the actual sizes (declared bound + 1 per dimension).
    pub fn new(elem: ValueType, dims: Dims) -> Self {
        let total = dims.iter().product::<usize>();
        ArrayValue {
            elem,
            dims,
            cells: vec![Value::zero(elem); total],
        }
    }

    /// Wrap into the shared handle form stored in scopes.
    pub fn into_ref(self) -> ArrayRef {
        Rc::new(RefCell::new(self))
    }

    pub fn elem_type(&self) -> ValueType {
        self.elem
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Row-major flat index, `None` when the rank does not match or any
    /// index is outside `0..dim`.
    fn flat_index(&self, indices: &[i64]) -> Option<usize> {
        if indices.len() != self.dims.len() {
            return None;
        }
        let mut flat = 0usize;
        for (&index, &dim) in indices.iter().zip(self.dims.iter()) {
            if index < 0 || (index as usize) >= dim {
                return None;
            }
            flat = flat * dim + index as usize;
        }
        Some(flat)
    }

    /// Read one cell; `None` on a bad subscript.
    pub fn get(&self, indices: &[i64]) -> Option<Value> {
        let flat = self.flat_index(indices)?;
        self.cells.get(flat).cloned()
    }

    /// Write one cell; `false` on a bad subscript. The value must already
    /// be coerced to the element type.
    pub fn set(&mut self, indices: &[i64], value: Value) -> bool {
        match self.flat_index(indices) {
            Some(flat) => {
                self.cells[flat] = value;
                true
            }
            None => false,
        }
    }
}

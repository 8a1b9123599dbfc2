use std::collections::HashMap;

use crate::models::ItemId;

/// Shape errors when assembling a similarity matrix
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MatrixShapeError {
    #[error("row {row} has {len} values, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("matrix has {rows} rows for {items} items")]
    RowCount { rows: usize, items: usize },
}

/// Dense, precomputed item-item similarity matrix
///
/// Undefined similarities are `None`. Row and column `k` both refer to
/// `items[k]`.
#[derive(Debug, Clone)]
pub struct FullSimilarityMatrix {
    items: Vec<ItemId>,
    values: Vec<Option<f64>>,
}

impl FullSimilarityMatrix {
    pub fn new(items: Vec<ItemId>, rows: Vec<Vec<Option<f64>>>) -> Result<Self, MatrixShapeError> {
        let n = items.len();
        if rows.len() != n {
            return Err(MatrixShapeError::RowCount {
                rows: rows.len(),
                items: n,
            });
        }

        let mut values = Vec::with_capacity(n * n);
        for (row, cells) in rows.into_iter().enumerate() {
            if cells.len() != n {
                return Err(MatrixShapeError::RaggedRow {
                    row,
                    len: cells.len(),
                    expected: n,
                });
            }
            values.extend(cells.into_iter().map(|v| v.filter(|x| x.is_finite())));
        }

        Ok(Self { items, values })
    }

    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn row(&self, row: usize) -> &[Option<f64>] {
        let n = self.items.len();
        &self.values[row * n..(row + 1) * n]
    }

    /// Keeps, in every row, the entries at or above the row's `k`-th largest
    /// defined value
    ///
    /// Rows with at most `k` defined entries keep all of them. Entries tied
    /// with the threshold are all kept, so a row may retain more than `k`.
    pub fn truncate(&self, k: usize) -> TruncatedSimilarityMatrix {
        let rows = (0..self.len())
            .map(|row| truncate_row(self.row(row), k))
            .collect();

        TruncatedSimilarityMatrix::from_rows(self.items.clone(), rows)
    }
}

fn truncate_row(cells: &[Option<f64>], k: usize) -> Vec<Neighbor> {
    let defined = cells
        .iter()
        .enumerate()
        .filter_map(|(column, &v)| v.map(|similarity| Neighbor { column, similarity }));

    if k == 0 {
        return Vec::new();
    }

    let mut values: Vec<f64> = cells.iter().flatten().copied().collect();
    if values.len() <= k {
        return defined.collect();
    }

    let (_, kth, _) = values.select_nth_unstable_by(k - 1, |a, b| b.total_cmp(a));
    let threshold = *kth;

    defined.filter(|n| n.similarity >= threshold).collect()
}

/// A retained entry of a truncated row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub column: usize,
    pub similarity: f64,
}

/// Sparse, row-truncated similarity matrix
///
/// Not symmetric: `j` retained in row `i` says nothing about `i` in row `j`.
#[derive(Debug, Clone, Default)]
pub struct TruncatedSimilarityMatrix {
    items: Vec<ItemId>,
    positions: HashMap<ItemId, usize>,
    rows: Vec<Vec<Neighbor>>,
}

impl TruncatedSimilarityMatrix {
    /// Builds a matrix from already-truncated rows; each row must be ordered
    /// by column
    pub fn from_rows(items: Vec<ItemId>, rows: Vec<Vec<Neighbor>>) -> Self {
        let positions = items
            .iter()
            .enumerate()
            .map(|(pos, id)| (*id, pos))
            .collect();

        Self {
            items,
            positions,
            rows,
        }
    }

    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn position(&self, item_id: ItemId) -> Option<usize> {
        self.positions.get(&item_id).copied()
    }

    pub fn contains(&self, item_id: ItemId) -> bool {
        self.positions.contains_key(&item_id)
    }

    pub fn neighbors(&self, row: usize) -> &[Neighbor] {
        &self.rows[row]
    }

    /// Retained similarity from `from` to `to`, if any
    pub fn similarity(&self, from: ItemId, to: ItemId) -> Option<f64> {
        let row = self.position(from)?;
        let column = self.position(to)?;
        let neighbors = &self.rows[row];
        neighbors
            .binary_search_by_key(&column, |n| n.column)
            .ok()
            .map(|idx| neighbors[idx].similarity)
    }

    /// Total number of retained entries
    pub fn retained(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }
}

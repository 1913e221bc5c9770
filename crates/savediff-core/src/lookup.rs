//! Single-capture lookups.
//!
//! Used when only one snapshot is at hand, or to confirm known offsets
//! across two saves.

use memchr::memmem;
use serde::Serialize;
use tracing::debug;

use crate::numeric::{Dtype, DtypeSelector};

/// One occurrence of a value in a blob
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValueHit {
    pub offset: usize,
    pub dtype: Dtype,
}

/// Find every offset where `value` is stored under the selected dtypes.
///
/// Occurrences may overlap. Dtypes that cannot represent `value` are
/// skipped. Hits are ordered by offset, then dtype label.
pub fn find_value(blob: &[u8], value: i64, dtype: DtypeSelector) -> Vec<ValueHit> {
    let dtypes = match dtype {
        DtypeSelector::Auto => Dtype::ALL.to_vec(),
        DtypeSelector::Only(dt) => vec![dt],
    };

    let mut hits = Vec::new();
    for dtype in dtypes {
        let Ok(pattern) = dtype.encode(value) else {
            continue;
        };
        let finder = memmem::Finder::new(&pattern);
        let before = hits.len();

        let mut search_from = 0;
        while let Some(rel) = blob.get(search_from..).and_then(|rest| finder.find(rest)) {
            let offset = search_from + rel;
            hits.push(ValueHit { offset, dtype });
            search_from = offset + 1;
        }

        debug!("{} {}: {} hit(s)", dtype, value, hits.len() - before);
    }

    hits.sort_by(|x, y| {
        x.offset
            .cmp(&y.offset)
            .then(x.dtype.label().cmp(y.dtype.label()))
    });
    hits
}

/// Field value at one offset in two blobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValueComparison {
    pub offset: usize,
    /// `None` when the field runs past the end of A
    pub a: Option<i64>,
    /// `None` when the field runs past the end of B
    pub b: Option<i64>,
}

impl ValueComparison {
    pub fn in_bounds(&self) -> bool {
        self.a.is_some() && self.b.is_some()
    }

    pub fn is_same(&self) -> bool {
        self.in_bounds() && self.a == self.b
    }
}

/// Decode `dtype` at each offset in both blobs, in the given order.
pub fn compare_values(a: &[u8], b: &[u8], offsets: &[usize], dtype: Dtype) -> Vec<ValueComparison> {
    offsets
        .iter()
        .map(|&offset| ValueComparison {
            offset,
            a: dtype.decode(a, offset),
            b: dtype.decode(b, offset),
        })
        .collect()
}

use crate::foundation::error::{ChoreoError, ChoreoResult};

/// One step of an edit script between two symbol sequences.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum EditOp {
    /// `from[from]` becomes `to[to]`.
    Match {
        /// Index into the source sequence.
        from: usize,
        /// Index into the destination sequence.
        to: usize,
    },
    /// `from[from]` has no counterpart.
    Delete {
        /// Index into the source sequence.
        from: usize,
    },
    /// `to[to]` is new.
    Insert {
        /// Index into the destination sequence.
        to: usize,
    },
}

/// Longest-common-subsequence edit script from `from` to `to`.
///
/// Symbols are compared by name in their original order. Where two alignments keep the
/// same number of matches, the walk takes the `Delete` before the `Insert`. With `reverse`
/// the diff runs over both sequences back to front, which aligns trailing runs first;
/// indices in the result always refer to the original sequences and ops are returned in
/// forward order.
pub fn compute_transform<S: AsRef<str>>(
    from: &[S],
    to: &[S],
    reverse: bool,
) -> ChoreoResult<Vec<EditOp>> {
    let a = names(from, "source")?;
    let b = names(to, "destination")?;
    if !reverse {
        return Ok(lcs_script(&a, &b));
    }

    let ra: Vec<&str> = a.iter().rev().copied().collect();
    let rb: Vec<&str> = b.iter().rev().copied().collect();
    let (n, m) = (a.len(), b.len());
    let mut ops: Vec<EditOp> = lcs_script(&ra, &rb)
        .into_iter()
        .map(|op| match op {
            EditOp::Match { from, to } => EditOp::Match {
                from: n - 1 - from,
                to: m - 1 - to,
            },
            EditOp::Delete { from } => EditOp::Delete { from: n - 1 - from },
            EditOp::Insert { to } => EditOp::Insert { to: m - 1 - to },
        })
        .collect();
    ops.reverse();
    Ok(ops)
}

fn names<'a, S: AsRef<str>>(seq: &'a [S], side: &str) -> ChoreoResult<Vec<&'a str>> {
    seq.iter()
        .enumerate()
        .map(|(i, s)| {
            let s = s.as_ref();
            if s.trim().is_empty() {
                Err(ChoreoError::malformed_diff(format!(
                    "{side} symbol {i} has an empty name"
                )))
            } else {
                Ok(s)
            }
        })
        .collect()
}

fn lcs_script(a: &[&str], b: &[&str]) -> Vec<EditOp> {
    let (n, m) = (a.len(), b.len());
    // suffix[i][j] = LCS length of a[i..] and b[j..]
    let mut suffix = vec![vec![0u32; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            suffix[i][j] = if a[i] == b[j] {
                suffix[i + 1][j + 1] + 1
            } else {
                suffix[i + 1][j].max(suffix[i][j + 1])
            };
        }
    }

    let mut ops = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if a[i] == b[j] {
            ops.push(EditOp::Match { from: i, to: j });
            i += 1;
            j += 1;
        } else if suffix[i + 1][j] >= suffix[i][j + 1] {
            ops.push(EditOp::Delete { from: i });
            i += 1;
        } else {
            ops.push(EditOp::Insert { to: j });
            j += 1;
        }
    }
    ops.extend((i..n).map(|from| EditOp::Delete { from }));
    ops.extend((j..m).map(|to| EditOp::Insert { to }));
    ops
}

#[cfg(test)]
#[path = "../../tests/unit/diff/symbols.rs"]
mod tests;

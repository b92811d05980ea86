//! Column normalization and equi-join
//!
//! The one algorithmic contract of this tool: normalize the join-key column
//! of two tables, then hash-join them on it. Strict mode requires the key on
//! both sides and inner-joins; lenient mode synthesizes an all-null key column
//! where missing and outer-joins. Null keys never match anything, including
//! other nulls. Output row order is deterministic: left input order, matches
//! in right input order, then (outer only) unmatched right rows in input order.

pub mod policy;

pub use policy::{JoinMode, KeyRename, MergePolicy};

use std::collections::HashMap;

use crate::error::{Result, key_column_missing};
use crate::table::{Table, Value};

/// Normalize both tables and equi-join them on `join_key` under `policy`.
pub fn merge(
    mut left: Table,
    mut right: Table,
    join_key: &str,
    policy: &MergePolicy,
) -> Result<Table> {
    normalize(&mut left, policy);
    normalize(&mut right, policy);

    let left_key = resolve_key(&mut left, join_key, policy.mode, "left dataset")?;
    let right_key = resolve_key(&mut right, join_key, policy.mode, "right dataset")?;

    Ok(join(&left, &right, left_key, right_key, policy.mode))
}

/// Trim column names, then fold alternate key spellings into the canonical
/// name. A rename is skipped when the canonical name is already taken.
fn normalize(table: &mut Table, policy: &MergePolicy) {
    table.trim_column_names();
    for rename in &policy.key_renames {
        if table.column_index(&rename.to).is_none() {
            table.rename_column(&rename.from, &rename.to);
        }
    }
}

/// Locate the join-key column, or decide what a missing one means.
fn resolve_key(table: &mut Table, join_key: &str, mode: JoinMode, dataset: &str) -> Result<usize> {
    match table.column_index(join_key) {
        Some(idx) => Ok(idx),
        None => match mode {
            JoinMode::Strict => Err(key_column_missing(join_key, dataset)),
            JoinMode::Lenient => Ok(table.push_null_column(join_key)),
        },
    }
}

fn join(left: &Table, right: &Table, left_key: usize, right_key: usize, mode: JoinMode) -> Table {
    // Output header: left columns, then right columns minus the key. Right
    // names that collide with a left name get a "_y" suffix instead of
    // silently overwriting.
    let mut columns: Vec<String> = left.columns().to_vec();
    let right_cols: Vec<(usize, String)> = right
        .columns()
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != right_key)
        .map(|(idx, name)| {
            let name = if left.columns().iter().any(|c| c == name) {
                format!("{name}_y")
            } else {
                name.clone()
            };
            (idx, name)
        })
        .collect();
    columns.extend(right_cols.iter().map(|(_, name)| name.clone()));
    let mut merged = Table::new(columns);

    // Hash the right side by key value; null keys never participate.
    let mut by_key: HashMap<&str, Vec<usize>> = HashMap::new();
    for (idx, row) in right.rows().iter().enumerate() {
        if let Some(key) = row[right_key].as_deref() {
            by_key.entry(key).or_default().push(idx);
        }
    }

    let mut right_matched = vec![false; right.len()];

    for left_row in left.rows() {
        let matches = left_row[left_key].as_deref().and_then(|k| by_key.get(k));
        match matches {
            Some(indices) => {
                // Duplicate keys yield the cross product of matching rows.
                for &idx in indices {
                    right_matched[idx] = true;
                    let mut row = left_row.clone();
                    row.extend(
                        right_cols
                            .iter()
                            .map(|(src, _)| right.rows()[idx][*src].clone()),
                    );
                    merged.push_row(row);
                }
            }
            None if mode == JoinMode::Lenient => {
                let mut row = left_row.clone();
                row.extend(right_cols.iter().map(|_| None));
                merged.push_row(row);
            }
            None => {}
        }
    }

    if mode == JoinMode::Lenient {
        let left_width = left.columns().len();
        for (idx, right_row) in right.rows().iter().enumerate() {
            if right_matched[idx] {
                continue;
            }
            // The key lands in the left section's key slot so the output has
            // a single coalesced key column.
            let mut row: Vec<Value> = vec![None; left_width];
            row[left_key] = right_row[right_key].clone();
            row.extend(right_cols.iter().map(|(src, _)| right_row[*src].clone()));
            merged.push_row(row);
        }
    }

    merged
}

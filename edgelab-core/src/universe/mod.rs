//! CrossSectionalUniverse: row-wise transforms over a bar-aligned asset matrix.
//!
//! A matrix is `Vec<Vec<f64>>` with one row per bar and one column per asset.
//! Every transform works on each row independently and preserves the shape.

use thiserror::Error;

use crate::domain::series::{mean, population_std};
use crate::domain::{Bar, BarSeries, EPSILON};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UniverseError {
    #[error("row {row} has {found} columns, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("top/bottom {n} overlap in a row of {columns} assets")]
    TopNTooLarge { n: usize, columns: usize },
    #[error("no assets supplied")]
    NoAssets,
    #[error("asset {asset} has {found} bars, expected {expected}")]
    UnalignedAsset {
        asset: usize,
        expected: usize,
        found: usize,
    },
    #[error("matrix shapes differ: {left_rows}x{left_cols} vs {right_rows}x{right_cols}")]
    ShapeMismatch {
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },
}

/// Number of columns, or an error if rows disagree.
pub fn check_rectangular(matrix: &[Vec<f64>]) -> Result<usize, UniverseError> {
    let expected = matrix.first().map_or(0, Vec::len);
    for (row, values) in matrix.iter().enumerate() {
        if values.len() != expected {
            return Err(UniverseError::Ragged {
                row,
                expected,
                found: values.len(),
            });
        }
    }
    Ok(expected)
}

fn map_rows(
    matrix: &[Vec<f64>],
    f: impl Fn(&[f64]) -> Vec<f64>,
) -> Result<Vec<Vec<f64>>, UniverseError> {
    check_rectangular(matrix)?;
    Ok(matrix.iter().map(|row| f(row)).collect())
}

/// Stable ascending argsort: ties keep column order.
fn argsort(row: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..row.len()).collect();
    order.sort_by(|&a, &b| row[a].total_cmp(&row[b]));
    order
}

/// 0-indexed ascending rank within each row (double argsort).
pub fn cross_rank(matrix: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, UniverseError> {
    map_rows(matrix, |row| {
        let mut ranks = vec![0.0; row.len()];
        for (rank, col) in argsort(row).into_iter().enumerate() {
            ranks[col] = rank as f64;
        }
        ranks
    })
}

/// `(x - row_mean) / (row_std + eps)`, population std.
pub fn cross_zscore(matrix: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, UniverseError> {
    map_rows(matrix, |row| {
        let m = mean(row);
        let s = population_std(row) + EPSILON;
        row.iter().map(|x| (x - m) / s).collect()
    })
}

/// Signed value over the row's absolute sum, floored at eps.
pub fn cross_weight(matrix: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, UniverseError> {
    map_rows(matrix, |row| {
        let gross = row.iter().map(|x| x.abs()).sum::<f64>().max(EPSILON);
        row.iter().map(|x| x / gross).collect()
    })
}

/// +1/n on the n highest scores, -1/n on the n lowest, 0 elsewhere.
pub fn top_n(matrix: &[Vec<f64>], n: usize) -> Result<Vec<Vec<f64>>, UniverseError> {
    let columns = check_rectangular(matrix)?;
    if !matrix.is_empty() && 2 * n > columns {
        return Err(UniverseError::TopNTooLarge { n, columns });
    }
    let w = 1.0 / n.max(1) as f64;
    Ok(matrix
        .iter()
        .map(|row| {
            let order = argsort(row);
            let mut weights = vec![0.0; row.len()];
            for &col in &order[..n] {
                weights[col] = -w;
            }
            for &col in &order[row.len() - n..] {
                weights[col] = w;
            }
            weights
        })
        .collect())
}

/// Clip negatives to 0 and renormalize each row to sum to 1. Rows with no
/// positive entry become all zeros.
pub fn long_only(matrix: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, UniverseError> {
    map_rows(matrix, |row| {
        let clipped: Vec<f64> = row.iter().map(|x| x.max(0.0)).collect();
        let total: f64 = clipped.iter().sum();
        if total <= 0.0 {
            vec![0.0; row.len()]
        } else {
            clipped.iter().map(|x| x / total).collect()
        }
    })
}

/// Truncate every asset to the shortest history, aligned from the start.
pub fn align_dates(assets: &[BarSeries]) -> Result<Vec<BarSeries>, UniverseError> {
    let len = assets
        .iter()
        .map(BarSeries::len)
        .min()
        .ok_or(UniverseError::NoAssets)?;
    Ok(assets.iter().map(|s| s.truncate_to(len)).collect())
}

/// Bar-by-asset matrix of one field. Assets must already be aligned.
pub fn field_matrix(
    assets: &[BarSeries],
    field: impl Fn(&Bar) -> f64,
) -> Result<Vec<Vec<f64>>, UniverseError> {
    let first = assets.first().ok_or(UniverseError::NoAssets)?;
    let expected = first.len();
    for (asset, series) in assets.iter().enumerate() {
        if series.len() != expected {
            return Err(UniverseError::UnalignedAsset {
                asset,
                expected,
                found: series.len(),
            });
        }
    }
    Ok((0..expected)
        .map(|i| assets.iter().map(|s| field(&s.bars()[i])).collect())
        .collect())
}

/// Row-wise dot product of a weight matrix with a same-shaped return matrix.
pub fn portfolio_returns(
    weights: &[Vec<f64>],
    returns: &[Vec<f64>],
) -> Result<Vec<f64>, UniverseError> {
    let wc = check_rectangular(weights)?;
    let rc = check_rectangular(returns)?;
    if weights.len() != returns.len() || wc != rc {
        return Err(UniverseError::ShapeMismatch {
            left_rows: weights.len(),
            left_cols: wc,
            right_rows: returns.len(),
            right_cols: rc,
        });
    }
    Ok(weights
        .iter()
        .zip(returns)
        .map(|(w, r)| w.iter().zip(r).map(|(a, b)| a * b).sum())
        .collect())
}

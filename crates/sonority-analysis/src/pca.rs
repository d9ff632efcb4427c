//! Principal component analysis over the catalog's numeric columns.
//!
//! The feature matrix is mean-centered, its sample covariance matrix
//! (`n - 1` denominator) is built explicitly and decomposed with
//! `nalgebra`'s [`SymmetricEigen`], and each retained component is
//! summarised by its three most influential columns and its share of the
//! total variance.

use nalgebra::{DMatrix, SymmetricEigen};
use serde::Serialize;

use sonority_core::{Catalog, Error, Result};

/// Components reported when the caller has no preference.
pub const DEFAULT_COMPONENTS: usize = 3;

/// Features listed per component.
const TOP_FEATURES: usize = 3;

/// Summary of one principal component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentReport {
    /// 1-based component number, in descending variance order.
    pub component: usize,
    /// Column names with the largest absolute loadings, strongest first.
    pub top_features: Vec<String>,
    /// This component's eigenvalue over the sum of all eigenvalues.
    pub explained_variance_ratio: f64,
}

/// One eigenpair of the covariance matrix.
#[derive(Debug, Clone, PartialEq)]
struct Axis {
    /// Variance along the axis; rounding noise below zero is clamped to 0.
    variance: f64,
    /// Unit loading vector, one entry per numeric column.
    loadings: Vec<f64>,
}

/// Run PCA and report the first `num_components` components.
///
/// `num_components` is clamped to the number of numeric columns.
///
/// # Errors
///
/// `InsufficientData` when the catalog has no numeric columns, fewer than
/// two rows, or fewer rows than numeric columns.
pub fn analyze(catalog: &Catalog, num_components: usize) -> Result<Vec<ComponentReport>> {
    let columns = catalog.numeric_columns();
    let rows = catalog.len();
    if columns.is_empty() || rows < 2 || rows < columns.len() {
        return Err(Error::InsufficientData {
            rows,
            columns: columns.len(),
        });
    }

    log::info!(
        "Running PCA over {} rows x {} columns",
        rows,
        columns.len()
    );

    let axes = principal_axes(covariance_matrix(catalog));
    let total: f64 = axes.iter().map(|axis| axis.variance).sum();

    let reports = axes
        .iter()
        .take(num_components.min(columns.len()))
        .enumerate()
        .map(|(position, axis)| {
            let mut ranked: Vec<usize> = (0..columns.len()).collect();
            ranked.sort_by(|&a, &b| axis.loadings[b].abs().total_cmp(&axis.loadings[a].abs()));

            ComponentReport {
                component: position + 1,
                top_features: ranked
                    .into_iter()
                    .take(TOP_FEATURES)
                    .map(|c| columns[c].clone())
                    .collect(),
                explained_variance_ratio: if total > 0.0 {
                    axis.variance / total
                } else {
                    0.0
                },
            }
        })
        .collect();

    Ok(reports)
}

/// Sample covariance of the numeric columns.
fn covariance_matrix(catalog: &Catalog) -> DMatrix<f64> {
    let width = catalog.numeric_columns().len();
    let n = catalog.len() as f64;

    let mut means = vec![0.0; width];
    for row in catalog.rows() {
        for (mean, value) in means.iter_mut().zip(row.values()) {
            *mean += value;
        }
    }
    for mean in &mut means {
        *mean /= n;
    }

    let mut covariance = DMatrix::zeros(width, width);
    for row in catalog.rows() {
        let centered: Vec<f64> = row
            .values()
            .iter()
            .zip(&means)
            .map(|(value, mean)| value - mean)
            .collect();
        for i in 0..width {
            for j in i..width {
                covariance[(i, j)] += centered[i] * centered[j];
            }
        }
    }
    for i in 0..width {
        for j in i..width {
            covariance[(i, j)] /= n - 1.0;
            covariance[(j, i)] = covariance[(i, j)];
        }
    }
    covariance
}

/// Eigen-decompose a covariance matrix into axes ordered by descending
/// variance. Equal variances keep eigenvalue index order.
fn principal_axes(covariance: DMatrix<f64>) -> Vec<Axis> {
    let eigen = SymmetricEigen::new(covariance);
    let values = eigen.eigenvalues.as_slice();

    descending_order(values)
        .into_iter()
        .map(|idx| Axis {
            variance: values[idx].max(0.0),
            loadings: eigen.eigenvectors.column(idx).iter().copied().collect(),
        })
        .collect()
}

/// Indices of `values`, largest first; the sort is stable so ties keep
/// index order.
fn descending_order(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&i, &j| values[j].total_cmp(&values[i]));
    order
}

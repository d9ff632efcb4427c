//! Correlation ranking against a target column.

use serde::Serialize;

use sonority_core::{Catalog, Error, Result};

/// Features listed in a report.
const TOP_FEATURES: usize = 3;

/// One feature's absolute correlation with the target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureCorrelation {
    pub feature: String,
    /// `|r|`, in `[0, 1]`.
    pub coefficient: f64,
}

/// The features most correlated with a target column, strongest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationReport {
    pub target: String,
    pub features: Vec<FeatureCorrelation>,
}

impl CorrelationReport {
    /// Just the feature names, in rank order.
    #[must_use]
    pub fn feature_names(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.feature.as_str()).collect()
    }
}

/// Pearson correlation coefficient of two equally long series.
///
/// `r = Σ(dx·dy) / (sqrt(Σdx²) · sqrt(Σdy²))` with `dx`, `dy` the
/// deviations from each series' mean. Returns 0 for series shorter than two values, for
/// zero-variance series, and whenever the result is not finite.
#[must_use]
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }
    let mean_x = xs[..n].iter().sum::<f64>() / n as f64;
    let mean_y = ys[..n].iter().sum::<f64>() / n as f64;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in xs[..n].iter().zip(&ys[..n]) {
        let (dx, dy) = (x - mean_x, y - mean_y);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    // Square roots taken separately so the product cannot under- or overflow.
    let r = cov / (var_x.sqrt() * var_y.sqrt());
    if r.is_finite() {
        r
    } else {
        0.0
    }
}

/// Rank every other numeric column by `|r|` with `target`, keeping the top
/// three. Ties keep column order.
///
/// # Errors
///
/// `MissingColumn` when `target` is not one of the catalog's numeric
/// columns. The catalog is only read.
pub fn rank(catalog: &Catalog, target: &str) -> Result<CorrelationReport> {
    let target_values = catalog
        .column(target)
        .ok_or_else(|| Error::MissingColumn(target.to_string()))?;

    let mut correlations: Vec<FeatureCorrelation> = catalog
        .numeric_columns()
        .iter()
        .filter(|name| name.as_str() != target)
        .filter_map(|name| {
            let values = catalog.column(name)?;
            Some(FeatureCorrelation {
                feature: name.clone(),
                coefficient: pearson(&values, &target_values).abs(),
            })
        })
        .collect();

    correlations.sort_by(|a, b| b.coefficient.total_cmp(&a.coefficient));
    correlations.truncate(TOP_FEATURES);

    log::debug!("Top correlations with '{}': {:?}", target, correlations);

    Ok(CorrelationReport {
        target: target.to_string(),
        features: correlations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sonority_core::{CatalogRow, FeatureKey, FeatureVector};

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-12, "{} != {}", a, b);
    }

    #[test]
    fn test_pearson_perfect() {
        assert_close(pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]), 1.0);
        assert_close(pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]), -1.0);
    }

    #[test]
    fn test_pearson_degenerate_is_zero() {
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(pearson(&[1.0], &[2.0]), 0.0);
        assert_eq!(pearson(&[], &[]), 0.0);
    }

    #[test]
    fn test_pearson_extreme_scales() {
        let tiny = [0.0, 1e-150, 2e-150];
        assert_close(pearson(&tiny, &tiny), 1.0);
        let huge = [0.0, 1e150, 2e150];
        assert_close(pearson(&huge, &huge), 1.0);
        assert_close(pearson(&tiny, &huge), 1.0);
    }

    fn popularity_catalog() -> Catalog {
        let rows = (0..6)
            .map(|i| {
                let x = f64::from(i);
                let features = FeatureVector::default()
                    .with(FeatureKey::Energy, x)
                    .with(FeatureKey::Danceability, -0.5 * x + f64::from(i % 2))
                    .with(FeatureKey::Valence, if i % 2 == 0 { 1.0 } else { 0.0 })
                    .with(FeatureKey::Acousticness, 6.0 - x + 0.5 * f64::from(i % 2));
                CatalogRow::new(format!("Song {}", i), "Artist", features)
                    .with_popularity(10.0 * x)
            })
            .collect();
        Catalog::from_rows(rows)
    }

    #[test]
    fn test_rank_by_absolute_correlation() {
        let report = rank(&popularity_catalog(), "popularity").unwrap();
        assert_eq!(report.target, "popularity");
        assert_eq!(report.features.len(), 3);
        assert_eq!(
            report.feature_names(),
            vec!["energy", "acousticness", "danceability"]
        );
        assert_close(report.features[0].coefficient, 1.0);
        // acousticness is negatively correlated; only the magnitude counts.
        assert!((0.98..0.99).contains(&report.features[1].coefficient));
        assert!(report.features.iter().all(|f| f.feature != "popularity"));
    }

    #[test]
    fn test_rank_ties_keep_column_order() {
        let rows = (0..5)
            .map(|i| {
                let x = f64::from(i);
                let features = FeatureVector::default()
                    .with(FeatureKey::Liveness, -x)
                    .with(FeatureKey::Energy, x);
                CatalogRow::new(format!("Song {}", i), "Artist", features).with_popularity(x)
            })
            .collect();
        let catalog = Catalog::from_rows(rows);
        let report = rank(&catalog, "popularity").unwrap();

        // energy and liveness tie at |r| = 1; the constant columns tie at 0.
        assert_eq!(report.feature_names(), vec!["energy", "liveness", "key"]);
        assert_eq!(report.features[0].coefficient, report.features[1].coefficient);
    }

    #[test]
    fn test_rank_missing_target_leaves_catalog_untouched() {
        let catalog = popularity_catalog();
        let before = catalog.clone();
        match rank(&catalog, "tempo") {
            Err(Error::MissingColumn(column)) => assert_eq!(column, "tempo"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_rank_zero_variance_columns_count_as_zero() {
        let report = rank(&popularity_catalog(), "popularity").unwrap();
        let catalog = popularity_catalog();
        let constant = pearson(
            &catalog.column("key").unwrap(),
            &catalog.column("popularity").unwrap(),
        );
        assert_eq!(constant, 0.0);
        assert!(report.features.iter().all(|f| f.coefficient.is_finite()));
    }
}

use std::collections::HashSet;

use sonority_core::{Catalog, FeatureVector, QueryVector, Recommendation, Result};

/// Recommendations returned when the caller does not ask for a count.
pub const DEFAULT_RECOMMENDATIONS: usize = 20;

/// A catalog row and its distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the row in the catalog.
    pub index: usize,
    pub distance: f64,
}

/// Every catalog row ordered by ascending distance to `query`.
///
/// Equal distances keep catalog order, so the result is deterministic for
/// a given catalog.
#[must_use]
pub fn nearest(catalog: &Catalog, query: &FeatureVector) -> Vec<Neighbor> {
    let mut neighbors: Vec<Neighbor> = catalog
        .rows()
        .iter()
        .enumerate()
        .map(|(index, row)| Neighbor {
            index,
            distance: query.euclidean_distance(&row.features),
        })
        .collect();
    neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    neighbors
}

/// The `k` songs nearest to `query`, nearest first.
///
/// Rows titled exactly like the query (case-sensitive) are skipped, and
/// each (title, artist) pair is returned at most once. Fewer than `k`
/// results come back when the catalog runs out.
///
/// # Errors
///
/// `IncompatibleVector` when the query lacks a recommendation feature or
/// carries a non-finite value for one.
pub fn find_similar(
    catalog: &Catalog,
    query: &QueryVector,
    k: usize,
) -> Result<Vec<Recommendation>> {
    let features = query.project()?;
    if k == 0 {
        return Ok(Vec::new());
    }

    let rows = catalog.rows();
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut recommendations = Vec::with_capacity(k.min(rows.len()));

    for neighbor in nearest(catalog, &features) {
        let row = &rows[neighbor.index];
        if row.title == query.title {
            continue;
        }
        if !seen.insert((row.title.as_str(), row.artist.as_str())) {
            continue;
        }
        recommendations.push(Recommendation::new(&row.title, &row.artist));
        if recommendations.len() >= k {
            break;
        }
    }

    log::debug!(
        "Found {} recommendations for '{}' among {} songs",
        recommendations.len(),
        query.title,
        rows.len()
    );

    Ok(recommendations)
}

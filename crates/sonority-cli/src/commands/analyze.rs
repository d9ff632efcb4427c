use anyhow::Result;
use sonority_analysis::{analyze, rank};
use sonority_core::Catalog;

/// Print the PCA and correlation reports for the catalog.
///
/// Both analyses are diagnostic: if one cannot run, it is reported and
/// skipped.
pub fn run_analyze(catalog: &Catalog, components: usize, target: &str) -> Result<()> {
    log::info!("Running data analysis over {} songs", catalog.len());

    println!("\n🔬 Principal Component Analysis\n");
    match analyze(catalog, components) {
        Ok(reports) => {
            println!("Top three features in each component:");
            for report in &reports {
                println!("  Component {}: {}", report.component, report.top_features.join(", "));
            }
            println!("\nExplained variance ratio:");
            for report in &reports {
                println!(
                    "  Component {}: {:.4}",
                    report.component, report.explained_variance_ratio
                );
            }
        }
        Err(e) => {
            log::warn!("Skipping PCA: {}", e);
            println!("  Skipped: {}", e);
        }
    }

    println!("\n{}\n", "=".repeat(30));

    println!("📈 Correlation with '{}'\n", target);
    match rank(catalog, target) {
        Ok(report) => {
            for (i, feature) in report.features.iter().enumerate() {
                println!("  {}. {} (|r| = {:.4})", i + 1, feature.feature, feature.coefficient);
            }
        }
        Err(e) => {
            log::warn!("Skipping correlation analysis: {}", e);
            println!("  Skipped: {}", e);
        }
    }

    Ok(())
}

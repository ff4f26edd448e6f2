pub mod catalog;
pub mod init;
pub mod play;
pub mod rank;

use babel_core::catalog::Catalog;
use babel_core::error::QuizError;
use babel_core::CatalogLoader;

/// Load the catalog, turning an empty catalog into a diagnostic. Skipped
/// sources are already logged by the loader.
pub async fn load_catalog(loader: &CatalogLoader) -> anyhow::Result<std::sync::Arc<Catalog>> {
    match loader.get_catalog().await {
        Ok(catalog) => Ok(catalog),
        Err(QuizError::EmptyCatalog { warnings }) => {
            anyhow::bail!(
                "no vocabulary available: {} source(s) failed and no seed words are configured",
                warnings.len()
            )
        }
        Err(e) => Err(e.into()),
    }
}

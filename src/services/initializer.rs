use dashmap::DashMap;
use log::{info, warn};
use std::sync::Arc;

use super::token_data::TokenDataService;
use crate::components::ProgressBar;
use crate::errors::{Error, Result};

/// Page region whose content is replaced while token data loads.
pub const MAIN_REGION: &str = "main";
pub const PROGRESS_BAR_ID: &str = "progress-bar";
pub const LOADING_LABEL: &str = "Loading tokens...";

#[derive(Debug, Clone, PartialEq)]
enum RegionContent {
    Original,
    Progress {
        id: String,
        label: String,
        value: f64,
    },
}

/// Named content regions of the served pages.
///
/// A region either shows its own content or a progress bar. Pages ask
/// [`PageRegions::render`] before producing their body.
#[derive(Debug, Clone, Default)]
pub struct PageRegions {
    regions: Arc<DashMap<String, RegionContent>>,
}

impl PageRegions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: &str) {
        self.regions.insert(name.to_string(), RegionContent::Original);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.regions.contains_key(name)
    }

    /// Replace the content of `name` with an empty progress bar.
    ///
    /// Returns `false` and leaves the region alone if it already shows progress.
    pub fn show_progress(&self, name: &str, id: &str, label: &str) -> Result<bool> {
        let mut region = self
            .regions
            .get_mut(name)
            .ok_or_else(|| Error::NotFound(format!("No <{}> region registered", name)))?;
        if matches!(*region, RegionContent::Progress { .. }) {
            return Ok(false);
        }
        *region = RegionContent::Progress {
            id: id.to_string(),
            label: label.to_string(),
            value: 0.0,
        };
        Ok(true)
    }

    pub fn is_loading(&self, name: &str) -> bool {
        self.progress_value(name).is_some()
    }

    pub fn advance(&self, name: &str, increment: f64) {
        match self.regions.get_mut(name) {
            Some(mut region) => {
                if let RegionContent::Progress { value, .. } = region.value_mut() {
                    *value = (*value + increment).min(ProgressBar::MAX);
                }
            }
            None => warn!("Cannot advance progress of unknown region {}", name),
        }
    }

    pub fn restore(&self, name: &str) {
        if let Some(mut region) = self.regions.get_mut(name) {
            *region = RegionContent::Original;
        }
    }

    pub fn progress_value(&self, name: &str) -> Option<f64> {
        match self.regions.get(name)?.value() {
            RegionContent::Progress { value, .. } => Some(*value),
            RegionContent::Original => None,
        }
    }

    /// Progress bar markup while `name` is loading, `None` when it shows its own content.
    pub fn render(&self, name: &str) -> Result<Option<String>> {
        let Some(region) = self.regions.get(name) else {
            return Ok(None);
        };
        match region.value() {
            RegionContent::Progress { id, label, value } => {
                ProgressBar::render_with_value(id, label, *value).map(Some)
            }
            RegionContent::Original => Ok(None),
        }
    }
}

/// Load every chain's token list and the price cache behind a progress bar.
///
/// The main region shows the progress bar for the duration and is restored
/// afterwards, also when the supported-token refresh fails; that error is
/// then returned.
pub async fn initialize_token_data(regions: &PageRegions, data: &TokenDataService) -> Result<()> {
    if !regions.contains(MAIN_REGION) {
        return Err(Error::NotFound(format!(
            "No <{}> region registered",
            MAIN_REGION
        )));
    }

    if !regions.show_progress(MAIN_REGION, PROGRESS_BAR_ID, LOADING_LABEL)? {
        info!("Token data is already loading");
        return Ok(());
    }
    let increment = ProgressBar::MAX / (data.chain_tokens().get_total_chains() + 2) as f64;
    let mut advance = || regions.advance(MAIN_REGION, increment);

    info!("Loading token data");
    let result = load(data, &mut advance).await;
    regions.restore(MAIN_REGION);

    if result.is_ok() {
        info!("Token data loaded");
    }
    result
}

async fn load<P: FnMut()>(data: &TokenDataService, progress: &mut P) -> Result<()> {
    data.chain_tokens().refresh_token_cache(progress).await?;
    data.token_prices()
        .refresh_token_price_cache(progress, &[])
        .await
}

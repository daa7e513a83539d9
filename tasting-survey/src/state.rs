use std::{path::PathBuf, sync::Arc};

use tasting_survey_html::HtmlOptions;
use tasting_survey_notify::{Notifier, SmtpNotifier};
use tasting_survey_types::Catalog;
use tracing::info;

use crate::{config::Config, controller::SubmissionController, error::AppError, session::SessionStore};

pub struct State {
    pub controller: SubmissionController,
    pub sessions: SessionStore,
    pub html: HtmlOptions,
    pub assets_dir: PathBuf,
}

impl State {
    pub fn new(controller: SubmissionController, assets_dir: impl Into<PathBuf>) -> Arc<Self> {
        Arc::new(Self {
            controller,
            sessions: SessionStore::new(),
            html: HtmlOptions::new(),
            assets_dir: assets_dir.into(),
        })
    }

    /// Load the catalog and set up SMTP delivery as configured.
    pub fn from_config(config: Config) -> Result<Arc<Self>, AppError> {
        let catalog = Catalog::load(&config.catalog_path)?;
        info!(
            path = %config.catalog_path.display(),
            items = catalog.len(),
            fields = catalog.fields().len(),
            "Catalog loaded"
        );

        let notifier: Arc<dyn Notifier> = Arc::new(SmtpNotifier::new(config.smtp)?);
        let controller = SubmissionController::new(Arc::new(catalog), notifier, config.mail);

        Ok(Self::new(controller, config.assets_dir))
    }
}

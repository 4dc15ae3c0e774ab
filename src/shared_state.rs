use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::services::irradiance_table::IrradianceTable;
use crate::services::panel_sizer::PanelSizer;
use crate::services::sizing_service::SizingService;

/// Everything the handlers need. Read-only after startup, so clones are cheap
/// and no locking is involved.
#[derive(Clone, Debug)]
pub struct AppState {
    pub service: Arc<SizingService>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: &Config, table: IrradianceTable) -> Self {
        let service = SizingService::new(
            Arc::new(table),
            PanelSizer::new(config.sizing),
            config.data.demand_source,
            config.waffle,
        );
        Self {
            service: Arc::new(service),
            started_at: Instant::now(),
        }
    }

    pub fn table(&self) -> &IrradianceTable {
        self.service.table()
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

//! Shared state handed to every handler.

use tollgate_config::OptionStore;
use tollgate_telemetry::Metrics;

use crate::facade::SharedLogContents;
use crate::http::system::SystemInfo;

/// Dependencies reachable from request handlers.
pub(crate) struct ApiState {
    pub(crate) options: OptionStore,
    pub(crate) log_contents: SharedLogContents,
    pub(crate) telemetry: Metrics,
    pub(crate) system: SystemInfo,
}

impl ApiState {
    pub(crate) const fn new(
        options: OptionStore,
        log_contents: SharedLogContents,
        telemetry: Metrics,
        system: SystemInfo,
    ) -> Self {
        Self {
            options,
            log_contents,
            telemetry,
            system,
        }
    }
}

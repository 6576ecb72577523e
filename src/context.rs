//! Service context bundling the ports a command needs.

use std::sync::Arc;

use crate::adapters::live::{LiveClock, LiveHttpTransport};
use crate::config::Settings;
use crate::ports::clock::Clock;
use crate::ports::transport::ChatTransport;

/// Everything a command reads from the outside world.
pub struct ServiceContext {
    /// Clock for stamping reports.
    pub clock: Box<dyn Clock>,
    /// Network boundary shared by the hosted backends.
    pub transport: Arc<dyn ChatTransport>,
    /// Resolved configuration.
    pub settings: Settings,
}

impl ServiceContext {
    /// Real clock, real network, configuration from the process environment.
    #[must_use]
    pub fn live() -> Self {
        Self::new(Box::new(LiveClock), Arc::new(LiveHttpTransport::new()), Settings::from_env())
    }

    /// Wires explicit adapters.
    #[must_use]
    pub fn new(clock: Box<dyn Clock>, transport: Arc<dyn ChatTransport>, settings: Settings) -> Self {
        Self { clock, transport, settings }
    }

    /// Settings with `provider` applied; `auto` leaves them untouched.
    #[must_use]
    pub fn settings_for(&self, provider: &str) -> Settings {
        if provider.trim().eq_ignore_ascii_case("auto") {
            self.settings.clone()
        } else {
            self.settings.clone().with_provider_override(provider)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::canned::{CannedTransport, FixedClock};
    use chrono::Utc;

    fn ctx(settings: Settings) -> ServiceContext {
        ServiceContext::new(Box::new(FixedClock(Utc::now())), Arc::new(CannedTransport::new()), settings)
    }

    #[test]
    fn auto_keeps_environment_override() {
        let ctx = ctx(Settings::from_vars([("TRIAGE_PROVIDER", "foundry")]));
        assert_eq!(ctx.settings_for("auto").provider_override.as_deref(), Some("foundry"));
        assert_eq!(ctx.settings_for(" AUTO ").provider_override.as_deref(), Some("foundry"));
    }

    #[test]
    fn explicit_provider_replaces_override() {
        let ctx = ctx(Settings::from_vars([("TRIAGE_PROVIDER", "foundry")]));
        assert_eq!(ctx.settings_for("dummy").provider_override.as_deref(), Some("dummy"));
    }
}

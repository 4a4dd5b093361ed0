//! Initializer and click wiring

use gpm_host::Transport;
use gpm_protocol::HostInfo;

use crate::config::AddinConfig;
use crate::handler;
use crate::pane::TaskPane;

/// The task pane bound to a host.
///
/// [`Addin::click`] takes `&mut self`, so one add-in never runs two
/// calculations at once. The button is also disabled for the duration.
pub struct Addin<T: Transport> {
    transport: T,
    config: AddinConfig,
    pane: TaskPane,
}

impl<T: Transport> Addin<T> {
    pub fn new(transport: T, config: AddinConfig) -> Self {
        Self {
            transport,
            config,
            pane: TaskPane::default(),
        }
    }

    pub fn config(&self) -> &AddinConfig {
        &self.config
    }

    pub fn pane(&self) -> &TaskPane {
        &self.pane
    }

    pub fn pane_mut(&mut self) -> &mut TaskPane {
        &mut self.pane
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Ask the host who it is, then [`initialize`](Self::initialize).
    ///
    /// A host that does not answer leaves the pane unattached.
    pub async fn on_ready(&mut self) {
        match self.transport.hello().await {
            Ok(info) => self.initialize(&info),
            Err(e) => tracing::error!("Host did not report ready: {e}"),
        }
    }

    /// Attach the calculate handler when running in the expected host.
    pub fn initialize(&mut self, info: &HostInfo) {
        if info.host != self.config.expected_host {
            tracing::debug!(
                "Running in {} on {}, not {}; calculate button left unattached",
                info.host,
                info.platform,
                self.config.expected_host
            );
            return;
        }

        self.pane.calculate.attach();
        self.pane.status.clear();
        tracing::info!("Attached to {} on {}", info.host, info.platform);
    }

    /// Handle a click on the calculate button.
    pub async fn click(&mut self) {
        if !self.pane.calculate.accepts_clicks() {
            tracing::debug!("Click ignored: button not attached or disabled");
            return;
        }

        self.pane.calculate.set_enabled(false);
        let period = self.pane.period.value().to_string();
        let status = handler::run(&mut self.transport, &self.config, &period).await;
        self.pane.status.report(&status);
        self.pane.calculate.set_enabled(true);
    }
}

//! Host runtime for the gpm add-in.
//!
//! Document access follows a two-phase model: operations are queued on a
//! [`RequestContext`] and only reach the host when [`RequestContext::sync`] is
//! awaited. Reads hand back [`Loaded`] handles that are filled by the sync.
//!
//! # Architecture
//!
//! ```text
//! Add-in handler
//!     └── RequestContext (queue + sync)
//!           └── Transport
//!                 ├── LocalHost   (in-process, gpm-core workbook)
//!                 └── BridgeHost  (JSON lines to a host process)
//!                       └── serve() on the other end
//! ```
//!
//! # Example
//!
//! ```rust
//! use gpm_core::Workbook;
//! use gpm_host::{LocalHost, RequestContext};
//!
//! # async fn example() -> gpm_host::Result<()> {
//! let mut host = LocalHost::new(Workbook::new());
//! let mut ctx = RequestContext::new(&mut host);
//!
//! let exists = ctx.sheet_exists("Summary");
//! ctx.sync().await?;
//!
//! if !exists.get()? {
//!     ctx.add_sheet("Summary")?;
//!     ctx.set_values("Summary", "A1:B1", vec![vec!["Metric".into(), "Value".into()]]);
//!     ctx.sync().await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod bridge;
pub mod context;
pub mod error;
pub mod local;
pub mod serve;
pub mod transport;

pub use bridge::{BridgeConfig, BridgeHost, ProcessBridge};
pub use context::{Loaded, RequestContext};
pub use error::{Error, Result};
pub use local::LocalHost;
pub use serve::serve;
pub use transport::Transport;

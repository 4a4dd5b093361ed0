//! # gpm-addin
//!
//! The gross profit margin task pane.
//!
//! - [`Addin`] - wires the calculate button once the host is ready, and runs
//!   the handler on each click
//! - [`calculate`] - read the ledger table, compute the margin, write the
//!   summary sheet, all through one [`RequestContext`](gpm_host::RequestContext)
//! - [`TaskPane`] - the period field, the button and the status line
//!
//! ```rust
//! use gpm_addin::{Addin, AddinConfig};
//! use gpm_core::Workbook;
//! use gpm_host::LocalHost;
//!
//! # async fn example() {
//! let host = LocalHost::new(Workbook::new());
//! let mut addin = Addin::new(host, AddinConfig::default());
//!
//! addin.on_ready().await;
//! addin.pane_mut().period.set_value("Q1");
//! addin.click().await;
//!
//! println!("{}", addin.pane().status.text());
//! # }
//! ```

mod addin;
mod config;
mod error;
mod handler;
mod pane;

pub use addin::Addin;
pub use config::AddinConfig;
pub use error::HandlerError;
pub use handler::{calculate, run};
pub use pane::{Button, Status, StatusLine, TaskPane, TextField};

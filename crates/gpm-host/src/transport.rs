//! The seam between a request context and a host.

use gpm_protocol::{HostInfo, Operation, OperationResult};

use crate::error::Result;

/// Something that can execute batches of document operations.
///
/// Implementations apply the operations of one batch in order and return one
/// result per operation. A failing operation aborts the rest of its batch;
/// operations before it stay applied.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Ask the host to identify itself.
    async fn hello(&mut self) -> Result<HostInfo>;

    /// Execute one batch.
    async fn sync(&mut self, operations: Vec<Operation>) -> Result<Vec<OperationResult>>;
}

impl<T: Transport> Transport for &mut T {
    async fn hello(&mut self) -> Result<HostInfo> {
        (**self).hello().await
    }

    async fn sync(&mut self, operations: Vec<Operation>) -> Result<Vec<OperationResult>> {
        (**self).sync(operations).await
    }
}

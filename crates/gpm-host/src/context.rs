//! The two-phase request context.

use std::cell::OnceCell;
use std::rc::Rc;

use gpm_protocol::{CellValue, Operation, OperationResult};

use crate::error::{Error, Result};
use crate::transport::Transport;

/// A value requested from the host, available once the batch that carries the
/// request has been synced.
#[derive(Debug)]
pub struct Loaded<T> {
    slot: Rc<OnceCell<OperationResult>>,
    extract: fn(&OperationResult) -> Option<T>,
    what: &'static str,
}

impl<T> Loaded<T> {
    /// The loaded value.
    ///
    /// Fails with [`Error::NotLoaded`] before the sync that fills it.
    pub fn get(&self) -> Result<T> {
        let result = self.slot.get().ok_or(Error::NotLoaded(self.what))?;
        (self.extract)(result).ok_or(Error::UnexpectedResponse)
    }
}

struct Queued {
    operation: Operation,
    slot: Option<Rc<OnceCell<OperationResult>>>,
}

/// Queues document operations and ships them to the host on [`sync`].
///
/// Invariant: a sync separates conflicting name-reuse operations. Queuing
/// [`add_sheet`] for a name whose deletion is still pending fails with
/// [`Error::NameReuse`], since the host does not order a delete before a
/// create of the same name within one batch.
///
/// [`sync`]: RequestContext::sync
/// [`add_sheet`]: RequestContext::add_sheet
pub struct RequestContext<T: Transport> {
    transport: T,
    queue: Vec<Queued>,
    syncs: usize,
}

impl<T: Transport> RequestContext<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            queue: Vec::new(),
            syncs: 0,
        }
    }

    /// Number of queued, not yet synced operations.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Number of completed round trips.
    pub fn sync_count(&self) -> usize {
        self.syncs
    }

    /// Request the data body (header excluded) of a table.
    pub fn table_data_body(&mut self, sheet: &str, table: &str) -> Loaded<Vec<Vec<CellValue>>> {
        self.load(
            Operation::GetTableDataBody {
                sheet: sheet.to_string(),
                table: table.to_string(),
            },
            "table data body",
            |r| match r {
                OperationResult::Values { values } => Some(values.clone()),
                _ => None,
            },
        )
    }

    /// Request whether a sheet exists.
    pub fn sheet_exists(&mut self, name: &str) -> Loaded<bool> {
        self.load(
            Operation::GetSheetOrNull {
                name: name.to_string(),
            },
            "sheet lookup",
            |r| match r {
                OperationResult::Sheet { exists } => Some(*exists),
                _ => None,
            },
        )
    }

    pub fn delete_sheet(&mut self, name: &str) {
        self.push(Operation::DeleteSheet {
            name: name.to_string(),
        });
    }

    /// Queue creation of a sheet.
    pub fn add_sheet(&mut self, name: &str) -> Result<()> {
        let lower = name.to_lowercase();
        let pending_delete = self.queue.iter().any(|q| {
            matches!(&q.operation, Operation::DeleteSheet { name: n } if n.to_lowercase() == lower)
        });
        if pending_delete {
            return Err(Error::NameReuse(name.to_string()));
        }
        self.push(Operation::AddSheet {
            name: name.to_string(),
        });
        Ok(())
    }

    pub fn set_values(&mut self, sheet: &str, range: &str, values: Vec<Vec<CellValue>>) {
        self.push(Operation::SetValues {
            sheet: sheet.to_string(),
            range: range.to_string(),
            values,
        });
    }

    pub fn set_number_format(&mut self, sheet: &str, range: &str, format: &str) {
        self.push(Operation::SetNumberFormat {
            sheet: sheet.to_string(),
            range: range.to_string(),
            format: format.to_string(),
        });
    }

    pub fn set_bold(&mut self, sheet: &str, range: &str, bold: bool) {
        self.push(Operation::SetBold {
            sheet: sheet.to_string(),
            range: range.to_string(),
            bold,
        });
    }

    pub fn autofit_columns(&mut self, sheet: &str, range: &str) {
        self.push(Operation::AutofitColumns {
            sheet: sheet.to_string(),
            range: range.to_string(),
        });
    }

    pub fn activate_sheet(&mut self, name: &str) {
        self.push(Operation::ActivateSheet {
            name: name.to_string(),
        });
    }

    /// Send every queued operation to the host as one batch.
    ///
    /// The queue is emptied whether or not the batch succeeds. Nothing is sent
    /// when the queue is empty.
    pub async fn sync(&mut self) -> Result<()> {
        if self.queue.is_empty() {
            return Ok(());
        }

        let queued = std::mem::take(&mut self.queue);
        let (operations, slots): (Vec<_>, Vec<_>) =
            queued.into_iter().map(|q| (q.operation, q.slot)).unzip();
        let expected = operations.len();

        tracing::debug!("Syncing {expected} operation(s)");
        let results = self.transport.sync(operations).await?;
        self.syncs += 1;

        if results.len() != expected {
            return Err(Error::ResultCountMismatch {
                expected,
                actual: results.len(),
            });
        }

        for (slot, result) in slots.into_iter().zip(results) {
            if let Some(slot) = slot {
                // Each slot belongs to exactly one batch, so it is still empty.
                let _ = slot.set(result);
            }
        }

        Ok(())
    }

    fn push(&mut self, operation: Operation) {
        self.queue.push(Queued {
            operation,
            slot: None,
        });
    }

    fn load<V>(
        &mut self,
        operation: Operation,
        what: &'static str,
        extract: fn(&OperationResult) -> Option<V>,
    ) -> Loaded<V> {
        let slot = Rc::new(OnceCell::new());
        self.queue.push(Queued {
            operation,
            slot: Some(Rc::clone(&slot)),
        });
        Loaded {
            slot,
            extract,
            what,
        }
    }
}

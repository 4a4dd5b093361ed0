//! The calculate handler

use gpm_host::{RequestContext, Transport};
use gpm_report::{compute_from_cells, Period, SummaryBlock};

use crate::config::AddinConfig;
use crate::error::HandlerError;
use crate::pane::Status;

/// Compute the margin for `raw_period` and write the summary sheet.
///
/// Returns the name of the sheet written. The period is validated before the
/// host is touched. An existing summary sheet for the period is deleted (in
/// its own sync) and re-created; it is left alone when the calculation fails.
pub async fn calculate<T: Transport>(
    transport: T,
    config: &AddinConfig,
    raw_period: &str,
) -> Result<String, HandlerError> {
    let period = Period::parse(raw_period)?;

    let mut ctx = RequestContext::new(transport);
    let body = ctx.table_data_body(&config.data_sheet, &config.table);
    ctx.sync().await?;

    let values = body.get()?;
    let result = compute_from_cells(&period, &values)?;
    tracing::debug!(
        "Period {}: revenue {}, cogs {}, margin {}",
        result.period,
        result.revenue,
        result.cogs,
        result.margin
    );

    let SummaryBlock { sheet_name, values } = SummaryBlock::new(&config.output_prefix, &result);

    let existing = ctx.sheet_exists(&sheet_name);
    ctx.sync().await?;
    if existing.get()? {
        tracing::debug!("Replacing existing sheet {sheet_name}");
        ctx.delete_sheet(&sheet_name);
        ctx.sync().await?;
    }

    ctx.add_sheet(&sheet_name)?;
    ctx.set_values(&sheet_name, SummaryBlock::RANGE, values);
    ctx.set_number_format(
        &sheet_name,
        SummaryBlock::CURRENCY_RANGE,
        SummaryBlock::CURRENCY_FORMAT,
    );
    ctx.set_number_format(
        &sheet_name,
        SummaryBlock::PERCENT_RANGE,
        SummaryBlock::PERCENT_FORMAT,
    );
    for range in SummaryBlock::BOLD_RANGES {
        ctx.set_bold(&sheet_name, range, true);
    }
    ctx.autofit_columns(&sheet_name, SummaryBlock::AUTOFIT_RANGE);
    ctx.activate_sheet(&sheet_name);
    ctx.sync().await?;

    Ok(sheet_name)
}

/// Run [`calculate`] and turn its outcome into a status line.
///
/// Failures are logged with the host's debug info; only the short message
/// reaches the status.
pub async fn run<T: Transport>(transport: T, config: &AddinConfig, raw_period: &str) -> Status {
    match calculate(transport, config, raw_period).await {
        Ok(sheet) => {
            tracing::info!("Wrote gross profit margin to {sheet}");
            Status::success(format!("Gross profit margin written to sheet '{sheet}'."))
        }
        Err(e) => {
            match e.debug_info() {
                Some(info) => tracing::error!(
                    "Calculation failed: {e} (at {}, {} #{})",
                    info.error_location,
                    info.statement,
                    info.operation_index
                ),
                None => tracing::error!("Calculation failed: {e}"),
            }
            Status::error(e.to_string())
        }
    }
}

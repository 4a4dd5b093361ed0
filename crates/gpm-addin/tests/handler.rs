use gpm_addin::{calculate, Addin, AddinConfig, HandlerError};
use gpm_core::{CellRange, CellValue, Workbook};
use gpm_host::{LocalHost, Transport};
use gpm_protocol::{HostInfo, HostKind, Operation, OperationResult};
use gpm_report::CalcError;
use pretty_assertions::assert_eq;

/// A ledger workbook: `DataSheet` with table `InputData` over the given rows.
fn ledger(rows: &[(&str, &str, CellValue)]) -> Workbook {
    let mut wb = Workbook::empty();
    wb.add_worksheet_with_name("DataSheet").unwrap();
    let ws = wb.worksheet_by_name_mut("DataSheet").unwrap();
    ws.set_cell_value("A1", "Account").unwrap();
    ws.set_cell_value("B1", "Period").unwrap();
    ws.set_cell_value("C1", "Amount").unwrap();
    for (i, (account, period, amount)) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        ws.set_cell_value_at(row, 0, *account).unwrap();
        ws.set_cell_value_at(row, 1, *period).unwrap();
        ws.set_cell_value_at(row, 2, amount.clone()).unwrap();
    }
    let range = CellRange::from_indices(0, 0, rows.len() as u32, 2);
    wb.add_table("DataSheet", "InputData", range).unwrap();
    wb
}

fn example() -> Workbook {
    ledger(&[
        ("Revenue", "Q1", 1000.0.into()),
        ("COGS", "Q1", 600.0.into()),
        ("Revenue", "Q2", 500.0.into()),
    ])
}

/// Counts what reaches the host.
struct Counting<T> {
    inner: T,
    syncs: usize,
    operations: usize,
}

impl<T> Counting<T> {
    fn new(inner: T) -> Self {
        Self {
            inner,
            syncs: 0,
            operations: 0,
        }
    }
}

impl<T: Transport> Transport for Counting<T> {
    async fn hello(&mut self) -> gpm_host::Result<HostInfo> {
        self.inner.hello().await
    }

    async fn sync(&mut self, operations: Vec<Operation>) -> gpm_host::Result<Vec<OperationResult>> {
        self.syncs += 1;
        self.operations += operations.len();
        self.inner.sync(operations).await
    }
}

async fn ready_addin(wb: Workbook) -> Addin<Counting<LocalHost>> {
    let mut addin = Addin::new(Counting::new(LocalHost::new(wb)), AddinConfig::default());
    addin.on_ready().await;
    assert!(addin.pane().calculate.is_attached());
    addin
}

async fn click_with(addin: &mut Addin<Counting<LocalHost>>, period: &str) {
    addin.pane_mut().period.set_value(period);
    addin.click().await;
}

#[tokio::test]
async fn test_example_q1() {
    let mut addin = ready_addin(example()).await;
    click_with(&mut addin, "Q1").await;

    let status = &addin.pane().status;
    assert!(!status.is_error(), "{}", status.text());
    assert_eq!(status.text(), "Gross profit margin written to sheet 'GPM_Q1'.");
    assert_eq!(status.color(), "#323130");
    assert!(addin.pane().calculate.is_enabled());

    let wb = addin.into_transport().inner.into_workbook();
    let ws = wb.worksheet_by_name("GPM_Q1").unwrap();
    assert_eq!(wb.active_worksheet().unwrap().name(), "GPM_Q1");

    let block = ws.range_values(&CellRange::parse("A1:B7").unwrap());
    assert_eq!(
        block,
        vec![
            vec!["Period".into(), "Q1".into()],
            vec![CellValue::Empty, CellValue::Empty],
            vec!["Metric".into(), "Value".into()],
            vec!["Revenue".into(), 1000.0.into()],
            vec!["COGS".into(), 600.0.into()],
            vec!["Gross Profit".into(), 400.0.into()],
            vec!["Gross Profit Margin".into(), 0.4.into()],
        ]
    );

    assert_eq!(ws.display_text_at(3, 1), "$1,000.00");
    assert_eq!(ws.display_text_at(4, 1), "$600.00");
    assert_eq!(ws.display_text_at(5, 1), "$400.00");
    assert_eq!(ws.display_text_at(6, 1), "40.00%");
    assert!(ws.is_bold_at(0, 0) && ws.is_bold_at(0, 1));
    assert!(ws.is_bold_at(2, 0) && ws.is_bold_at(2, 1));
    assert!(!ws.is_bold_at(3, 0));
    assert!(ws.column_width(0) > gpm_core::DEFAULT_COLUMN_WIDTH);
}

#[tokio::test]
async fn test_blank_period_never_reaches_host() {
    let mut addin = ready_addin(example()).await;
    click_with(&mut addin, "   ").await;

    assert!(addin.pane().status.is_error());
    assert_eq!(addin.pane().status.color(), "#D13438");
    assert_eq!(
        addin.pane().status.text(),
        CalcError::Validation.to_string()
    );
    assert_eq!(addin.transport().syncs, 0);
    assert_eq!(addin.transport().operations, 0);
}

#[tokio::test]
async fn test_rerun_replaces_sheet() {
    let mut addin = ready_addin(example()).await;
    click_with(&mut addin, "Q1").await;
    let first = addin.transport().inner.workbook().clone();

    click_with(&mut addin, " Q1 ").await;
    assert!(!addin.pane().status.is_error());

    let second = addin.transport().inner.workbook();
    assert_eq!(second.sheet_count(), 2);
    assert_eq!(
        first.worksheet_by_name("GPM_Q1"),
        second.worksheet_by_name("GPM_Q1")
    );
}

#[tokio::test]
async fn test_non_positive_revenue_keeps_existing_sheet() {
    let mut wb = ledger(&[
        ("Revenue", "Q1", 0.0.into()),
        ("COGS", "Q1", 10.0.into()),
    ]);
    wb.add_worksheet_with_name("GPM_Q1").unwrap();
    wb.worksheet_by_name_mut("GPM_Q1")
        .unwrap()
        .set_cell_value("A1", "previous")
        .unwrap();

    let mut addin = ready_addin(wb).await;
    click_with(&mut addin, "Q1").await;

    assert!(addin.pane().status.is_error());
    assert!(addin.pane().status.text().contains("greater than zero"));

    let wb = addin.transport().inner.workbook();
    assert_eq!(
        wb.worksheet_by_name("GPM_Q1").unwrap().get_value("A1").unwrap(),
        CellValue::from("previous")
    );
    // only the data read was synced
    assert_eq!(addin.transport().syncs, 1);
}

#[tokio::test]
async fn test_missing_accounts() {
    let cases = [
        (
            ledger(&[("COGS", "Q1", 600.0.into())]),
            "No Revenue data found for period 'Q1'.",
        ),
        (
            ledger(&[("Revenue", "Q1", 1000.0.into())]),
            "No COGS data found for period 'Q1'.",
        ),
        (
            ledger(&[("Revenue", "q1", 1000.0.into()), ("COGS", "q1", 1.0.into())]),
            "No Revenue data found for period 'Q1'.",
        ),
    ];

    for (wb, expected) in cases {
        let mut addin = ready_addin(wb).await;
        click_with(&mut addin, "Q1").await;
        assert!(addin.pane().status.is_error());
        assert_eq!(addin.pane().status.text(), expected);
        assert!(addin.transport().inner.workbook().worksheet_by_name("GPM_Q1").is_none());
    }
}

#[tokio::test]
async fn test_labels_are_trimmed_and_amounts_coerced() {
    let wb = ledger(&[
        ("Revenue ", "Q1", 900.0.into()),
        (" cogs", " Q1 ", "300".into()),
        ("REVENUE", "Q1", "n/a".into()),
        ("Revenue", "Q1", 100.0.into()),
        ("Opex", "Q1", 50.0.into()),
    ]);
    let mut host = LocalHost::new(wb);

    let sheet = calculate(&mut host, &AddinConfig::default(), "Q1")
        .await
        .unwrap();
    assert_eq!(sheet, "GPM_Q1");

    let ws = host.workbook().worksheet_by_name("GPM_Q1").unwrap();
    assert_eq!(ws.get_value("B4").unwrap(), CellValue::Number(1000.0));
    assert_eq!(ws.get_value("B5").unwrap(), CellValue::Number(300.0));
    assert_eq!(ws.get_value("B7").unwrap(), CellValue::Number(0.7));
}

#[tokio::test]
async fn test_missing_table_is_a_host_error() {
    let config = AddinConfig {
        table: "Ledger".to_string(),
        ..AddinConfig::default()
    };
    let mut host = LocalHost::new(example());

    let err = calculate(&mut host, &config, "Q1").await.unwrap_err();
    assert!(matches!(err, HandlerError::Host(_)));
    let debug = err.debug_info().unwrap();
    assert_eq!(debug.error_location, "DataSheet!Ledger");
    assert_eq!(debug.operation_index, 0);
    assert_eq!(err.to_string(), "Table 'Ledger' not found on sheet 'DataSheet'");
}

#[tokio::test]
async fn test_invalid_sheet_name_is_reported() {
    let wb = ledger(&[
        ("Revenue", "Q1/Q2", 100.0.into()),
        ("COGS", "Q1/Q2", 40.0.into()),
    ]);
    let mut addin = ready_addin(wb).await;
    click_with(&mut addin, "Q1/Q2").await;

    assert!(addin.pane().status.is_error());
    assert!(addin.pane().status.text().starts_with("Invalid sheet name"));
    assert!(addin.pane().calculate.is_enabled());
}

#[tokio::test]
async fn test_other_host_is_not_attached() {
    let host = LocalHost::new(example()).with_info(HostInfo {
        host: HostKind::Word,
        platform: "local".to_string(),
    });
    let mut addin = Addin::new(Counting::new(host), AddinConfig::default());
    addin.pane_mut().status.report(&gpm_addin::Status::error("stale"));
    addin.on_ready().await;

    assert!(!addin.pane().calculate.is_attached());
    assert_eq!(addin.pane().status.text(), "stale");

    click_with(&mut addin, "Q1").await;
    assert_eq!(addin.transport().syncs, 0);
}

#[tokio::test]
async fn test_ready_clears_status_and_disabled_button_ignores_clicks() {
    let mut addin = Addin::new(Counting::new(LocalHost::new(example())), AddinConfig::default());
    addin.pane_mut().status.report(&gpm_addin::Status::error("stale"));
    addin.on_ready().await;
    assert_eq!(addin.pane().status.text(), "");

    addin.pane_mut().calculate.set_enabled(false);
    click_with(&mut addin, "Q1").await;
    assert_eq!(addin.transport().syncs, 0);
    assert_eq!(addin.pane().status.text(), "");
}

#[tokio::test]
async fn test_imported_period_labels_match_exactly() {
    let csv = "account,period,amount\n\
               Revenue,2024.10,1000\n\
               COGS,2024.10,600\n\
               Revenue,01,200\n\
               COGS,01,50\n";
    let wb = gpm_csv::CsvReader::read(csv.as_bytes(), &Default::default()).unwrap();
    let mut host = LocalHost::new(wb);
    let config = AddinConfig::default();

    let sheet = calculate(&mut host, &config, "2024.10").await.unwrap();
    assert_eq!(sheet, "GPM_2024.10");
    let ws = host.workbook().worksheet_by_name("GPM_2024.10").unwrap();
    assert_eq!(ws.get_value("B2").unwrap(), CellValue::Empty);
    assert_eq!(ws.get_value("B1").unwrap(), CellValue::from("2024.10"));
    assert_eq!(ws.get_value("B6").unwrap(), CellValue::Number(400.0));

    let sheet = calculate(&mut host, &config, "01").await.unwrap();
    assert_eq!(sheet, "GPM_01");
    let ws = host.workbook().worksheet_by_name("GPM_01").unwrap();
    assert_eq!(ws.get_value("B6").unwrap(), CellValue::Number(150.0));

    // "1" is a different period from "01"
    let err = calculate(&mut host, &config, "1").await.unwrap_err();
    assert_eq!(err.to_string(), "No Revenue data found for period '1'.");
}

//! gpm CLI - run the gross profit margin add-in against workbook files

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use gpm_addin::{Addin, AddinConfig, Status};
use gpm_core::Workbook;
use gpm_csv::{CsvReadOptions, CsvReader};
use gpm_host::{BridgeConfig, LocalHost, ProcessBridge, Transport};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gpm")]
#[command(author, version, about = "Gross profit margin add-in runner")]
struct Cli {
    /// More logging on stderr (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the margin for a period and write the summary sheet
    Calc {
        /// Workbook file (JSON)
        workbook: PathBuf,

        /// Period to calculate, e.g. Q1
        #[arg(short, long)]
        period: String,

        /// Save the result here instead of overwriting the input
        #[arg(short, long, conflicts_with = "bridge")]
        output: Option<PathBuf>,

        /// Host command to run instead of the in-process host; the workbook
        /// path is appended to its arguments (e.g. "gpm serve")
        #[arg(short, long)]
        bridge: Option<String>,

        #[command(flatten)]
        addin: AddinArgs,
    },

    /// Build a workbook from an account,period,amount CSV file
    Import {
        /// Input CSV file (with a header row)
        input: PathBuf,

        /// Workbook file to create
        #[arg(short, long)]
        output: PathBuf,

        /// Field delimiter (default: comma)
        #[arg(short, long, default_value = ",")]
        delimiter: char,

        #[command(flatten)]
        addin: AddinArgs,
    },

    /// Print a sheet with number formats applied
    Show {
        /// Workbook file (JSON)
        workbook: PathBuf,

        /// Sheet name (default: the active sheet)
        #[arg(short, long)]
        sheet: Option<String>,
    },

    /// Act as a host process: JSON requests on stdin, responses on stdout
    Serve {
        /// Workbook file (JSON), saved on shutdown
        workbook: PathBuf,
    },
}

/// Overrides for the add-in configuration
#[derive(Args)]
struct AddinArgs {
    /// Worksheet holding the ledger table
    #[arg(long)]
    data_sheet: Option<String>,

    /// Ledger table name
    #[arg(long)]
    table: Option<String>,

    /// Output sheet name prefix
    #[arg(long)]
    prefix: Option<String>,
}

impl AddinArgs {
    fn into_config(self) -> AddinConfig {
        let mut config = AddinConfig::default();
        if let Some(data_sheet) = self.data_sheet {
            config.data_sheet = data_sheet;
        }
        if let Some(table) = self.table {
            config.table = table;
        }
        if let Some(prefix) = self.prefix {
            config.output_prefix = prefix;
        }
        config
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Calc {
            workbook,
            period,
            output,
            bridge,
            addin,
        } => {
            let config = addin.into_config();
            let status = match bridge {
                Some(command) => calc_bridged(&workbook, &period, &command, config).await?,
                None => calc_local(&workbook, &period, output.as_deref(), config).await?,
            };
            if status.is_error {
                eprintln!("{}", status.message);
                return Ok(ExitCode::FAILURE);
            }
            println!("{}", status.message);
        }
        Commands::Import {
            input,
            output,
            delimiter,
            addin,
        } => import(&input, &output, delimiter, addin.into_config())?,
        Commands::Show { workbook, sheet } => show(&workbook, sheet.as_deref())?,
        Commands::Serve { workbook } => serve(&workbook).await?,
    }

    Ok(ExitCode::SUCCESS)
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // stdout carries protocol traffic under `serve`
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open(path: &Path) -> Result<Workbook> {
    Workbook::open_json(path).with_context(|| format!("Failed to open '{}'", path.display()))
}

/// Initialize the add-in, type the period and click once.
async fn click_once<T: Transport>(addin: &mut Addin<T>, period: &str) -> Result<Status> {
    addin.on_ready().await;
    if !addin.pane().calculate.is_attached() {
        bail!(
            "Host is not {}; the calculate button was not attached",
            addin.config().expected_host
        );
    }

    addin.pane_mut().period.set_value(period);
    addin.click().await;

    let status = addin.pane().status.text();
    Ok(Status {
        message: status.to_string(),
        is_error: addin.pane().status.is_error(),
    })
}

async fn calc_local(
    path: &Path,
    period: &str,
    output: Option<&Path>,
    config: AddinConfig,
) -> Result<Status> {
    let mut addin = Addin::new(LocalHost::new(open(path)?), config);
    let status = click_once(&mut addin, period).await?;

    // a failed run may still have changed the workbook (e.g. a deleted sheet)
    let workbook = addin.into_transport().into_workbook();
    let output = output.unwrap_or(path);
    workbook
        .save_json(output)
        .with_context(|| format!("Failed to write '{}'", output.display()))?;
    tracing::info!("Saved {}", output.display());

    Ok(status)
}

async fn calc_bridged(
    path: &Path,
    period: &str,
    command: &str,
    config: AddinConfig,
) -> Result<Status> {
    let bridge = BridgeConfig::from_command_line(command)
        .context("--bridge needs a command to run")?
        .arg(path.display().to_string());

    let host = ProcessBridge::start(bridge)
        .await
        .with_context(|| format!("Failed to start host '{command}'"))?;
    let mut addin = Addin::new(host, config);
    let status = click_once(&mut addin, period).await?;

    addin
        .into_transport()
        .shutdown()
        .await
        .context("Host did not shut down cleanly")?;

    Ok(status)
}

fn import(input: &Path, output: &Path, delimiter: char, config: AddinConfig) -> Result<()> {
    if !delimiter.is_ascii() {
        bail!("Delimiter must be a single ASCII character, got '{delimiter}'");
    }

    let options = CsvReadOptions {
        delimiter: delimiter as u8,
        sheet_name: config.data_sheet.clone(),
        table_name: config.table.clone(),
        ..Default::default()
    };
    let workbook = CsvReader::read_file(input, &options)
        .with_context(|| format!("Failed to import '{}'", input.display()))?;

    workbook
        .save_json(output)
        .with_context(|| format!("Failed to write '{}'", output.display()))?;

    let rows = workbook
        .table(&config.data_sheet, &config.table)
        .map(|t| t.range().row_count() - 1)
        .unwrap_or(0);
    eprintln!("Imported {} rows to '{}'", rows, output.display());
    Ok(())
}

fn show(path: &Path, sheet: Option<&str>) -> Result<()> {
    let workbook = open(path)?;

    let ws = match sheet {
        Some(name) => workbook
            .worksheet_by_name(name)
            .with_context(|| format!("Sheet '{name}' not found"))?,
        None => workbook
            .active_worksheet()
            .context("Workbook has no sheets")?,
    };

    println!("Sheet: {}", ws.name());
    let Some(used) = ws.used_range() else {
        eprintln!("Warning: Sheet appears to be empty");
        return Ok(());
    };

    let rows: Vec<Vec<String>> = (0..=used.end.row)
        .map(|row| {
            (0..=used.end.col)
                .map(|col| ws.display_text_at(row, col))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = (0..=used.end.col as usize)
        .map(|col| {
            rows.iter()
                .map(|row| row[col].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(text, &width)| format!("{text:<width$}"))
            .collect();
        println!("{}", line.join("  ").trim_end());
    }

    Ok(())
}

async fn serve(path: &Path) -> Result<()> {
    let mut host = LocalHost::new(open(path)?);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    gpm_host::serve(&mut host, stdin, stdout)
        .await
        .context("Host loop failed")?;

    host.workbook()
        .save_json(path)
        .with_context(|| format!("Failed to write '{}'", path.display()))?;
    tracing::info!("Saved {}", path.display());
    Ok(())
}

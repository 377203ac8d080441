//! `haulbook`: terminal front end for the freight back office.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use haulbook_client::{ApiClient, ClientConfig, ClientError, LedgerTarget, PageQuery, Resource};
use haulbook_console::render;
use haulbook_console::{
    LedgerView, ListSource, ListView, Outcome, PartyList, ResourceList, TracingNotifier, TruckList,
};
use haulbook_core::{BookingId, PartyId, TruckId};
use haulbook_export::{
    Artifact, ExportFormat, export_parties, export_records, export_trucks, ledger_table,
    parties_table, records_table, trucks_table, write_file,
};
use haulbook_ledger::{DateRange, LedgerColumn, format_currency};
use haulbook_parties::{PartialPaymentRequest, PaymentMode, bookings_index};

#[derive(Parser)]
#[command(name = "haulbook", version, about = "Party and truck ledgers from the command line")]
struct Cli {
    /// API base URL (overrides HAULBOOK_API_URL).
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Bearer token (overrides HAULBOOK_AUTH_TOKEN).
    #[arg(long, global = true)]
    token: Option<String>,

    /// Request timeout in seconds (overrides HAULBOOK_HTTP_TIMEOUT_SECS).
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Clone, Copy)]
struct RangeArgs {
    /// First day to include (YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last day to include (YYYY-MM-DD).
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl RangeArgs {
    fn range(&self) -> anyhow::Result<DateRange> {
        Ok(DateRange::new(self.from, self.to)?)
    }
}

#[derive(Args)]
struct ExportArgs {
    /// Write an artifact (`csv` or `print`) instead of only printing.
    #[arg(long)]
    export: Option<ExportFormat>,
    /// Directory to write the artifact into.
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// List parties with their freight, payments and balance.
    Parties {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[command(flatten)]
        range: RangeArgs,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Show a party's ledger.
    PartyLedger {
        party: PartyId,
        #[command(flatten)]
        range: RangeArgs,
        /// Columns to show/export, comma separated.
        #[arg(long, value_delimiter = ',')]
        columns: Vec<LedgerColumn>,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// List trucks with freight, commission and payable amounts.
    Trucks {
        #[arg(long)]
        search: Option<String>,
        #[command(flatten)]
        range: RangeArgs,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Show a truck's ledger.
    TruckLedger {
        truck: TruckId,
        #[command(flatten)]
        range: RangeArgs,
        #[arg(long, value_delimiter = ',')]
        columns: Vec<LedgerColumn>,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Save a booking record, by id or by a row of a party ledger.
    Booking {
        #[arg(required_unless_present = "party")]
        id: Option<BookingId>,
        /// Party whose ledger row links to the booking.
        #[arg(long, requires = "row", conflicts_with = "id")]
        party: Option<PartyId>,
        /// 1-based ledger row.
        #[arg(long)]
        row: Option<usize>,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Record a partial payment from a party.
    Pay {
        #[arg(long)]
        party: PartyId,
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        mode: PaymentMode,
        /// Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        reference: Option<String>,
        #[arg(long)]
        remarks: Option<String>,
        /// Bookings the payment settles.
        #[arg(long = "booking")]
        bookings: Vec<BookingId>,
    },
    /// Page through a back-office resource (banks, companies, challans,
    /// haltings, truck-payments).
    List {
        resource: Resource,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        search: Option<String>,
        /// JSON keys to show, comma separated.
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,
        #[command(flatten)]
        export: ExportArgs,
    },
}

fn config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        let mut overridden = ClientConfig::new(url.clone()).with_timeout(config.timeout());
        if let Some(token) = config.token() {
            overridden = overridden.with_token(token);
        }
        config = overridden;
    }
    if let Some(token) = &cli.token {
        config = config.with_token(token.clone());
    }
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs.max(1)));
    }
    Ok(config)
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn write_artifact(artifact: &Artifact, out: &Path) -> anyhow::Result<()> {
    let path = artifact
        .write_to(out)
        .with_context(|| format!("writing {}", artifact.file_name))?;
    println!("Saved {}", path.display());
    Ok(())
}

async fn show_ledger(
    client: &ApiClient,
    target: LedgerTarget,
    range: DateRange,
    columns: Vec<LedgerColumn>,
    export: &ExportArgs,
) -> anyhow::Result<()> {
    let view = LedgerView::new(Arc::new(client.clone()), Arc::new(TracingNotifier));

    if let LedgerTarget::Party(id) = target {
        match client.party_details(id).await {
            Ok(details) => view.attach_bookings(target, bookings_index(&details.bookings)),
            Err(err) => tracing::warn!(error = %err, "party bookings unavailable; rows will not link to bookings"),
        }
    }

    if let Outcome::Failed(message) = view.select(target, range).await? {
        bail!(message);
    }
    let Some(loaded) = view.loaded() else {
        bail!("no ledger loaded for {target}");
    };
    let sheet = &loaded.sheet;

    let columns = if columns.is_empty() {
        LedgerColumn::defaults_for(target.kind())
    } else {
        columns
    };

    if view.is_empty_ledger() {
        println!("{}", sheet.title);
        println!("Opening Balance: {}", sheet.opening_balance);
        println!("Closing Balance: {}", sheet.closing_balance);
        println!();
        println!("No ledger entries for the selected period.");
    } else {
        print!("{}", render::text(&ledger_table(sheet, &columns)?));
        let linked: Vec<String> = sheet
            .rows
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.booking_id.map(|b| format!("row {} -> booking {b}", i + 1)))
            .collect();
        if !linked.is_empty() {
            println!();
            println!("Booking links: {}", linked.join(", "));
        }
    }

    if let Some(format) = export.export {
        let artifact = view.export(format, Some(&columns), today())?;
        write_artifact(&artifact, &export.out)?;
    }
    Ok(())
}

async fn load_list<L: ListSource>(view: &ListView<L, TracingNotifier>) -> anyhow::Result<Vec<L::Item>> {
    if let Outcome::Failed(message) = view.refresh().await? {
        bail!(message);
    }
    Ok(view.items())
}

async fn save_booking(client: &ApiClient, id: BookingId, out: &Path) -> anyhow::Result<()> {
    let booking = client.booking(id).await?;
    let file_name = format!("booking-{id}.json");
    let path = write_file(out, &file_name, &serde_json::to_vec_pretty(&booking)?)
        .with_context(|| format!("writing {file_name}"))?;
    println!("Saved {}", path.display());
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = ApiClient::new(config(&cli)?)?;
    let notifier = Arc::new(TracingNotifier);

    match cli.command {
        Command::Parties {
            search,
            status,
            range,
            export,
        } => {
            let source = PartyList {
                client,
                status,
                range: range.range()?,
            };
            let query = PageQuery::default().with_search(search.unwrap_or_default());
            let view = ListView::with_query(Arc::new(source), notifier, query);
            let parties = load_list(&view).await?;
            if parties.is_empty() {
                println!("No parties found.");
                return Ok(());
            }
            print!("{}", render::text(&parties_table(&parties)?));
            if let Some(format) = export.export {
                write_artifact(&export_parties(&parties, format, today())?, &export.out)?;
            }
        }

        Command::PartyLedger {
            party,
            range,
            columns,
            export,
        } => {
            show_ledger(&client, LedgerTarget::Party(party), range.range()?, columns, &export).await?;
        }

        Command::Trucks {
            search,
            range,
            export,
        } => {
            let source = TruckList {
                client,
                range: range.range()?,
            };
            let query = PageQuery::default().with_search(search.unwrap_or_default());
            let view = ListView::with_query(Arc::new(source), notifier, query);
            let trucks = load_list(&view).await?;
            if trucks.is_empty() {
                println!("No trucks found.");
                return Ok(());
            }
            print!("{}", render::text(&trucks_table(&trucks)?));
            if let Some(format) = export.export {
                write_artifact(&export_trucks(&trucks, format, today())?, &export.out)?;
            }
        }

        Command::TruckLedger {
            truck,
            range,
            columns,
            export,
        } => {
            show_ledger(&client, LedgerTarget::Truck(truck), range.range()?, columns, &export).await?;
        }

        Command::Booking { id, party, row, out } => {
            let id = match (id, party, row) {
                (Some(id), _, _) => id,
                (None, Some(party), Some(row)) => {
                    let target = LedgerTarget::Party(party);
                    let view = LedgerView::new(Arc::new(client.clone()), notifier);
                    let details = client.party_details(party).await?;
                    view.attach_bookings(target, bookings_index(&details.bookings));
                    if let Outcome::Failed(message) = view.select(target, DateRange::all()).await? {
                        bail!(message);
                    }
                    view.booking_pdf_target(row.saturating_sub(1))
                        .with_context(|| format!("row {row} of party {party} is not linked to a booking"))?
                }
                _ => bail!("give a booking id, or --party with --row"),
            };
            save_booking(&client, id, &out).await?;
        }

        Command::Pay {
            party,
            amount,
            mode,
            date,
            reference,
            remarks,
            bookings,
        } => {
            let outstanding = match client.party_details(party).await {
                Ok(details) => Some(details.summary.balance),
                Err(err) => {
                    tracing::warn!(error = %err, "outstanding balance unknown; skipping the limit check");
                    None
                }
            };
            let request = PartialPaymentRequest {
                party_id: party,
                amount,
                payment_date: Some(date.unwrap_or_else(today)),
                payment_mode: mode,
                reference_no: reference,
                remarks,
                booking_ids: bookings,
            };

            match client.submit_partial_payment(&request, today(), outstanding).await {
                Ok(message) => {
                    println!(
                        "{}",
                        message.unwrap_or_else(|| format!(
                            "Recorded payment of {} from party {party}",
                            format_currency(Some(amount))
                        ))
                    );
                }
                Err(ClientError::Validation(errors)) => {
                    for e in &errors.0 {
                        eprintln!("{}: {}", e.field, e.message);
                    }
                    bail!("payment not submitted");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Command::List {
            resource,
            page,
            search,
            columns,
            export,
        } => {
            let source = ResourceList { client, resource };
            let query = PageQuery::page(page).with_search(search.unwrap_or_default());
            let view = ListView::with_query(Arc::new(source), notifier, query);
            let records = load_list(&view).await?;
            if records.is_empty() {
                println!("No {} found.", resource.plural());
                return Ok(());
            }
            print!("{}", render::text(&records_table(resource.plural(), &records, &columns)?));
            if let Some((page, total, count)) = view.position() {
                println!();
                println!("Page {page} of {} ({count} records)", total.max(1));
            }
            if let Some(format) = export.export {
                let artifact = export_records(resource.plural(), &records, &columns, format, today())?;
                write_artifact(&artifact, &export.out)?;
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    haulbook_observability::init();
    run(Cli::parse()).await
}

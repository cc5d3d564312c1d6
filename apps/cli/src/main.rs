use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    process::ExitCode,
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    ControllerEvent, HttpOrdersClient, InvoiceController, OrdersApi, UploadFile,
};
use shared::{
    domain::{FieldPath, OrderId},
    invoice::Document,
};
use tokio::sync::broadcast;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod edits;
mod render;
mod settings;

use edits::{FieldAssignment, ItemAssignment};
use settings::Settings;

#[derive(Parser, Debug)]
#[command(name = "invoice", about = "Extract, review and manage sales-order invoices")]
struct Cli {
    /// Base URL of the orders API, e.g. http://localhost:5000/api
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Settings file to read instead of ./invoice.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract invoice data from a PNG, JPG, JPEG or PDF file.
    Upload {
        path: PathBuf,
        /// Persist the extracted invoice as a new order.
        #[arg(long)]
        save: bool,
        #[arg(long)]
        json: bool,
    },
    /// List stored orders one page at a time.
    Orders {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Print a stored order.
    Show {
        id: i64,
        /// Print a single field instead, e.g. `--field shipping.poNumber`.
        #[arg(long, value_name = "PATH", conflicts_with = "json")]
        field: Option<FieldPath>,
        #[arg(long)]
        json: bool,
    },
    /// Create an order from a JSON invoice document.
    Create { document: PathBuf },
    /// Edit a stored order and save it.
    Edit(EditArgs),
    /// Delete a stored order.
    Delete {
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Check that the orders API is reachable.
    Health,
}

/// Edits apply in this order: `--set`, `--remove-item`, `--add-item`,
/// `--item`, `--tax-rate`, `--shipping`.
#[derive(Args, Debug)]
struct EditArgs {
    id: i64,
    /// Replace a field, e.g. `--set vendor.phone=555-0100`.
    #[arg(long = "set", value_name = "PATH=VALUE")]
    fields: Vec<FieldAssignment>,
    /// Edit a line item, e.g. `--item 0.quantity=3`.
    #[arg(long = "item", value_name = "INDEX.FIELD=VALUE")]
    items: Vec<ItemAssignment>,
    /// Append blank line items.
    #[arg(long, value_name = "N", default_value_t = 0)]
    add_item: usize,
    /// Remove the line item at this index (indices of the loaded order).
    #[arg(long = "remove-item", value_name = "INDEX")]
    remove_items: Vec<usize>,
    #[arg(long)]
    tax_rate: Option<f64>,
    #[arg(long)]
    shipping: Option<f64>,
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref(), cli.api_url.clone())?;
    debug!(?settings, "loaded settings");
    let api = Arc::new(
        HttpOrdersClient::with_timeout(&settings.api_url, settings.request_timeout())
            .with_context(|| format!("cannot use API url '{}'", settings.api_url))?,
    );
    let controller = InvoiceController::new(api.clone(), settings.page_size);
    let mut events = controller.subscribe_events();

    let outcome = run(cli.command, &controller, api.as_ref()).await;
    let reported_error = print_notifications(&mut events);

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) if reported_error => {
            debug!(error = %err, "command failed");
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err),
    }
}

/// Prints queued controller notifications. Returns whether any was an error.
fn print_notifications(events: &mut broadcast::Receiver<ControllerEvent>) -> bool {
    let mut reported_error = false;
    while let Ok(event) = events.try_recv() {
        let ControllerEvent::Notification(notification) = event else {
            continue;
        };
        if notification.is_error() {
            reported_error = true;
            eprintln!("{}: {}", notification.title, notification.message);
        } else {
            println!("{}: {}", notification.title, notification.message);
        }
    }
    reported_error
}

fn print_document(document: &Document, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(document)?);
    } else {
        println!("{}", render::document(document));
    }
    Ok(())
}

async fn loaded_document(controller: &InvoiceController) -> Result<Document> {
    controller
        .document()
        .await
        .context("no invoice is loaded")
}

async fn run(command: Command, controller: &InvoiceController, api: &dyn OrdersApi) -> Result<()> {
    match command {
        Command::Upload { path, save, json } => {
            let file = UploadFile::from_path(&path).await?;
            controller.upload(file).await?;
            print_document(&loaded_document(controller).await?, json)?;
            if save {
                let order_id = controller.create_order().await?;
                print_created(order_id);
            }
        }
        Command::Orders { page } => {
            controller.refresh_orders().await?;
            controller.set_page(page).await;
            println!("{}", render::orders(&controller.snapshot().await));
        }
        Command::Show { id, field, json } => {
            controller.view_order(OrderId(id)).await?;
            let document = loaded_document(controller).await?;
            match field {
                Some(path) => println!("{}", document.field(path)),
                None => print_document(&document, json)?,
            }
        }
        Command::Create { document } => {
            let raw = tokio::fs::read_to_string(&document)
                .await
                .with_context(|| format!("failed to read '{}'", document.display()))?;
            let mut invoice: Document = serde_json::from_str(&raw)
                .with_context(|| format!("'{}' is not an invoice document", document.display()))?;
            invoice.recompute_all();
            controller.load_extracted(invoice).await;
            let order_id = controller.create_order().await?;
            print_created(order_id);
        }
        Command::Edit(args) => edit(controller, args).await?,
        Command::Delete { id, yes } => {
            let order_id = OrderId(id);
            controller.request_delete(order_id).await;
            if !yes && !confirm(&format!("Delete order {order_id}?"))? {
                controller.cancel_delete().await;
                println!("Cancelled.");
                return Ok(());
            }
            controller.confirm_delete().await?;
        }
        Command::Health => {
            let health = api.health().await?;
            println!("{}", health.status);
        }
    }
    Ok(())
}

fn print_created(order_id: Option<OrderId>) {
    match order_id {
        Some(order_id) => println!("Created order {order_id}"),
        None => println!("Created order"),
    }
}

async fn edit(controller: &InvoiceController, args: EditArgs) -> Result<()> {
    controller.view_order(OrderId(args.id)).await?;

    for FieldAssignment { path, value } in &args.fields {
        controller.edit_field(*path, value).await?;
    }

    let mut removals = args.remove_items.clone();
    removals.sort_unstable_by(|a, b| b.cmp(a));
    removals.dedup();
    for index in removals {
        controller.remove_line_item(index).await?;
    }

    for _ in 0..args.add_item {
        controller.add_line_item().await?;
    }
    for ItemAssignment { index, edit } in args.items {
        controller.edit_line_item(index, edit).await?;
    }
    if let Some(tax_rate) = args.tax_rate {
        controller.set_tax_rate(tax_rate).await?;
    }
    if let Some(amount) = args.shipping {
        controller.set_shipping_handling(amount).await?;
    }

    let document = loaded_document(controller).await?;
    controller.update_order().await?;
    print_document(&document, args.json)
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

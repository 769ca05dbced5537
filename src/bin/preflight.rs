use sheet_console::domain::model::{ColumnSpec, Person, Product, SheetEntity};
use sheet_console::infra::sheets;
use sheet_console::storage::sheet::RowStoreAdapter;
use sheet_console::{AppConfig, SheetBackend};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--init-headers]\n\
         \n\
         Reads env vars (or .env):\n\
           GOOGLE_SHEETS_SPREADSHEET_ID, GOOGLE_SHEETS_ACCESS_TOKEN,\n\
           GOOGLE_SHEETS_API_BASE, SHEETS_TIMEOUT_SECS, USER_SHEET, PRODUCT_SHEET\n\
         Without GOOGLE_SHEETS_SPREADSHEET_ID the server runs in development mode.\n"
    );
    std::process::exit(2);
}

async fn check_sheet(
    backend: Arc<dyn SheetBackend>,
    sheet: &str,
    columns: &'static [ColumnSpec],
    init_headers: bool,
) -> anyhow::Result<()> {
    let adapter = RowStoreAdapter::new(backend, sheet, columns);
    let rows = adapter.list_all().await?;
    println!("  Sheet '{}': {} data row(s)", adapter.sheet(), rows.len());
    if init_headers {
        if adapter.ensure_header().await? {
            println!("  Sheet '{}': header row written.", adapter.sheet());
        } else {
            println!("  Sheet '{}': not empty, header left as is.", adapter.sheet());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let init_headers = args.iter().any(|a| a == "--init-headers");

    let config = AppConfig::from_env()?;
    println!("> Preflight:");
    match &config.sheets {
        Some(s) => {
            println!("  Mode: production (Google Sheets)");
            println!("  GOOGLE_SHEETS_SPREADSHEET_ID={}", s.spreadsheet_id);
            println!("  GOOGLE_SHEETS_API_BASE={}", s.api_base);
            println!(
                "  GOOGLE_SHEETS_ACCESS_TOKEN={}",
                if s.access_token.is_some() { "set" } else { "MISSING" }
            );
        }
        None => println!("  Mode: development (in-memory, nothing persisted)"),
    }

    let backend = sheets::connect(&config)?;
    backend
        .ping()
        .await
        .map_err(|e| anyhow::anyhow!("Backing store check failed: {}", e))?;
    println!("  Backing store reachable.");

    check_sheet(backend.clone(), &config.user_sheet, Person::columns(), init_headers).await?;
    check_sheet(backend, &config.product_sheet, Product::columns(), init_headers).await?;

    println!("> Preflight OK.");
    Ok(())
}

mod render;

use std::sync::Arc;

use anyhow::{bail, Context};
use bank_core::list_view::{SortDirection, SortKey, SortSpec};
use bank_core::pages::{ClientDetailPage, ClientListPage, DashboardPage};
use bank_core::{error_message, BankApi, BankClient, ClientConfig, MemoryTokenStore, UreqTransport};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "bank-cli", version, about = "Bank clients, loans and deposits")]
struct Cli {
    /// API base URL (overrides BANK_API_URL)
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Totals and the most recent clients
    Dashboard,
    /// Client table with local search and sort
    Clients {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,
    },
    /// One client with loans and deposits
    Show { id: i64 },
    DeleteClient {
        id: i64,
        /// Also delete the client's loans and deposits
        #[arg(long)]
        force: bool,
    },
    DeleteLoan { id: i64 },
    DeleteDeposit { id: i64 },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SortArg {
    Name,
    Age,
    Salary,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortKey::Name,
            SortArg::Age => SortKey::Age,
            SortArg::Salary => SortKey::Salary,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = ClientConfig::load().context("invalid BANK_* configuration")?;
    if let Some(url) = cli.base_url {
        config.api_url = url;
    }
    tracing::debug!(api_url = %config.api_url, timeout_ms = config.timeout_ms, "configured");

    let mut client = BankClient::new(&config.api_url);
    if let Some(token) = &config.api_token {
        client = client.with_token_store(Arc::new(MemoryTokenStore::with_token(token.clone())));
    }
    let api = BankApi::new(client, UreqTransport::from_config(&config));

    match cli.command {
        Command::Dashboard => {
            let mut page = DashboardPage::new();
            page.load(&api);
            if let Some(error) = page.error() {
                bail!("{error}");
            }
            print!("{}", render::dashboard(&page.stats()));
        }
        Command::Clients { search, sort, desc } => {
            let mut page = ClientListPage::new();
            page.load(&api);
            if let Some(error) = page.error() {
                bail!("{error}");
            }
            if let Some(query) = search {
                page.set_query(query);
            }
            if let Some(key) = sort {
                let direction = if desc {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                };
                page.set_sort(SortSpec::by(key.into(), direction));
            }
            print!("{}", render::client_list(&page));
        }
        Command::Show { id } => {
            let mut page = ClientDetailPage::new(id);
            page.load(&api);
            match (page.client(), page.error()) {
                (Some(full), None) => print!("{}", render::client_full(full)),
                (_, Some(error)) => bail!("{error}"),
                (None, None) => bail!("client #{id} not loaded"),
            }
        }
        Command::DeleteClient { id, force } => {
            if let Err(e) = api.delete_client(id, force) {
                bail!("{}", error_message(&e));
            }
            println!("Deleted client #{id}");
        }
        Command::DeleteLoan { id } => {
            if let Err(e) = api.delete_loan(id) {
                bail!("{}", error_message(&e));
            }
            println!("Deleted loan #{id}");
        }
        Command::DeleteDeposit { id } => {
            if let Err(e) = api.delete_deposit(id) {
                bail!("{}", error_message(&e));
            }
            println!("Deleted deposit #{id}");
        }
    }
    Ok(())
}

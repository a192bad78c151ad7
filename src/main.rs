use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result, miette};
use serde::Serialize;
use serde_json::json;
use std::process::ExitCode;
use std::sync::Arc;
use storefront::application::auth::Authenticator;
use storefront::application::cart::CartStore;
use storefront::application::catalog;
use storefront::application::checkout::CheckoutOrchestrator;
use storefront::application::orders::OrderHistory;
use storefront::config::{CatalogSettings, GatewaySettings, SessionSettings, StorageSettings};
use storefront::domain::cart::ProductSnapshot;
use storefront::domain::catalog::{DEFAULT_PAGE_SIZE, PriceRange, QuerySpec, SortKey};
use storefront::domain::order::Address;
use storefront::domain::ports::SessionStoreRef;
use storefront::infrastructure::auth::{DemoCredentials, InMemorySessionStore, SessionAuth};
use storefront::interfaces::json::checkout::CheckoutResponse;
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    storage: StorageSettings,

    #[command(flatten)]
    catalog: CatalogSettings,

    #[command(flatten)]
    gateway: GatewaySettings,

    #[command(flatten)]
    sessions: SessionSettings,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "STOREFRONT_LOG", default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Filter, sort and paginate the catalog
    Products(ProductsArgs),
    /// List the categories and brands available as filters
    Facets,
    /// Inspect or change the shopper's cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Pay for the cart and record the order
    Checkout(CheckoutArgs),
    /// Log in with a demo account
    Login(Credentials),
    /// List recorded orders (host only)
    Orders(Credentials),
}

#[derive(clap::Args)]
struct ProductsArgs {
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    brand: Option<String>,
    /// Inclusive price range as `min-max`
    #[arg(long)]
    price: Option<String>,
    /// none, price-asc, price-desc or rating-desc
    #[arg(long, default_value_t = SortKey::None)]
    sort: SortKey,
    #[arg(long)]
    search: Option<String>,
    #[arg(long, default_value_t = 1)]
    page: usize,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,
}

#[derive(Subcommand)]
enum CartAction {
    Show,
    Add { id: u64 },
    Inc { id: u64 },
    Dec { id: u64 },
    Remove { id: u64 },
    Clear,
}

#[derive(clap::Args)]
struct CheckoutArgs {
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    line1: String,
    #[arg(long, default_value = "")]
    city: String,
    #[arg(long, default_value = "")]
    state: String,
    #[arg(long, default_value = "")]
    pincode: String,
    /// Amount to charge; defaults to the cart total
    #[arg(long)]
    amount: Option<f64>,
}

#[derive(clap::Args)]
struct Credentials {
    #[arg(long, default_value = "")]
    username: String,
    #[arg(long, default_value = "")]
    password: String,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{out}");
    Ok(())
}

fn print_cart(cart: &CartStore) -> Result<()> {
    print_json(&json!({
        "items": cart.lines(),
        "count": cart.item_count(),
        "total": cart.total(),
    }))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    storefront::logging::init(&cli.log_level);

    match cli.command {
        Command::Products(args) => {
            let products = cli.catalog.source().load().await.into_diagnostic()?;
            let price_range = args.price.as_deref().and_then(|raw| {
                let range = PriceRange::parse(raw);
                if range.is_none() {
                    warn!(price = raw, "ignoring malformed price range");
                }
                range
            });
            let spec = QuerySpec {
                category: args.category,
                brand: args.brand,
                price_range,
                sort: args.sort,
                search: args.search,
                page: args.page,
                page_size: args.page_size,
            };
            print_json(&catalog::query(&products, &spec))?;
        }
        Command::Facets => {
            let products = cli.catalog.source().load().await.into_diagnostic()?;
            print_json(&catalog::facets(&products))?;
        }
        Command::Cart { action } => {
            let storage = cli.storage.open().into_diagnostic()?;
            let mut cart = CartStore::load(storage.cart_for(&cli.storage.shopper)).await;
            match action {
                CartAction::Show => {}
                CartAction::Add { id } => {
                    let products = cli.catalog.source().load().await.into_diagnostic()?;
                    let product = products
                        .iter()
                        .find(|p| p.id == id)
                        .ok_or_else(|| miette!("product {id} not found in catalog"))?;
                    cart.add(id, ProductSnapshot::from(product))
                        .await
                        .into_diagnostic()?;
                }
                CartAction::Inc { id } => cart.increment(id).await.into_diagnostic()?,
                CartAction::Dec { id } => cart.decrement(id).await.into_diagnostic()?,
                CartAction::Remove { id } => cart.remove(id).await.into_diagnostic()?,
                CartAction::Clear => cart.clear().await.into_diagnostic()?,
            }
            print_cart(&cart)?;
        }
        Command::Checkout(args) => {
            let storage = cli.storage.open().into_diagnostic()?;
            let mut cart = CartStore::load(storage.cart_for(&cli.storage.shopper)).await;
            let orchestrator = CheckoutOrchestrator::new(cli.gateway.build(), storage.ledger);
            info!(gateway = orchestrator.gateway_name(), "payment gateway selected");
            let address = Address {
                name: args.name,
                line1: args.line1,
                city: args.city,
                state: args.state,
                pincode: args.pincode,
            };
            let amount = args
                .amount
                .unwrap_or_else(|| cart.total().map_or(0.0, |total| total as f64));
            let response: CheckoutResponse =
                orchestrator.checkout(&mut cart, amount, &address).await.into();
            print_json(&response)?;
            if response.is_error() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Login(credentials) => {
            let sessions: SessionStoreRef = Arc::new(InMemorySessionStore::new(cli.sessions.ttl()));
            let authenticator = Authenticator::new(DemoCredentials::default(), sessions);
            match authenticator
                .login(&credentials.username, &credentials.password)
                .await
            {
                Ok(grant) => print_json(&grant)?,
                Err(e) => {
                    print_json(&json!({ "error": e.to_string() }))?;
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::Orders(credentials) => {
            let sessions: SessionStoreRef = Arc::new(InMemorySessionStore::new(cli.sessions.ttl()));
            let authenticator = Authenticator::new(DemoCredentials::default(), sessions.clone());
            let token = authenticator
                .login(&credentials.username, &credentials.password)
                .await
                .ok()
                .map(|grant| grant.token);
            let auth = SessionAuth::new(sessions, token);

            let storage = cli.storage.open().into_diagnostic()?;
            let history = OrderHistory::new(storage.ledger);
            match history.list(&auth).await {
                Ok(orders) => print_json(&orders)?,
                Err(e) => {
                    print_json(&json!({ "error": e.to_string() }))?;
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

use checkout_flow::application::controller::CheckoutController;
use checkout_flow::config::CheckoutConfig;
use checkout_flow::domain::ports::{CheckoutBackendBox, NavigatorBox, PaymentProviderBox};
use checkout_flow::infrastructure::http::HttpCheckoutBackend;
use checkout_flow::interfaces::console::{ConsoleNavigator, ConsoleProvider};
use checkout_flow::interfaces::form::{form_from_pairs, parse_assignments};
use checkout_flow::telemetry::setup_tracing;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use tokio::io::{self, BufReader};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Checkout form fields as name=value (fname, email, phone, address,
    /// total, payment_method)
    fields: Vec<String>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Storefront base URL (overrides the config file)
    #[arg(long)]
    base_url: Option<String>,

    /// CSRF token of the rendered checkout page
    #[arg(long)]
    csrf_token: Option<String>,

    /// Seconds to wait for the payment widget before giving up
    #[arg(long)]
    provider_timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CheckoutConfig::from_path(path).into_diagnostic()?,
        None => CheckoutConfig::default(),
    };
    if let Some(base_url) = cli.base_url {
        config.backend.base_url = base_url;
    }
    if let Some(token) = cli.csrf_token {
        config.backend.csrf_token = token;
    }
    if cli.provider_timeout.is_some() {
        config.provider_timeout_secs = cli.provider_timeout;
    }
    config.validate().into_diagnostic()?;

    let backend: CheckoutBackendBox =
        Box::new(HttpCheckoutBackend::new(config.backend.clone()).into_diagnostic()?);
    // Widget options go to stderr, the widget callback comes in on stdin.
    let provider: PaymentProviderBox =
        Box::new(ConsoleProvider::new(BufReader::new(io::stdin()), io::stderr()));
    let navigator: NavigatorBox = Box::new(ConsoleNavigator::new(
        io::stdout(),
        Some(config.backend.base_url.clone()),
    ));

    let controller = CheckoutController::new(backend, provider, navigator, &config);

    let form = form_from_pairs(parse_assignments(&cli.fields));
    controller.submit_form(form).await.into_diagnostic()?;

    Ok(())
}

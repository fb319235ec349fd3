//! CLI harness for exercising the reveal flow
//!
//! Runs the controller against the in-memory secure store, so the whole
//! flow can be driven from a terminal:
//! - Scripted prompt outcomes (approve, cancel, fail) and retries
//! - Legacy record migration
//! - Devices that lost biometrics or passcode
//! - Secret classification

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use reveal_core::{
    classify_str, inspect_mnemonic, is_private_key_hex, RevealConfig, RevealController,
    RevealPhase, RevealView, WalletRecord,
};
use reveal_vault::{
    AccessPolicy, AuthOutcome, KeystoreVault, KeystoreVaultConfig, MockSecureStore, Platform,
    SecretLocator, StoreCapabilities, WalletId, WalletSecret,
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "reveal-harness")]
#[command(about = "Wallet secret reveal testing harness", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reveal a secret stored in an in-memory secure store
    Reveal(RevealArgs),

    /// Classify a secret as phrase or key
    Classify {
        /// Secret text
        secret: String,
    },
}

#[derive(Args)]
struct RevealArgs {
    /// Wallet id
    #[arg(short, long, default_value = "w1")]
    wallet: String,

    /// Secret to store before revealing
    #[arg(short, long)]
    secret: String,

    /// Platform profile (android, ios, macos, windows, linux)
    #[arg(short, long)]
    platform: Option<String>,

    /// Prompt outcomes, in order; later prompts approve
    #[arg(short, long, value_enum, value_delimiter = ',')]
    outcomes: Vec<Outcome>,

    /// Retries allowed after a denied prompt
    #[arg(short, long, default_value = "1")]
    retries: u32,

    /// Store the secret as an unprotected pre-migration record
    #[arg(long)]
    legacy: bool,

    /// Protect the secret with biometrics only
    #[arg(long)]
    biometry_only: bool,

    /// Remove enrolled biometrics before revealing
    #[arg(long)]
    no_biometrics: bool,

    /// Remove the device passcode before revealing
    #[arg(long)]
    no_passcode: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Outcome {
    Approve,
    Cancel,
    Fail,
}

impl From<Outcome> for AuthOutcome {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Approve => AuthOutcome::Approve,
            Outcome::Cancel => AuthOutcome::Cancel,
            Outcome::Fail => AuthOutcome::Fail,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Reveal(args) => run_reveal(args).await?,
        Commands::Classify { secret } => run_classify(&secret),
    }

    Ok(())
}

async fn run_reveal(args: RevealArgs) -> anyhow::Result<()> {
    let (platform, config) = match args.platform.as_deref() {
        Some(name) => {
            let platform = Platform::from_name(name);
            (platform, RevealConfig::for_platform(platform))
        }
        None => (Platform::current(), RevealConfig::for_current_platform()),
    };
    info!(
        "Platform profile: {:?} (startup delay {:?})",
        platform,
        config.startup_delay()
    );

    let store = Arc::new(MockSecureStore::with_capabilities(StoreCapabilities {
        platform,
        has_biometrics: true,
        has_passcode: true,
    }));
    let policy = if args.biometry_only {
        AccessPolicy::BiometryOnly
    } else {
        AccessPolicy::BiometryOrPasscode
    };
    let vault = KeystoreVault::with_config(
        store.clone(),
        KeystoreVaultConfig {
            migration_policy: policy,
            ..KeystoreVaultConfig::default()
        },
    );

    let wallet_id = WalletId::new(args.wallet);
    let locator = SecretLocator::new(&wallet_id);
    if args.legacy {
        store.insert(
            &locator.legacy_key(),
            args.secret.as_bytes(),
            AccessPolicy::Unprotected,
        );
    } else {
        vault
            .save_secret(&wallet_id, &WalletSecret::new(args.secret))
            .await
            .context("failed to store secret")?;
    }

    if args.no_biometrics || args.no_passcode {
        store.set_capabilities(StoreCapabilities {
            platform,
            has_biometrics: !args.no_biometrics,
            has_passcode: !args.no_passcode,
        });
    }
    for outcome in args.outcomes {
        store.push_outcome(outcome.into());
    }

    let controller = RevealController::new(
        WalletRecord::new(wallet_id),
        Arc::new(vault),
        config,
    );
    let mut events = controller.events();
    let listener = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            info!("Event: {:?}", event);
        }
    });

    controller.start();
    let mut phase = controller.settled().await;
    let mut retries_left = args.retries;
    while phase == RevealPhase::BiometricGate && retries_left > 0 {
        retries_left -= 1;
        info!("Retrying after denied prompt ({} left)", retries_left);
        controller.retry();
        phase = controller.settled().await;
    }

    print_view(&controller);
    info!("Prompts raised: {}", store.prompt_count());
    if args.legacy {
        info!(
            "Legacy record migrated: {}",
            store.contains(&locator.current_key()) && !store.contains(&locator.legacy_key())
        );
    }

    drop(controller);
    listener.await?;
    Ok(())
}

fn print_view(controller: &RevealController) {
    match controller.view() {
        RevealView::Nothing => println!("(nothing)"),
        RevealView::Spinner => println!("(loading)"),
        RevealView::AuthenticatePrompt { message, button } => {
            println!("{}", message);
            println!("[{}]", button);
        }
        RevealView::Secret {
            wallet_type,
            caption,
            warning,
        } => {
            println!("{} ({})", caption, wallet_type);
            controller.with_secret(|secret, _| println!("{}", secret.expose()));
            println!("{}", warning);
        }
        RevealView::CannotReveal { message } => println!("{}", message),
    }
}

fn run_classify(secret: &str) {
    let wallet_type = classify_str(secret);
    println!("Type: {} ({})", wallet_type.title(), wallet_type);
    println!("Word list check: {:?}", inspect_mnemonic(secret));
    println!("32-byte hex key: {}", is_private_key_hex(secret));
}

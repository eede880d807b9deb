//! moments Operator CLI
//!
//! Operator actions against the moments contract:
//! 1. Load configuration and operator identity
//! 2. Compile the requested contract call into a transaction plan
//! 3. Resolve objects, select gas, sign and submit (or print the plan with --dry-run)
//! 4. Generate and verify nonce-tagged signatures

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use moments_ops::config::{self, validate_config};
use moments_ops::keystore::{self, address_of, load_identity};
use moments_ops::{
    DisplayFields, JsonRpcLedgerClient, MomentsContext, MomentsOperation, NftKind, ObjectId,
    OpsConfig, Submitter, SuiAddress,
};
use moments_signer::{
    sign_with_nonce, sign_with_nonce_exposing_key, verify, KeyProvider, SigningResult,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// moments contract operator toolkit
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path (TOML, JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Sui RPC endpoint or network alias (overrides config)
    #[arg(long)]
    rpc_url: Option<String>,

    /// moments Package ID (overrides config)
    #[arg(long)]
    package_id: Option<String>,

    /// Print the transaction plan instead of submitting it
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the operator's Sui address
    Address,

    /// Generate a new secret key file
    Keygen {
        #[arg(long)]
        out: PathBuf,
    },

    /// Sign a message with a nonce
    Sign {
        #[arg(long)]
        message: String,
        #[arg(long)]
        nonce: u64,
        /// Write the signing result JSON here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        /// Include the base64 secret key in the output (demo only)
        #[arg(long, default_value_t = false)]
        include_private_key: bool,
    },

    /// Verify a signing result JSON file
    Verify {
        #[arg(long)]
        file: PathBuf,
    },

    /// Create a Display object for an NFT kind
    CreateDisplay {
        /// platform, restrict-transferable or non-transferable-platform
        #[arg(long)]
        kind: NftKind,
        /// SOUV type name (overrides config)
        #[arg(long)]
        souv: Option<String>,
        /// Publisher object ID (overrides config)
        #[arg(long)]
        publisher: Option<ObjectId>,
    },

    /// Create a new event
    NewEvent {
        #[arg(long)]
        duration_ms: u64,
    },

    /// Create a supply cap
    CreateSupply {
        /// Supply limit; omitted means unlimited
        #[arg(long)]
        limit: Option<u64>,
        #[arg(long)]
        admin_cap: Option<ObjectId>,
    },

    /// Update the limit of a supply cap
    UpdateSupply {
        #[arg(long)]
        supply_cap: ObjectId,
        #[arg(long)]
        limit: u64,
        #[arg(long)]
        admin_cap: Option<ObjectId>,
    },

    /// Mint a non-transferable NFT to a recipient
    MintNonTransferable {
        #[arg(long)]
        event: ObjectId,
        #[arg(long)]
        supply_cap: ObjectId,
        #[arg(long)]
        recipient: SuiAddress,
    },

    /// Transfer a restrict-transferable NFT with admin authorization
    TransferRestricted {
        #[arg(long)]
        poap: ObjectId,
        #[arg(long)]
        event: ObjectId,
        #[arg(long)]
        recipient: SuiAddress,
        #[arg(long)]
        admin_cap: Option<ObjectId>,
    },

    /// Transfer an NFT with a nonce-tagged signature
    Transfer {
        #[arg(long)]
        recipient: SuiAddress,
        #[arg(long)]
        poap: ObjectId,
        #[arg(long)]
        public_keys: ObjectId,
        /// Signing result JSON produced by `sign`
        #[arg(long)]
        signature_file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Initialize logging
    init_logging(&args.log_level)?;

    debug!("moments-ops v{}", env!("CARGO_PKG_VERSION"));

    // 2. Load configuration
    let mut config = load_configuration(args.config.as_deref())?;

    // Command line arguments override config
    if let Some(rpc_url) = args.rpc_url {
        config.sui_rpc_url = rpc_url;
    }
    if let Some(package_id) = args.package_id {
        config.package_id = Some(package_id);
    }
    if let Commands::CreateDisplay {
        souv: Some(souv), ..
    } = &args.command
    {
        config.souv_type = souv.clone();
    }

    validate_config(&config).context("Invalid configuration")?;

    // 3. Run command
    let provider = KeyProvider::new();

    match args.command {
        Commands::Address => {
            let keypair = load_identity(&provider, &config)?;
            println!("{}", address_of(keypair));
        }

        Commands::Keygen { out } => {
            let keypair = keystore::generate_and_save(&out).context("Failed to generate key")?;
            println!("Address:    {}", address_of(&keypair));
            println!("Public key: {}", hex::encode(keypair.public_key_bytes()));
            println!("Secret key written to {}", out.display());
        }

        Commands::Sign {
            message,
            nonce,
            out,
            include_private_key,
        } => {
            let keypair = load_identity(&provider, &config)?;
            let result = if include_private_key {
                warn!("Private key will be included in the output");
                sign_with_nonce_exposing_key(keypair, &message, nonce)?
            } else {
                sign_with_nonce(keypair, &message, nonce)?
            };

            let json = result.to_json()?;
            match out {
                Some(path) => {
                    std::fs::write(&path, &json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("Signing result written to {}", path.display());
                }
                None => println!("{}", json),
            }
        }

        Commands::Verify { file } => {
            let nonce = verify_file(&file)?;
            println!("✅ Signature valid (nonce {})", nonce);
        }

        Commands::CreateDisplay {
            kind, publisher, ..
        } => {
            let publisher = required_id(publisher, &config.publisher_id, "PUBLISHER_ID")?;
            let ctx = MomentsContext::from_config(&config)?;
            let fields = DisplayFields::for_kind(kind, &ctx.souv.name)
                .with_overrides(&config.display_fields);

            info!("Creating {} display for {}", kind, ctx.souv);
            let op = MomentsOperation::CreateDisplay {
                publisher,
                kind,
                fields,
            };
            run_operation(&config, &provider, &ctx, op, args.dry_run).await?;
        }

        Commands::NewEvent { duration_ms } => {
            let ends_at = i64::try_from(duration_ms)
                .ok()
                .and_then(chrono::Duration::try_milliseconds)
                .and_then(|d| chrono::Utc::now().checked_add_signed(d));
            match ends_at {
                Some(end) => info!(
                    "Creating event lasting {} ms (ends around {})",
                    duration_ms,
                    end.to_rfc3339()
                ),
                None => info!("Creating event lasting {} ms", duration_ms),
            }

            let ctx = MomentsContext::from_config(&config)?;
            let op = MomentsOperation::NewEvent { duration_ms };
            run_operation(&config, &provider, &ctx, op, args.dry_run).await?;
        }

        Commands::CreateSupply { limit, admin_cap } => {
            let admin_cap = required_id(admin_cap, &config.admin_cap_id, "ADMIN_CAP_ID")?;
            let ctx = MomentsContext::from_config(&config)?;
            let op = MomentsOperation::CreateSupplyCap { admin_cap, limit };
            run_operation(&config, &provider, &ctx, op, args.dry_run).await?;
        }

        Commands::UpdateSupply {
            supply_cap,
            limit,
            admin_cap,
        } => {
            let admin_cap = required_id(admin_cap, &config.admin_cap_id, "ADMIN_CAP_ID")?;
            let ctx = MomentsContext::from_config(&config)?;
            let op = MomentsOperation::UpdateSupply {
                admin_cap,
                supply_cap,
                new_limit: limit,
            };
            run_operation(&config, &provider, &ctx, op, args.dry_run).await?;
        }

        Commands::MintNonTransferable {
            event,
            supply_cap,
            recipient,
        } => {
            let ctx = MomentsContext::from_config(&config)?;
            let op = MomentsOperation::MintNonTransferable {
                event,
                supply_cap,
                recipient,
            };
            run_operation(&config, &provider, &ctx, op, args.dry_run).await?;
        }

        Commands::TransferRestricted {
            poap,
            event,
            recipient,
            admin_cap,
        } => {
            let admin_cap = required_id(admin_cap, &config.admin_cap_id, "ADMIN_CAP_ID")?;
            let ctx = MomentsContext::from_config(&config)?;
            let op = MomentsOperation::TransferRestrictTransferable {
                admin_cap,
                poap,
                event,
                recipient,
            };
            run_operation(&config, &provider, &ctx, op, args.dry_run).await?;
        }

        Commands::Transfer {
            recipient,
            poap,
            public_keys,
            signature_file,
        } => {
            let signed = read_signing_result(&signature_file)?;
            if !verify(&signed)? {
                warn!(
                    "Signature in {} does not verify locally; the contract will likely reject it",
                    signature_file.display()
                );
            }

            let ctx = MomentsContext::from_config(&config)?;
            let op = MomentsOperation::Transfer {
                recipient,
                poap,
                public_keys,
                signed_data: signed.signature().to_vec(),
                msg: signed.encoded_message(),
            };
            run_operation(&config, &provider, &ctx, op, args.dry_run).await?;
        }
    }

    Ok(())
}

/// Initialize logging system
fn init_logging(log_level: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => {
            eprintln!("⚠️  Unknown log level: {}, using INFO", log_level);
            tracing::Level::INFO
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Load configuration file (or environment only)
fn load_configuration(config_path: Option<&Path>) -> Result<OpsConfig> {
    match config_path {
        Some(path) if !path.exists() => {
            warn!(
                "Configuration file {} does not exist, using environment",
                path.display()
            );
            config::load(None).context("Failed to load configuration")
        }
        Some(path) => {
            info!("📋 Loading configuration: {}", path.display());
            config::load(Some(path)).context("Failed to load configuration")
        }
        None => config::load(None).context("Failed to load configuration"),
    }
}

/// Object ID from the command line, falling back to config
fn required_id(
    flag: Option<ObjectId>,
    configured: &Option<String>,
    name: &str,
) -> Result<ObjectId> {
    if let Some(id) = flag {
        return Ok(id);
    }

    let value = configured
        .as_deref()
        .with_context(|| format!("{} is not configured", name))?;

    value
        .parse()
        .with_context(|| format!("Invalid {}: {}", name, value))
}

fn read_signing_result(path: &Path) -> Result<SigningResult> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    SigningResult::from_json(&json)
        .with_context(|| format!("Invalid signing result in {}", path.display()))
}

/// Verify a signing result file, returning its nonce; a bad signature is an error
fn verify_file(path: &Path) -> Result<u64> {
    let result = read_signing_result(path)?;
    if !verify(&result)? {
        anyhow::bail!("❌ Signature invalid in {}", path.display());
    }
    Ok(result.nonce())
}

/// Plan, then print or submit
async fn run_operation(
    config: &OpsConfig,
    provider: &KeyProvider,
    ctx: &MomentsContext,
    op: MomentsOperation,
    dry_run: bool,
) -> Result<()> {
    let keypair = load_identity(provider, config)?;
    let sender = address_of(keypair);

    let plan = op
        .plan(ctx, sender)
        .with_context(|| format!("Failed to plan {}", op.name()))?;

    info!("Using package ID: {}", ctx.package_id);
    info!("Signer address: {}", sender);

    if dry_run {
        info!("Dry run: {} not submitted", op.name());
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    let client = JsonRpcLedgerClient::from_config(config)?;
    let submitter = Submitter::new(&client, keypair);

    let submission = submitter
        .submit(&plan)
        .await
        .with_context(|| format!("{} failed", op.name()))?;

    debug!(
        "Transaction result: {}",
        serde_json::to_string_pretty(&submission.outcome.raw)?
    );

    println!("Digest: {}", submission.digest());
    match submission.matched_object_id() {
        Some(id) => println!("Object: {}", id),
        None => {
            for change in &submission.outcome.object_changes {
                println!(
                    "{}: {} {}",
                    change.kind(),
                    change.object_id().unwrap_or("-"),
                    change.object_type().unwrap_or("")
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use moments_signer::Ed25519Keypair;
    use tempfile::TempDir;

    fn write_result(dir: &TempDir, name: &str, result: &SigningResult) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, result.to_json().unwrap()).unwrap();
        path
    }

    #[test]
    fn test_verify_file_accepts_valid_signature() {
        let dir = TempDir::new().unwrap();
        let keypair = Ed25519Keypair::from_seed(&[4u8; 32]);
        let signed = sign_with_nonce(&keypair, "hello world", 2).unwrap();

        let path = write_result(&dir, "signed.json", &signed);
        assert_eq!(verify_file(&path).unwrap(), 2);
    }

    #[test]
    fn test_verify_file_rejects_tampered_nonce() {
        let dir = TempDir::new().unwrap();
        let keypair = Ed25519Keypair::from_seed(&[4u8; 32]);
        let signed = sign_with_nonce(&keypair, "hello world", 2).unwrap();

        let tampered = SigningResult::new(
            signed.public_key().to_vec(),
            signed.message().to_vec(),
            3,
            signed.signature().to_vec(),
        );
        let path = write_result(&dir, "tampered.json", &tampered);

        let err = verify_file(&path).unwrap_err();
        assert!(err.to_string().contains("Signature invalid"));
    }

    #[test]
    fn test_verify_file_missing() {
        let dir = TempDir::new().unwrap();
        assert!(verify_file(&dir.path().join("absent.json")).is_err());
    }
}

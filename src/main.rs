//! keyvault CLI application.
//!
//! This binary provides a command-line interface for generating, importing,
//! listing, and using ECDSA keys. It is the outermost layer: every core
//! failure is mapped to a distinct process exit code here, and nowhere else
//! does the process terminate.

use clap::{Parser, Subcommand};
use keyvault::crypto::signature::{self, Signature};
use keyvault::error::{KeyVaultError, Result};
use keyvault::render::{ArtRenderer, DigestMode, NullArtRenderer, PlainRenderer, RecordRenderer};
use keyvault::repository::KeyRepository;
use keyvault::storage::record::KeyView;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "keyvault")]
#[command(about = "Local ECDSA key management", long_about = None)]
struct Cli {
    /// Key store root directory
    #[arg(long, default_value = "keys")]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new key pair
    Generate {
        /// Name for the key
        #[arg(long)]
        name: String,

        /// Curve to generate on
        #[arg(long, default_value = "prime256v1")]
        curve: String,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Import a PEM public key as a verify-only record
    Import {
        /// Name for the key
        #[arg(long)]
        name: String,

        /// Curve the key belongs to
        #[arg(long, default_value = "prime256v1")]
        curve: String,

        /// PEM public key file
        #[arg(long)]
        file: PathBuf,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a key by identifier
    Get {
        /// Key identifier
        #[arg(long)]
        id: String,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,

        /// Include the visual fingerprint when a renderer is available
        #[arg(long)]
        art: bool,
    },

    /// List all keys
    List {
        /// Print the records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign a file's contents, writing a DER signature next to the key
    Sign {
        /// Key identifier
        #[arg(long)]
        id: String,

        /// File to sign
        #[arg(long)]
        file: PathBuf,
    },

    /// Verify a file against a DER signature
    Verify {
        /// Key identifier
        #[arg(long)]
        id: String,

        /// File that was signed
        #[arg(long)]
        file: PathBuf,

        /// DER signature file
        #[arg(long)]
        signature: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {}", err);
        std::process::exit(exit_code(&err));
    }
}

fn run(cli: Cli) -> Result<()> {
    let repo = KeyRepository::open(&cli.store)?;

    match cli.command {
        Commands::Generate { name, curve, json } => {
            let record = repo.create_generated(&name, &curve)?;
            print_views(&[record.view()], json)
        }

        Commands::Import {
            name,
            curve,
            file,
            json,
        } => {
            let pem = fs::read(&file)?;
            let record = repo.create_imported(&name, &curve, &pem)?;
            print_views(&[record.view()], json)
        }

        Commands::Get { id, json, art } => {
            let record = repo.get_by_id(&id)?;
            print_views(&[record.view()], json)?;

            if art {
                match NullArtRenderer.render(&record.fingerprint_sha256, DigestMode::Sha256) {
                    Ok(block) => println!("{}", block),
                    Err(unavailable) => println!("({})", unavailable),
                }
            }
            Ok(())
        }

        Commands::List { json } => {
            let records = repo.list()?;
            if records.is_empty() && !json {
                println!("no keys available");
                return Ok(());
            }
            let views: Vec<KeyView> = records.iter().map(|r| r.view()).collect();
            print_views(&views, json)
        }

        Commands::Sign { id, file } => {
            let record = repo.get_by_id(&id)?;
            let payload = fs::read(&file)?;

            let sig = signature::sign(&record, &payload)?;
            let der = sig.to_der()?;
            let path =
                repo.store()
                    .write_signature(&record.id, chrono::Utc::now().timestamp(), &der)?;

            println!("signature: {}", path.display());
            println!("r = 0x{}", hex::encode(sig.r()));
            println!("s = 0x{}", hex::encode(sig.s()));
            Ok(())
        }

        Commands::Verify {
            id,
            file,
            signature: signature_file,
        } => {
            let record = repo.get_by_id(&id)?;
            let payload = fs::read(&file)?;
            let sig = Signature::from_der(&fs::read(&signature_file)?)?;

            let valid = signature::verify(&record, &payload, &sig)?;
            println!("verified: {}", valid);
            Ok(())
        }
    }
}

fn print_views(views: &[KeyView], json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(views)
            .map_err(|e| KeyVaultError::Io(std::io::Error::other(e)))?;
        println!("{}", text);
    } else {
        print!("{}", PlainRenderer.render(views));
    }
    Ok(())
}

/// One exit code per error kind, so scripts can branch on the failure.
fn exit_code(err: &KeyVaultError) -> i32 {
    match err {
        KeyVaultError::EmptyName => 2,
        KeyVaultError::UnsupportedCurve(_) => 3,
        KeyVaultError::NotFound(_) => 4,
        KeyVaultError::MissingPrivateKey(_) => 5,
        KeyVaultError::MalformedKey(_) => 6,
        KeyVaultError::MalformedSignature(_) => 7,
        KeyVaultError::CorruptRecord(_) => 8,
        KeyVaultError::Crypto(_) => 9,
        KeyVaultError::Io(_) => 10,
    }
}

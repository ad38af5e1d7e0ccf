//! cronet-inspect - diagnostics for the cronet runtime bindings
//!
//! Shows where the library would be loaded from, which entry points a given
//! build exports, what version it reports, and computes public-key pins.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cronet_bind::config::BindConfig;
use cronet_bind::ffi::{
    symbol_group, FloatSymbols, NativeLibrary, SearchEnv, SymbolTable, LIBRARY_FILENAME,
};
use cronet_bind::pins;
use cronet_bind::{Cronet, LoadGuard};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "cronet-inspect")]
#[command(version)]
#[command(about = "Inspect and load the cronet native library", long_about = None)]
struct Cli {
    /// Config file (default: nearest cronet.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the library and print its version and default user agent
    Info {
        /// Library path (overrides config and search)
        #[arg(long)]
        library: Option<PathBuf>,
    },

    /// Show the library search order and which candidate wins
    Locate {
        /// Print every candidate path, not just the directories
        #[arg(short, long)]
        verbose: bool,
    },

    /// Compute SPKI SHA-256 pins for the certificates in a PEM file
    Pin {
        /// PEM file with one or more certificates
        cert_pem: PathBuf,

        /// Print hex digests instead of sha256/<base64> pins
        #[arg(long)]
        hex: bool,
    },

    /// List the bound symbols, optionally checking a library for them
    Symbols {
        /// Library to check for every symbol
        #[arg(long)]
        check: Option<PathBuf>,

        /// Only list symbols in this group (e.g. "engine", "url_request")
        #[arg(long)]
        group: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Info { library } => cmd_info(&config, library),
        Commands::Locate { verbose } => cmd_locate(&config, verbose),
        Commands::Pin { cert_pem, hex } => cmd_pin(&cert_pem, hex),
        Commands::Symbols { check, group } => cmd_symbols(check, group.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<BindConfig> {
    match path {
        Some(path) => {
            let config = BindConfig::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?;
            Ok(config.with_env_override(std::env::var_os(cronet_bind::config::LIBRARY_PATH_ENV)))
        }
        None => BindConfig::load_from_cwd().context("Failed to load cronet.toml"),
    }
}

fn cmd_info(config: &BindConfig, library: Option<PathBuf>) -> Result<()> {
    let cronet = Cronet::with_guard(Arc::new(LoadGuard::new(config.locator())));
    let native = cronet
        .load(library.as_deref())
        .context("Failed to load cronet")?;

    println!("Library:  {}", native.path().display());
    println!("Symbols:  {}", native.symbol_count());

    let engine = cronet.engine_create();
    println!("Version:  {}", cronet.engine_get_version_string(engine));
    println!("User agent: {}", cronet.engine_get_default_user_agent(engine));
    cronet.engine_destroy(engine);

    Ok(())
}

fn cmd_locate(config: &BindConfig, verbose: bool) -> Result<()> {
    let locator = config.locator();
    let env = SearchEnv::from_process();

    println!("Library file: {}", LIBRARY_FILENAME);
    if let Some(path) = locator.explicit_path() {
        println!("Explicit path: {}", path.display());
    }

    println!("Search order:");
    if verbose {
        for (i, candidate) in locator.candidates(&env).iter().enumerate() {
            let mark = if candidate.exists() { "found" } else { "-" };
            println!("  {:>2}. {} [{}]", i + 1, candidate.display(), mark);
        }
    } else {
        for (i, dir) in locator.search_dirs(&env).iter().enumerate() {
            println!("  {:>2}. {}", i + 1, dir.display());
        }
    }

    match locator.locate(None, &env) {
        Ok(path) => {
            println!("Selected: {}", path.display());
            Ok(())
        }
        Err(err) => anyhow::bail!("{}", err),
    }
}

fn cmd_pin(cert_pem: &Path, hex: bool) -> Result<()> {
    let pem = fs::read_to_string(cert_pem)
        .with_context(|| format!("Failed to read {}", cert_pem.display()))?;
    let hashes = pins::spki_sha256_from_pem(&pem)
        .with_context(|| format!("Failed to compute pins for {}", cert_pem.display()))?;

    for hash in &hashes {
        if hex {
            println!("{}", pins::hex_string(hash));
        } else {
            println!("{}", pins::pin_string(hash));
        }
    }
    Ok(())
}

fn cmd_symbols(check: Option<PathBuf>, group: Option<&str>) -> Result<()> {
    let registered = SymbolTable::SYMBOLS
        .iter()
        .chain(FloatSymbols::SYMBOLS.iter())
        .filter(|(g, _)| group.map_or(true, |wanted| *g == wanted));

    let Some(path) = check else {
        let mut count = 0;
        for (g, symbol) in registered {
            println!("{:<24} {}", g, symbol);
            count += 1;
        }
        println!("{} symbols", count);
        return Ok(());
    };

    let missing = NativeLibrary::audit(&path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let missing: Vec<_> = missing
        .into_iter()
        .filter(|symbol| group.map_or(true, |wanted| symbol_group(symbol) == Some(wanted)))
        .collect();

    let checked = registered.count();
    if missing.is_empty() {
        println!("{}: all {} symbols present", path.display(), checked);
        return Ok(());
    }

    for symbol in &missing {
        println!("missing  {}", symbol);
    }
    anyhow::bail!(
        "{}: {} of {} symbols missing",
        path.display(),
        missing.len(),
        checked
    )
}

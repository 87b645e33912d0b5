use clap::Parser;
use skytools::atlas::DEFAULT_CIRCUMPOLAR_LATITUDE;
use skytools::coord::Coordinate;
use skytools::report::AtlasReport;
use skytools::resolve::cache::TargetCache;
use skytools::resolve::{ResolvedTarget, TargetResolver};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// skytools — Uranometria 2000.0 chart lookup
///
/// Prints the sky quadrant and the Uranometria 2000.0 volume and page for a
/// position or a named object.
///
/// Examples:
///   skytools M31
///   skytools --name "Omega Centauri"
///   skytools --ra 05:35:17 --dec -05:23:28
///   skytools --ra 13.5 --dec -45 --json
///   skytools Vega --lat 52
///   skytools --serve --port 3030
#[derive(Parser)]
#[command(name = "skytools", version, about, long_about = None)]
struct Cli {
    /// Object name (positional). Example: skytools M31
    #[arg(index = 1)]
    name_positional: Option<String>,

    /// Object name, resolved via Sesame or the built-in catalog.
    #[arg(long, short = 'n')]
    name: Option<String>,

    /// Right ascension: hours (10.5) or sexagesimal (10:30:00, 10h30m00s).
    #[arg(long, allow_hyphen_values = true)]
    ra: Option<String>,

    /// Declination: degrees (-41.27) or sexagesimal (-41:16:08, -41d16m08s).
    #[arg(long, allow_hyphen_values = true)]
    dec: Option<String>,

    /// Observer latitude for the circumpolar (NP) cutoff.
    #[arg(long, default_value_t = DEFAULT_CIRCUMPOLAR_LATITUDE, allow_hyphen_values = true)]
    lat: f64,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,

    /// Offline mode: only use the cache and the built-in catalog.
    #[arg(long)]
    offline: bool,

    /// Name cache file. Defaults to ~/.skytools/cache.json.
    #[arg(long)]
    cache: Option<PathBuf>,

    /// Run the HTTP API instead of a one-shot lookup.
    #[arg(long)]
    serve: bool,

    /// Bind address for --serve.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port for --serve.
    #[arg(long, default_value_t = 3030)]
    port: u16,

    /// More log output (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut resolver = match &cli.cache {
        Some(path) => TargetResolver::with_cache(TargetCache::load_from(path.clone())),
        None => TargetResolver::new(),
    };
    resolver.set_offline(cli.offline);

    // ── Server mode ─────────────────────────────────────────────

    if cli.serve {
        let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("Error: Cannot start async runtime: {}", e);
            std::process::exit(1);
        });
        if let Err(e) = runtime.block_on(skytools::server::start(&cli.host, cli.port, resolver, cli.lat)) {
            eprintln!("Error: Server on {}:{} failed: {}", cli.host, cli.port, e);
            std::process::exit(1);
        }
        return;
    }

    // ── One-shot lookup ─────────────────────────────────────────

    let target = resolve_target(&cli, &resolver);

    let report = AtlasReport::build(&target, cli.lat).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: Cannot encode report: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", report.render_text());
    }
}

fn resolve_target(cli: &Cli, resolver: &TargetResolver) -> ResolvedTarget {
    // Priority: --name > positional name > --ra/--dec > error

    if let Some(name) = cli.name.as_ref().or(cli.name_positional.as_ref()) {
        return resolver.resolve(name).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });
    }

    match (&cli.ra, &cli.dec) {
        (Some(ra), Some(dec)) => {
            let coord = Coordinate::parse(ra, dec).unwrap_or_else(|e| {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            });
            TargetResolver::from_manual(coord)
        }
        (Some(_), None) | (None, Some(_)) => {
            eprintln!("Error: --ra and --dec must be given together.");
            std::process::exit(1);
        }
        (None, None) => {
            eprintln!("Error: No target specified.");
            eprintln!();
            eprintln!("Usage:");
            eprintln!("  skytools M31");
            eprintln!("  skytools --name \"Omega Centauri\"");
            eprintln!("  skytools --ra 05:35:17 --dec -05:23:28");
            std::process::exit(1);
        }
    }
}

//! Entertainment Engine
//!
//! Loads the catalog and user profiles, then prints recommendations and
//! trending items for one user.
//!
//! ```text
//! entertainment-engine [USER_ID] [KIND]
//! ```
//!
//! Without a user id the first stored profile is used. Without a kind every
//! kind is printed.

use anyhow::{bail, Context};
use chrono::Datelike;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use entertainment::storage;
use entertainment::{
    CatalogStore, Config, Error, MatchScorer, MediaKind, ProfileRegistry, ScoredItem,
};

fn main() -> anyhow::Result<()> {
    // Initialize tracing with structured logging
    init_tracing();

    info!("Entertainment Engine v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env().context("failed to load configuration")?;

    let mut args = std::env::args().skip(1);
    let user_arg = args.next();
    let kinds: Vec<MediaKind> = match args.next() {
        Some(raw) => vec![raw.parse::<MediaKind>().map_err(anyhow::Error::msg)?],
        None => MediaKind::ALL.to_vec(),
    };

    let catalog = if config.catalog.path.exists() {
        storage::load_catalog(&config.catalog.path, config.catalog.duplicate_policy)
            .map_err(report)?
    } else {
        warn!(
            "Catalog file {} not found, starting with an empty catalog",
            config.catalog.path.display()
        );
        CatalogStore::new(config.catalog.duplicate_policy)
    };

    let profiles = if config.profiles.path.exists() {
        storage::load_profiles(&config.profiles.path).map_err(report)?
    } else {
        warn!(
            "Profiles file {} not found, no users available",
            config.profiles.path.display()
        );
        ProfileRegistry::new()
    };

    let profile = match user_arg {
        Some(id) => match profiles.get(&id) {
            Some(profile) => profile,
            None => bail!("unknown user '{}'", id),
        },
        None => match profiles.iter().next() {
            Some(profile) => profile,
            None => bail!("no user profiles in {}", config.profiles.path.display()),
        },
    };

    let scorer = MatchScorer::with_weights(&catalog, config.recommendation.weights.clone());
    let count = config.recommendation.default_count;
    let current_year = chrono::Utc::now().year();

    println!("Recommendations for {} ({})", profile.name, profile.user_id);
    for kind in &kinds {
        print_section(kind.bucket(), &scorer.recommend(profile, *kind, count));
    }

    println!();
    println!("Trending");
    for kind in &kinds {
        print_section(kind.bucket(), &scorer.trending(*kind, count, current_year));
    }

    Ok(())
}

fn print_section(title: &str, items: &[ScoredItem]) {
    println!("  {}:", title);
    if items.is_empty() {
        println!("    (none)");
    }
    for item in items {
        println!("    {} ({}) score {:.1}", item.title, item.year, item.score);
    }
}

fn report(err: Error) -> anyhow::Error {
    error!(code = err.error_code(), "{}", err);
    err.into()
}

/// Initialize structured logging with tracing
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Default log levels
        EnvFilter::new("entertainment_engine=debug,entertainment=info,warn")
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_ansi(std::env::var("NO_COLOR").is_err()),
        )
        .init();
}

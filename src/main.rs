//! # Course Scout CLI (`cscout`)
//!
//! The `cscout` binary is the command-line interface to Course Scout. It
//! provides commands for refreshing the catalog index, searching, retrieving
//! course details, saving preferences, getting recommendations, and starting
//! the agent-facing tool server.
//!
//! ## Usage
//!
//! ```bash
//! cscout --config ./config/scout.toml <command>
//! ```
//!
//! | Command | Description |
//! |---------|-------------|
//! | `cscout refresh` | Refetch the catalog and rebuild the index |
//! | `cscout search "<query>"` | Fuzzy search across the indexed courses |
//! | `cscout detail <slug-or-title>` | Show one course by slug or title |
//! | `cscout recommend` | Recommend courses from preference hints |
//! | `cscout serve` | Start the tool server |
//!
//! The catalog cache and preference record live for one process invocation;
//! the long-lived session belongs to `cscout serve`.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use course_scout::cache::Session;
use course_scout::config::{self, Config};
use course_scout::fetch::HttpFetcher;
use course_scout::models::{Course, Price};
use course_scout::ops::{self, SearchHit};
use course_scout::server;

/// Course Scout — a schema-tolerant search and recommendation layer over a
/// remote course catalog.
#[derive(Parser)]
#[command(
    name = "cscout",
    about = "Course Scout — schema-tolerant course catalog search and recommendations",
    version,
    long_about = "Course Scout fetches a remote course catalog, normalizes its unstable JSON \
    record shapes into a common schema, caches the result, and answers search, detail, and \
    recommendation queries against the cache — via this CLI and an MCP-compatible tool server."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/scout.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Refetch the catalog and rebuild the index.
    ///
    /// Ignores the cache freshness window and replaces the index wholesale.
    Refresh,

    /// Search indexed courses.
    ///
    /// Scores every course against the query tokens, level, and topic, and
    /// prints the top matches. With no query and no filters, lists the whole
    /// catalog unranked.
    Search {
        /// Free-text query, e.g. "laravel pemula".
        query: Option<String>,

        /// Difficulty filter, matched loosely against the course level.
        #[arg(long)]
        level: Option<String>,

        /// Topic or stack filter, e.g. "react".
        #[arg(long)]
        topic: Option<String>,

        /// Maximum number of results.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show one course by slug or title fragment.
    ///
    /// Exact slug matches win over title-substring matches.
    Detail {
        /// Course slug, or a fragment of its title.
        slug_or_title: String,
    },

    /// Recommend courses from preference hints.
    ///
    /// Hints given here are saved into the session's preference record
    /// first, exactly as an agent would via `set_user_pref`.
    Recommend {
        /// Preferred topic; doubles as the search query.
        #[arg(long)]
        topic: Option<String>,

        /// Preferred difficulty.
        #[arg(long)]
        level: Option<String>,

        /// Budget hint, e.g. "gratis".
        #[arg(long)]
        budget: Option<String>,

        /// Maximum number of recommendations.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Start the agent-facing tool server.
    ///
    /// Binds to `[server].bind` and serves the tool registry until the
    /// process is terminated.
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Refresh => {
            run_refresh(&cfg).await?;
        }
        Commands::Search {
            query,
            level,
            topic,
            limit,
        } => {
            run_search(&cfg, query, level, topic, limit).await?;
        }
        Commands::Detail { slug_or_title } => {
            run_detail(&cfg, &slug_or_title).await?;
        }
        Commands::Recommend {
            topic,
            level,
            budget,
            limit,
        } => {
            run_recommend(&cfg, topic, level, budget, limit).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}

async fn run_refresh(cfg: &Config) -> Result<()> {
    let fetcher = HttpFetcher::new(&cfg.catalog)?;
    let mut session = Session::new();
    let count = ops::refresh_courses(&mut session, &fetcher).await?;
    println!("refreshed catalog index");
    println!("  indexed courses: {}", count);
    println!("ok");
    Ok(())
}

async fn run_search(
    cfg: &Config,
    query: Option<String>,
    level: Option<String>,
    topic: Option<String>,
    limit: Option<usize>,
) -> Result<()> {
    let fetcher = HttpFetcher::new(&cfg.catalog)?;
    let mut session = Session::new();

    let res = ops::search_courses(
        &mut session,
        &fetcher,
        cfg,
        query.as_deref(),
        level.as_deref(),
        topic.as_deref(),
        limit,
    )
    .await?;

    if res.results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, hit) in res.results.iter().enumerate() {
        print_hit(i + 1, hit);
    }
    println!("total indexed: {}", res.total_indexed);
    Ok(())
}

async fn run_detail(cfg: &Config, slug_or_title: &str) -> Result<()> {
    let fetcher = HttpFetcher::new(&cfg.catalog)?;
    let mut session = Session::new();

    let course = ops::get_course_detail(&mut session, &fetcher, cfg, slug_or_title).await?;
    print_course(&course);
    Ok(())
}

async fn run_recommend(
    cfg: &Config,
    topic: Option<String>,
    level: Option<String>,
    budget: Option<String>,
    limit: Option<usize>,
) -> Result<()> {
    let fetcher = HttpFetcher::new(&cfg.catalog)?;
    let mut session = Session::new();

    let saved = ops::set_user_pref(&mut session, topic, level, budget);
    if saved.is_empty() {
        println!("No preferences set — listing the catalog unranked.");
    } else {
        println!(
            "preferences: topic={} level={} budget={}",
            saved.topic.as_deref().unwrap_or("-"),
            saved.level.as_deref().unwrap_or("-"),
            saved.budget.as_deref().unwrap_or("-"),
        );
    }

    let rec = ops::recommend_for_user(&mut session, &fetcher, cfg, limit).await?;
    if rec.recommendations.is_empty() {
        println!("No recommendations.");
        return Ok(());
    }

    for (i, hit) in rec.recommendations.iter().enumerate() {
        print_hit(i + 1, hit);
    }
    Ok(())
}

fn print_hit(rank: usize, hit: &SearchHit) {
    println!("{}. [{:.2}] {}", rank, hit.score, hit.title);
    if let Some(ref slug) = hit.slug {
        println!("    slug: {}", slug);
    }
    if !hit.level.is_empty() {
        println!("    level: {}", hit.level);
    }
    println!("    price: {}", price_display(&hit.price));
    if !hit.categories.is_empty() {
        println!("    categories: {}", hit.categories.join(", "));
    }
    if !hit.preview.is_empty() {
        println!("    preview: \"{}\"", hit.preview.replace('\n', " "));
    }
    println!();
}

fn print_course(course: &Course) {
    println!("{}", course.title);
    if let Some(ref slug) = course.slug {
        println!("  slug: {}", slug);
    }
    if !course.level.is_empty() {
        println!("  level: {}", course.level);
    }
    println!("  price: {}", price_display(&course.price));
    if !course.categories.is_empty() {
        println!("  categories: {}", course.categories.join(", "));
    }
    if !course.description.is_empty() {
        println!("  description: {}", course.description);
    }
}

fn price_display(price: &Price) -> String {
    match price {
        Price::Absent => "-".to_string(),
        Price::Number(n) => n.to_string(),
        Price::Text(s) => s.clone(),
    }
}

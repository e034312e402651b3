use anyhow::Result;
use clap::{Parser, Subcommand};
use futures::StreamExt;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use typed_toolkit::{
    FixtureFetcher, OrgClient, access_nested_map, annotations, delays, load_config,
};

#[derive(Parser)]
#[command(name = "typed-toolkit")]
#[command(about = "Nested-map access, memoized lookups and async delay demos")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a key path inside a JSON document
    Access {
        /// JSON document to walk
        #[arg(long)]
        json: String,
        /// Keys to descend through, outermost first
        path: Vec<String>,
    },
    /// Run N random delays concurrently and print them in completion order
    WaitN {
        #[arg(short, long)]
        n: usize,
        #[arg(long)]
        max_delay: Option<f64>,
    },
    /// Same as wait-n, with every delay in its own spawned task
    TaskWaitN {
        #[arg(short, long)]
        n: usize,
        #[arg(long)]
        max_delay: Option<f64>,
    },
    /// Average seconds per task for one wait-n run
    MeasureTime {
        #[arg(short, long)]
        n: usize,
        #[arg(long)]
        max_delay: Option<f64>,
    },
    /// Print the paced random stream as values arrive
    Generate,
    /// Time four concurrent stream collections
    MeasureRuntime,
    /// Repeat every item FACTOR times
    Zoom {
        #[arg(short, long, default_value_t = annotations::DEFAULT_ZOOM_FACTOR)]
        factor: usize,
        items: Vec<String>,
    },
    /// List the public repositories of an organisation from fixtures
    Org {
        name: String,
        /// Only repositories under this license key
        #[arg(long)]
        license: Option<String>,
        /// Fixture document (overrides the config file)
        #[arg(long, env = "TYPED_TOOLKIT_FIXTURES")]
        fixtures: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("typed_toolkit=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config()?;

    match cli.command {
        Commands::Access { json, path } => {
            let doc: serde_json::Value = serde_json::from_str(&json)?;
            let keys: Vec<&str> = path.iter().map(String::as_str).collect();

            let value = access_nested_map(&doc, &keys)?;
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        Commands::WaitN { n, max_delay } => {
            let max_delay = max_delay.unwrap_or(config.max_delay);
            info!("Waiting on {} delays (max {}s)", n, max_delay);

            for delay in delays::wait_n(n, max_delay).await {
                println!("{:.3}", delay);
            }
        }
        Commands::TaskWaitN { n, max_delay } => {
            let max_delay = max_delay.unwrap_or(config.max_delay);
            info!("Spawning {} delay tasks (max {}s)", n, max_delay);

            for delay in delays::task_wait_n(n, max_delay).await? {
                println!("{:.3}", delay);
            }
        }
        Commands::MeasureTime { n, max_delay } => {
            let max_delay = max_delay.unwrap_or(config.max_delay);
            info!("Measuring {} delays (max {}s)", n, max_delay);

            // measure_time drives its own runtime.
            let average =
                tokio::task::spawn_blocking(move || delays::measure_time(n, max_delay)).await??;
            println!("{:.3}", average);
        }
        Commands::Generate => {
            let settings = config.generator.settings();
            info!(
                "Generating {} values every {:?}",
                settings.count, settings.interval
            );

            let stream = delays::random_stream(settings);
            tokio::pin!(stream);
            while let Some(value) = stream.next().await {
                println!("{:.3}", value);
            }
        }
        Commands::MeasureRuntime => {
            let settings = config.generator.settings();
            let elapsed = delays::measure_runtime_with(settings, 4).await;
            println!("{:.3}", elapsed);
        }
        Commands::Zoom { factor, items } => {
            println!("{}", annotations::zoom_array(&items, factor).join(" "));
        }
        Commands::Org {
            name,
            license,
            fixtures,
        } => {
            let path = fixtures.or(config.github.fixtures).ok_or_else(|| {
                anyhow::anyhow!("No fixtures configured (pass --fixtures or set github.fixtures)")
            })?;

            let fetcher = FixtureFetcher::load(&path)?;
            let client =
                OrgClient::new(name, fetcher).with_url_template(config.github.org_url_template);

            let repos = client.public_repos(license.as_deref())?;
            info!("Found {} repositories for {}", repos.len(), client.org_name());
            for repo in repos {
                println!("{}", repo);
            }
        }
    }

    Ok(())
}

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Handle;
use tracing::{info, warn};

use oompa_loompas::config::{self, Config};
use oompa_loompas::filter::Filters;
use oompa_loompas::handlers::{self, Command, Reply, Session};
use oompa_loompas::remote::{ApiClient, RemoteDataSource};
use oompa_loompas::repository::{DefaultOompaLoompasRepository, OompaLoompasRepository};
use oompa_loompas::viewmodel::{DetailViewModel, ListViewModel};

#[derive(Debug, Parser)]
#[command(author, version, about = "Browse the Oompa Loompa workforce")]
struct Args {
    /// Path to YAML config file (built-in defaults when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Print one page of oompa loompas
    List {
        #[arg(long, default_value = "1")]
        page: u32,
        /// Only show this gender
        #[arg(long)]
        gender: Option<String>,
        /// Only show this profession
        #[arg(long)]
        profession: Option<String>,
    },
    /// Print the details of one oompa loompa
    Show { id: u32 },
    /// Interactive session reading commands from stdin
    Browse,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();

    // Network calls run here; view-model tasks stay on the main runtime.
    let io = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("oompa-io")
        .enable_all()
        .build()
        .context("failed to start io runtime")?;
    let result = run(args, io.handle().clone()).await;
    // Dropping a runtime inside async context would block.
    io.shutdown_background();
    result
}

async fn run(args: Args, io: Handle) -> Result<()> {
    let cfg = match &args.config {
        Some(path) => config::load(Some(path))
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => Config::default(),
    };
    let cfg = cfg.apply_env_overrides()?;
    info!(base_url = %cfg.api.base_url, "using api");

    let client = ApiClient::from_config(&cfg).context("failed to create api client")?;
    let data_source = Arc::new(RemoteDataSource::new(client, io));
    let repository: Arc<dyn OompaLoompasRepository> =
        Arc::new(DefaultOompaLoompasRepository::new(data_source));

    match args.command {
        Cmd::List {
            page,
            gender,
            profession,
        } => {
            if page == 0 {
                bail!("--page must be at least 1");
            }
            let list = ListViewModel::new(repository, Handle::current());
            list.fetch(page);
            let state = handlers::settled_list(list.subscribe()).await;
            let filters = Filters { gender, profession };
            print!("{}", handlers::render_page(&state, &filters));
            if !state.error_messages.is_empty() {
                bail!("failed to fetch page {}", page);
            }
        }
        Cmd::Show { id } => {
            let detail = DetailViewModel::new(repository, Handle::current());
            detail.fetch_details(Some(id));
            let state = handlers::settled_detail(detail.subscribe()).await;
            print!("{}", handlers::render_details(&state));
            if state.details.is_none() {
                bail!("failed to fetch oompa loompa {}", id);
            }
        }
        Cmd::Browse => browse(repository).await?,
    }

    Ok(())
}

async fn browse(repository: Arc<dyn OompaLoompasRepository>) -> Result<()> {
    let mut session = Session::new(
        ListViewModel::new(repository.clone(), Handle::current()),
        DetailViewModel::new(repository, Handle::current()),
    );
    println!("{}", handlers::HELP);
    print!("{}", session.start().await);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(handlers::CommandError::Empty) => continue,
            Err(err) => {
                warn!(%err, "bad command");
                println!("{} (try `help`)", err);
                continue;
            }
        };
        match session.handle(command).await {
            Reply::Output(out) => print!("{}", out),
            Reply::Quit => break,
        }
    }
    Ok(())
}

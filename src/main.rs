use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hacklab_hub::app::{AppEvent, AppState, Tab};
use hacklab_hub::config::HubConfig;
use hacklab_hub::filter::ProgressFilter;
use hacklab_hub::i18n::Language;
use hacklab_hub::loader;
use hacklab_hub::manifest::{self, GithubReadmeSource, LocalReadmeSource, ReadmeSource};
use hacklab_hub::model::ProgressLevel;
use hacklab_hub::progress::FileProgressStore;
use hacklab_hub::{HubError, Result, render};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_env("HACKLAB_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|err| HubError::Logging(err.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    let config = HubConfig::resolve(
        cli.data_dir,
        cli.data_url,
        cli.progress_file,
        cli.lang,
        cli.page_url,
    );

    match cli.command {
        Command::Generate(args) => execute_generate(args),
        command => execute_browse(&config, command),
    }
}

fn execute_browse(config: &HubConfig, command: Command) -> Result<()> {
    // A failed load is diagnosed and leaves every view empty.
    let mut state = match loader::load_catalog(&config.data) {
        Ok(catalog) => AppState::new(catalog, config.language),
        Err(err) => {
            error!(error = %err, "error loading data");
            return Ok(());
        }
    };
    let mut store = FileProgressStore::open(&config.progress_file);
    let language = config.language;

    match command {
        Command::List(args) => {
            state.apply(AppEvent::SwitchTab(Tab::Catalog), &mut store)?;
            if let Some(category) = args.category {
                state.apply(AppEvent::SetCategory(category), &mut store)?;
            }
            state.apply(AppEvent::SetProgressFilter(args.progress), &mut store)?;
            if let Some(search) = args.search {
                state.apply(AppEvent::SetSearch(search), &mut store)?;
            }
            print!("{}", render::render_list(&state.list_view(&store)));
        }
        Command::Dashboard => {
            state.apply(AppEvent::SwitchTab(Tab::Dashboard), &mut store)?;
            print!(
                "{}",
                render::render_dashboard(&state.dashboard_view(&store), language)
            );
        }
        Command::Options => {
            print!(
                "{}",
                render::render_filter_options(&state.filter_options(), language)
            );
        }
        Command::Progress(args) => {
            let event = match args.level {
                Some(level) => AppEvent::SetProgress(args.slug.clone(), level),
                None => AppEvent::CycleProgress(args.slug.clone()),
            };
            state.apply(event, &mut store)?;
            if let Some(card) = state.card(&args.slug, &store) {
                print!("{}", render::render_card(&card));
            }
        }
        Command::Reset(args) => {
            if !args.yes && !confirm(language.reset_confirmation())? {
                return Ok(());
            }
            state.apply(AppEvent::ResetAll, &mut store)?;
            println!("{}", language.reset_done());
        }
        Command::Share => {
            println!("{}", state.share_url(&store, &config.page_url));
        }
        Command::Guide => {
            state.apply(AppEvent::OpenHelp, &mut store)?;
            println!("{}", language.help_text());
            state.apply(AppEvent::CloseHelp, &mut store)?;
        }
        Command::Generate(args) => execute_generate(args)?,
    }
    Ok(())
}

fn execute_generate(args: GenerateArgs) -> Result<()> {
    let source: Box<dyn ReadmeSource> = match &args.readme_dir {
        Some(dir) => {
            if !dir.exists() {
                return Err(HubError::MissingInput(dir.clone()));
            }
            Box::new(LocalReadmeSource::new(dir))
        }
        None => Box::new(GithubReadmeSource::new()?),
    };

    let document =
        manifest::generate_manifest(&args.repos, &args.categories, &args.output, source.as_ref())?;
    println!(
        "{} ({} tools)",
        args.output.display(),
        document.tools.len()
    );
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Browse the learning-tool catalog and track your progress."
)]
struct Cli {
    /// Directory holding categories.json and tools.json.
    #[arg(long, global = true, env = "HACKLAB_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Base URL serving categories.json and tools.json; overrides --data-dir.
    #[arg(long, global = true, env = "HACKLAB_DATA_URL")]
    data_url: Option<String>,

    /// File storing per-tool progress.
    #[arg(long, global = true, env = "HACKLAB_PROGRESS_FILE")]
    progress_file: Option<PathBuf>,

    /// Display language (ja or en).
    #[arg(long, global = true, env = "HACKLAB_LANG", default_value = "ja")]
    lang: Language,

    /// Catalog page URL included in the share text.
    #[arg(long, global = true, env = "HACKLAB_PAGE_URL")]
    page_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the tools matching the given filters.
    List(ListArgs),
    /// Show overall and per-category progress.
    Dashboard,
    /// Show the available filter values.
    Options,
    /// Advance a tool's progress by one level, or set it explicitly.
    Progress(ProgressArgs),
    /// Reset every tool to "not started".
    Reset(ResetArgs),
    /// Print a share link summarising your progress.
    Share,
    /// Explain how the catalog works.
    Guide,
    /// Regenerate tools.json from repository READMEs.
    Generate(GenerateArgs),
}

#[derive(clap::Args)]
struct ListArgs {
    /// Only tools in this category id.
    #[arg(long)]
    category: Option<String>,

    /// Only tools at this progress level (all, 0, 1, 2 or 3).
    #[arg(long, default_value = "all")]
    progress: ProgressFilter,

    /// Case-insensitive text matched against titles, descriptions and tags.
    #[arg(long)]
    search: Option<String>,
}

#[derive(clap::Args)]
struct ProgressArgs {
    /// Slug of the tool.
    slug: String,

    /// Level to set (0-3) instead of advancing.
    #[arg(long)]
    level: Option<ProgressLevel>,
}

#[derive(clap::Args)]
struct ResetArgs {
    /// Skip the confirmation prompt.
    #[arg(long)]
    yes: bool,
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// Repository list, one GitHub URL per line.
    #[arg(long, default_value = "repos.txt")]
    repos: PathBuf,

    /// Categories document used to resolve category names.
    #[arg(long, default_value = "data/categories.json")]
    categories: PathBuf,

    /// Where to write the generated tools document.
    #[arg(long, default_value = "data/tools.json")]
    output: PathBuf,

    /// Read READMEs from local checkouts instead of GitHub.
    #[arg(long)]
    readme_dir: Option<PathBuf>,
}

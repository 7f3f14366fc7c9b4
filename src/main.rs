use apidoc_toggles::clock::{Clock, SystemClock};
use apidoc_toggles::config::{self, ToggleConfig};
use apidoc_toggles::cookie::{CookieJar, CookieStore};
use apidoc_toggles::page::{Page, PageLayout};
use apidoc_toggles::{bootstrap, output, privacy, render, sidebar};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Page to open.
#[derive(clap::Args, Clone)]
struct PageArgs {
    /// Absolute URL the page is opened at, including any ?query and #fragment
    url: String,

    /// Page layout JSON (anchors, controls, sidebar). Defaults to an empty
    /// page with both controls.
    #[arg(long)]
    page: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Target {
    /// The "Show/Hide Private API" button
    Private,
    /// The sidebar collapse arrow
    Sidebar,
}

#[derive(Parser)]
#[command(name = "apidoc-toggles")]
#[command(about = "Simulate the private-API and sidebar toggles of generated API docs")]
#[command(long_about = "\
Simulate the private-API and sidebar toggles of generated API docs

Every command opens a page the way a browser would: the toggles read the
URL and the cookie jar, settle on a state, and write first-visit defaults.
The jar is saved afterwards, so consecutive commands behave like
consecutive page loads in one browser.

State resolution on load:
  Private API: ?private=1 → stored private-hidden → #anchor in private
               container shows, anything else hides
  Sidebar:     stored sidebar-collapsed, expanded when absent

Run 'apidoc-toggles gen-config' to generate a documented toggles.toml.")]
#[command(version)]
struct Cli {
    /// Cookie jar file carried between invocations
    #[arg(long, default_value = ".apidoc-toggles/cookies.json", global = true)]
    jar: PathBuf,

    /// Directory containing toggles.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Log decisions to stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open a page and print the resulting toggle state
    Load(PageArgs),
    /// Open a page, then click one of the toggles
    Toggle {
        #[arg(value_enum)]
        target: Target,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Open a page and print its toggle markup as HTML
    Render(PageArgs),
    /// List the live cookies in the jar
    Cookies,
    /// Print a stock toggles.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Command::Load(args) => {
            let config = config::load_config(&cli.config_dir)?;
            let mut store = open_store(&cli.jar);
            let page = open_page(args, &mut store, &config)?;
            store.jar().save(&cli.jar, store.clock().now())?;
            output::print_page_state(&page);
        }
        Command::Toggle { target, page } => {
            let config = config::load_config(&cli.config_dir)?;
            let mut store = open_store(&cli.jar);
            let mut page = open_page(page, &mut store, &config)?;
            match target {
                Target::Private => privacy::toggle(&mut page, &mut store, &config)?,
                Target::Sidebar => sidebar::toggle(&mut page, &mut store, &config)?,
            };
            store.jar().save(&cli.jar, store.clock().now())?;
            output::print_page_state(&page);
        }
        Command::Render(args) => {
            let config = config::load_config(&cli.config_dir)?;
            let mut store = open_store(&cli.jar);
            let page = open_page(args, &mut store, &config)?;
            store.jar().save(&cli.jar, store.clock().now())?;
            println!("{}", render::render_page(&page).into_string());
        }
        Command::Cookies => {
            let jar = CookieJar::load(&cli.jar);
            output::print_cookies(&jar, SystemClock.now());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install a stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "apidoc_toggles=debug,warn",
        _ => "apidoc_toggles=trace,info",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open_store(jar: &Path) -> CookieStore<SystemClock> {
    CookieStore::new(CookieJar::load(jar), SystemClock)
}

/// Open the page at its URL and run the page-load initializers.
fn open_page(
    args: &PageArgs,
    store: &mut CookieStore<SystemClock>,
    config: &ToggleConfig,
) -> Result<Page, Box<dyn std::error::Error>> {
    let layout = match &args.page {
        Some(path) => PageLayout::load(path)?,
        None => PageLayout::default(),
    };
    let mut page = Page::open(layout, &args.url)?;
    bootstrap::load(&mut page, store, config)?;
    Ok(page)
}

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::config::{Configuration, LoadedConfig};
use crate::notify::{MailTransport, Notifier, SmtpMailer};
use crate::remote::{CaseQuery, Fetched, PortalClient, fetch};
use crate::repository::{RepoError, RepoKind, Repository};
use crate::utils::{Console, format_path_with_tilde, get_log_dir, init_logging};

#[derive(Parser)]
#[command(name = "adrian")]
#[command(version)]
#[command(about = "Watch court case files and party searches for new information", long_about = None)]
pub struct Cli {
    /// Suppress output to console (messages go to the log file)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new case file
    Create {
        /// Case file number, e.g. 1234/3/2024
        #[arg(short = 'n', long = "number", value_name = "NUMBER")]
        number: String,
        path: PathBuf,
    },
    /// Create a search by party name
    CreateSearch {
        /// Party name
        #[arg(short = 'p', long = "party", value_name = "PARTY")]
        party: String,
        path: PathBuf,
    },
    /// Print info about the case file
    Info {
        path: PathBuf,
        /// Also send an email if there is unread information
        #[arg(short = 'm', long = "notify")]
        notify: bool,
    },
    /// Print a human readable representation of the case file
    Dump { path: PathBuf },
    /// Synchronize local file with remote data
    Update {
        path: PathBuf,
        /// Send an email when there is new information
        #[arg(short = 'm', long = "notify")]
        notify: bool,
    },
    /// Mark new information in the case file as read
    Mark { path: PathBuf },
    /// Send a test email
    TestNotify,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Held until exit so buffered log lines are flushed
    let _log_guard = match get_log_dir().and_then(|dir| init_logging(&dir)) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {:#}", e);
            None
        }
    };

    let console = Console::new(cli.quiet);
    if console.is_quiet() {
        info!("Quiet mode on, console output redirected to the log file");
    }

    let LoadedConfig { config, sources, warnings } =
        Configuration::load().context("Failed to load configuration")?;
    for source in &sources {
        info!(path = %source.display(), "configuration loaded");
    }
    for warning in &warnings {
        warn!("{}", warning);
        console.say(warning);
    }

    execute(cli.command, &config, &console)
}

/// Dispatch one parsed command
pub fn execute(command: Commands, config: &Configuration, console: &Console) -> Result<()> {
    let notifier = Notifier::new(console, SmtpMailer::new(config.smtp.clone()));

    match command {
        Commands::Create { number, path } => create(&path, &number, RepoKind::ByFileNumber, console),
        Commands::CreateSearch { party, path } => create(&path, &party, RepoKind::BySearch, console),
        Commands::Info { path, notify } => info(&path, notify, &notifier, console),
        Commands::Dump { path } => dump(&path, console),
        Commands::Update { path, notify } => {
            let client = PortalClient::new(&config.service.url, config.service.timeout)
                .context("Failed to set up the portal client")?;
            update(&path, notify, &client, &notifier, console)
        }
        Commands::Mark { path } => mark(&path, console),
        Commands::TestNotify => {
            test_notify(&notifier, console);
            Ok(())
        }
    }
}

fn load_existing(path: &Path) -> Result<Repository> {
    match Repository::load(path)? {
        Some(repo) => Ok(repo),
        None => bail!("No valid case file at: {}", path.display()),
    }
}

pub fn create(path: &Path, criteria: &str, kind: RepoKind, console: &Console) -> Result<()> {
    match Repository::create(path, criteria, kind) {
        Ok(_) => {
            console.say(match kind {
                RepoKind::ByFileNumber => "The case file was successfully initialized at the given path.",
                RepoKind::BySearch => "The search was successfully initialized at the given path.",
            });
            Ok(())
        }
        Err(RepoError::AlreadyExists(_)) => {
            console.say(match kind {
                RepoKind::ByFileNumber => "The given path already contains a case file.",
                RepoKind::BySearch => "The given path already contains a repository.",
            });
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn info<M: MailTransport>(
    path: &Path,
    send_email: bool,
    notifier: &Notifier<'_, M>,
    console: &Console,
) -> Result<()> {
    let repo = load_existing(path)?;

    let label = match repo.kind() {
        RepoKind::ByFileNumber => "File id",
        RepoKind::BySearch => "Party",
    };
    console.say(format_args!("{}: {}", label, repo.criteria()));
    console.say(format_args!("Path: {}", format_path_with_tilde(repo.path())));

    if repo.has_unread_info() {
        notifier.notify(&repo, send_email);
    }
    Ok(())
}

pub fn dump(path: &Path, console: &Console) -> Result<()> {
    let repo = load_existing(path)?;
    console.say(repo.describe()?.trim_end());
    Ok(())
}

pub fn update<Q, M>(
    path: &Path,
    send_email: bool,
    client: &Q,
    notifier: &Notifier<'_, M>,
    console: &Console,
) -> Result<()>
where
    Q: CaseQuery + ?Sized,
    M: MailTransport,
{
    let mut repo = load_existing(path)?;
    let fetched = fetch(client, repo.criteria(), repo.kind());
    let no_records = fetched == Fetched::NoRecords;

    match repo.update(fetched.into_snapshot()) {
        Ok(true) => {
            if repo.has_unread_info() {
                notifier.notify(&repo, send_email);
            }
            Ok(())
        }
        Ok(false) => {
            console.say("There is nothing new in your case file.");
            Ok(())
        }
        Err(e) if e.is_retryable() && no_records => {
            console.say("No records found for the given criteria.");
            Ok(())
        }
        Err(e) if e.is_retryable() => {
            console.say("Can't retrieve data from server.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn mark(path: &Path, console: &Console) -> Result<()> {
    let mut repo = load_existing(path)?;
    if repo.acknowledge()? {
        console.say("The new information in your file has been marked as read.");
    } else {
        console.say("There is nothing new in your case file.");
    }
    Ok(())
}

pub fn test_notify<M: MailTransport>(notifier: &Notifier<'_, M>, console: &Console) {
    if notifier.send_test() {
        console.say("Mail test succeeded");
    } else {
        console.say("Mail test failed");
    }
}

use anyhow::Result;
use clap::{Parser, Subcommand};
mod auth;
use credvault::{
    Analysis, CommonPasswordSet, CredentialEntry, GeneratorOptions, KdfParams, Storage,
    StrengthEvaluator, Vault, VaultError, default_storage, generate_password,
    load_common_passwords,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

#[derive(Debug, clap::Args)]
struct Argon2Args {
    /// Argon2 memory cost in KiB (default: 65536)
    #[arg(long = "argon-mem")]
    mem_cost_kib: Option<u32>,

    /// Argon2 time cost / iterations (default: 3)
    #[arg(long = "argon-time")]
    time_cost: Option<u32>,

    /// Argon2 parallelism (default: 1)
    #[arg(long = "argon-parallelism")]
    parallelism: Option<u32>,
}

impl Argon2Args {
    fn to_kdf_params(&self) -> Result<KdfParams> {
        let default = KdfParams::default();

        Ok(KdfParams::new(
            self.mem_cost_kib.unwrap_or(default.mem_cost_kib()),
            self.time_cost.unwrap_or(default.time_cost()),
            self.parallelism.unwrap_or(default.parallelism()),
        )?)
    }
}

#[derive(Debug, clap::Args)]
struct GenerateArgs {
    /// Generate a random password instead of prompting for one
    #[arg(short, long)]
    generate: bool,

    /// Length of the generated password
    #[arg(long, default_value_t = credvault::generator::DEFAULT_GENERATED_LENGTH)]
    length: usize,

    /// Leave symbols out of the generated password
    #[arg(long)]
    no_symbols: bool,
}

impl GenerateArgs {
    fn options(&self) -> GeneratorOptions {
        GeneratorOptions {
            length: self.length,
            symbols: !self.no_symbols,
            ..Default::default()
        }
    }

    /// The generated password, or one read from the user.
    fn resolve(&self) -> Result<Zeroizing<String>> {
        if self.generate {
            let pw = generate_password(&self.options())?;
            println!("generated password: {}", pw.as_str());
            return Ok(pw);
        }
        auth::read_secret_with_confirmation("Password: ", "Confirm password: ")
    }
}

fn resolve_storage(path: Option<PathBuf>) -> Result<Storage> {
    match path {
        Some(p) => Ok(Storage::new(p)),
        None => default_storage(),
    }
}

#[derive(Debug, Parser)]
#[command(name = "credvault")]
#[command(
    version,
    about = "Offline credential vault with password strength analysis."
)]
struct Cli {
    /// Path to the vault directory
    #[arg(long, global = true, value_name = "PATH", env = "CREDVAULT_DIR")]
    dir: Option<PathBuf>,

    /// Newline-delimited list of common passwords (default: built-in list)
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        env = "CREDVAULT_COMMON_PASSWORDS"
    )]
    common_passwords: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Creates the vault and sets the master password
    Init {
        #[command(flatten)]
        argon2: Argon2Args,
    },

    /// Stores a new credential
    #[command(arg_required_else_help = true)]
    Add {
        service: String,
        username: String,
        #[command(flatten)]
        password: GenerateArgs,
    },

    /// Shows a credential with its decrypted password
    #[command(arg_required_else_help = true)]
    Get { id: u64 },

    /// Replaces the password of a credential
    #[command(arg_required_else_help = true)]
    Update {
        id: u64,
        #[command(flatten)]
        password: GenerateArgs,
    },

    /// Removes a credential
    #[command(arg_required_else_help = true)]
    Remove { id: u64 },

    /// Lists stored credentials without passwords
    List {
        /// Only show services containing this text
        #[arg(short, long)]
        service: Option<String>,
    },

    /// Scores a password and suggests improvements
    Analyze {
        /// Password to analyze (prompted for if omitted)
        password: Option<String>,
    },

    /// Prints a random password
    Generate {
        #[arg(long, default_value_t = credvault::generator::DEFAULT_GENERATED_LENGTH)]
        length: usize,

        #[arg(long)]
        no_symbols: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "credvault=debug"
    } else {
        "credvault=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn unlock(storage: &Storage, evaluator: &StrengthEvaluator) -> Result<Vault> {
    Vault::unlock(
        storage,
        evaluator,
        auth::is_interactive(),
        auth::read_master_password,
        |remaining| eprintln!("Incorrect password. {remaining} attempts remaining"),
    )
}

fn column_width(
    entries: &[&CredentialEntry],
    header: &str,
    len: impl Fn(&CredentialEntry) -> usize,
) -> usize {
    entries
        .iter()
        .map(|&e| len(e))
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(header.len())
}

fn print_analysis(analysis: &Analysis) {
    let score = analysis.result.score;
    let filled = usize::from(score / 5);
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(20 - filled));

    println!(
        "Strength: {bar} {score}/100 ({})",
        analysis.result.rating.as_str().to_uppercase()
    );
    println!("Suggestions:");
    for item in &analysis.feedback {
        println!("  - {item}");
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Cli::parse();
    init_tracing(args.verbose);

    let common: CommonPasswordSet = load_common_passwords(args.common_passwords.clone());
    let evaluator = StrengthEvaluator::new(Arc::new(common));

    match args.command {
        Commands::Init { argon2 } => {
            let kdf = argon2.to_kdf_params()?;
            let storage = resolve_storage(args.dir.clone())?;
            if !Vault::is_first_run(&storage)? {
                return Err(VaultError::StoreExists.into());
            }
            let password = auth::read_new_master_password()?;
            let analysis = evaluator.analyze(&password);
            Vault::init(storage, password, kdf, evaluator)?.lock();
            println!("vault initialized");
            print_analysis(&analysis);
        }
        Commands::Add {
            service,
            username,
            password,
        } => {
            let storage = resolve_storage(args.dir.clone())?;
            let mut vault = unlock(&storage, &evaluator)?;
            let secret = password.resolve()?;
            let id = vault.add(&service, &username, &secret)?;
            vault.save()?;
            println!("stored entry {id} for '{service}'");
            print_analysis(&vault.evaluator().analyze(&secret));
        }
        Commands::Get { id } => {
            let storage = resolve_storage(args.dir.clone())?;
            let vault = unlock(&storage, &evaluator)?;
            let revealed = vault.reveal(id)?;
            let entry = revealed.entry;
            let result = &revealed.analysis.result;
            println!("Service:  {}", entry.service());
            println!("Username: {}", entry.username());
            println!("Password: {}", revealed.password.as_str());
            println!("Created:  {}", entry.created());
            println!(
                "Strength: {} ({}/100)",
                result.rating.as_str().to_uppercase(),
                result.score
            );
            if result.rating != entry.strength() {
                println!("          stored rating was '{}'", entry.strength());
            }
        }
        Commands::Update { id, password } => {
            let storage = resolve_storage(args.dir.clone())?;
            let mut vault = unlock(&storage, &evaluator)?;
            let secret = password.resolve()?;
            vault.update_password(id, &secret)?;
            vault.save()?;
            println!("entry {id} updated");
            print_analysis(&vault.evaluator().analyze(&secret));
        }
        Commands::Remove { id } => {
            let storage = resolve_storage(args.dir.clone())?;
            let mut vault = unlock(&storage, &evaluator)?;
            let removed = vault.remove(id)?;
            vault.save()?;
            println!("entry {id} ('{}') removed successfully", removed.service());
        }
        Commands::List { service } => {
            let storage = resolve_storage(args.dir.clone())?;
            let vault = unlock(&storage, &evaluator)?;
            let entries: Vec<_> = match &service {
                Some(s) => vault.find(s).collect(),
                None => vault.entries().collect(),
            };

            if entries.is_empty() {
                println!("No passwords stored.");
                return Ok(());
            }

            let id_w = column_width(&entries, "ID", |e| e.id().to_string().len());
            let service_w = column_width(&entries, "Service", |e| e.service().chars().count());
            let user_w = column_width(&entries, "Username", |e| e.username().chars().count());
            let strength_w = column_width(&entries, "Strength", |e| e.strength().as_str().len());

            println!(
                "{:<id_w$}  {:<service_w$}  {:<user_w$}  {:<strength_w$}  Created",
                "ID", "Service", "Username", "Strength"
            );
            println!(
                "{:-<id_w$}  {:-<service_w$}  {:-<user_w$}  {:-<strength_w$}  {:-<10}",
                "", "", "", "", ""
            );
            for e in entries {
                println!(
                    "{:<id_w$}  {:<service_w$}  {:<user_w$}  {:<strength_w$}  {}",
                    e.id(),
                    e.service(),
                    e.username(),
                    e.strength().as_str(),
                    e.created()
                );
            }
        }
        Commands::Analyze { password } => {
            let password = match password {
                Some(p) => Zeroizing::new(p),
                None => auth::read_secret("Password to analyze: ")?,
            };
            print_analysis(&evaluator.analyze(&password));
        }
        Commands::Generate { length, no_symbols } => {
            let opts = GeneratorOptions {
                length,
                symbols: !no_symbols,
                ..Default::default()
            };
            let password = generate_password(&opts)?;
            println!("{}", password.as_str());
        }
    }

    Ok(())
}

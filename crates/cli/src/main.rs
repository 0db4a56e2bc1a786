// tagcalc CLI - headless formula editing and evaluation

mod exit_codes;
mod repl;
mod resolve;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tagcalc_config::{FormulaStore, Settings};
use tagcalc_engine::session::ERROR_RESULT;
use tagcalc_engine::{Catalog, FormulaSession, PersistedState, SavedFormulaId, EXAMPLES};

use exit_codes::{
    EXIT_ERROR, EXIT_EVAL_ERROR, EXIT_NOT_FOUND, EXIT_REFUSED, EXIT_STORE_NAMESPACE,
    EXIT_STORE_WRITE, EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "tagcalc")]
#[command(about = "Build and evaluate formulas over named variables (headless)")]
#[command(version)]
struct Cli {
    /// Directory holding settings.json and the formula store
    /// (default: the user config directory)
    #[arg(long, global = true, env = "TAGCALC_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a formula given as parts (variable names become tags)
    #[command(after_help = "\
Examples:
  tagcalc eval 'Base salary' '*' '(' 1 + 0.05 ')'
  tagcalc eval 2 ^ 10")]
    Eval {
        /// Formula parts, in order
        #[arg(required = true, allow_hyphen_values = true)]
        parts: Vec<String>,
    },

    /// List the built-in example formulas, or evaluate one
    Examples {
        /// Example number to evaluate (1-based)
        n: Option<usize>,
    },

    /// Show autocomplete suggestions for a query
    Suggest {
        /// Text typed so far (empty lists the default suggestions)
        #[arg(default_value = "")]
        query: String,
    },

    /// List variables
    Vars {
        /// Only variables of this linked model
        #[arg(long)]
        model: Option<String>,
    },

    /// Set a variable's value (percent variables accept "5%")
    SetVar {
        id: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// List or change linked models
    Models {
        #[command(subcommand)]
        command: Option<ModelCommands>,
    },

    /// List, show or delete saved formulas
    Saved {
        #[command(subcommand)]
        command: Option<SavedCommands>,
    },

    /// Interactive line editor (changes are saved on exit)
    Repl,
}

#[derive(Subcommand)]
enum ModelCommands {
    /// Add an inactive model
    Add {
        name: String,
        kind: String,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Remove a model (the last one cannot be removed)
    Remove { id: String },
    /// Make a model the active one
    Activate { id: String },
}

#[derive(Subcommand)]
enum SavedCommands {
    /// Print a saved formula's tokens and stored result
    Show { id: String },
    /// Delete a saved formula
    Delete { id: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let data_dir = cli
        .data_dir
        .map(|dir| PathBuf::from(shellexpand::tilde(&dir.to_string_lossy()).to_string()));
    let settings = match &data_dir {
        Some(dir) => Settings::load_from(&dir.join("settings.json")),
        None => Settings::load(),
    };
    init_logging(&settings);

    let result = Context::open(data_dir, settings).and_then(|mut ctx| match cli.command {
        Commands::Eval { parts } => cmd_eval(&mut ctx, &parts),
        Commands::Examples { n } => cmd_examples(&mut ctx, n),
        Commands::Suggest { query } => cmd_suggest(&ctx, &query),
        Commands::Vars { model } => cmd_vars(&ctx, model.as_deref()),
        Commands::SetVar { id, value } => cmd_set_var(&mut ctx, &id, &value),
        Commands::Models { command } => cmd_models(&mut ctx, command),
        Commands::Saved { command } => cmd_saved(&mut ctx, command),
        Commands::Repl => cmd_repl(ctx),
    });

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

/// Log to stderr. `TAGCALC_LOG` overrides the settings file's `log.level`.
fn init_logging(settings: &Settings) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env("TAGCALC_LOG")
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(filter)
        .init();
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(EXIT_NOT_FOUND, msg)
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Session plus the store it came from
struct Context {
    session: FormulaSession,
    store: FormulaStore,
    settings: Settings,
}

impl Context {
    fn open(data_dir: Option<PathBuf>, settings: Settings) -> Result<Self, CliError> {
        let store = match data_dir {
            Some(dir) => FormulaStore::with_root(dir, &settings.namespace),
            None => FormulaStore::new(&settings.namespace),
        }
        .map_err(|e| {
            CliError::new(EXIT_STORE_NAMESPACE, e.to_string())
                .with_hint("check \"storage.namespace\" in settings.json")
        })?;

        log::debug!("Using formula store {}", store.path().display());
        let session = store.load().into_session();
        Ok(Self { session, store, settings })
    }

    fn persist(&self) -> Result<(), CliError> {
        self.store
            .save(&PersistedState::from_session(&self.session))
            .map_err(|e| CliError::new(EXIT_STORE_WRITE, e.to_string()))
    }
}

fn print_result(result: &str) -> Result<(), CliError> {
    println!("{}", result);
    if result == ERROR_RESULT {
        return Err(CliError::new(EXIT_EVAL_ERROR, "")
            .with_hint("TAGCALC_LOG=debug shows the built expression"));
    }
    Ok(())
}

fn cmd_eval(ctx: &mut Context, parts: &[String]) -> Result<(), CliError> {
    let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
    let result = ctx.session.apply_example(&parts).to_string();
    print_result(&result)
}

fn cmd_examples(ctx: &mut Context, n: Option<usize>) -> Result<(), CliError> {
    let Some(n) = n else {
        for (i, example) in EXAMPLES.iter().enumerate() {
            println!("{}. {}", i + 1, example.display);
        }
        return Ok(());
    };

    let example = n
        .checked_sub(1)
        .and_then(|i| EXAMPLES.get(i))
        .ok_or_else(|| CliError::not_found(format!("no example {}", n)))
        .map_err(|e| e.with_hint(format!("examples are numbered 1-{}", EXAMPLES.len())))?;
    let result = ctx.session.apply_example(example.parts).to_string();
    println!("{}", example.display);
    print_result(&result)
}

fn cmd_suggest(ctx: &Context, query: &str) -> Result<(), CliError> {
    let catalog = Catalog::new();
    let matches = catalog.match_query(query, ctx.settings.suggestion_limit);
    if matches.is_empty() {
        return Err(CliError::not_found(format!("no suggestions for \"{}\"", query)));
    }
    for s in matches {
        println!("{:<3} {:<9} {}", s.id, s.kind.name(), s.display);
    }
    Ok(())
}

fn cmd_vars(ctx: &Context, model: Option<&str>) -> Result<(), CliError> {
    if let Some(model) = model {
        if ctx.session.models().get(model).is_none() {
            return Err(CliError::not_found(format!("no model \"{}\"", model)));
        }
    }
    let registry = ctx.session.registry();
    for binding in registry.iter().filter(|b| model.map_or(true, |m| b.model_id == m)) {
        println!(
            "{:<20} {:<20} {:>16}  {}",
            binding.id,
            binding.name,
            binding.display_value(),
            binding.model_id
        );
    }
    Ok(())
}

fn cmd_set_var(ctx: &mut Context, id: &str, value: &str) -> Result<(), CliError> {
    let binding = ctx
        .session
        .registry()
        .get_by_id(id)
        .ok_or_else(|| CliError::not_found(format!("no variable \"{}\"", id)).with_hint("see `tagcalc vars`"))?;
    let parsed = binding
        .parse_input(value)
        .ok_or_else(|| CliError::args(format!("not a number: \"{}\"", value)))?;

    ctx.session.set_variable(id, parsed);
    ctx.persist()?;
    if let Some(binding) = ctx.session.registry().get_by_id(id) {
        println!("{} = {}", binding.name, binding.display_value());
    }
    Ok(())
}

fn cmd_models(ctx: &mut Context, command: Option<ModelCommands>) -> Result<(), CliError> {
    match command {
        None => {
            for model in ctx.session.models().iter() {
                let marker = if model.is_active { "*" } else { " " };
                println!("{} {:<24} {:<28} {}", marker, model.id, model.name, model.kind);
            }
            return Ok(());
        }
        Some(ModelCommands::Add { name, kind, icon, color }) => {
            let id = ctx.session.add_model(&name, &kind, icon, color);
            println!("{}", id);
        }
        Some(ModelCommands::Remove { id }) => {
            if ctx.session.models().get(&id).is_none() {
                return Err(CliError::not_found(format!("no model \"{}\"", id)));
            }
            if !ctx.session.remove_model(&id) {
                return Err(CliError::new(EXIT_REFUSED, "cannot remove the last linked model"));
            }
        }
        Some(ModelCommands::Activate { id }) => {
            if !ctx.session.set_active_model(&id) {
                return Err(CliError::not_found(format!("no model \"{}\"", id)));
            }
        }
    }
    ctx.persist()
}

fn find_saved(ctx: &Context, arg: &str) -> Result<SavedFormulaId, CliError> {
    resolve::saved(ctx.session.archive(), arg)
        .ok_or_else(|| CliError::not_found(format!("no saved formula \"{}\"", arg)))
}

fn cmd_saved(ctx: &mut Context, command: Option<SavedCommands>) -> Result<(), CliError> {
    match command {
        None => {
            for f in ctx.session.archive().list() {
                println!(
                    "{}  {}  {:<24} = {}",
                    resolve::short_id(&f.id),
                    f.timestamp.format("%Y-%m-%d %H:%M"),
                    f.name,
                    f.result.as_deref().unwrap_or("-")
                );
            }
            Ok(())
        }
        Some(SavedCommands::Show { id }) => {
            let id = find_saved(ctx, &id)?;
            ctx.session.load(id);
            if ctx.settings.evaluate_on_load {
                ctx.session.evaluate();
            }
            println!("{}", ctx.session.sequence().render());
            println!("= {}", ctx.session.result().unwrap_or("-"));
            Ok(())
        }
        Some(SavedCommands::Delete { id }) => {
            let id = find_saved(ctx, &id)?;
            ctx.session.delete_saved(id);
            ctx.persist()
        }
    }
}

fn cmd_repl(ctx: Context) -> Result<(), CliError> {
    let Context { session, store, settings } = ctx;
    let prompt = atty::is(atty::Stream::Stdin);

    let mut editor = repl::Repl::new(session, settings.suggestion_limit, settings.evaluate_on_load);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let run = editor.run(stdin.lock(), &mut stdout, prompt);

    // Persist whatever was saved even if input broke off
    let ctx = Context { session: editor.into_session(), store, settings };
    ctx.persist()?;
    run.map_err(|e| CliError::new(EXIT_ERROR, format!("reading input: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_eval_parts() {
        let cli = Cli::try_parse_from(["tagcalc", "eval", "-2", "*", "Base salary"]).unwrap();
        match cli.command {
            Commands::Eval { parts } => assert_eq!(parts, ["-2", "*", "Base salary"]),
            _ => panic!("expected eval"),
        }
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["tagcalc"]).is_err());
    }

    #[test]
    fn test_cli_data_dir_is_global() {
        let cli = Cli::try_parse_from(["tagcalc", "models", "--data-dir", "/tmp/x", "activate", "comp-calc"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        assert!(matches!(
            cli.command,
            Commands::Models { command: Some(ModelCommands::Activate { .. }) }
        ));
    }
}

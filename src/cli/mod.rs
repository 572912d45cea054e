//! Command-line interface for `lit`.
//!
//! This module provides the CLI parsing and command routing using clap.

pub mod commands;
pub mod spec;

use std::path::PathBuf;

use anyhow::{Context as _, Result, anyhow};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use lit_lib::{CommandEditor, IssueStore, Layout};

use crate::config::{CliOverrides, Settings};
use crate::logging;
use spec::{PipedInput, Spec};

/// `lit` - issue tracker in a single plain-text outline file.
#[derive(Parser, Debug)]
#[command(name = "lit")]
#[command(
    author,
    version,
    about = "Issue tracker in a single plain-text outline file",
    long_about = None,
    after_help = "Selection words: [sortby|rsortby KEY] [all | IDS... | with|without KEY [VAL] | less|greater KEY VAL]\n\
                  Use the 'comment' key to filter by comment text and times, 'attach' by attached files.\n\
                  id, list, show and edit default to open issues unless input is piped."
)]
pub struct Cli {
    /// Name recorded in stamps (default: user@host)
    #[arg(long, global = true, env = "LIT_USER")]
    pub actor: Option<String>,

    /// Where the issue file lives: tracker (.lit/issues, searched upward) or flat (./issues)
    #[arg(long, global = true, env = "LIT_LAYOUT")]
    pub layout: Option<Layout>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new issue tracker
    Init,

    /// Create new issues and print their ids
    New {
        /// How many issues to create
        #[arg(default_value_t = 1)]
        count: u16,
    },

    /// List ids of selected issues (default: open)
    Id(SpecArgs),

    /// Show a one-line summary of selected issues (default: open)
    List(SpecArgs),

    /// Show selected issues in full (default: open)
    Show(ShowArgs),

    /// Set a field in selected issues
    Set(SetArgs),

    /// Add or delete a tag in selected issues
    Tag(TagArgs),

    /// Add a comment (default: write it in the editor)
    Comment(CommentArgs),

    /// Attach files to an issue
    Attach(AttachCommand),

    /// Edit selected issues in the editor (default: open)
    Edit(SpecArgs),

    /// Close selected issues
    Close(SpecArgs),

    /// Reopen selected issues
    Reopen(SpecArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Default)]
pub struct SpecArgs {
    /// Selection words
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub words: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Output JSON instead of outline text
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub spec: SpecArgs,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Field name (prefixes of known fields are accepted)
    pub key: String,

    /// New value
    #[arg(allow_hyphen_values = true)]
    pub value: String,

    #[command(flatten)]
    pub spec: SpecArgs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TagOp {
    Add,
    Del,
}

#[derive(Args, Debug)]
pub struct TagArgs {
    #[arg(value_enum)]
    pub op: TagOp,

    pub tag: String,

    #[command(flatten)]
    pub spec: SpecArgs,
}

#[derive(Args, Debug)]
pub struct CommentArgs {
    /// Issue id or prefix
    pub id: String,

    /// Comment text
    pub text: Option<String>,
}

#[derive(Args, Debug)]
pub struct AttachCommand {
    #[command(subcommand)]
    pub command: AttachSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AttachSubcommand {
    /// Attach a file (default: write the description in the editor)
    Add {
        id: String,
        file: PathBuf,
        description: Option<String>,
    },

    /// List attached files
    List { id: String },

    /// Write an attached file to stdout
    Get { id: String, name: String },
}

/// Everything a command needs besides its own arguments.
#[derive(Debug)]
pub struct Context {
    pub settings: Settings,
    pub input: PipedInput,
}

impl Context {
    /// Parse selection words plus any piped words.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed selection words.
    pub fn spec(&self, args: &SpecArgs) -> Result<Spec> {
        let mut words = args.words.clone();
        words.extend(self.input.words.iter().cloned());
        Ok(Spec::parse(&words)?)
    }

    /// Whether an empty selection means open issues.
    #[must_use]
    pub const fn default_open(&self) -> bool {
        !self.input.piped
    }

    /// # Errors
    ///
    /// Returns an error if the issue file cannot be found or parsed.
    pub fn open_store(&self) -> Result<IssueStore> {
        Ok(IssueStore::open(self.settings.store_config())?)
    }

    /// # Errors
    ///
    /// Returns an error if no editor is configured.
    pub fn editor(&self) -> Result<CommandEditor> {
        self.settings
            .editor
            .as_deref()
            .map(CommandEditor::new)
            .ok_or_else(|| anyhow!("VISUAL or EDITOR environment variable must be set"))
    }
}

/// Run the CLI.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet)?;

    let name = cli.command.name();
    if let Commands::Completions { shell } = cli.command {
        commands::completions::execute(shell);
        return Ok(());
    }

    let overrides = CliOverrides {
        actor: cli.actor,
        layout: cli.layout,
        editor: CliOverrides::editor_from_env(),
    };
    let cwd = std::env::current_dir().context("reading current directory")?;
    let settings = Settings::load(&cwd, overrides)?;
    tracing::debug!(?settings, "Resolved settings");

    let input = if cli.command.takes_spec() {
        PipedInput::detect().context("reading stdin")?
    } else {
        PipedInput::default()
    };
    let ctx = Context { settings, input };

    dispatch(cli.command, &ctx).context(name)
}

fn dispatch(command: Commands, ctx: &Context) -> Result<()> {
    match command {
        Commands::Init => commands::init::execute(ctx),
        Commands::New { count } => commands::new::execute(count, ctx),
        Commands::Id(args) => commands::id::execute(&args, ctx),
        Commands::List(args) => commands::list::execute(&args, ctx),
        Commands::Show(args) => commands::show::execute(&args, ctx),
        Commands::Set(args) => commands::set::execute(&args, ctx),
        Commands::Tag(args) => commands::tag::execute(&args, ctx),
        Commands::Comment(args) => commands::comment::execute(&args, ctx),
        Commands::Attach(attach) => commands::attach::execute(&attach.command, ctx),
        Commands::Edit(args) => commands::edit::execute(&args, ctx),
        Commands::Close(args) => commands::close::execute(&args, true, ctx),
        Commands::Reopen(args) => commands::close::execute(&args, false, ctx),
        Commands::Completions { shell } => {
            commands::completions::execute(shell);
            Ok(())
        }
    }
}

impl Commands {
    const fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::New { .. } => "new",
            Self::Id(_) => "id",
            Self::List(_) => "list",
            Self::Show(_) => "show",
            Self::Set(_) => "set",
            Self::Tag(_) => "tag",
            Self::Comment(_) => "comment",
            Self::Attach(attach) => match attach.command {
                AttachSubcommand::Add { .. } => "attach add",
                AttachSubcommand::List { .. } => "attach list",
                AttachSubcommand::Get { .. } => "attach get",
            },
            Self::Edit(_) => "edit",
            Self::Close(_) => "close",
            Self::Reopen(_) => "reopen",
            Self::Completions { .. } => "completions",
        }
    }

    /// Commands that accept trailing selection words.
    const fn takes_spec(&self) -> bool {
        matches!(
            self,
            Self::Id(_)
                | Self::List(_)
                | Self::Show(_)
                | Self::Set(_)
                | Self::Tag(_)
                | Self::Edit(_)
                | Self::Close(_)
                | Self::Reopen(_)
        )
    }
}

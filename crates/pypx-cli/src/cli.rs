use clap::{ArgAction, Args, Parser, Subcommand};

pub const PYPX_HELP_TEMPLATE: &str =
    "{before-help}\nUsage:\n    {usage}\n\nCommands:\n{subcommands}\n\nGlobal options:\n{options}\n";

pub const PYPX_BEFORE_HELP: &str = concat!(
    "pypx ",
    env!("CARGO_PKG_VERSION"),
    " – run Python scripts under any interpreter version\n",
);

#[derive(Parser, Debug)]
#[command(
    name = "pypx",
    author,
    version,
    propagate_version = false,
    disable_help_subcommand = true,
    before_help = PYPX_BEFORE_HELP,
    help_template = PYPX_HELP_TEMPLATE
)]
#[allow(clippy::struct_excessive_bools)]
pub struct PypxCli {
    #[arg(
        short,
        long,
        help = "Suppress human output (errors still print to stderr)",
        global = true
    )]
    pub quiet: bool,
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        help = "Increase logging (-vv reaches trace)",
        global = true
    )]
    pub verbose: u8,
    #[arg(long, help = "Force trace logging regardless of -v/-q", global = true)]
    pub trace: bool,
    #[arg(
        long,
        help = "Emit {status,message,details} JSON envelopes",
        global = true
    )]
    pub json: bool,
    #[arg(long, help = "Disable colored human output", global = true)]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: CommandGroupCli,
}

#[derive(Subcommand, Debug)]
pub enum CommandGroupCli {
    #[command(about = "List pypx-managed interpreters (and system ones with --all).")]
    List(ListArgs),
    #[command(about = "Download and install a Python version into the pypx tree.")]
    Install(InstallArgs),
    #[command(about = "Run a script with a specific Python version, installing it if missing.")]
    Run(RunArgs),
    #[command(about = "Print the interpreter a version resolves to.")]
    Which(WhichArgs),
    #[command(subcommand, about = "Create, list, and activate virtual environments.")]
    Env(EnvCommand),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(long, help = "Include interpreters found on PATH")]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct InstallArgs {
    #[arg(value_name = "VERSION", help = "Exact version (3.11.5) or series (3.11)")]
    pub version: String,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[arg(value_name = "VERSION")]
    pub version: String,
    #[arg(value_name = "SCRIPT")]
    pub script: String,
    #[arg(
        value_name = "ARG",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        help = "Arguments forwarded to the script"
    )]
    pub args: Vec<String>,
}

#[derive(Args, Debug)]
pub struct WhichArgs {
    #[arg(value_name = "VERSION", help = "Version to resolve (default interpreter if omitted)")]
    pub version: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum EnvCommand {
    #[command(about = "List environments under the pypx envs directory.")]
    List,
    #[command(about = "Create an environment with the given Python version.")]
    Create(EnvCreateArgs),
    #[command(about = "Open a shell with the environment activated.")]
    Activate(EnvActivateArgs),
}

#[derive(Args, Debug)]
pub struct EnvCreateArgs {
    #[arg(value_name = "NAME", help = "Environment name (defaults to pypx-<VERSION>)")]
    pub name: Option<String>,
    #[arg(
        long,
        value_name = "VERSION",
        help = "Python version for the environment (defaults to 3.11)"
    )]
    pub python: Option<String>,
}

#[derive(Args, Debug)]
pub struct EnvActivateArgs {
    #[arg(value_name = "NAME")]
    pub name: String,
}

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};

pub const NO_COMMAND: &str = "Please enter a command.";
pub const UNKNOWN_COMMAND: &str = "No command with that name exists.";
pub const INCORRECT_OPERANDS: &str = "Incorrect operands.";

#[derive(Parser)]
#[command(name = "twig", about = "Twig: a small local version-control system", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Log engine activity to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a repository in the current directory
    Init(InitArgs),
    /// Stage a file's current content
    Add(AddArgs),
    /// Record the staged changes
    Commit(CommitArgs),
    /// Restore a file, or switch branches
    Checkout(CheckoutArgs),
    /// Show the current branch's history
    Log(LogArgs),
    /// Show every commit ever made
    GlobalLog(LogArgs),
    /// Print the ids of commits with the given message
    Find(FindArgs),
    /// Unstage a file, or stage its removal
    Rm(RmArgs),
    /// Show branches, staged changes and working-tree changes
    Status(StatusArgs),
    /// Create a branch at the current commit
    Branch(BranchArgs),
    /// Delete a branch pointer
    RmBranch(BranchArgs),
    /// Move the current branch to a commit
    Reset(ResetArgs),
    /// Merge a branch into the current branch
    Merge(MergeArgs),
}

#[derive(Args)]
pub struct InitArgs {}

#[derive(Args)]
pub struct AddArgs {
    pub file: String,
}

#[derive(Args)]
pub struct CommitArgs {
    pub message: Option<String>,
}

/// `checkout -- <file>`, `checkout <commit> -- <file>` or
/// `checkout <branch>`.
#[derive(Args)]
pub struct CheckoutArgs {
    pub target: Option<String>,
    #[arg(last = true)]
    pub file: Option<String>,
}

/// What a `checkout` invocation asks for.
#[derive(Debug, PartialEq, Eq)]
pub enum CheckoutTarget<'a> {
    File(&'a str),
    FileAt { commit: &'a str, file: &'a str },
    Branch(&'a str),
}

impl CheckoutArgs {
    /// `None` if neither a target nor a file was given.
    pub fn resolve(&self) -> Option<CheckoutTarget<'_>> {
        match (self.target.as_deref(), self.file.as_deref()) {
            (None, Some(file)) => Some(CheckoutTarget::File(file)),
            (Some(commit), Some(file)) => Some(CheckoutTarget::FileAt { commit, file }),
            (Some(branch), None) => Some(CheckoutTarget::Branch(branch)),
            (None, None) => None,
        }
    }
}

#[derive(Args)]
pub struct LogArgs {}

#[derive(Args)]
pub struct FindArgs {
    pub message: String,
}

#[derive(Args)]
pub struct RmArgs {
    pub file: String,
}

#[derive(Args)]
pub struct StatusArgs {}

#[derive(Args)]
pub struct BranchArgs {
    pub name: String,
}

#[derive(Args)]
pub struct ResetArgs {
    pub commit: String,
}

#[derive(Args)]
pub struct MergeArgs {
    pub branch: String,
}

/// The line printed for a parse failure, or `None` for help and version
/// output, which clap renders itself.
pub fn usage_message(err: &clap::Error) -> Option<&'static str> {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => None,
        ErrorKind::MissingSubcommand | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            Some(NO_COMMAND)
        }
        ErrorKind::InvalidSubcommand => Some(UNKNOWN_COMMAND),
        _ => Some(INCORRECT_OPERANDS),
    }
}

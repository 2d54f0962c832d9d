use std::io::Write;
use std::path::Path;

use twig_sdk::{Repository, TwigResult};

use crate::cli::*;

/// Run one command against the repository rooted at `root`.
///
/// Errors the user caused are printed to `out` like any other output and
/// count as success; only fatal errors are returned.
pub fn run_command(
    command: Option<Command>,
    root: &Path,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let Some(command) = command else {
        writeln!(out, "{NO_COMMAND}")?;
        return Ok(());
    };
    match execute(command, root, out) {
        Ok(()) => Ok(()),
        Err(err) if err.is_user_error() => {
            tracing::debug!(kind = ?err.kind(), "command refused");
            writeln!(out, "{err}")?;
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn execute(command: Command, root: &Path, out: &mut dyn Write) -> TwigResult<()> {
    if let Command::Init(_) = command {
        Repository::init_fs(root)?;
        return Ok(());
    }
    let repo = Repository::open_fs(root)?;

    match command {
        Command::Init(_) => {}
        Command::Add(args) => {
            repo.add(&args.file)?;
        }
        Command::Commit(args) => {
            repo.commit(args.message.as_deref().unwrap_or_default())?;
        }
        Command::Checkout(args) => cmd_checkout(&repo, &args, out)?,
        Command::Log(_) => write!(out, "{}", repo.render_log(&repo.log()?)?)?,
        Command::GlobalLog(_) => write!(out, "{}", repo.render_log(&repo.global_log()?)?)?,
        Command::Find(args) => {
            for id in repo.find(&args.message)? {
                writeln!(out, "{id}")?;
            }
        }
        Command::Rm(args) => {
            repo.rm(&args.file)?;
        }
        Command::Status(_) => write!(out, "{}", repo.status()?)?,
        Command::Branch(args) => {
            repo.branch(&args.name)?;
        }
        Command::RmBranch(args) => repo.rm_branch(&args.name)?,
        Command::Reset(args) => {
            repo.reset(&args.commit)?;
        }
        Command::Merge(args) => {
            if let Some(message) = repo.merge(&args.branch)?.message() {
                writeln!(out, "{message}")?;
            }
        }
    }
    Ok(())
}

fn cmd_checkout(repo: &Repository, args: &CheckoutArgs, out: &mut dyn Write) -> TwigResult<()> {
    match args.resolve() {
        Some(CheckoutTarget::File(file)) => repo.checkout_file(file),
        Some(CheckoutTarget::FileAt { commit, file }) => repo.checkout_file_at(commit, file),
        Some(CheckoutTarget::Branch(branch)) => repo.checkout_branch(branch),
        None => {
            writeln!(out, "{INCORRECT_OPERANDS}")?;
            Ok(())
        }
    }
}

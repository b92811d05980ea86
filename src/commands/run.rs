//! Run command implementation
//!
//! Runs one merge invocation against a directory-backed bucket and prints
//! the status envelope as JSON on stdout. Everything that can go wrong,
//! including missing configuration, lands in the envelope rather than a bare
//! error: the envelope is the invocation contract. The process exits nonzero
//! for any non-200 envelope so shell callers get both signals.

use std::path::PathBuf;

use console::Style;

use crate::cli::RunArgs;
use crate::error::{MergeError, Result};
use crate::event::InvocationEvent;
use crate::handler::{self, Response};
use crate::merge::{JoinMode, KeyRename, MergePolicy};
use crate::storage::FsStore;

/// Run one merge invocation
pub fn run(args: RunArgs, verbose: bool) -> Result<()> {
    let response = match prepare(&args) {
        Ok((store, event, policy)) => {
            if verbose {
                announce(&store, &policy);
            }
            handler::handle(&store, event.as_ref(), &policy)
        }
        Err(err) => Response::from_error(&err),
    };

    let envelope = serde_json::to_string(&response).map_err(|e| MergeError::Internal {
        message: e.to_string(),
    })?;
    println!("{envelope}");

    if verbose {
        summarize(&response);
    }

    if !response.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

/// Resolve bucket, event, and policy from arguments and environment.
fn prepare(args: &RunArgs) -> Result<(FsStore, Option<InvocationEvent>, MergePolicy)> {
    let bucket = match &args.bucket {
        Some(path) => path.clone(),
        None => PathBuf::from(handler::bucket_from_env()?),
    };

    let event = match &args.event {
        Some(path) => Some(InvocationEvent::from_file(path)?),
        None => None,
    };

    Ok((FsStore::new(bucket), event, build_policy(args)?))
}

/// Policy file first, then flags layered on top.
fn build_policy(args: &RunArgs) -> Result<MergePolicy> {
    let mut policy = match &args.policy {
        Some(path) => MergePolicy::load(path)?,
        None => MergePolicy::default(),
    };

    if args.lenient {
        policy.mode = JoinMode::Lenient;
    }
    if args.raw_prefix {
        policy.raw_prefix = true;
    }
    for spec in &args.rename {
        policy.key_renames.push(KeyRename::parse(spec)?);
    }

    Ok(policy)
}

fn announce(store: &FsStore, policy: &MergePolicy) {
    let label = Style::new().bold();
    let (anxiety_key, demographics_key) = handler::input_keys(policy);
    eprintln!("{} {}", label.apply_to("Bucket:"), store.root().display());
    eprintln!("{} {:?}", label.apply_to("Mode:"), policy.mode);
    eprintln!(
        "{} {anxiety_key}, {demographics_key}",
        label.apply_to("Inputs:")
    );
    eprintln!("{} {}", label.apply_to("Output:"), handler::OUTPUT_KEY);
}

fn summarize(response: &Response) {
    let status = if response.is_success() {
        Style::new().bold().green().apply_to(response.status_code)
    } else {
        Style::new().bold().red().apply_to(response.status_code)
    };
    eprintln!("{} {}", status, response.body);
}

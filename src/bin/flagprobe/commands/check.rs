//! `flagprobe check` command

use anyhow::Result;

use crate::cli::{CheckArgs, GlobalArgs};
use flagprobe::capability::{self, CapabilityOptions};
use flagprobe::core::bucket::FlagBucketStore;
use flagprobe::core::language::LangSelector;
use flagprobe::util::shell::Status;
use flagprobe::ConfigureContext;

pub fn execute(global: &GlobalArgs, args: CheckArgs) -> Result<()> {
    let root = global.project_root()?;
    let state_path = global.state_path(&root);
    let buckets = FlagBucketStore::load_or_default(&state_path)?;

    let options = CapabilityOptions {
        error: args.error,
        uselib_store: args.store,
        lang: lang_selector(args.langs),
        flags: args.flags,
    };

    let mut ctx = ConfigureContext::from_environment(&root, global.shell(), buckets)?;
    let status = capability::request(&mut ctx, args.capability, &options)?;
    tracing::debug!("{}: {}", args.capability, status);

    if args.dry_run {
        return Ok(());
    }

    ctx.shell()
        .status(Status::Saved, format!("flags to {}", state_path.display()));
    ctx.into_buckets().save(&state_path)
}

/// Selector for the `--lang` values; none given means the default languages.
pub fn lang_selector(mut langs: Vec<String>) -> Option<LangSelector> {
    match langs.len() {
        0 => None,
        1 => langs.pop().map(LangSelector::One),
        _ => Some(LangSelector::Many(langs)),
    }
}

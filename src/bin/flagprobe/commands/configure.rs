//! `flagprobe configure` command

use anyhow::{bail, Context, Result};

use crate::cli::{ConfigureArgs, GlobalArgs};
use flagprobe::capability;
use flagprobe::core::bucket::FlagBucketStore;
use flagprobe::util::config::{project_requests_path, RequestsFile};
use flagprobe::util::shell::Status;
use flagprobe::ConfigureContext;

pub fn execute(global: &GlobalArgs, args: ConfigureArgs) -> Result<()> {
    let root = global.project_root()?;
    let requests_path = args
        .requests
        .unwrap_or_else(|| project_requests_path(&root));

    if !requests_path.exists() {
        bail!(
            "requests file not found: {}\n\
             help: list capabilities as [[request]] tables, e.g.\n\
             \n\
             [[request]]\n\
             capability = \"warn-all\"",
            requests_path.display()
        );
    }

    let requests = RequestsFile::load(&requests_path)?;
    let state_path = global.state_path(&root);
    let buckets = FlagBucketStore::load_or_default(&state_path)?;

    let mut ctx = ConfigureContext::from_environment(&root, global.shell(), buckets)?;

    let mut available = 0;
    for (index, req) in requests.requests.iter().enumerate() {
        let status = capability::request(&mut ctx, req.capability, &req.options)
            .with_context(|| format!("request #{} ({}) failed", index + 1, req.capability))?;
        if status.is_available() {
            available += 1;
        }
    }

    ctx.shell().status(
        Status::Finished,
        format!(
            "{} of {} capabilities available",
            available,
            requests.requests.len()
        ),
    );

    if args.dry_run {
        return Ok(());
    }

    ctx.shell()
        .status(Status::Saved, format!("flags to {}", state_path.display()));
    ctx.into_buckets().save(&state_path)
}

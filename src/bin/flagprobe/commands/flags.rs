//! `flagprobe flags` command

use anyhow::Result;

use crate::cli::{FlagsArgs, GlobalArgs};
use flagprobe::core::bucket::{FlagBucketStore, Profile};

pub fn execute(global: &GlobalArgs, args: FlagsArgs) -> Result<()> {
    let shell = global.shell();
    let root = global.project_root()?;
    let state_path = global.state_path(&root);
    let store = FlagBucketStore::load_or_default(&state_path)?;

    let profile = args.store.as_deref().map(Profile::named).transpose()?;
    let buckets: Vec<_> = store
        .iter()
        .filter(|(key, _)| profile.as_ref().map_or(true, |p| &key.profile == p))
        .collect();

    if shell.is_json() {
        let table: serde_json::Map<String, serde_json::Value> = buckets
            .iter()
            .map(|(key, flags)| (key.name(), serde_json::json!(flags)))
            .collect();
        println!("{}", serde_json::Value::Object(table));
        return Ok(());
    }

    if buckets.is_empty() {
        shell.note(format!("no flags recorded in {}", state_path.display()));
        return Ok(());
    }

    for (key, flags) in buckets {
        println!("{} = {}", key, flags.join(" "));
    }

    Ok(())
}

//! Warning capabilities.

use crate::builder::context::ConfigureContext;
use crate::core::bucket::Profile;
use crate::core::language::LanguageSet;
use crate::probe::{Candidate, ProbeSpec};
use crate::util::shell::Color;

use super::{Capability, CapabilityOptions, CapabilityStatus, ConfigureError};

/// Enable all warnings: `-Wall`, or `/Wall` for MSVC.
pub fn warn_all(
    ctx: &mut ConfigureContext,
    options: &CapabilityOptions,
) -> Result<CapabilityStatus, ConfigureError> {
    let flags: &[&str] = if options.error {
        &["-Werror=all", "/Wall /WX"]
    } else {
        &["-Wall", "/Wall"]
    };
    probe_warning(
        ctx,
        "emit all warnings?",
        Candidate::compile_list(flags.iter().copied()),
        options,
    )
}

/// Enable extra warnings (`-Wextra`).
pub fn warn_extra(
    ctx: &mut ConfigureContext,
    options: &CapabilityOptions,
) -> Result<CapabilityStatus, ConfigureError> {
    let flag = if options.error {
        "-Werror=extra"
    } else {
        "-Wextra"
    };
    probe_warning(ctx, "emit extra warnings?", Candidate::compile_list([flag]), options)
}

/// Warn on declarations after statements (GCC-style compilers only).
pub fn decl_after_stmt(
    ctx: &mut ConfigureContext,
    options: &CapabilityOptions,
) -> Result<CapabilityStatus, ConfigureError> {
    let flag = if options.error {
        "-Werror=declaration-after-statement"
    } else {
        "-Wdeclaration-after-statement"
    };
    probe_warning(
        ctx,
        "warn on declaration-after-statement?",
        Candidate::compile_list([flag]),
        options,
    )
}

/// Silence (or, with `error`, enforce) the warnings named by the caller's flags.
pub fn ignore_warning(
    ctx: &mut ConfigureContext,
    options: &CapabilityOptions,
) -> Result<CapabilityStatus, ConfigureError> {
    if options.flags.is_empty() {
        return Err(ConfigureError::MissingFlags {
            capability: Capability::IgnoreWarning,
        });
    }

    let candidates = if options.error {
        Candidate::compile_list(options.flags.iter().map(|f| escalate_flag(f)))
    } else {
        Candidate::compile_list(options.flags.iter().cloned())
    };
    probe_warning(ctx, "ignore warning?", candidates, options)
}

/// Turn a warning flag into its error-escalated form.
///
/// `-Wno-X` and `-WX` become `-Werror=X`; `/wdN` and `/woN` become `/weN`.
/// Anything else, including flags that already escalate, is unchanged.
pub fn escalate_flag(flag: &str) -> String {
    if flag.starts_with("-Werror") {
        return flag.to_string();
    }
    if let Some(name) = flag.strip_prefix("-Wno-") {
        return format!("-Werror={}", name);
    }
    if let Some(name) = flag.strip_prefix("-W") {
        if !name.is_empty() {
            return format!("-Werror={}", name);
        }
    }
    if let Some(number) = flag.strip_prefix("/wd").or_else(|| flag.strip_prefix("/wo")) {
        return format!("/we{}", number);
    }
    flag.to_string()
}

fn probe_warning(
    ctx: &mut ConfigureContext,
    message: &str,
    candidates: Vec<Candidate>,
    options: &CapabilityOptions,
) -> Result<CapabilityStatus, ConfigureError> {
    let languages = LanguageSet::resolve(options.lang.as_ref())?;
    let profile = Profile::from_store(options.uselib_store.as_deref())?;

    let spec = ProbeSpec::new(&candidates, &languages, &profile).escalated(options.error);
    let status = CapabilityStatus::from(ctx.engine().run(&spec));

    ctx.shell().check(message, status.as_str(), Color::Yellow);
    Ok(status)
}

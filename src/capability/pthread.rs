//! POSIX threads support.
//!
//! Finds the compiler and linker flags that make a threaded program build,
//! then records the platform quirks that go with them. Everything lands in
//! the `pthread` profile unless the request names another store.

use std::path::Path;

use tracing::debug;

use crate::builder::context::ConfigureContext;
use crate::core::bucket::{BucketKey, Profile};
use crate::core::language::{Language, LanguageSet};
use crate::core::platform::DestOs;
use crate::probe::{Candidate, ProbeSpec};
use crate::util::process::ProcessBuilder;
use crate::util::shell::Color;

use super::{CapabilityOptions, CapabilityStatus, ConfigureError};

/// Profile used when the request doesn't name one.
pub const DEFAULT_STORE: &str = "pthread";

/// Program exercising the core thread API; it must link.
pub const PTHREAD_SIMPLE: &str = "\
#include <pthread.h>
int main(void) {
\tpthread_t th;
\tpthread_join(th, 0);
\tpthread_attr_init(0);
\tpthread_cleanup_push(0, 0);
\tpthread_create(0, 0, 0, 0);
\tpthread_cleanup_pop(0);
\treturn 0;
}
";

/// Program checking that `pthread_join` resolves.
const PTHREAD_FUNCTION: &str = "\
#include <pthread.h>
int main(void) {
\tvoid *p = (void *)(pthread_join);
\treturn p == 0;
}
";

/// Spellings of the joinable attribute, preferred first.
const JOINABLE_ATTRS: [&str; 2] = ["PTHREAD_CREATE_JOINABLE", "PTHREAD_CREATE_UNDETACHED"];

/// C compilers that build thread-safe code on AIX.
const AIX_THREAD_COMPILERS: [&str; 3] = ["gcc", "xlc_r", "cc_r"];

fn attr_fragment(attr: &str) -> String {
    format!(
        "#include <pthread.h>\nint main(void) {{\n  int attr={};\n  return attr;\n}}\n",
        attr
    )
}

/// Check for POSIX threads support.
///
/// The `error` option has no meaning here and is ignored.
pub fn check_pthread(
    ctx: &mut ConfigureContext,
    options: &CapabilityOptions,
) -> Result<CapabilityStatus, ConfigureError> {
    let languages = LanguageSet::resolve(options.lang.as_ref())?;
    let profile = Profile::named(options.uselib_store.as_deref().unwrap_or(DEFAULT_STORE))?;
    let primary = languages.primary().unwrap_or(Language::C);

    let mut available = check_env_override(ctx, &languages, &profile, primary);

    if !available {
        let candidates = candidate_table(ctx.dest_os(), ctx.pthread_config());
        let spec = ProbeSpec::new(&candidates, &languages, &profile)
            .with_fragment(PTHREAD_SIMPLE)
            .linking();
        available = ctx.engine().run(&spec).is_success();
    }

    if available {
        available = apply_platform_quirks(ctx, &languages, &profile, primary);
    }

    let (status, color) = if available {
        (CapabilityStatus::Yes, Color::Green)
    } else {
        (CapabilityStatus::No, Color::Red)
    };
    ctx.shell().check("Checking for pthread", status.as_str(), color);
    Ok(status)
}

/// Try the flags from `PTHREAD_CFLAGS` / `PTHREAD_LIBS`.
///
/// On failure only the entries added here are removed again.
fn check_env_override(
    ctx: &mut ConfigureContext,
    languages: &LanguageSet,
    profile: &Profile,
    primary: Language,
) -> bool {
    let env = ctx.pthread_env().clone();
    if !env.is_set() {
        return false;
    }

    let mut entries = Vec::new();
    if let Some(libs) = &env.libs {
        entries.push((BucketKey::link(profile), libs.as_str()));
    }
    if let Some(cflags) = &env.cflags {
        for language in languages.iter() {
            entries.push((BucketKey::compile(language, profile), cflags.as_str()));
        }
    }

    let inserted: Vec<(BucketKey, &str)> = entries
        .into_iter()
        .filter(|(key, flag)| ctx.buckets_mut().append(key, flag))
        .collect();

    let ok = ctx
        .engine()
        .check_fragment(primary, profile, PTHREAD_FUNCTION, true);
    debug!(
        "PTHREAD_CFLAGS/PTHREAD_LIBS from environment: {}",
        if ok { "ok" } else { "failed" }
    );

    if !ok {
        for (key, flag) in &inserted {
            ctx.buckets_mut().remove(key, flag);
        }
    }
    ok
}

/// Thread flag candidates in trial order for the destination OS.
fn candidate_table(dest_os: &DestOs, pthread_config: Option<&Path>) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    // Solaris libc carries stub pthread symbols that make plain links pass.
    if *dest_os == DestOs::SunOs {
        candidates.extend([
            Candidate::compile("-pthreads"),
            Candidate::link("-lpthread"),
            Candidate::compile("-mt"),
            Candidate::compile("-pthread"),
        ]);
    }

    candidates.extend([
        Candidate::link("-lpthreads"),
        Candidate::bare(),
        Candidate::link("-lthread"),
        Candidate::compile("-pthread"),
        Candidate::compile("-pthreads"),
        Candidate::compile("-mthreads"),
        Candidate::link("-lpthread"),
        Candidate::compile("--thread-safe"),
        Candidate::compile("-mt"),
    ]);

    if let Some(candidate) = pthread_config.and_then(pthread_config_candidate) {
        candidates.push(candidate);
    }

    candidates.extend([Candidate::compile("-Kthread"), Candidate::compile("-kthread")]);
    candidates
}

/// Flags reported by a `pthread-config` program.
fn pthread_config_candidate(program: &Path) -> Option<Candidate> {
    let query = |arg: &str| {
        ProcessBuilder::new(program)
            .arg(arg)
            .read_stdout()
            .map_err(|e| debug!("pthread-config {}: {:#}", arg, e))
            .ok()
            .filter(|out| !out.is_empty())
    };

    let compile = query("--cflags");
    let link: Vec<String> = [query("--ldflags"), query("--libs")]
        .into_iter()
        .flatten()
        .collect();
    let link = (!link.is_empty()).then(|| link.join(" "));

    if compile.is_none() && link.is_none() {
        return None;
    }
    Some(Candidate { compile, link })
}

/// Record platform quirks once threads work. Returns whether threads stay
/// available.
fn apply_platform_quirks(
    ctx: &mut ConfigureContext,
    languages: &LanguageSet,
    profile: &Profile,
    primary: Language,
) -> bool {
    let cpp_key = BucketKey::preprocessor(profile);

    let mut joinable = None;
    for attr in JOINABLE_ATTRS {
        if ctx
            .engine()
            .check_fragment(primary, profile, &attr_fragment(attr), true)
        {
            joinable = Some(attr);
            break;
        }
    }
    match joinable {
        Some(attr) if attr != JOINABLE_ATTRS[0] => {
            let define = format!("-D{}={}", JOINABLE_ATTRS[0], attr);
            ctx.buckets_mut().append(&cpp_key, &define);
        }
        Some(_) => {}
        None => debug!("joinable thread attribute spelling unknown"),
    }

    let define = match ctx.dest_os() {
        DestOs::Aix | DestOs::FreeBsd | DestOs::Darwin => Some("-DTHREAD_SAFE"),
        DestOs::SunOs | DestOs::HpUx => Some("-D_REENTRANT"),
        _ => None,
    };
    if let Some(define) = define {
        ctx.buckets_mut().append(&cpp_key, define);
    }

    let mut available = true;
    if *ctx.dest_os() == DestOs::Aix {
        let program = ctx.c_program().unwrap_or_default();
        if !AIX_THREAD_COMPILERS.contains(&program) {
            debug!("`{}` does not build thread-safe code on AIX", program);
            available = false;
        }
    }

    let link_key = BucketKey::link(profile);
    let compiles_with_pthread = languages
        .iter()
        .any(|language| ctx.buckets().contains(&BucketKey::compile(language, profile), "-pthread"));
    if compiles_with_pthread
        && !ctx.buckets().contains(&link_key, "-pthread")
        && !ctx
            .engine()
            .check_fragment(primary, profile, PTHREAD_SIMPLE, true)
    {
        ctx.buckets_mut().append(&link_key, "-pthread");
    }

    available
}

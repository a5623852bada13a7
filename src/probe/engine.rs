//! Candidate selection state machine.

use tracing::debug;

use crate::core::bucket::{BucketKey, FlagBucketStore, FlagKind, Profile};
use crate::core::family::CompilerIds;
use crate::core::language::{Language, LanguageSet};

use super::{Candidate, CompileProbe, ProbeOutcome, ProbeRequest, FLAG_TEST_FRAGMENT};

/// What to probe: candidates, target languages, profile and probe program.
#[derive(Debug, Clone)]
pub struct ProbeSpec<'a> {
    pub candidates: &'a [Candidate],
    pub languages: &'a LanguageSet,
    pub profile: &'a Profile,
    pub fragment: &'a str,
    pub link: bool,
    pub escalated: bool,
}

impl<'a> ProbeSpec<'a> {
    /// Compile-only probe of [`FLAG_TEST_FRAGMENT`].
    pub fn new(
        candidates: &'a [Candidate],
        languages: &'a LanguageSet,
        profile: &'a Profile,
    ) -> Self {
        ProbeSpec {
            candidates,
            languages,
            profile,
            fragment: FLAG_TEST_FRAGMENT,
            link: false,
            escalated: false,
        }
    }

    pub fn with_fragment(mut self, fragment: &'a str) -> Self {
        self.fragment = fragment;
        self
    }

    /// Link the probe program instead of only compiling it.
    pub fn linking(mut self) -> Self {
        self.link = true;
        self
    }

    /// Mark the candidates as the error-escalated variant of a capability.
    pub fn escalated(mut self, escalated: bool) -> Self {
        self.escalated = escalated;
        self
    }
}

/// Tries candidates in order and records the first one that works.
///
/// Candidates are appended to their buckets speculatively so that each probe
/// sees the accumulated flags; a failed attempt is rolled back before the
/// next candidate runs.
pub struct FlagProbeEngine<'a> {
    probe: &'a mut dyn CompileProbe,
    buckets: &'a mut FlagBucketStore,
    compilers: &'a CompilerIds,
}

impl<'a> FlagProbeEngine<'a> {
    pub fn new(
        probe: &'a mut dyn CompileProbe,
        buckets: &'a mut FlagBucketStore,
        compilers: &'a CompilerIds,
    ) -> Self {
        FlagProbeEngine {
            probe,
            buckets,
            compilers,
        }
    }

    /// Walk the candidate list, stopping at the first success.
    pub fn run(&mut self, spec: &ProbeSpec<'_>) -> ProbeOutcome {
        let mut attempted = false;

        for candidate in spec.candidates {
            let eligible: Vec<Language> = spec
                .languages
                .iter()
                .filter(|&language| self.accepts(language, candidate))
                .collect();

            if eligible.is_empty() {
                debug!("skipping `{}`: not supported by any target compiler", candidate);
                continue;
            }

            attempted = true;
            if self.try_candidate(candidate, &eligible, spec) {
                return if spec.escalated {
                    ProbeOutcome::ErrorEnforced
                } else {
                    ProbeOutcome::Yes
                };
            }
        }

        if attempted {
            ProbeOutcome::No
        } else {
            ProbeOutcome::NotAttempted
        }
    }

    /// Build a fragment with the flags currently recorded for `profile`.
    pub fn check_fragment(
        &mut self,
        language: Language,
        profile: &Profile,
        fragment: &str,
        link: bool,
    ) -> bool {
        let compile_flags = self
            .buckets
            .collect(&[FlagKind::Preprocessor, FlagKind::Compile(language)], profile);
        let link_flags = if link {
            self.buckets.collect(&[FlagKind::Link], profile)
        } else {
            Vec::new()
        };

        let request = ProbeRequest {
            fragment,
            language,
            compile_flags: &compile_flags,
            link_flags: &link_flags,
            link,
        };
        self.probe.compile(&request)
    }

    fn accepts(&self, language: Language, candidate: &Candidate) -> bool {
        match &candidate.compile {
            Some(flag) => self.compilers.family(language).accepts(flag),
            None => true,
        }
    }

    fn try_candidate(
        &mut self,
        candidate: &Candidate,
        eligible: &[Language],
        spec: &ProbeSpec<'_>,
    ) -> bool {
        let link_key = BucketKey::link(spec.profile);
        let link_inserted = match &candidate.link {
            Some(flag) => self.buckets.append(&link_key, flag),
            None => false,
        };

        let mut accepted = false;
        for &language in eligible {
            let key = BucketKey::compile(language, spec.profile);
            let inserted = match &candidate.compile {
                Some(flag) => self.buckets.append(&key, flag),
                None => false,
            };

            let ok = self.check_fragment(language, spec.profile, spec.fragment, spec.link);
            debug!(
                "probe `{}` for {}: {}",
                candidate,
                language,
                if ok { "ok" } else { "failed" }
            );

            if ok {
                accepted = true;
            } else if inserted {
                if let Some(flag) = &candidate.compile {
                    self.buckets.remove(&key, flag);
                }
            }
        }

        if !accepted && link_inserted {
            if let Some(flag) = &candidate.link {
                self.buckets.remove(&link_key, flag);
            }
        }

        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockProbe;

    fn langs(languages: &[Language]) -> LanguageSet {
        LanguageSet::from_languages(languages.iter().copied())
    }

    fn c_bucket(store: &FlagBucketStore) -> &[String] {
        store.get(&BucketKey::compile(Language::C, &Profile::unnamed()))
    }

    fn cxx_bucket(store: &FlagBucketStore) -> &[String] {
        store.get(&BucketKey::compile(Language::Cxx, &Profile::unnamed()))
    }

    #[test]
    fn test_first_accepted_candidate_is_recorded() {
        let mut probe = MockProbe::accepting(&["-Wall"]);
        let mut store = FlagBucketStore::new();
        let compilers = CompilerIds::new().with(Language::C, "gcc");
        let candidates = Candidate::compile_list(["-Wall", "/Wall"]);
        let languages = langs(&[Language::C]);
        let profile = Profile::unnamed();

        let outcome = FlagProbeEngine::new(&mut probe, &mut store, &compilers)
            .run(&ProbeSpec::new(&candidates, &languages, &profile));

        assert_eq!(outcome, ProbeOutcome::Yes);
        assert_eq!(c_bucket(&store), ["-Wall"]);
        assert_eq!(probe.calls().len(), 1);
    }

    #[test]
    fn test_earlier_candidate_wins() {
        let mut probe = MockProbe::accepting(&["-Wall", "/Wall"]);
        let mut store = FlagBucketStore::new();
        let compilers = CompilerIds::new();
        let candidates = Candidate::compile_list(["-Wall", "/Wall"]);
        let languages = langs(&[Language::C]);
        let profile = Profile::unnamed();

        FlagProbeEngine::new(&mut probe, &mut store, &compilers)
            .run(&ProbeSpec::new(&candidates, &languages, &profile));

        assert_eq!(c_bucket(&store), ["-Wall"]);
    }

    #[test]
    fn test_msvc_never_sees_gcc_warning_flags() {
        let mut probe = MockProbe::accepting(&["/Wall"]);
        let mut store = FlagBucketStore::new();
        let compilers = CompilerIds::new().with(Language::Cxx, "msvc");
        let candidates = Candidate::compile_list(["-Wall", "/Wall"]);
        let languages = langs(&[Language::Cxx]);
        let profile = Profile::unnamed();

        let outcome = FlagProbeEngine::new(&mut probe, &mut store, &compilers)
            .run(&ProbeSpec::new(&candidates, &languages, &profile));

        assert_eq!(outcome, ProbeOutcome::Yes);
        assert_eq!(cxx_bucket(&store), ["/Wall"]);
        let calls = probe.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls.iter().all(|call| !call.has_flag("-Wall")));
    }

    #[test]
    fn test_other_family_never_sees_msvc_warning_numbers() {
        let mut probe = MockProbe::accepting_all();
        let mut store = FlagBucketStore::new();
        let compilers = CompilerIds::new().with(Language::C, "clang");
        let candidates = Candidate::compile_list(["/wd4996", "/we4996", "/wo4996"]);
        let languages = langs(&[Language::C]);
        let profile = Profile::unnamed();

        let outcome = FlagProbeEngine::new(&mut probe, &mut store, &compilers)
            .run(&ProbeSpec::new(&candidates, &languages, &profile));

        assert_eq!(outcome, ProbeOutcome::NotAttempted);
        assert!(probe.calls().is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_failed_candidates_are_rolled_back() {
        let mut probe = MockProbe::rejecting_all();
        let mut store = FlagBucketStore::new();
        let compilers = CompilerIds::new();
        let candidates = Candidate::compile_list(["-Wnonexistent", "-Wother"]);
        let languages = langs(&[Language::C, Language::Cxx]);
        let profile = Profile::unnamed();

        let outcome = FlagProbeEngine::new(&mut probe, &mut store, &compilers)
            .run(&ProbeSpec::new(&candidates, &languages, &profile));

        assert_eq!(outcome, ProbeOutcome::No);
        assert!(store.is_empty());

        // The second candidate is probed without the first one left behind.
        let calls = probe.calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[2].compile_flags, ["-Wother"]);
    }

    #[test]
    fn test_rollback_keeps_preexisting_flag() {
        let mut probe = MockProbe::rejecting_all();
        let mut store = FlagBucketStore::new();
        let key = BucketKey::compile(Language::C, &Profile::unnamed());
        store.append(&key, "-Wall");
        let compilers = CompilerIds::new();
        let candidates = Candidate::compile_list(["-Wall"]);
        let languages = langs(&[Language::C]);
        let profile = Profile::unnamed();

        FlagProbeEngine::new(&mut probe, &mut store, &compilers)
            .run(&ProbeSpec::new(&candidates, &languages, &profile));

        assert_eq!(store.get(&key), ["-Wall"]);
    }

    #[test]
    fn test_rerun_does_not_duplicate() {
        let mut probe = MockProbe::accepting(&["-Wall"]);
        let mut store = FlagBucketStore::new();
        let compilers = CompilerIds::new();
        let candidates = Candidate::compile_list(["-Wall"]);
        let languages = langs(&[Language::C, Language::Cxx]);
        let profile = Profile::unnamed();

        for _ in 0..2 {
            let outcome = FlagProbeEngine::new(&mut probe, &mut store, &compilers)
                .run(&ProbeSpec::new(&candidates, &languages, &profile));
            assert_eq!(outcome, ProbeOutcome::Yes);
        }

        assert_eq!(c_bucket(&store), ["-Wall"]);
        assert_eq!(cxx_bucket(&store), ["-Wall"]);
    }

    #[test]
    fn test_partial_language_success_stops_early() {
        // C++ rejects the flag, C accepts it; the request stops there.
        let mut probe = MockProbe::with_rule(|req| req.language == Language::C);
        let mut store = FlagBucketStore::new();
        let compilers = CompilerIds::new();
        let candidates = Candidate::compile_list(["-Wdeclaration-after-statement", "-Wall"]);
        let languages = langs(&[Language::C, Language::Cxx]);
        let profile = Profile::unnamed();

        let outcome = FlagProbeEngine::new(&mut probe, &mut store, &compilers)
            .run(&ProbeSpec::new(&candidates, &languages, &profile));

        assert_eq!(outcome, ProbeOutcome::Yes);
        assert_eq!(c_bucket(&store), ["-Wdeclaration-after-statement"]);
        assert!(cxx_bucket(&store).is_empty());
        assert_eq!(probe.calls().len(), 2);
    }

    #[test]
    fn test_mixed_families_filter_per_language() {
        let mut probe = MockProbe::accepting_all();
        let mut store = FlagBucketStore::new();
        let compilers = CompilerIds::new()
            .with(Language::C, "gcc")
            .with(Language::Cxx, "msvc");
        let candidates = Candidate::compile_list(["-Wall"]);
        let languages = langs(&[Language::C, Language::Cxx]);
        let profile = Profile::unnamed();

        FlagProbeEngine::new(&mut probe, &mut store, &compilers)
            .run(&ProbeSpec::new(&candidates, &languages, &profile));

        assert_eq!(c_bucket(&store), ["-Wall"]);
        assert!(cxx_bucket(&store).is_empty());
        assert!(probe.calls().iter().all(|call| call.language == Language::C));
    }

    #[test]
    fn test_escalated_success_is_error_enforced() {
        let mut probe = MockProbe::accepting_all();
        let mut store = FlagBucketStore::new();
        let compilers = CompilerIds::new();
        let candidates = Candidate::compile_list(["-Werror=all"]);
        let languages = langs(&[Language::C]);
        let profile = Profile::unnamed();

        let outcome = FlagProbeEngine::new(&mut probe, &mut store, &compilers)
            .run(&ProbeSpec::new(&candidates, &languages, &profile).escalated(true));

        assert_eq!(outcome, ProbeOutcome::ErrorEnforced);
    }

    #[test]
    fn test_link_candidates_use_profile_buckets() {
        let mut probe = MockProbe::accepting(&["-lpthread"]);
        let mut store = FlagBucketStore::new();
        let compilers = CompilerIds::new();
        let candidates = vec![Candidate::link("-lthread"), Candidate::link("-lpthread")];
        let languages = langs(&[Language::C]);
        let profile = Profile::named("pthread").unwrap();

        let outcome = FlagProbeEngine::new(&mut probe, &mut store, &compilers)
            .run(&ProbeSpec::new(&candidates, &languages, &profile).linking());

        assert_eq!(outcome, ProbeOutcome::Yes);
        assert_eq!(store.get(&BucketKey::link(&profile)), ["-lpthread"]);
        assert!(store.get(&BucketKey::link(&Profile::unnamed())).is_empty());
        assert!(probe.calls().iter().all(|call| call.link));
    }

    #[test]
    fn test_profile_probe_sees_default_flags() {
        let mut probe = MockProbe::accepting_all();
        let mut store = FlagBucketStore::new();
        store.append(&BucketKey::compile(Language::C, &Profile::unnamed()), "-O2");
        let compilers = CompilerIds::new();
        let candidates = Candidate::compile_list(["-Wextra"]);
        let languages = langs(&[Language::C]);
        let profile = Profile::named("strict").unwrap();

        FlagProbeEngine::new(&mut probe, &mut store, &compilers)
            .run(&ProbeSpec::new(&candidates, &languages, &profile));

        assert_eq!(probe.calls()[0].compile_flags, ["-O2", "-Wextra"]);
        assert_eq!(store.get(&BucketKey::compile(Language::C, &profile)), ["-Wextra"]);
        assert_eq!(c_bucket(&store), ["-O2"]);
    }
}

use crate::error::ReferenceError;
use crate::git::GitRunner;
use crate::parse::{ParsedReference, VersionSpec};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    pub tag: Option<String>,
    pub commit: String,
}

fn parse_semver_loose(tag: &str) -> Option<semver::Version> {
    let stripped = tag.strip_prefix('v').unwrap_or(tag);
    semver::Version::parse(stripped).ok()
}

/// Resolve a `ParsedReference`'s version spec to a concrete commit (spec
/// §4.6). Pure given the `GitRunner`'s outputs — the quantified property
/// "resolver determinism" holds because this function touches no global
/// state, only the trait object it's handed.
pub fn resolve_version(reference: &ParsedReference, git: &dyn GitRunner) -> Result<ResolvedVersion, ReferenceError> {
    let ParsedReference { host, owner, repo, .. } = reference;

    match &reference.version_spec {
        VersionSpec::Latest => {
            let tags = git.list_tags(host, owner, repo)?;
            let mut semver_tags: Vec<(semver::Version, String)> = tags
                .into_iter()
                .filter_map(|tag| parse_semver_loose(&tag).map(|v| (v, tag)))
                .collect();
            // Semver order; lexicographic tag string breaks ties.
            semver_tags.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

            match semver_tags.last() {
                Some((_, best_tag)) => {
                    let commit = git.resolve_ref_to_sha(host, owner, repo, best_tag)?;
                    Ok(ResolvedVersion {
                        tag: Some(best_tag.clone()),
                        commit,
                    })
                }
                None => {
                    let commit = git.default_branch_head(host, owner, repo)?;
                    Ok(ResolvedVersion { tag: None, commit })
                }
            }
        }
        VersionSpec::Tag(t) => {
            let commit = git.resolve_ref_to_sha(host, owner, repo, t)?;
            Ok(ResolvedVersion {
                tag: Some(t.clone()),
                commit,
            })
        }
        VersionSpec::Branch(b) => {
            let commit = git.resolve_ref_to_sha(host, owner, repo, b)?;
            Ok(ResolvedVersion { tag: None, commit })
        }
        VersionSpec::Sha(sha) => {
            if !git.sha_exists(host, owner, repo, sha)? {
                return Err(ReferenceError::NotFound {
                    reference: format!("{host}/{owner}/{repo}@{sha}"),
                });
            }
            Ok(ResolvedVersion {
                tag: None,
                commit: sha.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_reference;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeGit {
        tags: Vec<String>,
        resolved: std::collections::HashMap<String, String>,
        default_head: String,
        calls: RefCell<Vec<String>>,
    }

    impl GitRunner for FakeGit {
        fn list_tags(&self, _host: &str, _owner: &str, _repo: &str) -> Result<Vec<String>, ReferenceError> {
            self.calls.borrow_mut().push("list_tags".to_string());
            Ok(self.tags.clone())
        }
        fn resolve_ref_to_sha(&self, _h: &str, _o: &str, _r: &str, refname: &str) -> Result<String, ReferenceError> {
            self.calls.borrow_mut().push(format!("resolve:{refname}"));
            self.resolved
                .get(refname)
                .cloned()
                .ok_or_else(|| ReferenceError::NotFound {
                    reference: refname.to_string(),
                })
        }
        fn default_branch_head(&self, _h: &str, _o: &str, _r: &str) -> Result<String, ReferenceError> {
            self.calls.borrow_mut().push("default_branch_head".to_string());
            Ok(self.default_head.clone())
        }
        fn sha_exists(&self, _h: &str, _o: &str, _r: &str, sha: &str) -> Result<bool, ReferenceError> {
            Ok(sha == self.default_head || self.resolved.values().any(|v| v == sha))
        }
    }

    #[test]
    fn latest_picks_highest_semver_ignoring_non_semver_tags() {
        let git = FakeGit {
            tags: vec!["v1.0.0".into(), "v2.0.0".into(), "release-2024-01".into()],
            resolved: [("v2.0.0".to_string(), "c2".to_string())].into_iter().collect(),
            default_head: "headsha".to_string(),
            calls: RefCell::new(Vec::new()),
        };
        let reference = parse_reference("github.com/x/y").unwrap();
        let resolved = resolve_version(&reference, &git).unwrap();
        assert_eq!(resolved.tag.as_deref(), Some("v2.0.0"));
        assert_eq!(resolved.commit, "c2");
    }

    #[test]
    fn latest_with_no_tags_falls_back_to_default_branch() {
        let git = FakeGit {
            tags: vec![],
            resolved: Default::default(),
            default_head: "headsha".to_string(),
            calls: RefCell::new(Vec::new()),
        };
        let reference = parse_reference("github.com/x/y").unwrap();
        let resolved = resolve_version(&reference, &git).unwrap();
        assert_eq!(resolved.tag, None);
        assert_eq!(resolved.commit, "headsha");
    }

    #[test]
    fn explicit_sha_is_accepted_verbatim_after_existence_check() {
        let sha = "b".repeat(40);
        let git = FakeGit {
            tags: vec![],
            resolved: Default::default(),
            default_head: sha.clone(),
            calls: RefCell::new(Vec::new()),
        };
        let reference = parse_reference(&format!("github.com/x/y@{sha}")).unwrap();
        let resolved = resolve_version(&reference, &git).unwrap();
        assert_eq!(resolved.commit, sha);
        assert_eq!(resolved.tag, None);
    }

    #[test]
    fn semver_tie_break_is_lexicographic_on_tag_string() {
        let git = FakeGit {
            tags: vec!["1.0.0".into(), "v1.0.0".into()],
            resolved: [("v1.0.0".to_string(), "c".to_string()), ("1.0.0".to_string(), "c2".to_string())]
                .into_iter()
                .collect(),
            default_head: "headsha".to_string(),
            calls: RefCell::new(Vec::new()),
        };
        let reference = parse_reference("github.com/x/y").unwrap();
        let resolved = resolve_version(&reference, &git).unwrap();
        // "v1.0.0" > "1.0.0" lexicographically, both parse to the same semver.
        assert_eq!(resolved.tag.as_deref(), Some("v1.0.0"));
    }
}

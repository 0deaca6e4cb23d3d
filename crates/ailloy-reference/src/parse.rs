use crate::error::ReferenceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSpec {
    Tag(String),
    Sha(String),
    Branch(String),
    Latest,
}

/// `<host>/<owner>/<repo>[@<version>][//<subpath>]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReference {
    pub host: String,
    pub owner: String,
    pub repo: String,
    pub version_spec: VersionSpec,
    pub subpath: Option<String>,
}

impl ParsedReference {
    /// `host/owner/repo[//subpath]` — the cache/lockfile lookup key. Does
    /// not include the version, since a cache entry is keyed by the
    /// resolved commit, not the requested spec.
    pub fn cache_key(&self) -> String {
        match &self.subpath {
            Some(sub) if !sub.is_empty() => format!("{}/{}/{}//{}", self.host, self.owner, self.repo, sub),
            _ => format!("{}/{}/{}", self.host, self.owner, self.repo),
        }
    }
}

fn is_hex_sha(s: &str) -> bool {
    s.len() == 40 && s.chars().all(|c| c.is_ascii_hexdigit())
}

pub fn parse_reference(raw: &str) -> Result<ParsedReference, ReferenceError> {
    let err = |message: &str| ReferenceError::Parse {
        reference: raw.to_string(),
        message: message.to_string(),
    };

    let (head, subpath) = match raw.split_once("//") {
        Some((head, sub)) => (head, Some(sub.to_string())),
        None => (raw, None),
    };

    let (host_owner_repo, version_spec) = match head.split_once('@') {
        Some((rest, version)) => (rest, parse_version_spec(version)),
        None => (head, VersionSpec::Latest),
    };

    let parts: Vec<&str> = host_owner_repo.split('/').collect();
    let [host, owner, repo] = parts.as_slice() else {
        return Err(err("expected `<host>/<owner>/<repo>`"));
    };
    if host.is_empty() || owner.is_empty() || repo.is_empty() {
        return Err(err("host, owner, and repo must be non-empty"));
    }

    Ok(ParsedReference {
        host: (*host).to_string(),
        owner: (*owner).to_string(),
        repo: (*repo).to_string(),
        version_spec,
        subpath,
    })
}

fn parse_version_spec(version: &str) -> VersionSpec {
    if version.eq_ignore_ascii_case("latest") {
        VersionSpec::Latest
    } else if is_hex_sha(version) {
        VersionSpec::Sha(version.to_string())
    } else {
        VersionSpec::Tag(version.to_string())
    }
}

pub fn format_reference(reference: &ParsedReference) -> String {
    let mut out = format!("{}/{}/{}", reference.host, reference.owner, reference.repo);
    match &reference.version_spec {
        VersionSpec::Latest => {}
        VersionSpec::Tag(t) => out.push_str(&format!("@{t}")),
        VersionSpec::Sha(s) => out.push_str(&format!("@{s}")),
        VersionSpec::Branch(b) => out.push_str(&format!("@{b}")),
    }
    if let Some(subpath) = &reference.subpath {
        out.push_str(&format!("//{subpath}"));
    }
    out
}

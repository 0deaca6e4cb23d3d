use camino::{Utf8Path, Utf8PathBuf};

use crate::error::ManifestError;
use crate::fs_view::BundleFs;
use crate::model::{FluxType, FluxVar, IngotManifest, MoldManifest, API_VERSION};
use ailloy_flux::FluxTree;

const FLUX_SCHEMA_FILE: &str = "flux.schema.yaml";
const FLUX_DEFAULTS_FILE: &str = "flux.yaml";

pub fn load_mold(fs: &dyn BundleFs, path: &str) -> Result<MoldManifest, ManifestError> {
    let rel = Utf8PathBuf::from(path);
    let raw = read(fs, &rel)?;
    let manifest: MoldManifest =
        serde_yaml::from_str(&raw).map_err(|e| parse_error(&rel, &e))?;
    validate_common(&rel, &manifest.api_version, &manifest.kind, "mold")?;
    validate_name(&rel, &manifest.name, true)?;
    validate_version(&rel, &manifest.version)?;
    for var in &manifest.flux_schema {
        validate_flux_var(&rel, var)?;
    }
    if let Some(output) = &manifest.output {
        for (category, entries) in output {
            for spec in entries.specs(category) {
                if !fs.exists(Utf8Path::new(&spec.src)) {
                    return Err(ManifestError::invalid(
                        rel.clone(),
                        format!("output.{category}"),
                        format!("referenced source `{}` does not exist in bundle", spec.src),
                    ));
                }
            }
        }
    }
    Ok(manifest)
}

pub fn load_ingot(fs: &dyn BundleFs, path: &str) -> Result<IngotManifest, ManifestError> {
    let rel = Utf8PathBuf::from(path);
    let raw = read(fs, &rel)?;
    let manifest: IngotManifest =
        serde_yaml::from_str(&raw).map_err(|e| parse_error(&rel, &e))?;
    validate_common(&rel, &manifest.api_version, &manifest.kind, "ingot")?;
    validate_name(&rel, &manifest.name, false)?;
    validate_version(&rel, &manifest.version)?;
    if manifest.files.is_empty() {
        return Err(ManifestError::invalid(rel, "files", "must list at least one file"));
    }
    Ok(manifest)
}

pub fn load_flux_schema(fs: &dyn BundleFs) -> Result<Option<Vec<FluxVar>>, ManifestError> {
    let rel = Utf8PathBuf::from(FLUX_SCHEMA_FILE);
    if !fs.exists(&rel) {
        return Ok(None);
    }
    let raw = read(fs, &rel)?;
    let vars: Vec<FluxVar> = serde_yaml::from_str(&raw).map_err(|e| parse_error(&rel, &e))?;
    for var in &vars {
        validate_flux_var(&rel, var)?;
    }
    Ok(Some(vars))
}

pub fn load_flux_defaults(fs: &dyn BundleFs) -> Result<FluxTree, ManifestError> {
    let rel = Utf8PathBuf::from(FLUX_DEFAULTS_FILE);
    if !fs.exists(&rel) {
        return Ok(FluxTree::empty_map());
    }
    let raw = read(fs, &rel)?;
    FluxTree::from_yaml(&raw).map_err(|e| ManifestError::ParseError {
        file: rel,
        message: e.to_string(),
    })
}

fn read(fs: &dyn BundleFs, rel: &Utf8Path) -> Result<String, ManifestError> {
    fs.read_to_string(rel).map_err(|e| ManifestError::Io {
        file: rel.to_path_buf(),
        source: e,
    })
}

fn parse_error(file: &Utf8Path, err: &serde_yaml::Error) -> ManifestError {
    ManifestError::ParseError {
        file: file.to_path_buf(),
        message: err.to_string(),
    }
}

fn validate_common(file: &Utf8Path, api_version: &str, kind: &str, expected_kind: &str) -> Result<(), ManifestError> {
    if api_version != API_VERSION {
        return Err(ManifestError::invalid(
            file.to_path_buf(),
            "apiVersion",
            format!("unrecognized apiVersion `{api_version}`, expected `{API_VERSION}`"),
        ));
    }
    if kind != expected_kind {
        return Err(ManifestError::invalid(
            file.to_path_buf(),
            "kind",
            format!("expected kind `{expected_kind}`, found `{kind}`"),
        ));
    }
    Ok(())
}

fn validate_name(file: &Utf8Path, name: &str, require_lowercase_dotless: bool) -> Result<(), ManifestError> {
    if name.is_empty() {
        return Err(ManifestError::invalid(file.to_path_buf(), "name", "must not be empty"));
    }
    if name.contains('/') || name.contains('\\') || name.chars().any(char::is_whitespace) {
        return Err(ManifestError::invalid(
            file.to_path_buf(),
            "name",
            "must not contain path separators or whitespace",
        ));
    }
    if require_lowercase_dotless {
        if name.contains('.') {
            return Err(ManifestError::invalid(file.to_path_buf(), "name", "must not contain `.`"));
        }
        if name.chars().any(char::is_uppercase) {
            return Err(ManifestError::invalid(file.to_path_buf(), "name", "must be lowercase"));
        }
    }
    Ok(())
}

fn validate_version(file: &Utf8Path, version: &str) -> Result<(), ManifestError> {
    if version.is_empty() {
        return Err(ManifestError::invalid(file.to_path_buf(), "version", "must not be empty"));
    }
    semver::Version::parse(version).map_err(|e| {
        ManifestError::invalid(file.to_path_buf(), "version", format!("not a valid semver version: {e}"))
    })?;
    Ok(())
}

fn validate_flux_var(file: &Utf8Path, var: &FluxVar) -> Result<(), ManifestError> {
    if var.name.is_empty() {
        return Err(ManifestError::invalid(file.to_path_buf(), "flux-schema.name", "must not be empty"));
    }
    for segment in var.name.split('.') {
        if segment.is_empty()
            || !segment.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
            || !segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(ManifestError::invalid(
                file.to_path_buf(),
                "flux-schema.name",
                format!("`{}` is not a well-formed dotted path", var.name),
            ));
        }
    }
    if matches!(var.var_type, FluxType::Select) && var.options.is_empty() && var.discover.is_none() {
        return Err(ManifestError::invalid(
            file.to_path_buf(),
            "flux-schema.options",
            format!("select variable `{}` must declare options or a discover spec", var.name),
        ));
    }
    if var.discover.is_some() && !matches!(var.var_type, FluxType::Select | FluxType::String) {
        return Err(ManifestError::invalid(
            file.to_path_buf(),
            "flux-schema.discover",
            format!("discover is only valid on select or string variables (`{}`)", var.name),
        ));
    }
    Ok(())
}

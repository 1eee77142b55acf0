use anyhow::{Context, Result, bail};
use argmodel::Parser;
use argmodel_metadata::{ArgumentDoc, ItemDoc, OptionDoc, ParserDoc};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SCHEMA_NAME: &str = "argmodel.json";

#[derive(Debug, Clone)]
pub struct LoadedSchema {
    pub path: PathBuf,
    pub doc: ParserDoc,
}

impl LoadedSchema {
    pub fn parser(&self) -> Result<Parser> {
        self.doc
            .build()
            .with_context(|| format!("invalid schema: {}", self.path.display()))
    }
}

/// Load the schema at `schema_path`, or `argmodel.json` in the current directory.
pub fn load_schema(schema_path: Option<&Path>) -> Result<LoadedSchema> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    let path = match schema_path {
        Some(p) => resolve_against(&cwd, p),
        None => cwd.join(DEFAULT_SCHEMA_NAME),
    };

    if !path.exists() {
        bail!("schema not found: {}", path.display());
    }

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("failed to read schema: {}", path.display()))?;
    let doc = ParserDoc::from_json(&contents)
        .with_context(|| format!("failed to parse schema JSON: {}", path.display()))?;
    tracing::debug!(path = %path.display(), items = doc.items.len(), "schema loaded");

    Ok(LoadedSchema { path, doc })
}

/// Write a starter schema into `dir` unless one already exists there.
pub fn write_default_schema(dir: &Path, overwrite: bool) -> Result<PathBuf> {
    let dest = dir.join(DEFAULT_SCHEMA_NAME);
    if dest.exists() && !overwrite {
        bail!("{} already exists", dest.display());
    }

    let doc = ParserDoc {
        items: vec![
            ItemDoc::Option(OptionDoc {
                short: Some('v'),
                long: Some("verbose".to_string()),
                description: "Print more output".to_string(),
                ..OptionDoc::default()
            }),
            ItemDoc::Argument(ArgumentDoc {
                name: "input".to_string(),
                required: true,
                description: "File to read".to_string(),
            }),
        ],
        ..ParserDoc::default()
    };

    let mut out = doc.to_json_pretty().context("failed to serialize schema")?;
    out.push('\n');

    let tmp = dest.with_extension("tmp");
    fs::write(&tmp, out.as_bytes())
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, &dest)
        .with_context(|| format!("failed to move {} into place", dest.display()))?;
    Ok(dest)
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

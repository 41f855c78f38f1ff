use crate::config::NetworkDocument;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use log::info;
use std::path::Path;

/// Input format of a network description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Pick the format from the file extension; anything but .yaml/.yml is JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                DocumentFormat::Yaml
            }
            _ => DocumentFormat::Json,
        }
    }
}

/// Parse a network description from a string
pub fn parse_document(content: &str, format: DocumentFormat) -> Result<NetworkDocument> {
    let document: NetworkDocument = match format {
        DocumentFormat::Json => serde_json::from_str(content)?,
        DocumentFormat::Yaml => serde_yaml::from_str(content)?,
    };

    for entry in &document {
        entry.validate()?;
    }

    Ok(document)
}

/// Load and validate a network description file
pub fn load_document(path: &Path) -> Result<NetworkDocument> {
    info!("Loading network description from: {:?}", path);

    if !path.exists() {
        return Err(eyre!("{} was not found", path.display()));
    }

    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;

    let format = DocumentFormat::from_path(path);
    let document = parse_document(&content, format)
        .wrap_err_with(|| format!("{} is not valid", path.display()))?;

    info!("Found {} network(s) to divide", document.len());
    Ok(document)
}

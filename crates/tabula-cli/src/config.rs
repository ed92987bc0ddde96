use std::fs;
use std::path::Path;

use anyhow::Context;
use tabula_store::StoreConfig;

/// Build the store configuration from an optional TOML file and an optional
/// `--root` override.
pub fn load_config(path: Option<&Path>, root: Option<&Path>) -> anyhow::Result<StoreConfig> {
    let mut config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("parsing config file {}", path.display()))?
        }
        None => StoreConfig::default(),
    };

    if let Some(root) = root {
        config.root = root.to_path_buf();
    }
    Ok(config)
}

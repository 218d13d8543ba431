//! Layered configuration
//!
//! Sources, later ones winning key by key:
//! 1. built-in defaults
//! 2. the user file `<config dir>/funcstyle/funcstyle.toml`
//! 3. the project file `funcstyle.toml` beside the entry source, or `--config`
//! 4. command-line flags, applied by the caller
//!
//! Name tables merge instead of replacing: each layer adds exceptions and
//! builtins on top of the previous ones.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;

use crate::{dirs, naming::Renamer, resolver::DEFAULT_EXTENSIONS, types::Direction};

/// Default output directory name, relative to the project root
pub const DEFAULT_OUTPUT_DIR: &str = "result";

/// Fully resolved configuration of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Output directory; relative paths are placed under the project root
    pub output: PathBuf,
    pub mode: Direction,
    /// Project root; defaults to the entry file's directory
    pub root: Option<PathBuf>,
    /// Extensions of sources followed through `#include`
    pub extensions: Vec<String>,
    /// Extra snake -> camel exceptions
    pub exceptions: IndexMap<String, String>,
    /// Extra identifiers that are never renamed
    pub builtins: Vec<String>,
    /// Run the pipeline without writing any file
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT_DIR),
            mode: Direction::default(),
            root: None,
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| (*ext).to_owned()).collect(),
            exceptions: IndexMap::new(),
            builtins: Vec::new(),
            dry_run: false,
        }
    }
}

/// One configuration file as written on disk; every key is optional
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub output: Option<PathBuf>,
    pub mode: Option<Direction>,
    pub root: Option<PathBuf>,
    pub extensions: Option<Vec<String>>,
    pub names: NamesSection,
}

/// `[names]` table
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct NamesSection {
    pub exceptions: IndexMap<String, String>,
    pub builtins: Vec<String>,
}

impl ConfigFile {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a configuration file; a relative `root` is taken
    /// relative to the file's own directory
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut file = Self::from_toml(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        if let (Some(root), Some(dir)) = (&file.root, path.parent()) {
            if root.is_relative() {
                file.root = Some(dir.join(root));
            }
        }
        Ok(file)
    }
}

impl Config {
    /// Overlay the keys set in `file`
    pub fn apply(&mut self, file: ConfigFile) {
        if let Some(output) = file.output {
            self.output = output;
        }
        if let Some(mode) = file.mode {
            self.mode = mode;
        }
        if let Some(root) = file.root {
            self.root = Some(root);
        }
        if let Some(extensions) = file.extensions {
            self.extensions = extensions;
        }
        self.exceptions.extend(file.names.exceptions);
        self.builtins.extend(file.names.builtins);
    }

    /// Defaults, then the user file, then the project (or explicit) file
    ///
    /// Missing implicit files are skipped; an explicit file must exist.
    pub fn load(explicit: Option<&Path>, project_dir: &Path) -> Result<Self> {
        let user_file = dirs::user_config_file();
        let project_file = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Some(dirs::project_config_file(project_dir)).filter(|p| p.is_file()),
        };
        Self::load_layers(
            user_file.as_deref().filter(|p| p.is_file()),
            project_file.as_deref(),
        )
    }

    /// Build a configuration from explicit layer files
    pub fn load_layers(user_file: Option<&Path>, project_file: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();
        for path in [user_file, project_file].into_iter().flatten() {
            debug!("Loading configuration from {}", path.display());
            config.apply(ConfigFile::read(path)?);
        }
        Ok(config)
    }

    /// Identifier transformer for this configuration
    pub fn renamer(&self) -> Result<Renamer> {
        if self.exceptions.is_empty() && self.builtins.is_empty() {
            return Ok(Renamer::new());
        }
        Renamer::with_overrides(
            self.exceptions
                .iter()
                .map(|(snake, camel)| (snake.as_str(), camel.as_str())),
            self.builtins.iter().map(String::as_str),
        )
        .context("Invalid [names] configuration")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.output, PathBuf::from("result"));
        assert_eq!(config.mode, Direction::ToCamel);
        assert_eq!(config.extensions, vec![".fc".to_owned(), ".func".to_owned()]);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_parse_full_file() -> Result<()> {
        let file = ConfigFile::from_toml(
            r#"
output = "camel"
mode = 2
extensions = [".fc"]

[names]
builtins = ["my_asm_op"]

[names.exceptions]
recv_internal = "onInternalMessage"
"#,
        )?;
        assert_eq!(file.output, Some(PathBuf::from("camel")));
        assert_eq!(file.mode, Some(Direction::ToSnake));
        assert_eq!(file.extensions, Some(vec![".fc".to_owned()]));
        assert_eq!(file.names.builtins, vec!["my_asm_op".to_owned()]);
        assert_eq!(
            file.names.exceptions.get("recv_internal").map(String::as_str),
            Some("onInternalMessage")
        );
        Ok(())
    }

    #[test]
    fn test_named_mode() -> Result<()> {
        let file = ConfigFile::from_toml(r#"mode = "snake""#)?;
        assert_eq!(file.mode, Some(Direction::ToSnake));
        assert!(ConfigFile::from_toml(r#"mode = "kebab""#).is_err());
        Ok(())
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(ConfigFile::from_toml("outptu = \"x\"").is_err());
        assert!(ConfigFile::from_toml("[names]\nexception = {}").is_err());
    }

    #[test]
    fn test_layers_override_key_by_key() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let user = temp_dir.path().join("user.toml");
        let project = temp_dir.path().join("project/funcstyle.toml");
        fs::create_dir_all(temp_dir.path().join("project"))?;
        fs::write(
            &user,
            "output = \"from-user\"\nmode = \"snake\"\n[names]\nbuiltins = [\"a\"]\n",
        )?;
        fs::write(&project, "mode = 1\nroot = \"..\"\n[names]\nbuiltins = [\"b\"]\n")?;

        let config = Config::load_layers(Some(&user), Some(&project))?;
        assert_eq!(config.output, PathBuf::from("from-user"));
        assert_eq!(config.mode, Direction::ToCamel);
        assert_eq!(config.builtins, vec!["a".to_owned(), "b".to_owned()]);
        assert_eq!(config.root, Some(temp_dir.path().join("project").join("..")));
        Ok(())
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.toml");
        assert!(Config::load(Some(&missing), temp_dir.path()).is_err());
    }

    #[test]
    fn test_renamer_from_config() -> Result<()> {
        let mut config = Config::default();
        config
            .exceptions
            .insert("recv_internal".to_owned(), "onInternalMessage".to_owned());
        let renamer = config.renamer()?;
        assert_eq!(
            renamer.transform("recv_internal", Direction::ToCamel),
            "onInternalMessage"
        );

        config
            .exceptions
            .insert("other".to_owned(), "onInternalMessage".to_owned());
        assert!(config.renamer().is_err());
        Ok(())
    }
}

//! Layered runtime settings.
//!
//! Precedence, lowest first: built-in defaults, the TOML file given with
//! `--config`, `ROSTER_*` environment variables (nested keys joined by `__`,
//! e.g. `ROSTER_SOURCE__KIND=remote`), then command-line flags.
//!
//! ```toml
//! prefs_path    = "~/.local/share/roster/prefs.db"
//! initial_route = "#/hot"
//!
//! [source]
//! kind     = "remote"
//! url      = "https://xyz.example.co"
//! anon_key = "public-anon-key"
//!
//! [search]
//! require_keyword = false
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use roster_client::SourceConfig;
use roster_core::search::KeywordPolicy;
use serde::Deserialize;

use crate::Args;

const DEFAULT_PREFS_PATH: &str = "~/.local/share/roster/prefs.db";

fn default_prefs_path() -> PathBuf { PathBuf::from(DEFAULT_PREFS_PATH) }

fn default_initial_route() -> String { "#/".to_owned() }

fn yes() -> bool { true }

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
  /// Whether results stay hidden until a keyword is typed.
  #[serde(default = "yes")]
  pub require_keyword: bool,
}

impl Default for SearchSettings {
  fn default() -> Self { Self { require_keyword: true } }
}

impl SearchSettings {
  pub fn policy(&self) -> KeywordPolicy {
    if self.require_keyword { KeywordPolicy::Required } else { KeywordPolicy::Optional }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  #[serde(default)]
  pub source:        SourceConfig,
  #[serde(default = "default_prefs_path")]
  pub prefs_path:    PathBuf,
  #[serde(default)]
  pub search:        SearchSettings,
  #[serde(default = "default_initial_route")]
  pub initial_route: String,
}

impl Settings {
  /// Build settings from every layer. Paths come back with `~` expanded.
  pub fn load(args: &Args) -> anyhow::Result<Self> {
    let mut builder = config::Config::builder()
      .set_default("source.kind", "static")?
      .set_default("source.location", ".")?;

    if let Some(path) = &args.config {
      builder = builder.add_source(config::File::from(path.as_path()).required(true));
    }

    let settings = builder
      .add_source(
        config::Environment::with_prefix("ROSTER")
          .prefix_separator("_")
          .separator("__"),
      )
      .set_override_option("source.kind", args.source.map(|k| k.to_string()))?
      .set_override_option("source.location", args.location.clone())?
      .set_override_option("source.url", args.url.clone())?
      .set_override_option("source.anon_key", args.anon_key.clone())?
      .set_override_option(
        "prefs_path",
        args.prefs.as_ref().map(|p| p.to_string_lossy().into_owned()),
      )?
      .set_override_option("initial_route", args.route.clone())?
      .build()
      .context("failed to read configuration")?;

    let mut settings: Settings =
      settings.try_deserialize().context("invalid configuration")?;
    settings.prefs_path = expand_tilde(&settings.prefs_path);
    if let SourceConfig::Static { location } = &mut settings.source {
      *location = expand_tilde(Path::new(location)).to_string_lossy().into_owned();
    }
    Ok(settings)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use clap::Parser;
  use roster_client::RemoteConfig;

  use super::*;

  fn args(extra: &[&str]) -> Args {
    Args::parse_from(std::iter::once("roster").chain(extra.iter().copied()))
  }

  fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
  }

  #[test]
  fn defaults_apply_without_any_layer() {
    let settings = Settings::load(&args(&["--prefs", "/tmp/p.db"])).unwrap();
    assert_eq!(settings.source, SourceConfig::Static { location: ".".into() });
    assert_eq!(settings.prefs_path, PathBuf::from("/tmp/p.db"));
    assert_eq!(settings.search.policy(), KeywordPolicy::Required);
    assert_eq!(settings.initial_route, "#/");
  }

  #[test]
  fn reads_the_config_file() {
    let file = config_file(
      r##"
        initial_route = "#/hot"
        prefs_path = "/var/roster/prefs.db"

        [source]
        kind = "remote"
        url = "https://db.example.co"
        anon_key = "k"

        [search]
        require_keyword = false
      "##,
    );
    let path = file.path().to_str().unwrap();
    let settings = Settings::load(&args(&["--config", path])).unwrap();

    assert_eq!(
      settings.source,
      SourceConfig::Remote(RemoteConfig::new("https://db.example.co", "k"))
    );
    assert_eq!(settings.initial_route, "#/hot");
    assert_eq!(settings.search.policy(), KeywordPolicy::Optional);
  }

  #[test]
  fn flags_override_the_file() {
    let file = config_file(
      r#"
        [source]
        kind = "static"
        location = "./public"
      "#,
    );
    let path = file.path().to_str().unwrap();
    let settings = Settings::load(&args(&[
      "--config",
      path,
      "--location",
      "https://example.org/site",
      "--route",
      "#/discover",
    ]))
    .unwrap();

    assert_eq!(
      settings.source,
      SourceConfig::Static { location: "https://example.org/site".into() }
    );
    assert_eq!(settings.initial_route, "#/discover");
  }

  #[test]
  fn remote_flags_select_the_remote_source() {
    let settings = Settings::load(&args(&[
      "--source",
      "remote",
      "--url",
      "https://db.example.co",
      "--anon-key",
      "k",
    ]))
    .unwrap();
    assert!(matches!(settings.source, SourceConfig::Remote(r) if r.url == "https://db.example.co"));
  }

  #[test]
  fn expands_home_in_paths() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(expand_tilde(Path::new("~/x/prefs.db")), PathBuf::from(home).join("x/prefs.db"));
    assert_eq!(expand_tilde(Path::new("/abs")), PathBuf::from("/abs"));
  }
}

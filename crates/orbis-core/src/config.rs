use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{de, Deserialize, Deserializer};

use crate::{errors::Error, Result};

/// Config file looked up in the working directory unless `ORBIS_CONFIG` is set.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Value shipped in the sample `.env`; treated the same as an unset token.
pub const PLACEHOLDER_TOKEN: &str = "YOUR_BOT_TOKEN_HERE";

pub const DEFAULT_CAPS_THRESHOLD: f64 = 0.6;
pub const DEFAULT_MIN_ALPHA_CHARS: usize = 5;
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Tunables for the content rules, read from the JSON config file.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct ModerationConfig {
    /// Uppercase share of letters above which a message counts as shouting.
    #[serde(default = "default_caps_threshold")]
    pub caps_threshold: f64,
    /// Messages with fewer letters than this are never checked for caps.
    #[serde(
        default = "default_min_alpha_chars",
        deserialize_with = "deserialize_letter_count"
    )]
    pub min_alpha_chars: usize,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            caps_threshold: DEFAULT_CAPS_THRESHOLD,
            min_alpha_chars: DEFAULT_MIN_ALPHA_CHARS,
        }
    }
}

impl ModerationConfig {
    /// Read and validate the JSON config file at `path`.
    ///
    /// A missing file is reported as [`Error::ConfigMissing`] so startup can
    /// exit with a specific diagnostic.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::ConfigMissing {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => return Err(Error::Io(e)),
        };
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        let t = self.caps_threshold;
        if !t.is_finite() || t <= 0.0 || t > 1.0 {
            return Err(Error::Config(format!(
                "caps_threshold must be in (0, 1], got {t}"
            )));
        }
        Ok(())
    }
}

/// Typed process configuration, built once at startup and passed down explicitly.
#[derive(Clone, Debug)]
pub struct Config {
    pub discord_token: String,
    pub config_path: PathBuf,
    pub moderation: ModerationConfig,
    /// Bound of the inbound gateway event queue.
    pub queue_capacity: usize,
}

impl Config {
    /// Load `.env` (if present), the JSON config file, then the session token.
    ///
    /// The config file is checked first: a missing file is fatal even when the
    /// token is also missing.
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let config_path =
            env_path("ORBIS_CONFIG").unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        Self::from_sources(
            config_path,
            env_str("DISCORD_TOKEN"),
            env_usize("ORBIS_QUEUE_CAPACITY"),
        )
    }

    /// Build a config from explicit inputs (no process environment access).
    pub fn from_sources(
        config_path: PathBuf,
        token: Option<String>,
        queue_capacity: Option<usize>,
    ) -> Result<Self> {
        let moderation = ModerationConfig::load(&config_path)?;
        let discord_token = validate_token(token)?;
        let queue_capacity = queue_capacity
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_QUEUE_CAPACITY);

        Ok(Self {
            discord_token,
            config_path,
            moderation,
            queue_capacity,
        })
    }
}

fn validate_token(raw: Option<String>) -> Result<String> {
    match raw.and_then(non_empty) {
        Some(t) if t.trim() != PLACEHOLDER_TOKEN => Ok(t.trim().to_string()),
        _ => Err(Error::CredentialMissing(
            "DISCORD_TOKEN environment variable is not set or is using the placeholder value in .env"
                .to_string(),
        )),
    }
}

fn default_caps_threshold() -> f64 {
    DEFAULT_CAPS_THRESHOLD
}

fn default_min_alpha_chars() -> usize {
    DEFAULT_MIN_ALPHA_CHARS
}

/// Accept `5` as well as an integral float such as `5.0`.
fn deserialize_letter_count<'de, D>(deserializer: D) -> std::result::Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let n = f64::deserialize(deserializer)?;
    if !n.is_finite() || n < 0.0 || n.fract() != 0.0 || n > usize::MAX as f64 {
        return Err(de::Error::custom(format!(
            "min_alpha_chars must be a non-negative whole number, got {n}"
        )));
    }
    Ok(n as usize)
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_usize(key: &str) -> Option<usize> {
    env_str(key).and_then(|s| s.trim().parse::<usize>().ok())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Export `KEY=value` pairs from a `.env` file. Variables already present in
/// the environment win over the file.
fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, value) in contents.lines().filter_map(parse_dotenv_line) {
        if env::var_os(key).is_none() {
            env::set_var(key, value);
        }
    }
}

/// `KEY=value`, `KEY="value"` or `KEY='value'`; blanks and `#` comments yield `None`.
fn parse_dotenv_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.starts_with('#') {
        return None;
    }
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    let value = value.trim();
    let unquoted = ['"', '\'']
        .iter()
        .find_map(|&q| value.strip_prefix(q)?.strip_suffix(q))
        .unwrap_or(value);
    Some((key, unquoted))
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    fn tmp(prefix: &str) -> PathBuf {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::from_secs(0))
            .as_nanos();
        let pid = std::process::id();
        PathBuf::from(format!("/tmp/{prefix}-{pid}-{ts}"))
    }

    fn write_config(contents: &str) -> PathBuf {
        let path = tmp("orbis-config").with_extension("json");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn defaults_apply_when_keys_absent() {
        let cfg = ModerationConfig::from_json("{}").unwrap();
        assert_eq!(cfg, ModerationConfig::default());
        assert_eq!(cfg.caps_threshold, 0.6);
        assert_eq!(cfg.min_alpha_chars, 5);
    }

    #[test]
    fn explicit_values_and_unknown_keys() {
        let cfg = ModerationConfig::from_json(
            r#"{"caps_threshold": 0.75, "min_alpha_chars": 10, "nickname": "orbis"}"#,
        )
        .unwrap();
        assert_eq!(cfg.caps_threshold, 0.75);
        assert_eq!(cfg.min_alpha_chars, 10);
    }

    #[test]
    fn threshold_range_is_enforced() {
        assert!(matches!(
            ModerationConfig::from_json(r#"{"caps_threshold": 0}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            ModerationConfig::from_json(r#"{"caps_threshold": 1.5}"#),
            Err(Error::Config(_))
        ));
        assert!(ModerationConfig::from_json(r#"{"caps_threshold": 1}"#).is_ok());
    }

    #[test]
    fn negative_min_alpha_is_a_json_error() {
        assert!(matches!(
            ModerationConfig::from_json(r#"{"min_alpha_chars": -1}"#),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn min_alpha_accepts_whole_floats_only() {
        let cfg = ModerationConfig::from_json(r#"{"min_alpha_chars": 5.0}"#).unwrap();
        assert_eq!(cfg.min_alpha_chars, 5);
        let cfg = ModerationConfig::from_json(r#"{"min_alpha_chars": 0}"#).unwrap();
        assert_eq!(cfg.min_alpha_chars, 0);
        assert!(matches!(
            ModerationConfig::from_json(r#"{"min_alpha_chars": 5.5}"#),
            Err(Error::Json(_))
        ));
        assert!(matches!(
            ModerationConfig::from_json(r#"{"min_alpha_chars": "5"}"#),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn dotenv_line_parsing() {
        assert_eq!(parse_dotenv_line("A=1"), Some(("A", "1")));
        assert_eq!(parse_dotenv_line("  B = two words "), Some(("B", "two words")));
        assert_eq!(parse_dotenv_line("C=\"quoted\""), Some(("C", "quoted")));
        assert_eq!(parse_dotenv_line("D='single'"), Some(("D", "single")));
        assert_eq!(parse_dotenv_line("E=\"unbalanced'"), Some(("E", "\"unbalanced'")));
        assert_eq!(parse_dotenv_line("F="), Some(("F", "")));
        assert_eq!(parse_dotenv_line("# G=3"), None);
        assert_eq!(parse_dotenv_line(""), None);
        assert_eq!(parse_dotenv_line("=value"), None);
        assert_eq!(parse_dotenv_line("no pair"), None);
    }

    #[test]
    fn missing_file_is_reported_as_config_missing() {
        let path = tmp("orbis-absent").with_extension("json");
        let err = Config::from_sources(path.clone(), Some("token".into()), None).unwrap_err();
        match err {
            Error::ConfigMissing { path: p } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_wins_over_missing_token() {
        let path = tmp("orbis-absent").with_extension("json");
        let err = Config::from_sources(path, None, None).unwrap_err();
        assert!(matches!(err, Error::ConfigMissing { .. }));
    }

    #[test]
    fn placeholder_or_blank_token_is_rejected() {
        let path = write_config("{}");
        for token in [None, Some(""), Some("   "), Some(PLACEHOLDER_TOKEN)] {
            let err =
                Config::from_sources(path.clone(), token.map(str::to_string), None).unwrap_err();
            assert!(matches!(err, Error::CredentialMissing(_)), "{token:?}");
        }
        let _ = fs::remove_file(path);
    }

    #[test]
    fn loads_full_config() {
        let path = write_config(r#"{"caps_threshold": 0.7}"#);
        let cfg = Config::from_sources(path.clone(), Some(" abc.def \n".into()), Some(0)).unwrap();
        assert_eq!(cfg.discord_token, "abc.def");
        assert_eq!(cfg.moderation.caps_threshold, 0.7);
        assert_eq!(cfg.moderation.min_alpha_chars, 5);
        assert_eq!(cfg.queue_capacity, DEFAULT_QUEUE_CAPACITY);
        assert_eq!(cfg.config_path, path);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn dotenv_does_not_override_existing_env() {
        let path = tmp("orbis-dotenv");
        let set_key = format!("ORBIS_TEST_SET_{}", std::process::id());
        let new_key = format!("ORBIS_TEST_NEW_{}", std::process::id());
        env::set_var(&set_key, "kept");
        fs::write(
            &path,
            format!("# comment\n{set_key}=replaced\n{new_key}=\"quoted value\"\nnot a pair\n"),
        )
        .unwrap();

        load_dotenv_if_present(&path);

        assert_eq!(env::var(&set_key).unwrap(), "kept");
        assert_eq!(env::var(&new_key).unwrap(), "quoted value");
        let _ = fs::remove_file(path);
    }
}

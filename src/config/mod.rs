use crate::error::{GroupSourceError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const TENANT_ID_VAR: &str = "AZURE_TENANT_ID";
pub const CLIENT_ID_VAR: &str = "AZURE_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "AZURE_CLIENT_SECRET";

/// Default HTTP timeout for Graph calls, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Groups looked up when no names file is given
pub const DEFAULT_GROUP_NAMES: &[&str] = &[
    "DEV-ATD",
    "DEV-AVIS-cloud",
    "DEV-BDAS-cloud",
    "DEV-CAKEHR-cloud",
    "DEV-DELTAPV-cloud",
    "DEV-ESTAPIKS2-cloud",
    "DEV-Evo-Roads",
    "DEV-FITS-cloud",
    "DEV-INTRANET-cloud",
    "DEV-LAMBDAPV-cloud",
    "DEV-MANAGEMENT-cloud",
    "DEV-NILDA2-cloud",
    "DEV-OPVS–CargoRail",
    "DEV-PRESERVICA-cloud",
    "DEV-VADDVS",
    "Dots-Sales",
    "Product Group",
    "BW-DEV-ATD",
    "BW-DEV-Common",
    "BW-DEV-EvoRoads",
    "BW-DEV-Kappa",
    "BW-DEV-LDz-OPVS",
    "BW-DEV-SAGE-MAGS",
    "DEV-AIHEN-cloud",
    "DEV-AIROS",
    "DEV-Digitalizacija",
    "DEV-EXT-AKKA-LAA",
    "DEV-External-ATD-SMARTIN",
    "DEV-External-SMARTIN-DESIGN",
    "DEV-EXT-Estapiks2",
    "DEV-EXT-Fits",
    "DEV-EXT-KAMIS",
    "DEV-EXT-Peruza",
    "DEV-EXT-Preservica",
    "DEV-FITS",
    "DEV-IC-FITS",
    "SQL-00-PBI-Sync",
];

/// App registration secrets used for the client credentials grant
#[derive(Clone)]
pub struct Credentials {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Read credentials from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials from the process environment, falling back to a
    /// dotenv-style file for anything the environment does not set
    pub fn from_env_with_file(env_file: &Path) -> Result<Self> {
        let contents = fs::read_to_string(env_file).map_err(|e| {
            GroupSourceError::ConfigError(format!(
                "Failed to read env file '{}': {}",
                env_file.display(),
                e
            ))
        })?;
        let file_vars = parse_env_file(&contents);

        Self::from_lookup(|key| {
            std::env::var(key)
                .ok()
                .filter(|v| !v.is_empty())
                .or_else(|| file_vars.get(key).cloned())
        })
    }

    /// Build credentials from an arbitrary key lookup. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| GroupSourceError::MissingEnvVar(key.to_string()))
        };

        Ok(Self {
            tenant_id: require(TENANT_ID_VAR)?,
            client_id: require(CLIENT_ID_VAR)?,
            client_secret: require(CLIENT_SECRET_VAR)?,
        })
    }
}

/// Everything a run needs, resolved once at startup
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub credentials: Credentials,
    pub group_names: Vec<String>,
    pub timeout: Duration,
    pub verbose: bool,
    pub output: Option<PathBuf>,
}

/// Load group names from a file, or return the built-in list
pub fn load_group_names(names_file: Option<&Path>) -> Result<Vec<String>> {
    let Some(path) = names_file else {
        return Ok(DEFAULT_GROUP_NAMES.iter().map(|s| s.to_string()).collect());
    };

    if !path.exists() {
        return Err(GroupSourceError::NamesFileNotFound(
            path.display().to_string(),
        ));
    }

    let contents = fs::read_to_string(path)?;
    let names = parse_group_names(&contents);

    if names.is_empty() {
        return Err(GroupSourceError::NoGroupNames(path.display().to_string()));
    }

    tracing::debug!("Loaded {} group names from {}", names.len(), path.display());
    Ok(names)
}

/// Split a names file into trimmed entries, skipping blank lines and `#` comments
pub fn parse_group_names(contents: &str) -> Vec<String> {
    contents
        .lines()
        .filter(|line| !line.starts_with('#'))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `KEY=VALUE` lines, ignoring comments and stripping surrounding quotes
pub fn parse_env_file(contents: &str) -> HashMap<String, String> {
    let mut vars = HashMap::new();

    for line in contents.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").unwrap_or(line);

        if let Some(pos) = line.find('=') {
            let key = line[..pos].trim().to_string();
            let value = line[pos + 1..].trim();

            let quoted = value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')));
            let value = if quoted {
                value[1..value.len() - 1].to_string()
            } else {
                value.to_string()
            };

            vars.insert(key, value);
        }
    }

    vars
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_credentials_from_lookup() {
        let creds = Credentials::from_lookup(lookup_from(&[
            (TENANT_ID_VAR, "tenant"),
            (CLIENT_ID_VAR, "client"),
            (CLIENT_SECRET_VAR, "secret"),
        ]))
        .unwrap();

        assert_eq!(creds.tenant_id, "tenant");
        assert_eq!(creds.client_id, "client");
        assert_eq!(creds.client_secret, "secret");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("\"secret\""));
    }

    #[test]
    fn test_missing_credential_names_variable() {
        let err = Credentials::from_lookup(lookup_from(&[
            (TENANT_ID_VAR, "tenant"),
            (CLIENT_SECRET_VAR, "secret"),
        ]))
        .unwrap_err();

        assert!(matches!(err, GroupSourceError::MissingEnvVar(ref v) if v == CLIENT_ID_VAR));
    }

    #[test]
    fn test_empty_credential_counts_as_missing() {
        let err = Credentials::from_lookup(lookup_from(&[
            (TENANT_ID_VAR, ""),
            (CLIENT_ID_VAR, "client"),
            (CLIENT_SECRET_VAR, "secret"),
        ]))
        .unwrap_err();

        assert!(matches!(err, GroupSourceError::MissingEnvVar(ref v) if v == TENANT_ID_VAR));
    }

    #[test]
    fn test_parse_group_names_skips_blanks_and_comments() {
        let contents = "# header\nAlpha\n\n   \n  Beta  \n#Gamma\nO'Brien Team\n";
        assert_eq!(
            parse_group_names(contents),
            vec!["Alpha", "Beta", "O'Brien Team"]
        );
    }

    #[test]
    fn test_parse_group_names_keeps_duplicates() {
        assert_eq!(parse_group_names("A\nA\n"), vec!["A", "A"]);
    }

    #[test]
    fn test_default_names_when_no_file() {
        let names = load_group_names(None).unwrap();
        assert_eq!(names.len(), DEFAULT_GROUP_NAMES.len());
        assert_eq!(names[0], "DEV-ATD");
    }

    #[test]
    fn test_missing_names_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        let err = load_group_names(Some(&path)).unwrap_err();
        assert!(matches!(err, GroupSourceError::NamesFileNotFound(_)));
    }

    #[test]
    fn test_names_file_with_only_comments_is_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# nothing here").unwrap();
        writeln!(file).unwrap();

        let err = load_group_names(Some(file.path())).unwrap_err();
        assert!(matches!(err, GroupSourceError::NoGroupNames(_)));
    }

    #[test]
    fn test_names_file_loaded_in_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Beta\nAlpha").unwrap();

        let names = load_group_names(Some(file.path())).unwrap();
        assert_eq!(names, vec!["Beta", "Alpha"]);
    }

    #[test]
    fn test_parse_env_file() {
        let contents = "# Client: Contoso\nAZURE_TENANT_ID=abc\nexport AZURE_CLIENT_ID = \"def\"\nAZURE_CLIENT_SECRET='x=y'\nBROKEN\n";
        let vars = parse_env_file(contents);

        assert_eq!(vars.get(TENANT_ID_VAR).map(String::as_str), Some("abc"));
        assert_eq!(vars.get(CLIENT_ID_VAR).map(String::as_str), Some("def"));
        assert_eq!(vars.get(CLIENT_SECRET_VAR).map(String::as_str), Some("x=y"));
        assert_eq!(vars.len(), 3);
    }

    #[test]
    fn test_parse_env_file_single_quote_char() {
        let vars = parse_env_file("KEY=\"");
        assert_eq!(vars.get("KEY").map(String::as_str), Some("\""));
    }
}

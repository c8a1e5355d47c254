use serde::Deserialize;

use crate::error::ConfigError;

/// Engine configuration, usually read from the `[fakes]` part of a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FakesConfig {
    pub pagination: ArgumentAliases,
    pub fillers: FillerConfig,
}

impl FakesConfig {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }
}

/// Argument names recognized by the query heuristics. Arguments with other names are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArgumentAliases {
    pub id: String,
    pub order: Vec<String>,
    pub direction: Vec<String>,
    pub reverse: Vec<String>,
    pub offset: Vec<String>,
    pub limit: Vec<String>,
    pub last: Vec<String>,
    pub after: Vec<String>,
    pub before: Vec<String>,
}

impl Default for ArgumentAliases {
    fn default() -> Self {
        fn names(names: &[&str]) -> Vec<String> {
            names.iter().map(|name| name.to_string()).collect()
        }

        ArgumentAliases {
            id: "id".to_owned(),
            order: names(&["order", "orderBy", "sortKey"]),
            direction: names(&["sort", "orderDirection"]),
            reverse: names(&["reverse"]),
            offset: names(&["offset", "skip"]),
            limit: names(&["limit", "first"]),
            last: names(&["last"]),
            after: names(&["after"]),
            before: names(&["before"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FillerConfig {
    /// How many objects an extension list field receives at most.
    /// 4 by default.
    pub list_size: usize,
}

impl Default for FillerConfig {
    fn default() -> Self {
        FillerConfig { list_size: 4 }
    }
}

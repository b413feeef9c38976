//! Dialect definitions loaded from TOML.
//!
//! ```toml
//! base = "postgres"
//! name = "warehouse"
//!
//! [options]
//! functions_registered_only = true
//!
//! [operators]
//! "||" = { function = "CONCAT" }
//!
//! [functions]
//! IFNULL = "COALESCE"
//! ```
//!
//! Keys left out of `[options]` keep the value of the base preset.

use super::{Dialect, Engine, FunctionInfo, OperatorInfo};
use crate::error::{SqlError, SqlResult};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorConfig {
    Symbol(String),
    Function(String),
}

impl From<OperatorConfig> for OperatorInfo {
    fn from(config: OperatorConfig) -> Self {
        match config {
            OperatorConfig::Symbol(s) => OperatorInfo::Symbol(s),
            OperatorConfig::Function(f) => OperatorInfo::Function(f),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DialectConfig {
    /// Preset to start from; a bare generic dialect when absent.
    pub base: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub options: toml::Table,
    #[serde(default)]
    pub operators: BTreeMap<String, OperatorConfig>,
    /// Function renames, logical name to emitted name.
    #[serde(default)]
    pub functions: BTreeMap<String, String>,
}

impl DialectConfig {
    pub fn from_toml_str(s: &str) -> SqlResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> SqlResult<()> {
        if let Some(base) = &self.base
            && Dialect::preset(base).is_none()
        {
            return Err(SqlError::Config(format!("unknown base dialect: {base}")));
        }
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err(SqlError::Config("dialect name must not be empty".into()));
        }
        for (symbol, op) in &self.operators {
            let target = match op {
                OperatorConfig::Symbol(s) | OperatorConfig::Function(s) => s,
            };
            if symbol.trim().is_empty() || target.trim().is_empty() {
                return Err(SqlError::Config(format!(
                    "operator mapping '{symbol}' has an empty side"
                )));
            }
        }
        for (name, target) in &self.functions {
            if name.trim().is_empty() || target.trim().is_empty() {
                return Err(SqlError::Config(format!(
                    "function mapping '{name}' has an empty side"
                )));
            }
        }
        Ok(())
    }

    /// Build the dialect described by this config.
    pub fn build(self) -> SqlResult<Dialect> {
        let mut dialect = match &self.base {
            Some(base) => Dialect::preset(base)
                .ok_or_else(|| SqlError::Config(format!("unknown base dialect: {base}")))?,
            None => Dialect::new("generic"),
        };
        if let Some(name) = self.name {
            dialect = dialect.with_name(name);
        }

        if !self.options.is_empty() {
            let mut merged = match toml::Value::try_from(dialect.options())
                .map_err(|e| SqlError::Config(e.to_string()))?
            {
                toml::Value::Table(table) => table,
                _ => toml::Table::new(),
            };
            merged.extend(self.options);
            let options = toml::Value::Table(merged).try_into()?;
            dialect = dialect.with_options(options);
        }

        for (symbol, op) in self.operators {
            dialect = dialect.with_operator(symbol, op.into());
        }
        for (name, target) in self.functions {
            dialect = dialect.with_function(name, FunctionInfo::renamed(target));
        }
        Ok(dialect)
    }
}

impl Dialect {
    /// Load a dialect from TOML text (see [`DialectConfig`]).
    pub fn from_toml_str(s: &str) -> SqlResult<Self> {
        DialectConfig::from_toml_str(s)?.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::OffsetStyle;
    use crate::ident::NameQuote;

    #[test]
    fn options_merge_over_base() {
        let dialect = Dialect::from_toml_str(
            r#"
            base = "sqlserver"
            name = "azure"

            [options]
            offset_style = "limit"

            [operators]
            "||" = { function = "CONCAT" }

            [functions]
            ifnull = "ISNULL"
            "#,
        )
        .unwrap();

        assert_eq!(dialect.name(), "azure");
        let opts = dialect.options();
        assert_eq!(opts.offset_style, OffsetStyle::Limit);
        // kept from the preset
        assert!(opts.top_supported);
        assert_eq!(opts.name_quote, NameQuote::Bracket);
        assert_eq!(
            dialect.operator("||"),
            Some(&OperatorInfo::Function("CONCAT".into()))
        );
        assert_eq!(
            dialect.function("IFNULL").and_then(|f| f.name.as_deref()),
            Some("ISNULL")
        );
    }

    #[test]
    fn unknown_base_is_rejected() {
        let err = Dialect::from_toml_str(r#"base = "db2""#).unwrap_err();
        assert!(matches!(err, SqlError::Config(msg) if msg.contains("db2")));
    }

    #[test]
    fn empty_function_target_is_rejected() {
        let err = Dialect::from_toml_str("[functions]\nNOW = \"\"").unwrap_err();
        assert!(matches!(err, SqlError::Config(_)));
    }

    #[test]
    fn bad_option_type_is_rejected() {
        let err = Dialect::from_toml_str("[options]\ntop_supported = \"yes\"").unwrap_err();
        assert!(matches!(err, SqlError::Config(_)));
    }
}

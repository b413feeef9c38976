use super::{Engine, EngineOptions, FunctionInfo, OffsetStyle, OperatorInfo};
use super::schema::{EntityType, SchemaRegistry, TableInfo, TableMeta};
use crate::error::SqlResult;
use crate::ident::NameQuote;
use std::collections::HashMap;

#[cfg(feature = "tracing")]
use crate::trace::CompileTrace;

/// A configurable [`Engine`].
///
/// Presets cover the common databases; every part can be adjusted with the
/// consuming `with_*` methods:
///
/// ```ignore
/// let engine = Dialect::postgres()
///     .with_function("IFNULL", FunctionInfo::renamed("COALESCE"))
///     .with_table::<User>();
/// ```
#[derive(Debug, Clone)]
pub struct Dialect {
    name: String,
    options: EngineOptions,
    operators: HashMap<String, OperatorInfo>,
    functions: HashMap<String, FunctionInfo>,
    schema: SchemaRegistry,
    #[cfg(feature = "tracing")]
    trace: Option<CompileTrace>,
}

impl Dialect {
    /// A dialect with default options and no overrides.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: EngineOptions::default(),
            operators: HashMap::new(),
            functions: HashMap::new(),
            schema: SchemaRegistry::new(),
            #[cfg(feature = "tracing")]
            trace: None,
        }
    }

    /// Microsoft SQL Server.
    pub fn sqlserver() -> Self {
        Self::new("sqlserver")
            .with_options(EngineOptions {
                top_supported: true,
                update_with_from: true,
                update_set_with_table_name: true,
                delete_with_alias: true,
                with_recursive: false,
                name_quote: NameQuote::Bracket,
                ..EngineOptions::default()
            })
            .with_operator("||", OperatorInfo::Symbol("+".into()))
            .with_function("LENGTH", FunctionInfo::renamed("LEN"))
            .with_function("NOW", FunctionInfo::renamed("GETDATE"))
    }

    /// PostgreSQL.
    pub fn postgres() -> Self {
        Self::new("postgres")
            .with_options(EngineOptions {
                distinct_on_supported: true,
                offset_style: OffsetStyle::Limit,
                ..EngineOptions::default()
            })
            .with_operator("^", OperatorInfo::Symbol("#".into()))
            .with_function("LEN", FunctionInfo::renamed("LENGTH"))
            .with_function("GETDATE", FunctionInfo::renamed("NOW"))
    }

    /// MySQL / MariaDB.
    pub fn mysql() -> Self {
        Self::new("mysql")
            .with_options(EngineOptions {
                full_join_supported: false,
                offset_style: OffsetStyle::Limit,
                update_set_with_table_name: true,
                delete_with_alias: true,
                name_quote: NameQuote::Backtick,
                ..EngineOptions::default()
            })
            .with_operator("||", OperatorInfo::Function("CONCAT".into()))
            .with_function("LEN", FunctionInfo::renamed("CHAR_LENGTH"))
    }

    /// SQLite.
    pub fn sqlite() -> Self {
        Self::new("sqlite")
            .with_options(EngineOptions {
                offset_style: OffsetStyle::Limit,
                ..EngineOptions::default()
            })
            .with_function("LEN", FunctionInfo::renamed("LENGTH"))
    }

    /// Oracle.
    pub fn oracle() -> Self {
        Self::new("oracle")
            .with_options(EngineOptions {
                insert_with_union: true,
                with_recursive: false,
                table_as: false,
                from_dummy_name: Some("DUAL".into()),
                parameter_prefix: ":p".into(),
                ..EngineOptions::default()
            })
            .with_operator("%", OperatorInfo::Function("MOD".into()))
            .with_operator("&", OperatorInfo::Function("BITAND".into()))
            .with_operator("EXCEPT", OperatorInfo::Symbol("MINUS".into()))
            .with_function("LEN", FunctionInfo::renamed("LENGTH"))
    }

    /// Look up a preset by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "sqlserver" | "mssql" => Some(Self::sqlserver()),
            "postgres" | "postgresql" => Some(Self::postgres()),
            "mysql" | "mariadb" => Some(Self::mysql()),
            "sqlite" => Some(Self::sqlite()),
            "oracle" => Some(Self::oracle()),
            _ => None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replace all feature flags.
    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Map an operator symbol to another symbol or a function.
    pub fn with_operator(mut self, symbol: impl Into<String>, info: OperatorInfo) -> Self {
        self.operators.insert(symbol.into(), info);
        self
    }

    /// Register a function, optionally renamed or with a custom layout.
    pub fn with_function(mut self, name: impl Into<String>, info: FunctionInfo) -> Self {
        self.functions.insert(name.into().to_ascii_uppercase(), info);
        self
    }

    /// Register entity metadata.
    pub fn with_table<T: TableMeta>(mut self) -> Self {
        self.schema.register::<T>();
        self
    }

    /// Log compiled statements through `tracing`.
    #[cfg(feature = "tracing")]
    pub fn with_trace(mut self, trace: CompileTrace) -> Self {
        self.trace = Some(trace);
        self
    }

    pub fn options_mut(&mut self) -> &mut EngineOptions {
        &mut self.options
    }

    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    pub fn schema_mut(&mut self) -> &mut SchemaRegistry {
        &mut self.schema
    }
}

impl Engine for Dialect {
    fn name(&self) -> &str {
        &self.name
    }

    fn options(&self) -> &EngineOptions {
        &self.options
    }

    fn operator(&self, symbol: &str) -> Option<&OperatorInfo> {
        self.operators.get(symbol)
    }

    fn function(&self, name: &str) -> Option<&FunctionInfo> {
        self.functions.get(name.to_ascii_uppercase().as_str())
    }

    fn table_info(&self, entity: EntityType) -> SqlResult<&TableInfo> {
        self.schema.get(entity)
    }

    #[cfg(feature = "tracing")]
    fn trace(&self) -> Option<&CompileTrace> {
        self.trace.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_resolve_by_name() {
        assert_eq!(Dialect::preset("PostgreSQL").unwrap().name(), "postgres");
        assert_eq!(Dialect::preset("mssql").unwrap().name(), "sqlserver");
        assert!(Dialect::preset("db2").is_none());
    }

    #[test]
    fn function_lookup_ignores_case() {
        let engine = Dialect::sqlserver();
        let info = engine.function("length").unwrap();
        assert_eq!(info.name.as_deref(), Some("LEN"));
        assert!(engine.function("coalesce").is_none());
    }

    #[test]
    fn operator_overrides() {
        let engine = Dialect::oracle();
        assert_eq!(
            engine.operator("%"),
            Some(&OperatorInfo::Function("MOD".into()))
        );
        assert_eq!(engine.operator("+"), None);
    }
}

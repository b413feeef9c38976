use crate::error::{SqlError, SqlResult};
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

/// Metadata for an entity type mapped to a table.
///
/// Normally produced by a derive or hand-written next to the entity struct.
pub trait TableMeta: 'static {
    /// The database table name.
    fn table_name() -> &'static str;

    /// The database schema name, if the table is schema-qualified.
    fn schema_name() -> Option<&'static str> {
        None
    }

    /// Column names in declaration order.
    fn columns() -> &'static [&'static str];

    /// `(field, column)` pairs for fields whose column name differs.
    fn field_columns() -> &'static [(&'static str, &'static str)] {
        &[]
    }
}

/// Identity of an entity type, used as the lookup key into engine metadata.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityType {
    id: TypeId,
    name: &'static str,
}

impl EntityType {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Type name without its module path.
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }
}

impl fmt::Debug for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Column of a mapped table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Field name on the entity.
    pub field: String,
    /// Column name in the database.
    pub name: String,
}

/// Table information for one entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub schema: Option<String>,
    pub name: String,
    pub columns: Vec<ColumnInfo>,
}

impl TableInfo {
    /// Create a table with no columns.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Add columns whose field and column names are the same.
    pub fn with_columns(mut self, columns: &[&str]) -> Self {
        for col in columns {
            self.columns.push(ColumnInfo {
                field: col.to_string(),
                name: col.to_string(),
            });
        }
        self
    }

    /// Add a column whose field name differs from its column name.
    pub fn with_mapped_column(mut self, field: impl Into<String>, name: impl Into<String>) -> Self {
        self.columns.push(ColumnInfo {
            field: field.into(),
            name: name.into(),
        });
        self
    }

    /// `schema.table`, or just `table`.
    pub fn qualified_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{schema}.{}", self.name),
            None => self.name.clone(),
        }
    }

    /// Column name for a field. Column names are accepted as well.
    pub fn column(&self, field: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.field == field)
            .or_else(|| self.columns.iter().find(|c| c.name == field))
            .map(|c| c.name.as_str())
    }

    fn from_meta<T: TableMeta>() -> Self {
        let mapped = T::field_columns();
        let columns = T::columns()
            .iter()
            .map(|col| {
                let field = mapped
                    .iter()
                    .find(|(_, c)| c == col)
                    .map_or(*col, |(f, _)| *f);
                ColumnInfo {
                    field: field.to_string(),
                    name: col.to_string(),
                }
            })
            .collect();
        Self {
            schema: T::schema_name().map(str::to_string),
            name: T::table_name().to_string(),
            columns,
        }
    }
}

/// Entity-to-table metadata, keyed by type.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    tables: HashMap<TypeId, TableInfo>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity from its [`TableMeta`] impl.
    pub fn register<T: TableMeta>(&mut self) {
        self.tables.insert(TypeId::of::<T>(), TableInfo::from_meta::<T>());
    }

    /// Register an entity with explicit metadata.
    pub fn register_table<T: 'static>(&mut self, info: TableInfo) {
        self.tables.insert(TypeId::of::<T>(), info);
    }

    pub fn get(&self, entity: EntityType) -> SqlResult<&TableInfo> {
        self.tables
            .get(&entity.id())
            .ok_or_else(|| SqlError::UnknownEntity(entity.short_name().to_string()))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Account;

    impl TableMeta for Account {
        fn table_name() -> &'static str {
            "accounts"
        }
        fn schema_name() -> Option<&'static str> {
            Some("billing")
        }
        fn columns() -> &'static [&'static str] {
            &["id", "owner_name"]
        }
        fn field_columns() -> &'static [(&'static str, &'static str)] {
            &[("owner", "owner_name")]
        }
    }

    #[test]
    fn register_from_meta() {
        let mut reg = SchemaRegistry::new();
        reg.register::<Account>();
        let info = reg.get(EntityType::of::<Account>()).unwrap();
        assert_eq!(info.qualified_name(), "billing.accounts");
        assert_eq!(info.column("owner"), Some("owner_name"));
        assert_eq!(info.column("id"), Some("id"));
        assert_eq!(info.column("owner_name"), Some("owner_name"));
        assert_eq!(info.column("missing"), None);
    }

    #[test]
    fn unknown_entity() {
        let reg = SchemaRegistry::new();
        let err = reg.get(EntityType::of::<Account>()).unwrap_err();
        assert!(matches!(err, SqlError::UnknownEntity(name) if name == "Account"));
    }
}

use super::Alias;
use crate::builder::QueryBuilder;
use crate::engine::EntityType;
use crate::error::{SqlError, SqlResult};
use crate::fragment::Fragment;
use std::fmt;

/// How a column names itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnName {
    /// A literal column name, or `*`.
    Named(String),
    /// An entity field, resolved to a column name at compile time.
    Field { entity: EntityType, field: String },
}

/// A column reference, optionally qualified by its table.
///
/// The name `*` puts a column in the select-all state. An entity select-all
/// column expands into the entity's full column list when compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    table: Option<Alias>,
    name: ColumnName,
}

impl Column {
    /// Bare column by name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            table: None,
            name: ColumnName::Named(name.into()),
        }
    }

    /// Bare `*`.
    pub fn all() -> Self {
        Self::new("*")
    }

    /// Bare column of an entity field.
    pub fn field<T: 'static>(field: impl Into<String>) -> Self {
        Self::entity_field(EntityType::of::<T>(), field)
    }

    pub(crate) fn entity_field(entity: EntityType, field: impl Into<String>) -> Self {
        Self {
            table: None,
            name: ColumnName::Field {
                entity,
                field: field.into(),
            },
        }
    }

    /// Qualify this column with a table or alias.
    pub fn qualified(mut self, table: impl Into<Alias>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn table(&self) -> Option<&Alias> {
        self.table.as_ref()
    }

    pub fn name(&self) -> &ColumnName {
        &self.name
    }

    fn write_qualifier(&self, b: &mut QueryBuilder<'_>, with_table: bool) -> SqlResult<()> {
        if let (true, Some(table)) = (with_table, &self.table) {
            table.write_reference(b)?;
            b.write(".");
        }
        Ok(())
    }

    /// Compile with or without the table qualifier.
    pub fn compile_with(&self, b: &mut QueryBuilder<'_>, with_table: bool) -> SqlResult<()> {
        match &self.name {
            ColumnName::Named(name) => {
                self.write_qualifier(b, with_table)?;
                b.write_name(name);
            }
            ColumnName::Field { entity, field } if field == "*" => {
                let engine = b.engine();
                let columns = engine.column_names(*entity)?;
                if columns.is_empty() {
                    return Err(SqlError::EmptyList("entity columns"));
                }
                for column in columns {
                    self.write_qualifier(b, with_table)?;
                    b.write_name_part(column);
                    b.write(", ");
                }
                b.remove_last(2);
            }
            ColumnName::Field { entity, field } => {
                let engine = b.engine();
                let column = engine.column_name(*entity, field)?;
                self.write_qualifier(b, with_table)?;
                b.write_name_part(column);
            }
        }
        Ok(())
    }
}

impl Fragment for Column {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        self.compile_with(b, true)
    }

    fn is_select_all(&self) -> bool {
        match &self.name {
            ColumnName::Named(name) => name == "*",
            ColumnName::Field { field, .. } => field == "*",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(table) = &self.table {
            table.fmt_reference(f)?;
            f.write_str(".")?;
        }
        match &self.name {
            ColumnName::Named(name) => f.write_str(name),
            ColumnName::Field { field, .. } => f.write_str(field),
        }
    }
}

impl From<&str> for Column {
    fn from(name: &str) -> Self {
        Column::new(name)
    }
}

impl From<String> for Column {
    fn from(name: String) -> Self {
        Column::new(name)
    }
}

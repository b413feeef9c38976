use super::Column;
use crate::builder::QueryBuilder;
use crate::engine::{Engine, EntityType};
use crate::error::SqlResult;
use crate::fragment::Fragment;
use std::fmt;

/// What an [`Alias`] binds: a literal table name or a mapped entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    /// Table name, possibly `schema.table`.
    Named(String),
    /// Entity type resolved through the engine's metadata.
    Entity(EntityType),
}

/// A table (or entity) bound to an optional alias name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    source: TableSource,
    name: Option<String>,
}

impl Alias {
    /// A table without an alias.
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            source: TableSource::Named(table.into()),
            name: None,
        }
    }

    /// A table with an alias.
    pub fn new(table: impl Into<String>, alias: impl Into<String>) -> Self {
        Self::table(table).aliased(alias)
    }

    /// An entity table without an alias.
    pub fn entity<T: 'static>() -> Self {
        Self {
            source: TableSource::Entity(EntityType::of::<T>()),
            name: None,
        }
    }

    /// An entity table with an alias.
    pub fn entity_as<T: 'static>(alias: impl Into<String>) -> Self {
        Self::entity::<T>().aliased(alias)
    }

    pub fn aliased(mut self, alias: impl Into<String>) -> Self {
        self.name = Some(alias.into());
        self
    }

    pub fn source(&self) -> &TableSource {
        &self.source
    }

    /// The alias name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Table name as the engine knows it (schema-qualified for entities).
    pub fn table_name(&self, engine: &dyn Engine) -> SqlResult<String> {
        match &self.source {
            TableSource::Named(name) => Ok(name.clone()),
            TableSource::Entity(entity) => Ok(engine.table_info(*entity)?.qualified_name()),
        }
    }

    /// The name other clauses use to reference this source.
    pub fn alias_or_table_name(&self, engine: &dyn Engine) -> SqlResult<String> {
        match &self.name {
            Some(name) => Ok(name.clone()),
            None => self.table_name(engine),
        }
    }

    /// Write just the (escaped) table name.
    pub fn write_table(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        let table = self.table_name(b.engine())?;
        b.write_name(&table);
        Ok(())
    }

    /// Write the name other clauses use to reference this source.
    pub fn write_reference(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        match &self.name {
            Some(name) => {
                b.write_name_part(name);
                Ok(())
            }
            None => self.write_table(b),
        }
    }

    /// A column qualified by this source.
    pub fn column(&self, name: impl Into<String>) -> Column {
        Column::new(name).qualified(self.clone())
    }

    /// `alias.*`; expands to every mapped column for entity sources.
    pub fn all(&self) -> Column {
        self.field("*")
    }

    /// A column by field name. Entity sources resolve it through the engine.
    pub fn field(&self, field: impl Into<String>) -> Column {
        match &self.source {
            TableSource::Named(_) => self.column(field),
            TableSource::Entity(entity) => {
                Column::entity_field(*entity, field).qualified(self.clone())
            }
        }
    }

    pub(crate) fn fmt_reference(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, &self.source) {
            (Some(name), _) => f.write_str(name),
            (None, TableSource::Named(table)) => f.write_str(table),
            (None, TableSource::Entity(entity)) => write!(f, "{entity}"),
        }
    }
}

impl Fragment for Alias {
    fn compile(&self, b: &mut QueryBuilder<'_>) -> SqlResult<()> {
        self.write_table(b)?;
        if let Some(name) = &self.name {
            b.write(if b.options().table_as { " AS " } else { " " });
            b.write_name_part(name);
        }
        Ok(())
    }

    fn source_alias(&self) -> Option<&Alias> {
        Some(self)
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            TableSource::Named(table) => f.write_str(table)?,
            TableSource::Entity(entity) => write!(f, "{entity}")?,
        }
        if let Some(name) = &self.name {
            write!(f, " AS {name}")?;
        }
        Ok(())
    }
}

impl From<&str> for Alias {
    fn from(table: &str) -> Self {
        Alias::table(table)
    }
}

impl From<String> for Alias {
    fn from(table: String) -> Self {
        Alias::table(table)
    }
}

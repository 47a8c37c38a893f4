//! Type tables describing the classes generation runs against.

use std::path::Path;

use xamlgen_engine::TypeTable;

use crate::ConfigError;

/// Reads a [`TypeTable`] from a TOML file.
///
/// ```toml
/// [types.Order]
/// properties = [
///     { name = "Id", type = "int", is_read_only = true },
///     { name = "Total", type = "decimal" },
/// ]
///
/// [types.Status]
/// base = "Enum"
/// members = ["Pending", "Shipped"]
/// ```
pub fn load_type_table<P: AsRef<Path>>(path: P) -> Result<TypeTable, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ConfigReadError {
        config_path: path.to_path_buf(),
        source,
    })?;
    let table: TypeTable = toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
        config_path: path.to_path_buf(),
        source,
    })?;
    Ok(table.normalized())
}

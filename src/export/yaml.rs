//! YAML Export functionality
//!
//! Exports one month to YAML for a human-readable archive.

use crate::error::{LedgerError, LedgerResult};
use crate::export::json::MonthExport;
use crate::models::Month;
use crate::storage::Storage;
use std::io::Write;

/// Export one month to YAML format
pub fn export_month_yaml<W: Write + ?Sized>(
    storage: &Storage,
    month: &Month,
    writer: &mut W,
) -> LedgerResult<()> {
    let export = MonthExport::from_storage(storage, month)?;

    writeln!(writer, "# rentshare month export: {}", export.month)?;
    writeln!(writer, "# Generated: {}", export.exported_at)?;
    writeln!(writer, "# App Version: {}", export.app_version)?;
    writeln!(writer)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| LedgerError::Export(e.to_string()))?;

    Ok(())
}

/// Read back a YAML export
pub fn import_from_yaml(yaml_str: &str) -> LedgerResult<MonthExport> {
    let export: MonthExport =
        serde_yaml::from_str(yaml_str).map_err(|e| LedgerError::Json(e.to_string()))?;
    export.validate().map_err(LedgerError::Validation)?;
    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Owner, OwnerId, RentRecord};

    #[test]
    fn test_yaml_export() {
        let storage = Storage::open_in_memory().unwrap();
        let month = Month::parse("2024-05").unwrap();
        storage
            .owners()
            .insert(&Owner::new(OwnerId::new(1), "Amal", 1.0))
            .unwrap();
        storage
            .rents()
            .insert(&RentRecord::new(month, "B2", "Nadia Saleh", 850.0, 850.0))
            .unwrap();

        let mut out = Vec::new();
        export_month_yaml(&storage, &month, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("# rentshare month export: 2024-05"));
        assert!(text.contains("Nadia Saleh"));

        // Comment lines are ignored by the parser
        let imported = import_from_yaml(&text).unwrap();
        assert_eq!(imported.rents.len(), 1);
        assert_eq!(imported.owners[0].name, "Amal");
    }
}

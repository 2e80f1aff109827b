//! Sheet import service
//!
//! Loads CSV exports of the building workbook. Each sheet kind has a static
//! field table mapping canonical fields to the header aliases it accepts.
//! Headers are normalized and checked before any row is read; every problem
//! found is reported together as a list of [`ImportIssue`]s.
//!
//! Monthly sheets replace the rows of each month they touch. The owners
//! sheet replaces the whole owner table. Each sheet is written in one
//! transaction.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::audit::AuditEntry;
use crate::error::{ImportIssue, LedgerError, LedgerResult};
use crate::models::{
    Expense, Money, Month, Owner, OwnerAllowance, OwnerId, OwnerValidationError, RentRecord,
};
use crate::storage::{
    AllowanceRepository, ExpenseRepository, OwnerRepository, RentRepository, Storage,
};

/// Workbook sheets the importer understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetKind {
    OwnersShares,
    UnitsRents,
    Expenses,
    OwnerAllowance,
}

impl SheetKind {
    /// Import order when loading a whole directory
    pub const ALL: [SheetKind; 4] = [
        SheetKind::OwnersShares,
        SheetKind::UnitsRents,
        SheetKind::Expenses,
        SheetKind::OwnerAllowance,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::OwnersShares => "owners_shares",
            Self::UnitsRents => "units_rents",
            Self::Expenses => "expenses",
            Self::OwnerAllowance => "owner_allowance",
        }
    }

    /// Match a sheet or file name, ignoring case, spaces and dashes
    pub fn parse(s: &str) -> Option<Self> {
        let cleaned = normalize_header(s);
        Self::ALL.into_iter().find(|k| k.name() == cleaned)
    }

    /// Whether rows are scoped to a month
    pub fn is_monthly(&self) -> bool {
        !matches!(self, Self::OwnersShares)
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            Self::OwnersShares => &OWNERS_FIELDS,
            Self::UnitsRents => &RENTS_FIELDS,
            Self::Expenses => &EXPENSES_FIELDS,
            Self::OwnerAllowance => &ALLOWANCE_FIELDS,
        }
    }
}

impl std::fmt::Display for SheetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One canonical field and the headers accepted for it
#[derive(Debug)]
pub struct FieldSpec {
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub required: bool,
}

const fn field(
    canonical: &'static str,
    aliases: &'static [&'static str],
    required: bool,
) -> FieldSpec {
    FieldSpec {
        canonical,
        aliases,
        required,
    }
}

static OWNERS_FIELDS: [FieldSpec; 3] = [
    field("ownerid", &["owner_id"], true),
    field("name", &["owner", "owner_name"], true),
    field("shareheld", &["share", "share_held", "shares"], true),
];

static RENTS_FIELDS: [FieldSpec; 5] = [
    field("month", &[], true),
    field("unitid", &["unit_id", "unit"], true),
    field("tenantname", &["tenant", "tenant_name"], true),
    field("effectiverent", &["effective_rent"], true),
    field("paidamount", &["paid", "paid_amount"], true),
];

static EXPENSES_FIELDS: [FieldSpec; 5] = [
    field("month", &[], true),
    field("description", &["desc"], true),
    field("amount", &["value"], true),
    field("ownerspecific", &["owner_specific", "owner_specific_flag"], true),
    field("chargedowner", &["charged_owner", "ownerid", "owner_id"], true),
];

static ALLOWANCE_FIELDS: [FieldSpec; 3] = [
    field("month", &[], true),
    field("ownerid", &["owner_id"], true),
    field("allowancevalue", &["allowance_value", "value"], true),
];

/// Outcome of importing one sheet
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub sheet: SheetKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Months replaced, empty for the owners sheet
    pub months: Vec<Month>,
    pub deleted: usize,
    pub inserted: usize,
}

impl ImportSummary {
    fn skipped(sheet: SheetKind) -> Self {
        Self {
            sheet,
            source: None,
            months: Vec::new(),
            deleted: 0,
            inserted: 0,
        }
    }
}

/// A validated row ready to be written
#[derive(Debug, Clone, PartialEq)]
enum SheetRow {
    Owner(Owner),
    Rent(RentRecord),
    Expense(Expense),
    Allowance(OwnerAllowance),
}

impl SheetRow {
    fn month(&self) -> Option<Month> {
        match self {
            Self::Owner(_) => None,
            Self::Rent(r) => Some(r.month),
            Self::Expense(e) => Some(e.month),
            Self::Allowance(a) => Some(a.month),
        }
    }
}

/// Service for importing workbook sheets
pub struct ImportService<'a> {
    storage: &'a Storage,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Import one CSV file
    ///
    /// When `kind` is `None` the sheet is inferred from the file name. For
    /// monthly sheets `month` overrides whatever month the file carries.
    pub fn import_file(
        &self,
        path: &Path,
        kind: Option<SheetKind>,
        month: Option<Month>,
    ) -> LedgerResult<ImportSummary> {
        let kind = match kind {
            Some(k) => k,
            None => path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(SheetKind::parse)
                .ok_or_else(|| {
                    LedgerError::Validation(format!(
                        "Cannot tell which sheet {} holds; pass --sheet",
                        path.display()
                    ))
                })?,
        };

        let file = std::fs::File::open(path).map_err(|e| {
            LedgerError::Io(format!("Failed to open {}: {}", path.display(), e))
        })?;
        self.import_reader(file, kind, month, Some(path.display().to_string()))
    }

    /// Import every recognised sheet found in a directory, in sheet order
    ///
    /// Sheets with no matching file are reported with zero counts.
    pub fn import_directory(
        &self,
        dir: &Path,
        month: Option<Month>,
    ) -> LedgerResult<Vec<ImportSummary>> {
        let mut files: HashMap<SheetKind, std::path::PathBuf> = HashMap::new();
        for entry in std::fs::read_dir(dir)
            .map_err(|e| LedgerError::Io(format!("Failed to read {}: {}", dir.display(), e)))?
        {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("csv"))
                .unwrap_or(false);
            if !is_csv {
                continue;
            }
            let kind = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(SheetKind::parse);
            if let Some(kind) = kind {
                files.entry(kind).or_insert(path);
            }
        }

        SheetKind::ALL
            .iter()
            .map(|kind| match files.get(kind) {
                Some(path) => self.import_file(path, Some(*kind), month),
                None => {
                    debug!(sheet = %kind, "sheet not present, skipping");
                    Ok(ImportSummary::skipped(*kind))
                }
            })
            .collect()
    }

    /// Import a sheet from any CSV source
    pub fn import_reader<R: Read>(
        &self,
        reader: R,
        kind: SheetKind,
        month: Option<Month>,
        source: Option<String>,
    ) -> LedgerResult<ImportSummary> {
        let month = month.filter(|_| kind.is_monthly());
        let rows = parse_sheet(reader, kind, month)?;

        let summary = self.storage.in_transaction(|tx| {
            let mut months: BTreeSet<Month> = BTreeSet::new();
            let mut deleted = 0;

            if kind.is_monthly() {
                months.extend(rows.iter().filter_map(SheetRow::month));
                // An explicit month is cleared even if the sheet is empty
                months.extend(month);
                for m in &months {
                    deleted += match kind {
                        SheetKind::UnitsRents => RentRepository::new(tx).delete_month(m)?,
                        SheetKind::Expenses => ExpenseRepository::new(tx).delete_month(m)?,
                        SheetKind::OwnerAllowance => AllowanceRepository::new(tx).delete_month(m)?,
                        SheetKind::OwnersShares => 0,
                    };
                }
            } else {
                deleted = OwnerRepository::new(tx).delete_all()?;
            }

            for row in &rows {
                match row {
                    SheetRow::Owner(o) => OwnerRepository::new(tx).insert(o)?,
                    SheetRow::Rent(r) => RentRepository::new(tx).insert(r)?,
                    SheetRow::Expense(e) => ExpenseRepository::new(tx).insert(e)?,
                    SheetRow::Allowance(a) => AllowanceRepository::new(tx).insert(a)?,
                }
            }

            Ok(ImportSummary {
                sheet: kind,
                source: source.clone(),
                months: months.into_iter().collect(),
                deleted,
                inserted: rows.len(),
            })
        })?;

        self.warn_unknown_owners(&rows)?;
        info!(
            sheet = %kind,
            inserted = summary.inserted,
            deleted = summary.deleted,
            months = summary.months.len(),
            "sheet imported"
        );
        self.storage
            .log_committed(&AuditEntry::import(kind.name(), source, &summary));

        Ok(summary)
    }

    fn warn_unknown_owners(&self, rows: &[SheetRow]) -> LedgerResult<()> {
        let known: HashSet<OwnerId> = self
            .storage
            .owners()
            .get_all()?
            .into_iter()
            .map(|o| o.id)
            .collect();
        if known.is_empty() {
            return Ok(());
        }
        for row in rows {
            let owner = match row {
                SheetRow::Expense(e) => e.charged_owner,
                SheetRow::Allowance(a) => Some(a.owner_id),
                _ => None,
            };
            if let Some(id) = owner.filter(|id| !known.contains(id)) {
                warn!(owner = %id, "row refers to an owner that is not on file");
            }
        }
        Ok(())
    }
}

/// Normalize a header: trim, lowercase, spaces and dashes to underscores
pub fn normalize_header(raw: &str) -> String {
    raw.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Map each canonical field to its column index
fn resolve_columns(
    kind: SheetKind,
    headers: &StringRecord,
    month_given: bool,
) -> Result<HashMap<&'static str, usize>, Vec<ImportIssue>> {
    let fields = kind.fields();
    let mut columns = HashMap::new();
    let mut issues = Vec::new();

    for (idx, raw) in headers.iter().enumerate() {
        let header = normalize_header(raw);
        if header.is_empty() {
            continue;
        }
        let matched = fields
            .iter()
            .find(|f| f.canonical == header)
            .or_else(|| fields.iter().find(|f| f.aliases.contains(&header.as_str())));

        match matched {
            Some(f) if columns.contains_key(f.canonical) => issues.push(ImportIssue {
                row: None,
                field: f.canonical.to_string(),
                message: format!("column '{}' maps to a field already present", raw.trim()),
            }),
            Some(f) => {
                columns.insert(f.canonical, idx);
            }
            None => issues.push(ImportIssue {
                row: None,
                field: header.clone(),
                message: format!("unknown column '{}'", raw.trim()),
            }),
        }
    }

    for f in fields.iter().filter(|f| f.required) {
        if f.canonical == "month" && month_given {
            continue;
        }
        if !columns.contains_key(f.canonical) {
            issues.push(ImportIssue {
                row: None,
                field: f.canonical.to_string(),
                message: "missing required column".to_string(),
            });
        }
    }

    if issues.is_empty() {
        Ok(columns)
    } else {
        Err(issues)
    }
}

fn parse_sheet<R: Read>(
    reader: R,
    kind: SheetKind,
    month: Option<Month>,
) -> LedgerResult<Vec<SheetRow>> {
    let mut csv = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv.headers()?.clone();
    let columns = resolve_columns(kind, &headers, month.is_some()).map_err(|issues| {
        LedgerError::Import {
            sheet: kind.name().to_string(),
            issues,
        }
    })?;

    let mut rows = Vec::new();
    let mut issues = Vec::new();
    let mut owner_ids = HashSet::new();

    for (idx, record) in csv.records().enumerate() {
        let record = record?;
        if record.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        let cells = Cells {
            record: &record,
            columns: &columns,
            row: idx + 1,
        };
        match parse_row(kind, &cells, month) {
            Ok(row) => {
                if let SheetRow::Owner(owner) = &row {
                    if !owner_ids.insert(owner.id) {
                        issues.push(cells.issue(
                            "ownerid",
                            format!("owner {} appears more than once", owner.id),
                        ));
                        continue;
                    }
                }
                rows.push(row);
            }
            Err(mut row_issues) => issues.append(&mut row_issues),
        }
    }

    if !issues.is_empty() {
        return Err(LedgerError::Import {
            sheet: kind.name().to_string(),
            issues,
        });
    }
    debug!(sheet = %kind, rows = rows.len(), "sheet parsed");
    Ok(rows)
}

/// Cell access for one data row
struct Cells<'r> {
    record: &'r StringRecord,
    columns: &'r HashMap<&'static str, usize>,
    row: usize,
}

impl Cells<'_> {
    fn text(&self, field: &str) -> &str {
        self.columns
            .get(field)
            .and_then(|idx| self.record.get(*idx))
            .map(str::trim)
            .unwrap_or("")
    }

    fn issue(&self, field: &str, message: impl Into<String>) -> ImportIssue {
        ImportIssue {
            row: Some(self.row),
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Blank cells read as zero
    fn number(&self, field: &str) -> Result<f64, ImportIssue> {
        let raw = self.text(field);
        if raw.is_empty() {
            return Ok(0.0);
        }
        Money::parse(raw)
            .map(|m| m.value())
            .map_err(|_| self.issue(field, format!("'{}' is not a number", raw)))
    }

    /// Whole-number ids, accepting spreadsheet floats like `3.0`
    fn owner_id(&self, field: &str) -> Result<Option<OwnerId>, ImportIssue> {
        let raw = self.text(field);
        if raw.is_empty() {
            return Ok(None);
        }
        let invalid = || self.issue(field, format!("'{}' is not an owner id", raw));
        let value = match raw.parse::<i64>() {
            Ok(v) => v,
            Err(_) => {
                let f: f64 = raw.parse().map_err(|_| invalid())?;
                if f.fract() != 0.0 || !f.is_finite() {
                    return Err(invalid());
                }
                f as i64
            }
        };
        Ok(Some(OwnerId::new(value)))
    }

    fn flag(&self, field: &str) -> Result<bool, ImportIssue> {
        let raw = self.text(field).to_lowercase();
        match raw.as_str() {
            "1" | "1.0" | "y" | "yes" | "true" | "t" => Ok(true),
            "" | "0" | "0.0" | "n" | "no" | "false" | "f" => Ok(false),
            _ => Err(self.issue(field, format!("'{}' is not a yes/no value", raw))),
        }
    }

    fn month(&self, given: Option<Month>) -> Result<Month, ImportIssue> {
        if let Some(m) = given {
            return Ok(m);
        }
        let raw = self.text("month");
        Month::parse(raw).map_err(|e| self.issue("month", format!("'{}': {}", raw, e)))
    }
}

/// Keep a cell value, or record why it was rejected
fn take<T>(issues: &mut Vec<ImportIssue>, result: Result<T, ImportIssue>) -> Option<T> {
    result.map_err(|e| issues.push(e)).ok()
}

fn parse_row(
    kind: SheetKind,
    cells: &Cells<'_>,
    month: Option<Month>,
) -> Result<SheetRow, Vec<ImportIssue>> {
    let mut issues = Vec::new();

    let row = match kind {
        SheetKind::OwnersShares => {
            let id = take(&mut issues, cells.owner_id("ownerid"));
            let share = take(&mut issues, cells.number("shareheld"));
            let name = cells.text("name").to_string();
            match (id, share) {
                (Some(Some(id)), Some(share)) => {
                    let owner = Owner::new(id, name, share);
                    match owner.validate() {
                        Ok(()) => Some(SheetRow::Owner(owner)),
                        Err(e) => {
                            let field = match e {
                                OwnerValidationError::EmptyName => "name",
                                _ => "shareheld",
                            };
                            issues.push(cells.issue(field, e.to_string()));
                            None
                        }
                    }
                }
                (Some(None), _) => {
                    issues.push(cells.issue("ownerid", "owner id is required"));
                    None
                }
                _ => None,
            }
        }
        SheetKind::UnitsRents => {
            let m = take(&mut issues, cells.month(month));
            let effective = take(&mut issues, cells.number("effectiverent"));
            let paid = take(&mut issues, cells.number("paidamount"));
            let unit = cells.text("unitid");
            if unit.is_empty() {
                issues.push(cells.issue("unitid", "unit id is required"));
            }
            match (m, effective, paid) {
                (Some(m), Some(effective), Some(paid)) if !unit.is_empty() => Some(SheetRow::Rent(
                    RentRecord::new(m, unit, cells.text("tenantname"), effective, paid),
                )),
                _ => None,
            }
        }
        SheetKind::Expenses => {
            let m = take(&mut issues, cells.month(month));
            let amount = take(&mut issues, cells.number("amount"));
            let specific = take(&mut issues, cells.flag("ownerspecific"));
            let charged = take(&mut issues, cells.owner_id("chargedowner"));
            match (m, amount, specific, charged) {
                (Some(_), Some(_), Some(true), Some(None)) => {
                    issues.push(cells.issue(
                        "chargedowner",
                        "owner-specific expense must name the charged owner",
                    ));
                    None
                }
                (Some(m), Some(amount), Some(specific), Some(charged)) => {
                    Some(SheetRow::Expense(Expense {
                        month: m,
                        description: cells.text("description").to_string(),
                        amount,
                        owner_specific: specific,
                        charged_owner: if specific { charged } else { None },
                    }))
                }
                _ => None,
            }
        }
        SheetKind::OwnerAllowance => {
            let m = take(&mut issues, cells.month(month));
            let owner = take(&mut issues, cells.owner_id("ownerid"));
            let value = take(&mut issues, cells.number("allowancevalue"));
            match (m, owner, value) {
                (Some(m), Some(Some(owner)), Some(value)) => {
                    Some(SheetRow::Allowance(OwnerAllowance::new(m, owner, value)))
                }
                (_, Some(None), _) => {
                    issues.push(cells.issue("ownerid", "owner id is required"));
                    None
                }
                _ => None,
            }
        }
    };

    match row {
        Some(row) if issues.is_empty() => Ok(row),
        _ => Err(issues),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditLogger;
    use tempfile::TempDir;

    fn month(s: &str) -> Month {
        Month::parse(s).unwrap()
    }

    fn import(
        storage: &Storage,
        kind: SheetKind,
        m: Option<Month>,
        csv: &str,
    ) -> LedgerResult<ImportSummary> {
        ImportService::new(storage).import_reader(csv.as_bytes(), kind, m, None)
    }

    fn issues_of(err: LedgerError) -> Vec<ImportIssue> {
        match err {
            LedgerError::Import { issues, .. } => issues,
            other => panic!("expected import error, got {:?}", other),
        }
    }

    #[test]
    fn test_sheet_kind_parse() {
        assert_eq!(SheetKind::parse("Owners Shares"), Some(SheetKind::OwnersShares));
        assert_eq!(SheetKind::parse("units-rents"), Some(SheetKind::UnitsRents));
        assert_eq!(SheetKind::parse("bills"), None);
        assert_eq!(normalize_header("  Tenant Name "), "tenant_name");
    }

    #[test]
    fn test_owners_sheet_replaces_table() {
        let storage = Storage::open_in_memory().unwrap();
        storage.owners().insert(&Owner::new(OwnerId::new(9), "Old", 1.0)).unwrap();

        let summary = import(
            &storage,
            SheetKind::OwnersShares,
            None,
            "Owner ID,Owner Name,Share Held\n1,Amal,60\n2,Karim,40\n",
        )
        .unwrap();

        assert_eq!(summary.deleted, 1);
        assert_eq!(summary.inserted, 2);
        assert!(summary.months.is_empty());
        let owners = storage.owners().get_all().unwrap();
        assert_eq!(owners.len(), 2);
        assert_eq!(owners[1].name, "Karim");
    }

    #[test]
    fn test_audit_failure_keeps_imported_rows() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::open_in_memory()
            .unwrap()
            .with_audit_log(AuditLogger::new(temp_dir.path().join("missing").join("audit.log")));

        let summary = import(
            &storage,
            SheetKind::OwnersShares,
            None,
            "Owner ID,Owner Name,Share Held\n1,Amal,60\n",
        )
        .unwrap();

        assert_eq!(summary.inserted, 1);
        assert_eq!(storage.owners().get_all().unwrap().len(), 1);
    }

    #[test]
    fn test_rents_month_override_and_overwrite() {
        let storage = Storage::open_in_memory().unwrap();
        let jan = month("2024-01");
        let csv = "month,unit,tenant,effective_rent,paid\n\
                   2023-06,A1,Hana,\"6,000\",6000\n\
                   2023-06,A2,Omar,4000,\n";

        let first = import(&storage, SheetKind::UnitsRents, Some(jan), csv).unwrap();
        assert_eq!(first.months, vec![jan]);
        assert_eq!(first.inserted, 2);

        let second = import(&storage, SheetKind::UnitsRents, Some(jan), csv).unwrap();
        assert_eq!(second.deleted, 2);

        let rents = storage.rents();
        assert_eq!(rents.sum_effective_rent(&jan).unwrap(), 10000.0);
        assert_eq!(rents.sum_paid(&jan).unwrap(), 6000.0);
        assert!(!rents.has_month(&month("2023-06")).unwrap());
    }

    #[test]
    fn test_expenses_flags_and_owner() {
        let storage = Storage::open_in_memory().unwrap();
        let jan = month("2024-01");
        let csv = "Month,Description,Amount,Owner Specific,Charged Owner\n\
                   2024-01,Elevator,1500,no,\n\
                   2024-01,Plumbing,500,Yes,1.0\n";

        import(&storage, SheetKind::Expenses, None, csv).unwrap();

        let expenses = storage.expenses();
        assert_eq!(expenses.sum_all(&jan).unwrap(), 2000.0);
        assert_eq!(expenses.sum_charged_to(&jan, OwnerId::new(1)).unwrap(), 500.0);
        let rows = expenses.find_by_month(&jan).unwrap();
        assert_eq!(rows[0].charged_owner, None);
    }

    #[test]
    fn test_unknown_and_missing_columns_are_reported_together() {
        let storage = Storage::open_in_memory().unwrap();
        let err = import(
            &storage,
            SheetKind::OwnerAllowance,
            Some(month("2024-01")),
            "owner_id,bonus\n1,100\n",
        )
        .unwrap_err();

        let issues = issues_of(err);
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|i| i.message.contains("unknown column 'bonus'")));
        assert!(issues
            .iter()
            .any(|i| i.field == "allowancevalue" && i.row.is_none()));
    }

    #[test]
    fn test_row_errors_abort_whole_sheet() {
        let storage = Storage::open_in_memory().unwrap();
        let csv = "month,ownerid,value\n2024-01,1,100\n2024-13,2,abc\n";

        let issues = issues_of(import(&storage, SheetKind::OwnerAllowance, None, csv).unwrap_err());
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.row == Some(2)));
        assert!(storage
            .allowances()
            .find_by_month(&month("2024-01"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_owner_specific_expense_needs_owner() {
        let storage = Storage::open_in_memory().unwrap();
        let csv = "month,description,amount,ownerspecific,chargedowner\n2024-01,Paint,80,t,\n";

        let issues = issues_of(import(&storage, SheetKind::Expenses, None, csv).unwrap_err());
        assert_eq!(issues[0].field, "chargedowner");
    }

    #[test]
    fn test_duplicate_owner_ids_rejected() {
        let storage = Storage::open_in_memory().unwrap();
        let csv = "ownerid,name,shareheld\n1,Amal,60\n1,Karim,40\n";

        let issues = issues_of(import(&storage, SheetKind::OwnersShares, None, csv).unwrap_err());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].row, Some(2));
    }

    #[test]
    fn test_import_directory() {
        let storage = Storage::open_in_memory().unwrap();
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("Owners_Shares.csv"),
            "ownerid,name,shareheld\n1,Amal,60\n2,Karim,40\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("units_rents.csv"),
            "unitid,tenantname,effectiverent,paidamount\nA1,Hana,10000,9000\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let jan = month("2024-01");
        let summaries = ImportService::new(&storage)
            .import_directory(dir.path(), Some(jan))
            .unwrap();

        assert_eq!(summaries.len(), 4);
        assert_eq!(summaries[0].inserted, 2);
        assert_eq!(summaries[1].inserted, 1);
        assert_eq!(summaries[2].inserted, 0);
        assert_eq!(storage.rents().sum_paid(&jan).unwrap(), 9000.0);
    }
}

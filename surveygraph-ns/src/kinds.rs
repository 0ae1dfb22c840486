//! Validation report kind codes
//!
//! Every entry in a validation report carries one of these codes. They are
//! stable strings so that serialized reports can be compared across runs and
//! filtered by consumers.
//!
//! Codes follow the tabular validation vocabulary: lower-case, hyphenated,
//! ending in `-error`.

// =============================================================================
// Structural errors (header and cell layout)
// =============================================================================

/// A header cell is blank
pub const BLANK_HEADER: &str = "blank-header";

/// Two header cells share a name
pub const DUPLICATE_LABEL: &str = "duplicate-label";

/// A row has more cells than the header
pub const EXTRA_CELL: &str = "extra-cell";

/// A row has fewer cells than the header
pub const MISSING_CELL: &str = "missing-cell";

/// The file's columns do not line up with the template schema
pub const SCHEMA_ERROR: &str = "schema-error";

/// The byte stream could not be parsed as delimited text
pub const SOURCE_ERROR: &str = "source-error";

// =============================================================================
// Cell errors (per field)
// =============================================================================

/// A cell could not be coerced to the field's type
pub const TYPE_ERROR: &str = "type-error";

/// A cell violates a field constraint (required, enum, pattern, range)
pub const CONSTRAINT_ERROR: &str = "constraint-error";

/// A per-field `unique` constraint was violated
pub const UNIQUE_ERROR: &str = "unique-error";

/// The schema primary key repeats
pub const PRIMARY_KEY: &str = "primary-key";

// =============================================================================
// Check errors (custom row and table checks)
// =============================================================================

/// A custom row check rejected the row
pub const ROW_CONSTRAINT: &str = "row-constraint";

/// A custom table check rejected a combination of rows
pub const TABLE_CONSTRAINT: &str = "table-constraint";

/// A check could not start because its configuration does not fit the schema
pub const CHECK_ERROR: &str = "check-error";

/// The report was truncated at the configured error limit
pub const ERROR_LIMIT: &str = "error-limit";

/// All report kinds, in declaration order
pub const ALL: &[&str] = &[
    BLANK_HEADER,
    DUPLICATE_LABEL,
    EXTRA_CELL,
    MISSING_CELL,
    SCHEMA_ERROR,
    SOURCE_ERROR,
    TYPE_ERROR,
    CONSTRAINT_ERROR,
    UNIQUE_ERROR,
    PRIMARY_KEY,
    ROW_CONSTRAINT,
    TABLE_CONSTRAINT,
    CHECK_ERROR,
    ERROR_LIMIT,
];

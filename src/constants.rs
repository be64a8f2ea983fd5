/// Logical column names the sheet must provide.
/// These are matched against the actual headers ignoring case and surrounding whitespace.

pub const CATEGORY: &str = "Category";
pub const QUESTION: &str = "Question";
pub const RESPONSIBLE_TEAM: &str = "Responsible Team";
pub const ISSUE_FINDING_DATE: &str = "Issue Finding Date";
pub const ISSUE_CLOSED_DATE: &str = "Issue Closed Date";
pub const REOPEN_DATES: &str = "Reopen Dates";
pub const STATUS: &str = "Status";
pub const REOPEN_COUNT: &str = "Reopen Count";
pub const ACCUMULATED_POINTS: &str = "Accumulated Points";

/// Required schema, in the order missing columns are reported
pub const REQUIRED_COLUMNS: [&str; 9] = [
    CATEGORY,
    QUESTION,
    RESPONSIBLE_TEAM,
    ISSUE_FINDING_DATE,
    ISSUE_CLOSED_DATE,
    REOPEN_DATES,
    STATUS,
    REOPEN_COUNT,
    ACCUMULATED_POINTS,
];

/// Human row numbers are 1-based and the header occupies the first sheet row,
/// so data row `i` (0-based) is reported as `i + HEADER_ROW_OFFSET`.
pub const HEADER_ROW_OFFSET: usize = 2;

/// Placeholder used for absent values in rendered views
pub const NOT_APPLICABLE: &str = "N/A";

// Status literals as they appear in spreadsheets
pub const STATUS_OPEN: &str = "Open";
pub const STATUS_CLOSED_TIMELY: &str = "Closed - Timely";
pub const STATUS_CLOSED_LATE: &str = "Closed - Late";
pub const STATUS_REOPENED: &str = "Re-Opened";
// Alternate spelling accepted on input only
pub const STATUS_REOPENED_ALT: &str = "Reopened";

/// Default config file name looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "armp.toml";
/// Environment variable that overrides the config path
pub const CONFIG_ENV_VAR: &str = "ARMP_CONFIG";

//! Declared spreadsheet layout for the ledger tabs.

use super::errors::{LedgerError, LedgerResult};
use std::{collections::HashSet, env};

/// Named columns of the pools tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolsField {
    OwnerId,
    Name,
    CurrentPool,
    StartingPool,
}

/// Named columns of the change-log tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangesField {
    Timestamp,
    Player,
    Operation,
    Value,
}

/// Field-to-column mapping for both ledger tabs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSchema {
    pub pools_tab: String,
    /// First 1-based row holding player data
    pub pools_first_row: u32,
    pub owner_id_column: String,
    pub name_column: String,
    pub current_pool_column: String,
    pub starting_pool_column: String,

    pub changes_tab: String,
    /// First 1-based row holding change records
    pub changes_first_row: u32,
    pub timestamp_column: String,
    pub player_column: String,
    pub operation_column: String,
    pub value_column: String,
}

/// Inclusive range of zero-based column indices covering a tab's fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpan {
    pub first: u32,
    pub last: u32,
}

impl ColumnSpan {
    /// Number of columns in the span
    pub fn width(&self) -> usize {
        (self.last - self.first + 1) as usize
    }

    /// Offset of `column` inside a row read over this span
    pub fn offset(&self, column: u32) -> usize {
        (column - self.first) as usize
    }
}

impl Default for LedgerSchema {
    fn default() -> Self {
        Self {
            pools_tab: "Pools".to_string(),
            pools_first_row: 7,
            owner_id_column: "C".to_string(),
            name_column: "D".to_string(),
            current_pool_column: "G".to_string(),
            starting_pool_column: "H".to_string(),
            changes_tab: "Pool Changes".to_string(),
            changes_first_row: 2,
            timestamp_column: "A".to_string(),
            player_column: "B".to_string(),
            operation_column: "C".to_string(),
            value_column: "D".to_string(),
        }
    }
}

impl LedgerSchema {
    /// Create a schema from environment overrides on top of the league layout
    ///
    /// Recognised variables: `POOLS_TAB`, `POOLS_FIRST_ROW`, `POOLS_COL_ID`,
    /// `POOLS_COL_NAME`, `POOLS_COL_CURRENT`, `POOLS_COL_STARTING`,
    /// `CHANGES_TAB`, `CHANGES_FIRST_ROW`, `CHANGES_COL_TIMESTAMP`,
    /// `CHANGES_COL_PLAYER`, `CHANGES_COL_OPERATION`, `CHANGES_COL_VALUE`.
    /// The result is not validated.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let text = |key: &str, default: String| env::var(key).unwrap_or(default);
        let number = |key: &str, default: u32| {
            env::var(key)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        };

        Self {
            pools_tab: text("POOLS_TAB", defaults.pools_tab),
            pools_first_row: number("POOLS_FIRST_ROW", defaults.pools_first_row),
            owner_id_column: text("POOLS_COL_ID", defaults.owner_id_column),
            name_column: text("POOLS_COL_NAME", defaults.name_column),
            current_pool_column: text("POOLS_COL_CURRENT", defaults.current_pool_column),
            starting_pool_column: text("POOLS_COL_STARTING", defaults.starting_pool_column),
            changes_tab: text("CHANGES_TAB", defaults.changes_tab),
            changes_first_row: number("CHANGES_FIRST_ROW", defaults.changes_first_row),
            timestamp_column: text("CHANGES_COL_TIMESTAMP", defaults.timestamp_column),
            player_column: text("CHANGES_COL_PLAYER", defaults.player_column),
            operation_column: text("CHANGES_COL_OPERATION", defaults.operation_column),
            value_column: text("CHANGES_COL_VALUE", defaults.value_column),
        }
    }

    /// Check that every column is well-formed and distinct within its tab
    ///
    /// # Errors
    ///
    /// * `LedgerError::Schema` - Describes the first problem found
    pub fn validate(&self) -> LedgerResult<()> {
        for (tab, first_row) in [
            (&self.pools_tab, self.pools_first_row),
            (&self.changes_tab, self.changes_first_row),
        ] {
            if tab.trim().is_empty() {
                return Err(LedgerError::Schema("tab names must not be empty".to_string()));
            }
            if first_row == 0 {
                return Err(LedgerError::Schema(format!(
                    "first data row of {tab:?} must be at least 1"
                )));
            }
        }
        if self.pools_tab == self.changes_tab {
            return Err(LedgerError::Schema(
                "pools and change-log tabs must differ".to_string(),
            ));
        }

        self.pools_span()?;
        self.changes_span()?;
        Ok(())
    }

    /// Column letters of a pools field
    pub fn pools_column(&self, field: PoolsField) -> &str {
        match field {
            PoolsField::OwnerId => &self.owner_id_column,
            PoolsField::Name => &self.name_column,
            PoolsField::CurrentPool => &self.current_pool_column,
            PoolsField::StartingPool => &self.starting_pool_column,
        }
    }

    /// Column letters of a change-log field
    pub fn changes_column(&self, field: ChangesField) -> &str {
        match field {
            ChangesField::Timestamp => &self.timestamp_column,
            ChangesField::Player => &self.player_column,
            ChangesField::Operation => &self.operation_column,
            ChangesField::Value => &self.value_column,
        }
    }

    /// Zero-based column index of a pools field
    pub fn pools_index(&self, field: PoolsField) -> LedgerResult<u32> {
        parse_column(self.pools_column(field))
    }

    /// Zero-based column index of a change-log field
    pub fn changes_index(&self, field: ChangesField) -> LedgerResult<u32> {
        parse_column(self.changes_column(field))
    }

    /// Columns spanned by the pools fields
    pub fn pools_span(&self) -> LedgerResult<ColumnSpan> {
        span(
            &self.pools_tab,
            [
                PoolsField::OwnerId,
                PoolsField::Name,
                PoolsField::CurrentPool,
                PoolsField::StartingPool,
            ]
            .map(|field| self.pools_column(field)),
        )
    }

    /// Columns spanned by the change-log fields
    pub fn changes_span(&self) -> LedgerResult<ColumnSpan> {
        span(
            &self.changes_tab,
            [
                ChangesField::Timestamp,
                ChangesField::Player,
                ChangesField::Operation,
                ChangesField::Value,
            ]
            .map(|field| self.changes_column(field)),
        )
    }

    /// A1 range covering all player rows, e.g. `Pools!C7:H`
    pub fn pools_read_range(&self) -> LedgerResult<String> {
        let span = self.pools_span()?;
        Ok(format!(
            "{}!{}{}:{}",
            quote_tab(&self.pools_tab),
            column_letters(span.first),
            self.pools_first_row,
            column_letters(span.last)
        ))
    }

    /// A1 range covering all change records, e.g. `'Pool Changes'!A2:D`
    pub fn changes_read_range(&self) -> LedgerResult<String> {
        let span = self.changes_span()?;
        Ok(format!(
            "{}!{}{}:{}",
            quote_tab(&self.changes_tab),
            column_letters(span.first),
            self.changes_first_row,
            column_letters(span.last)
        ))
    }

    /// A1 range used to append change records, e.g. `'Pool Changes'!A:D`
    pub fn changes_append_range(&self) -> LedgerResult<String> {
        let span = self.changes_span()?;
        Ok(format!(
            "{}!{}:{}",
            quote_tab(&self.changes_tab),
            column_letters(span.first),
            column_letters(span.last)
        ))
    }

    /// A1 reference of one pools cell, e.g. `Pools!G12`
    pub fn pools_cell(&self, field: PoolsField, row: u32) -> String {
        format!(
            "{}!{}{}",
            quote_tab(&self.pools_tab),
            self.pools_column(field).trim().to_uppercase(),
            row
        )
    }
}

/// Zero-based index of column letters (`A` = 0, `AA` = 26)
pub fn column_index(letters: &str) -> Option<u32> {
    let letters = letters.trim();
    if letters.is_empty() || letters.len() > 3 {
        return None;
    }
    letters.chars().try_fold(0u32, |acc, c| {
        c.is_ascii_alphabetic()
            .then(|| acc * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1))
    })
    .map(|n| n - 1)
}

/// Column letters of a zero-based index
pub fn column_letters(index: u32) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn parse_column(letters: &str) -> LedgerResult<u32> {
    column_index(letters)
        .ok_or_else(|| LedgerError::Schema(format!("invalid column {letters:?}")))
}

fn span(tab: &str, columns: [&str; 4]) -> LedgerResult<ColumnSpan> {
    let mut seen = HashSet::new();
    let mut indices = Vec::with_capacity(columns.len());
    for column in columns {
        let index = parse_column(column)?;
        if !seen.insert(index) {
            return Err(LedgerError::Schema(format!(
                "column {} is mapped twice in {tab:?}",
                column_letters(index)
            )));
        }
        indices.push(index);
    }

    Ok(ColumnSpan {
        first: indices.iter().copied().min().unwrap_or(0),
        last: indices.iter().copied().max().unwrap_or(0),
    })
}

fn quote_tab(tab: &str) -> String {
    if tab.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        tab.to_string()
    } else {
        format!("'{}'", tab.replace('\'', "''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_column_index() {
        assert_eq!(column_index("A"), Some(0));
        assert_eq!(column_index("h"), Some(7));
        assert_eq!(column_index("Z"), Some(25));
        assert_eq!(column_index("AA"), Some(26));
        assert_eq!(column_index(""), None);
        assert_eq!(column_index("A1"), None);
    }

    #[test]
    fn test_column_letters_inverse() {
        for index in [0, 7, 25, 26, 51, 52, 701, 702] {
            assert_eq!(column_index(&column_letters(index)), Some(index));
        }
        assert_eq!(column_letters(26), "AA");
    }

    #[test]
    fn test_default_schema_is_valid() {
        let schema = LedgerSchema::default();
        schema.validate().unwrap();
        assert_eq!(schema.pools_read_range().unwrap(), "Pools!C7:H");
        assert_eq!(
            schema.changes_read_range().unwrap(),
            "'Pool Changes'!A2:D"
        );
        assert_eq!(
            schema.changes_append_range().unwrap(),
            "'Pool Changes'!A:D"
        );
        assert_eq!(schema.pools_cell(PoolsField::CurrentPool, 12), "Pools!G12");
    }

    #[test]
    fn test_span_offsets() {
        let span = LedgerSchema::default().pools_span().unwrap();
        assert_eq!(span, ColumnSpan { first: 2, last: 7 });
        assert_eq!(span.width(), 6);
        assert_eq!(span.offset(6), 4);
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let schema = LedgerSchema {
            name_column: "C".to_string(),
            ..Default::default()
        };
        let err = schema.validate().unwrap_err();
        assert!(err.to_string().contains("mapped twice"));
    }

    #[test]
    fn test_bad_column_rejected() {
        let schema = LedgerSchema {
            value_column: "4".to_string(),
            ..Default::default()
        };
        assert!(matches!(schema.validate(), Err(LedgerError::Schema(_))));
    }

    #[test]
    fn test_zero_first_row_rejected() {
        let schema = LedgerSchema {
            changes_first_row: 0,
            ..Default::default()
        };
        assert!(schema.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides_change_log_columns() {
        // SAFETY: serialised with every other test touching the environment
        unsafe {
            env::set_var("CHANGES_COL_TIMESTAMP", "B");
            env::set_var("CHANGES_COL_PLAYER", "C");
            env::set_var("CHANGES_COL_OPERATION", "D");
            env::set_var("CHANGES_COL_VALUE", "E");
            env::set_var("POOLS_COL_ID", "A");
        }
        let schema = LedgerSchema::from_env();
        unsafe {
            for key in [
                "CHANGES_COL_TIMESTAMP",
                "CHANGES_COL_PLAYER",
                "CHANGES_COL_OPERATION",
                "CHANGES_COL_VALUE",
                "POOLS_COL_ID",
            ] {
                env::remove_var(key);
            }
        }

        schema.validate().unwrap();
        assert_eq!(schema.changes_column(ChangesField::Value), "E");
        assert_eq!(schema.owner_id_column, "A");
        assert_eq!(
            schema.changes_read_range().unwrap(),
            "'Pool Changes'!B2:E"
        );
    }
}

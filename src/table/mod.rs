// src/table/mod.rs
pub mod fields;

pub use fields::{is_boolean_field, to_boolean, BOOLEAN_FIELDS};

use crate::dsv::{Record, Table, Value};

/// In-memory rows behind one table view: search, selection and local
/// edits. Rows are replaced wholesale on every load.
#[derive(Debug, Clone, Default)]
pub struct TableState {
    records: Table,
    key_field: String,
    selected: Option<Value>,
    limit: Option<usize>,
}

impl TableState {
    /// `key_field` identifies a row for selection and upserts.
    pub fn new(key_field: impl Into<String>) -> Self {
        Self {
            key_field: key_field.into(),
            ..Default::default()
        }
    }

    /// Cap the number of rows `filtered` returns.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Swap in a freshly parsed table; `None` ("no data") clears.
    pub fn replace(&mut self, table: Option<Table>) {
        self.records = table.unwrap_or_default();
    }

    /// Rows containing `search` (case-insensitive) in any field.
    pub fn filtered(&self, search: &str) -> Vec<&Record> {
        let needle = search.trim().to_lowercase();
        self.apply_limit(self.records.iter().filter(|r| matches(r, &needle)))
    }

    /// `filtered`, restricted to rows whose `field` equals `value`.
    pub fn filtered_where(&self, search: &str, field: &str, value: &Value) -> Vec<&Record> {
        let needle = search.trim().to_lowercase();
        self.apply_limit(
            self.records
                .iter()
                .filter(|r| r.get(field) == Some(value))
                .filter(|r| matches(r, &needle)),
        )
    }

    fn apply_limit<'a>(&self, rows: impl Iterator<Item = &'a Record>) -> Vec<&'a Record> {
        match self.limit {
            Some(n) => rows.take(n).collect(),
            None => rows.collect(),
        }
    }

    pub fn selected(&self) -> Option<&Record> {
        let key = self.selected.as_ref()?;
        self.find(key)
    }

    /// Select `record`, or clear the selection if it is already selected.
    pub fn toggle_select(&mut self, record: &Record) -> Option<&Record> {
        let key = record.get(&self.key_field).cloned();
        if key.is_some() && key == self.selected {
            self.selected = None;
        } else {
            self.selected = key;
        }
        self.selected()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn find(&self, key: &Value) -> Option<&Record> {
        self.records
            .iter()
            .find(|r| r.get(&self.key_field) == Some(key))
    }

    /// Replace the row with the same key, or append. Rows without a key
    /// (not yet saved) are always appended.
    pub fn upsert(&mut self, record: Record) {
        let existing = record.get(&self.key_field).and_then(|key| {
            self.records
                .iter()
                .position(|r| r.get(&self.key_field) == Some(key))
        });
        match existing {
            Some(idx) => self.records[idx] = record,
            None => self.records.push(record),
        }
    }
}

fn matches(record: &Record, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    record
        .iter()
        .filter_map(|(_, v)| v)
        .any(|v| v.to_string().to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsv::parse_tsv;

    const USERS: &str = "id_user\temail\tfirst_name\tlast_name\taccount\tprofile\n\
                         1\tjohn@example.com\tJohn\tDoe\t1\tadmin\n\
                         2\tjane@example.com\tJane\tSmith\t1\texplorer\n\
                         3\tbob@other.org\tBob\tJohnson\t2\t";

    fn users() -> TableState {
        let mut t = TableState::new("id_user").with_limit(20);
        t.replace(parse_tsv(Some(USERS)));
        t
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let t = users();
        let hits = t.filtered("JOHN");
        assert_eq!(hits.len(), 2);
        assert!(hits[0]
            .get("first_name")
            .unwrap()
            .to_string()
            .to_lowercase()
            .contains("john"));
        assert!(t.filtered("aajxjanvlalsakjf").is_empty());
        assert_eq!(t.filtered("").len(), 3);
    }

    #[test]
    fn test_filter_matches_numbers() {
        let t = users();
        let hits = t.filtered("3");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].get("last_name"), Some(&Value::from("Johnson")));
    }

    #[test]
    fn test_filter_limit() {
        let mut text = String::from("id\tname");
        for i in 0..50 {
            text.push_str(&format!("\n{}\tuser{}", i, i));
        }
        let mut t = TableState::new("id").with_limit(20);
        t.replace(parse_tsv(Some(&text)));
        assert_eq!(t.len(), 50);
        assert_eq!(t.filtered("user").len(), 20);
        assert_eq!(TableState::new("id").filtered("").len(), 0);
    }

    #[test]
    fn test_filtered_where() {
        let t = users();
        let hits = t.filtered_where("", "account", &Value::Number(1.0));
        assert_eq!(hits.len(), 2);
        let hits = t.filtered_where("john", "account", &Value::Number(2.0));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].get("last_name"), Some(&Value::from("Johnson")));
    }

    #[test]
    fn test_toggle_select() {
        let mut t = users();
        let john = t.records()[0].clone();
        let jane = t.records()[1].clone();

        assert_eq!(t.toggle_select(&john), Some(&john));
        assert_eq!(t.toggle_select(&jane), Some(&jane));
        assert_eq!(t.toggle_select(&jane), None);
        assert!(t.selected().is_none());
    }

    #[test]
    fn test_upsert_updates_or_appends() {
        let mut t = TableState::new("id");
        t.upsert(Record::new().with("id", 1).with("company", "Old Co."));
        t.upsert(Record::new().with("id", 1).with("company", "Updated Co."));
        assert_eq!(t.len(), 1);
        assert_eq!(t.records()[0].get("company"), Some(&Value::from("Updated Co.")));

        t.upsert(Record::new().with("company", "New Co."));
        t.upsert(Record::new().with("company", "Newer Co."));
        assert_eq!(t.len(), 3);
        assert_eq!(
            t.records().last().unwrap().get("company"),
            Some(&Value::from("Newer Co."))
        );
    }

    #[test]
    fn test_replace_with_no_data_clears() {
        let mut t = users();
        assert_eq!(t.len(), 3);
        t.replace(None);
        assert!(t.is_empty());
    }
}

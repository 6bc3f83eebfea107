//! Table view pipeline: filter, stable sort, paginate.
//!
//! A deterministic pure transformation over a fixed in-memory recordset.
//! Any change to the search text or sort key resets to page 1; changing
//! only the page re-slices without re-filtering or re-sorting.

use serde::Serialize;
use std::cmp::Ordering;

/// Fixed page size of the table playground.
pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: String,
}

impl TableRow {
    fn field(&self, key: SortKey) -> &str {
        match key {
            SortKey::Id => "",
            SortKey::Name => &self.name,
            SortKey::Email => &self.email,
            SortKey::Role => &self.role,
            SortKey::Status => &self.status,
        }
    }

    fn contains(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.id.to_string().contains(&needle)
            || self.name.to_lowercase().contains(&needle)
            || self.email.to_lowercase().contains(&needle)
            || self.role.to_lowercase().contains(&needle)
            || self.status.to_lowercase().contains(&needle)
    }
}

/// The fixed 25-row recordset backing the table playground.
pub fn sample_rows() -> Vec<TableRow> {
    (0..25)
        .map(|i| TableRow {
            id: 1000 + i as i64,
            name: format!("Test User {}", i + 1),
            email: format!("tester{}@qa-sandbox.com", i + 1),
            role: if i % 3 == 0 {
                "Admin".to_string()
            } else if i % 2 == 0 {
                "QA".to_string()
            } else {
                "Dev".to_string()
            },
            status: if i % 5 == 0 {
                "Inactive".to_string()
            } else {
                "Active".to_string()
            },
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Id,
    Name,
    Email,
    Role,
    Status,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Id,
        SortKey::Name,
        SortKey::Email,
        SortKey::Role,
        SortKey::Status,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::Name => "name",
            SortKey::Email => "email",
            SortKey::Role => "role",
            SortKey::Status => "status",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Current table controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    pub search: String,
    pub sort_key: SortKey,
    pub direction: SortDirection,
    pub page: usize,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort_key: SortKey::Id,
            direction: SortDirection::Asc,
            page: 1,
        }
    }
}

impl TableState {
    /// Changing the search query always resets to page 1.
    pub fn set_search(&mut self, query: &str) {
        self.search = query.to_string();
        self.page = 1;
    }

    /// Reactivating the current column flips direction; switching columns
    /// resets to ascending. Either way the page resets to 1.
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort_key == key {
            self.direction = self.direction.flipped();
        } else {
            self.sort_key = key;
            self.direction = SortDirection::Asc;
        }
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }
}

/// The derived view handed to the renderer.
#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    pub rows: Vec<TableRow>,
    pub filtered_count: usize,
    pub total_count: usize,
    pub page: usize,
    pub total_pages: usize,
}

/// Run the full pipeline. The page is clamped into
/// `1 ..= max(1, ceil(filtered / PAGE_SIZE))`.
pub fn apply(rows: &[TableRow], state: &TableState) -> TableView {
    let mut filtered: Vec<TableRow> = if state.search.is_empty() {
        rows.to_vec()
    } else {
        rows.iter()
            .filter(|r| r.contains(&state.search))
            .cloned()
            .collect()
    };

    // Vec::sort_by is stable: ties keep input order.
    let key = state.sort_key;
    filtered.sort_by(|a, b| {
        let ord = match key {
            SortKey::Id => a.id.cmp(&b.id),
            _ => a.field(key).cmp(b.field(key)),
        };
        match state.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });

    let filtered_count = filtered.len();
    let total_pages = filtered_count.div_ceil(PAGE_SIZE).max(1);
    let page = state.page.clamp(1, total_pages);

    let start = (page - 1) * PAGE_SIZE;
    let page_rows = filtered
        .into_iter()
        .skip(start)
        .take(PAGE_SIZE)
        .collect::<Vec<_>>();

    TableView {
        rows: page_rows,
        filtered_count,
        total_count: rows.len(),
        page,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_returns_matching_subset() {
        let rows = sample_rows();
        let mut state = TableState::default();
        state.set_search("ADMIN");

        let view = apply(&rows, &state);
        assert!(view.filtered_count > 0);
        assert!(view.filtered_count < rows.len());
        for row in &view.rows {
            assert!(row.contains("admin"));
        }
    }

    #[test]
    fn empty_search_keeps_every_row() {
        let rows = sample_rows();
        let view = apply(&rows, &TableState::default());
        assert_eq!(view.filtered_count, 25);
        assert_eq!(view.total_pages, 3);
        assert_eq!(view.rows.len(), PAGE_SIZE);
        assert_eq!(view.rows[0].id, 1000);
    }

    #[test]
    fn same_column_toggles_direction_new_column_resets_ascending() {
        let mut state = TableState::default();
        state.toggle_sort(SortKey::Name);
        assert_eq!(state.sort_key, SortKey::Name);
        assert_eq!(state.direction, SortDirection::Asc);

        state.toggle_sort(SortKey::Name);
        assert_eq!(state.direction, SortDirection::Desc);

        state.toggle_sort(SortKey::Email);
        assert_eq!(state.sort_key, SortKey::Email);
        assert_eq!(state.direction, SortDirection::Asc);
    }

    #[test]
    fn toggling_twice_reverses_row_order() {
        let rows = sample_rows();
        let mut state = TableState::default();
        state.toggle_sort(SortKey::Role);
        let asc = apply(&rows, &state);
        state.toggle_sort(SortKey::Role);
        let desc = apply(&rows, &state);

        let first_asc = &asc.rows[0].role;
        let first_desc = &desc.rows[0].role;
        assert!(first_asc <= first_desc);
        assert_eq!(asc.filtered_count, desc.filtered_count);
    }

    #[test]
    fn ties_keep_input_order() {
        let rows = sample_rows();
        let mut state = TableState::default();
        state.toggle_sort(SortKey::Status);

        let view = apply(&rows, &state);
        let actives: Vec<i64> = view
            .rows
            .iter()
            .filter(|r| r.status == "Active")
            .map(|r| r.id)
            .collect();
        let mut sorted = actives.clone();
        sorted.sort_unstable();
        assert_eq!(actives, sorted);
    }

    #[test]
    fn search_and_sort_reset_page() {
        let mut state = TableState::default();
        state.set_page(3);
        state.set_search("tester1");
        assert_eq!(state.page, 1);

        state.set_page(2);
        state.toggle_sort(SortKey::Name);
        assert_eq!(state.page, 1);
    }

    #[test]
    fn page_is_clamped_to_valid_range() {
        let rows = sample_rows();
        let mut state = TableState::default();
        state.set_page(99);
        let view = apply(&rows, &state);
        assert_eq!(view.page, 3);
        assert_eq!(view.rows.len(), 5);

        state.set_search("no-such-user-anywhere");
        let view = apply(&rows, &state);
        assert_eq!(view.filtered_count, 0);
        assert_eq!(view.page, 1);
        assert_eq!(view.total_pages, 1);
        assert!(view.rows.is_empty());
    }

    #[test]
    fn page_change_only_reslices() {
        let rows = sample_rows();
        let mut state = TableState::default();
        let page1 = apply(&rows, &state);
        state.set_page(2);
        let page2 = apply(&rows, &state);

        assert_eq!(page1.filtered_count, page2.filtered_count);
        assert_ne!(page1.rows[0].id, page2.rows[0].id);
        assert_eq!(page2.rows[0].id, 1010);
    }
}

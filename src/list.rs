//! Search, category filtering, grouping and totals shared by the list views.
//!
//! Everything here derives a view of a collection without touching it; the
//! collection order is the display order unless a caller groups it.

use crate::model::{
    Appointment, Client, ClientDirectory, Conversation, FileCategory, Incident, Invoice,
    InvoiceStatus, Severity, StaffMember, StoredFile,
};
use crate::sink::{RecordSink, SinkError};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::iter::Sum;

/// A closed set of values a list can be narrowed to.
pub trait Category: Copy + PartialEq + Debug + 'static {
    const ALL: &'static [Self];
    fn label(&self) -> &'static str;
}

/// For lists that only support free-text search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoCategory {}

impl Category for NoCategory {
    const ALL: &'static [Self] = &[];

    fn label(&self) -> &'static str {
        match *self {}
    }
}

impl Category for InvoiceStatus {
    const ALL: &'static [Self] = InvoiceStatus::ALL;

    fn label(&self) -> &'static str {
        InvoiceStatus::label(self)
    }
}

impl Category for Severity {
    const ALL: &'static [Self] = Severity::ALL;

    fn label(&self) -> &'static str {
        Severity::label(self)
    }
}

impl Category for FileCategory {
    const ALL: &'static [Self] = FileCategory::ALL;

    fn label(&self) -> &'static str {
        FileCategory::label(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter<C> {
    All,
    Only(C),
}

impl<C: Category> Filter<C> {
    pub fn matches(&self, value: Option<C>) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(wanted) => value == Some(*wanted),
        }
    }

    /// All -> first variant -> ... -> last variant -> All.
    pub fn next(&self) -> Filter<C> {
        let all = C::ALL;
        match self {
            Filter::All => all.first().map(|c| Filter::Only(*c)).unwrap_or(Filter::All),
            Filter::Only(current) => {
                let idx = all.iter().position(|c| c == current);
                match idx.and_then(|i| all.get(i + 1)) {
                    Some(next) => Filter::Only(*next),
                    None => Filter::All,
                }
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Only(c) => c.label(),
        }
    }
}

/// Search term plus category filter; reset whenever its view is rebuilt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query<C> {
    pub term: String,
    pub category: Filter<C>,
}

impl<C> Default for Query<C> {
    fn default() -> Self {
        Query {
            term: String::new(),
            category: Filter::All,
        }
    }
}

impl<C: Category> Query<C> {
    pub fn search(term: impl Into<String>) -> Self {
        Query {
            term: term.into(),
            category: Filter::All,
        }
    }

    pub fn cycle_category(&mut self) {
        self.category = self.category.next();
    }
}

/// A record that can appear in a searchable list.
pub trait Listable {
    type Category: Category;

    /// Text matched by the search box. Client names are joined through the
    /// directory.
    fn search_fields<'a>(&'a self, clients: &'a ClientDirectory) -> Vec<&'a str>;

    fn category(&self) -> Option<Self::Category> {
        None
    }
}

impl Listable for Client {
    type Category = NoCategory;

    fn search_fields<'a>(&'a self, _clients: &'a ClientDirectory) -> Vec<&'a str> {
        vec![&self.name, &self.ndis_number]
    }
}

impl Listable for StaffMember {
    type Category = NoCategory;

    fn search_fields<'a>(&'a self, _clients: &'a ClientDirectory) -> Vec<&'a str> {
        vec![&self.name, self.role.label()]
    }
}

impl Listable for Invoice {
    type Category = InvoiceStatus;

    fn search_fields<'a>(&'a self, clients: &'a ClientDirectory) -> Vec<&'a str> {
        vec![clients.name_of(&self.client_id), &self.invoice_number]
    }

    fn category(&self) -> Option<InvoiceStatus> {
        Some(self.status)
    }
}

impl Listable for Incident {
    type Category = Severity;

    fn search_fields<'a>(&'a self, clients: &'a ClientDirectory) -> Vec<&'a str> {
        vec![
            clients.name_of(&self.client_id),
            &self.incident_number,
            &self.description,
        ]
    }

    fn category(&self) -> Option<Severity> {
        Some(self.severity)
    }
}

impl Listable for Appointment {
    type Category = NoCategory;

    fn search_fields<'a>(&'a self, clients: &'a ClientDirectory) -> Vec<&'a str> {
        vec![
            clients.name_of(&self.client_id),
            &self.staff_name,
            &self.service,
        ]
    }
}

impl Listable for Conversation {
    type Category = NoCategory;

    fn search_fields<'a>(&'a self, clients: &'a ClientDirectory) -> Vec<&'a str> {
        vec![clients.name_of(&self.client_id)]
    }
}

impl Listable for StoredFile {
    type Category = FileCategory;

    fn search_fields<'a>(&'a self, clients: &'a ClientDirectory) -> Vec<&'a str> {
        vec![&self.name, clients.name_of(&self.client_id)]
    }

    fn category(&self) -> Option<FileCategory> {
        Some(self.category)
    }
}

/// Order-preserving subsequence of `items` matching `query`.
pub fn filter_records<'a, E: Listable>(
    items: &'a [E],
    query: &Query<E::Category>,
    clients: &ClientDirectory,
) -> Vec<&'a E> {
    let needle = query.term.to_lowercase();
    items
        .iter()
        .filter(|item| {
            if !query.category.matches(item.category()) {
                return false;
            }
            if needle.is_empty() {
                return true;
            }
            item.search_fields(clients)
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Sums `field` over the items accepted by `predicate`; zero when none are.
pub fn aggregate<'a, E, T, P, F>(
    items: impl IntoIterator<Item = &'a E>,
    predicate: P,
    field: F,
) -> T
where
    E: 'a,
    T: Sum<T>,
    P: Fn(&E) -> bool,
    F: Fn(&E) -> T,
{
    items
        .into_iter()
        .filter(|item| predicate(item))
        .map(|item| field(item))
        .sum()
}

pub trait Dated {
    fn date(&self) -> NaiveDate;
}

impl Dated for Appointment {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Buckets by calendar day, earliest first; insertion order inside a day.
pub fn group_by_date<'a, E: Dated>(items: &[&'a E]) -> BTreeMap<NaiveDate, Vec<&'a E>> {
    let mut groups: BTreeMap<NaiveDate, Vec<&'a E>> = BTreeMap::new();
    for item in items {
        groups.entry(item.date()).or_default().push(*item);
    }
    groups
}

/// Owned collection plus its query.
#[derive(Debug, Clone)]
pub struct ListController<E: Listable> {
    items: Vec<E>,
    pub query: Query<E::Category>,
}

impl<E: Listable> ListController<E> {
    pub fn new(items: Vec<E>) -> Self {
        ListController {
            items,
            query: Query::default(),
        }
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [E] {
        &mut self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn filtered<'a>(&'a self, clients: &ClientDirectory) -> Vec<&'a E> {
        filter_records(&self.items, &self.query, clients)
    }

    pub fn push(&mut self, item: E) {
        self.items.push(item);
    }

    /// Removes the first item the predicate accepts.
    pub fn remove_where(&mut self, predicate: impl Fn(&E) -> bool) -> Option<E> {
        let idx = self.items.iter().position(predicate)?;
        Some(self.items.remove(idx))
    }
}

impl<E: Listable> RecordSink<E> for ListController<E> {
    fn commit(&mut self, record: E) -> Result<(), SinkError> {
        self.push(record);
        Ok(())
    }
}

/// Kilobytes represented by a display size such as "2.4 MB" or "856 KB".
/// Unparsable labels count as zero.
pub fn parse_size_label(label: &str) -> f64 {
    let trimmed = label.trim();
    let split = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);
    let value: f64 = match number.parse() {
        Ok(v) => v,
        Err(_) => return 0.0,
    };
    let factor = match unit.trim().to_ascii_uppercase().as_str() {
        "B" => 1.0 / 1024.0,
        "MB" => 1024.0,
        "GB" => 1024.0 * 1024.0,
        _ => 1.0,
    };
    value * factor
}

pub fn format_megabytes(kilobytes: f64) -> String {
    format!("{:.1} MB", kilobytes / 1024.0)
}

//! Pagination and ordering heuristics.
//!
//! Mock data has no business logic, so list arguments are interpreted by name: anything that looks
//! like an ordering key, a sort direction, an offset, a limit or a cursor is applied to the
//! candidate objects, every other argument is ignored.

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    config::ArgumentAliases,
    error::{ResolveError, ResolveResult},
    store::id_key,
};

/// Anything exposing the record the heuristics order and paginate on.
pub trait Candidate {
    fn record(&self) -> &Value;
}

impl Candidate for Value {
    fn record(&self) -> &Value {
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn parse(value: &Value) -> ResolveResult<Self> {
        match value.as_str() {
            Some(direction) if direction.eq_ignore_ascii_case("asc") => Ok(SortDirection::Ascending),
            Some(direction) if direction.eq_ignore_ascii_case("desc") => Ok(SortDirection::Descending),
            Some(direction) => Err(ResolveError::InvalidSortDirection(direction.to_owned())),
            None => Err(ResolveError::InvalidSortDirection(value.to_string())),
        }
    }
}

/// The recognized arguments of a list or connection field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaginationArguments {
    pub order_key: Option<String>,
    pub direction: Option<SortDirection>,
    pub offset: Option<usize>,
    pub limit: Option<usize>,
    pub last: Option<usize>,
    pub after: Option<String>,
    pub before: Option<String>,
}

impl PaginationArguments {
    pub fn from_arguments(arguments: &Map<String, Value>, aliases: &ArgumentAliases) -> ResolveResult<Self> {
        let order_key = first_of(arguments, &aliases.order).and_then(|(name, value)| match value {
            Value::String(key) => Some(key.clone()),
            other => {
                tracing::warn!("ignoring non-string ordering argument {name}: {other}");
                None
            }
        });

        let direction = match first_of(arguments, &aliases.direction) {
            Some((_, value)) => Some(SortDirection::parse(value)?),
            None => first_of(arguments, &aliases.reverse)
                .filter(|(_, value)| value.as_bool() == Some(true))
                .map(|_| SortDirection::Descending),
        };

        let count = |names: &[String]| {
            first_of(arguments, names).and_then(|(name, value)| match value.as_u64() {
                Some(count) => usize::try_from(count).ok(),
                None => {
                    tracing::warn!("ignoring argument {name}, {value} is not a positive integer");
                    None
                }
            })
        };

        let cursor = |names: &[String]| first_of(arguments, names).and_then(|(_, value)| id_key(value));

        Ok(PaginationArguments {
            order_key,
            direction,
            offset: count(&aliases.offset),
            limit: count(&aliases.limit),
            last: count(&aliases.last),
            after: cursor(&aliases.after),
            before: cursor(&aliases.before),
        })
    }
}

/// The first non-null argument among `names`, with the name it was passed under.
fn first_of<'a>(arguments: &'a Map<String, Value>, names: &'a [String]) -> Option<(&'a String, &'a Value)> {
    names.iter().find_map(|name| {
        arguments
            .get(name)
            .filter(|value| !value.is_null())
            .map(|value| (name, value))
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// `None` for an empty page.
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PageInfo {
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "startCursor": self.start_cursor,
            "endCursor": self.end_cursor,
            "hasNextPage": self.has_next_page,
            "hasPreviousPage": self.has_previous_page,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// The cursor of each item, in the same order.
    pub cursors: Vec<Option<String>>,
    pub page_info: PageInfo,
}

/// Orders and windows `items` according to the pagination arguments.
///
/// Cursors are the string form of the item ids unless `cursors` supplies them, one per item.
/// `after` and `before` are resolved against the cursors of the ordered sequence.
pub fn query_heuristics<T: Candidate>(
    items: Vec<T>,
    arguments: &PaginationArguments,
    cursors: Option<Vec<Option<String>>>,
) -> Page<T> {
    let mut cursors = cursors.map(Vec::into_iter);
    let mut entries: Vec<(Option<String>, T)> = items
        .into_iter()
        .map(|item| {
            let cursor = match cursors.as_mut() {
                Some(cursors) => cursors.next().flatten(),
                None => item.record().get("id").and_then(id_key),
            };
            (cursor, item)
        })
        .collect();

    order(&mut entries, arguments);

    let len = entries.len();
    let position = |cursor: &str| entries.iter().position(|(candidate, _)| candidate.as_deref() == Some(cursor));

    let mut start = 0;
    if let Some(after) = &arguments.after {
        match position(after) {
            Some(position) => start = position + 1,
            None => tracing::warn!("ignoring unknown cursor {after}"),
        }
    }
    start = start.saturating_add(arguments.offset.unwrap_or(0)).min(len);

    let mut end = len;
    if let Some(before) = &arguments.before {
        match position(before) {
            Some(position) => end = position,
            None => tracing::warn!("ignoring unknown cursor {before}"),
        }
    }
    end = end.max(start);

    if let Some(limit) = arguments.limit {
        end = end.min(start.saturating_add(limit));
    }
    if let Some(last) = arguments.last {
        start = start.max(end.saturating_sub(last));
    }

    let window: Vec<_> = entries.drain(start..end).collect();

    let page_info = PageInfo {
        start_cursor: window.first().and_then(|(cursor, _)| cursor.clone()),
        end_cursor: window.last().and_then(|(cursor, _)| cursor.clone()),
        has_next_page: end < len,
        has_previous_page: start > 0,
    };

    let (cursors, items) = window.into_iter().unzip();

    Page {
        items,
        cursors,
        page_info,
    }
}

fn order<T: Candidate>(entries: &mut [(Option<String>, T)], arguments: &PaginationArguments) {
    let direction = arguments.direction.unwrap_or(SortDirection::Ascending);

    let Some(order_key) = &arguments.order_key else {
        if direction == SortDirection::Descending {
            entries.reverse();
        }
        return;
    };

    let Some((_, first)) = entries.first() else {
        return;
    };

    let record = first.record();
    let key = if record.get(order_key).is_some() {
        order_key.clone()
    } else {
        let lowercase = order_key.to_lowercase();
        if record.get(&lowercase).is_none() {
            tracing::warn!("{order_key} field not in object, skipping ordering");
            return;
        }
        lowercase
    };

    entries.sort_by(|(_, a), (_, b)| {
        let ordering = compare_values(a.record().get(&key), b.record().get(&key));
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

/// Numbers compare numerically and strings lexicographically. Missing values and nulls come first.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (Some(a), Some(b)) => a.to_string().cmp(&b.to_string()),
    }
}

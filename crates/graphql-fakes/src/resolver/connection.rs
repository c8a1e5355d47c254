//! Relay style connections, synthesized from the nodes of the object store.

use std::cmp::Ordering;

use serde_json::{Map, Value};

use super::{ResolveInfo, Resolved};
use crate::{
    context::ResolutionContext,
    error::{ResolveError, ResolveResult},
    heuristics::{query_heuristics, Page, PaginationArguments},
    schema::SchemaModel,
    store::id_key,
};

/// A connection over every object of the node type, for root fields.
pub(super) fn resolve_top_level(
    arguments: &Map<String, Value>,
    context: &ResolutionContext,
    info: &ResolveInfo<'_>,
) -> ResolveResult<Resolved> {
    let schema = info.schema;
    let connection_type = info.return_type().named_type();
    let node_type = node_type(connection_type, schema);

    let mut nodes = context.store().objects_of(node_type, schema)?;
    nodes.sort_by(|a, b| compare_ids(a.record().get("id"), b.record().get("id")));

    let arguments = PaginationArguments::from_arguments(arguments, &context.config().pagination)?;
    let page = query_heuristics(nodes, &arguments, None);

    Ok(Resolved::object(
        connection_type,
        stitch(Map::new(), &[], page, node_type, schema),
    ))
}

/// A connection stored as a record: its nodes are paginated, then its edges are matched back to
/// the nodes of the page by cursor.
pub(super) fn resolve_nested(
    value: &Value,
    arguments: &Map<String, Value>,
    context: &ResolutionContext,
    info: &ResolveInfo<'_>,
) -> ResolveResult<Resolved> {
    let schema = info.schema;
    let connection_type = info.return_type().named_type();

    let record = match value {
        Value::Object(_) => value.clone(),
        id => context
            .store()
            .object_by_id(id, connection_type, schema)?
            .record()
            .clone(),
    };

    let Value::Object(connection) = record else {
        return Err(ResolveError::InvalidShape(format!(
            "the {connection_type} of {} is not an object",
            info.describe()
        )));
    };

    let node_type = node_type(connection_type, schema);
    let nodes = resolve_members(connection.get("nodes"), node_type, context, info)?;

    let edges: Vec<Value> = match edge_type(connection_type, schema) {
        Some(edge_type) => resolve_members(connection.get("edges"), edge_type, context, info)?
            .into_iter()
            .map(|edge| edge.into_json(edge_type, schema))
            .collect(),
        None => Vec::new(),
    };

    let cursors = node_cursors(&nodes, &edges);
    let arguments = PaginationArguments::from_arguments(arguments, &context.config().pagination)?;
    let page = query_heuristics(nodes, &arguments, Some(cursors));

    Ok(Resolved::object(
        connection_type,
        stitch(connection, &edges, page, node_type, schema),
    ))
}

/// The cursor of each node: the cursor of the stored edge pointing to it, else the node id.
fn node_cursors(nodes: &[Resolved], edges: &[Value]) -> Vec<Option<String>> {
    nodes
        .iter()
        .map(|node| {
            let id = node.record().get("id").and_then(id_key);

            edges
                .iter()
                .find(|edge| id.is_some() && edge_node_id(edge) == id)
                .and_then(|edge| edge.get("cursor").and_then(id_key))
                .or(id)
        })
        .collect()
}

/// The id of the node an edge points to, stored either as a reference or inline.
fn edge_node_id(edge: &Value) -> Option<String> {
    match edge.get("node")? {
        Value::Object(node) => node.get("id").and_then(id_key),
        reference => id_key(reference),
    }
}

/// Rebuilds `edges`, `nodes` and `pageInfo` of a connection record from a page of nodes.
///
/// Each edge is the stored edge whose cursor matches the cursor of its node, if any. Cursors must
/// be unique within one connection: on duplicates the first edge wins.
fn stitch(
    mut connection: Map<String, Value>,
    edges: &[Value],
    page: Page<Resolved>,
    node_type: &str,
    schema: &SchemaModel,
) -> Value {
    let page_info = page.page_info.to_value();
    let nodes: Vec<Value> = page
        .items
        .into_iter()
        .map(|node| node.into_json(node_type, schema))
        .collect();

    let stitched = nodes
        .iter()
        .zip(page.cursors)
        .map(|(node, cursor)| {
            let mut matching = edges
                .iter()
                .filter(|edge| cursor.is_some() && edge.get("cursor").and_then(id_key) == cursor);

            let mut edge = match matching.next() {
                Some(Value::Object(edge)) => edge.clone(),
                _ => Map::new(),
            };

            if matching.next().is_some() {
                tracing::warn!(
                    "several edges share the cursor {}, using the first one",
                    cursor.as_deref().unwrap_or_default()
                );
            }

            edge.insert("cursor".to_owned(), cursor.map(Value::String).unwrap_or(Value::Null));
            edge.insert("node".to_owned(), node.clone());

            Value::Object(edge)
        })
        .collect();

    connection.insert("edges".to_owned(), Value::Array(stitched));
    connection.insert("nodes".to_owned(), Value::Array(nodes));
    connection.insert("pageInfo".to_owned(), page_info);

    Value::Object(connection)
}

fn resolve_members(
    ids: Option<&Value>,
    type_name: &str,
    context: &ResolutionContext,
    info: &ResolveInfo<'_>,
) -> ResolveResult<Vec<Resolved>> {
    let ids = match ids {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(ids)) => ids,
        Some(other) => {
            return Err(ResolveError::InvalidShape(format!(
                "expected a list of {type_name} ids for {}, found {other}",
                info.describe()
            )))
        }
    };

    ids.iter()
        .map(|id| match id {
            Value::Null => Ok(Resolved::Null),
            Value::Object(_) => Ok(Resolved::Value(id.clone())),
            id => context.store().object_by_id(id, type_name, info.schema),
        })
        .collect()
}

/// The type of the nodes, from the `nodes` or `edges.node` fields, or else the connection name
/// without its `Connection` suffix.
fn node_type<'a>(connection_type: &'a str, schema: &'a SchemaModel) -> &'a str {
    schema
        .field(connection_type, "nodes")
        .or_else(|| schema.field(edge_type(connection_type, schema)?, "node"))
        .map(|field| field.ty.named_type())
        .unwrap_or_else(|| connection_type.strip_suffix("Connection").unwrap_or(connection_type))
}

fn edge_type<'a>(connection_type: &str, schema: &'a SchemaModel) -> Option<&'a str> {
    schema
        .field(connection_type, "edges")
        .map(|field| field.ty.named_type())
}

/// Numeric ids first, in numeric order, then the others in lexicographic order.
fn compare_ids(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn numeric(id: Option<&Value>) -> Option<f64> {
        match id? {
            Value::Number(id) => id.as_f64(),
            Value::String(id) => id.parse::<f64>().ok().filter(|id| id.is_finite()),
            _ => None,
        }
    }

    match (numeric(a), numeric(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.and_then(id_key).cmp(&b.and_then(id_key)),
    }
}

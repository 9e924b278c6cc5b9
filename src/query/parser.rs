//! JSON envelope parsing.
//!
//! A request is a JSON object with the recognised keys `where`, `sort`,
//! `skip`, `limit` and `implement`; unrecognised keys are ignored.

use serde_json::{Map, Value};

use super::ast::{
    Combinator, Direction, Implement, ImplementFrom, Operator, Predicate, Request, Sort, Where,
};
use super::errors::{ParseError, ParseResult};

/// Parses a request envelope into the typed AST.
pub fn parse_request(envelope: &Value) -> ParseResult<Request> {
    let map = envelope
        .as_object()
        .ok_or_else(|| ParseError::shape("request", "a JSON object"))?;

    let mut request = Request::default();

    for (key, value) in map {
        match key.as_str() {
            "where" => request.where_clause = Some(parse_where(value)?),
            "sort" => request.sort = Some(parse_sort(value)?),
            "skip" => request.skip = Some(parse_count("skip", value)?),
            "limit" => request.limit = Some(parse_count("limit", value)?),
            "implement" => request.implement = parse_implements(value)?,
            _ => {}
        }
    }

    Ok(request)
}

fn parse_where(value: &Value) -> ParseResult<Where> {
    let map = value
        .as_object()
        .ok_or_else(|| ParseError::shape("where", "a JSON object"))?;

    let predicate = Predicate {
        field: match map.get("field") {
            Some(v) => v
                .as_str()
                .ok_or_else(|| ParseError::shape("field", "a string"))?
                .to_string(),
            None => String::new(),
        },
        operator: match map.get("operator") {
            Some(v) => parse_operator(v)?,
            None => Operator::Equal,
        },
        value: match map.get("value") {
            Some(v) => canonical_value(v)?,
            None => String::new(),
        },
    };

    if map.contains_key("and") && map.contains_key("or") {
        return Err(ParseError::MixedCombinators);
    }

    let mut children = Vec::new();
    if let Some(child) = map.get("and") {
        children.push((Combinator::And, parse_where(child)?));
    } else if let Some(child) = map.get("or") {
        children.push((Combinator::Or, parse_where(child)?));
    }

    Ok(Where {
        predicate,
        children,
    })
}

fn parse_operator(value: &Value) -> ParseResult<Operator> {
    let token = value
        .as_str()
        .ok_or_else(|| ParseError::shape("operator", "a string"))?;

    match token {
        "=" => Ok(Operator::Equal),
        "!=" => Ok(Operator::NotEqual),
        ">" => Ok(Operator::Larger),
        "<" => Ok(Operator::Smaller),
        "><" => Ok(Operator::Between),
        other => Err(ParseError::UnknownOperator(other.to_string())),
    }
}

/// Canonicalises a wire value into the string domain the index operates
/// on: numbers gain six fractional digits, booleans become `true`/`false`.
fn canonical_value(value: &Value) -> ParseResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => {
            let f = n.as_f64().ok_or(ParseError::UnsupportedValue)?;
            Ok(format!("{:.6}", f))
        }
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(ParseError::UnsupportedValue),
    }
}

fn parse_sort(value: &Value) -> ParseResult<Sort> {
    let map = value
        .as_object()
        .ok_or_else(|| ParseError::shape("sort", "a JSON object"))?;

    let mut sort = Sort {
        field: String::new(),
        direction: Direction::Asc,
        levenshtein: None,
    };

    for (key, value) in map {
        match key.as_str() {
            "field" => {
                sort.field = value
                    .as_str()
                    .ok_or_else(|| ParseError::shape("field", "a string"))?
                    .to_string();
            }
            "direction" => {
                let token = value
                    .as_str()
                    .ok_or_else(|| ParseError::shape("direction", "a string"))?;
                sort.direction = match token {
                    "asc" => Direction::Asc,
                    "desc" => Direction::Desc,
                    other => return Err(ParseError::UnknownDirection(other.to_string())),
                };
            }
            "levenshtein" => {
                sort.levenshtein = Some(
                    value
                        .as_str()
                        .ok_or_else(|| ParseError::shape("levenshtein", "a string"))?
                        .to_string(),
                );
            }
            _ => {}
        }
    }

    Ok(sort)
}

fn parse_count(key: &'static str, value: &Value) -> ParseResult<i64> {
    // JSON numbers arrive as f64 from permissive clients; truncate.
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
        .ok_or_else(|| ParseError::shape(key, "a number"))
}

fn parse_implements(value: &Value) -> ParseResult<Vec<Implement>> {
    let list = value
        .as_array()
        .ok_or_else(|| ParseError::shape("implement", "an array"))?;

    list.iter().map(parse_implement).collect()
}

fn parse_implement(value: &Value) -> ParseResult<Implement> {
    let map = value
        .as_object()
        .ok_or_else(|| ParseError::shape("implement", "an array of objects"))?;

    let mut implement = Implement::default();

    for (key, value) in map {
        match key.as_str() {
            "from" => implement.from = parse_implement_from(value)?,
            "field" => {
                implement.field = value
                    .as_str()
                    .ok_or_else(|| ParseError::shape("field", "a string"))?
                    .to_string();
            }
            "as" => {
                implement.alias = Some(
                    value
                        .as_str()
                        .ok_or_else(|| ParseError::shape("as", "a string"))?
                        .to_string(),
                );
            }
            _ => {}
        }
    }

    Ok(implement)
}

fn parse_implement_from(value: &Value) -> ParseResult<ImplementFrom> {
    let map: &Map<String, Value> = value
        .as_object()
        .ok_or_else(|| ParseError::shape("from", "a JSON object"))?;

    let mut from = ImplementFrom::default();

    if let Some(table) = map.get("table") {
        from.table = table
            .as_str()
            .ok_or_else(|| ParseError::shape("table", "a string"))?
            .to_string();
    }
    if let Some(field) = map.get("field") {
        from.field = field
            .as_str()
            .ok_or_else(|| ParseError::shape("field", "a string"))?
            .to_string();
    }

    Ok(from)
}

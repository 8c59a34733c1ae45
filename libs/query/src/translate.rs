//! Pool query → Sierra query translation
//!
//! Sierra's `bibs/search` takes a single `text` parameter with one-letter
//! field prefixes (`t:` title, `a:` author, `d:` subject) and bare keyword
//! terms. Translation runs in three passes over the parsed tree: reject
//! fields Sierra cannot express, rewrite scoped clauses to Sierra codes, and
//! prune clauses left without content.

use serde::{Deserialize, Serialize};

use crate::ast::{BoolOp, Expr, Field};
use crate::error::{Error, Result};
use crate::parser::parse;

/// Rendered form of a fully reduced query: match every record.
pub const MATCH_ALL: &str = "(*)";

/// How `identifier:` clauses are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierPolicy {
    /// Fail with an unsupported-field error.
    #[default]
    Reject,
    /// Rewrite to `(b:(value) OR c:(value))`, matching barcode or call number.
    BarcodeOrCallNumber,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct TranslateOptions {
    #[serde(default)]
    pub identifier_policy: IdentifierPolicy,
}

/// Query text in Sierra syntax, not yet URL encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedQuery(String);

impl TranslatedQuery {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Percent-encoded for use as a URL query value.
    pub fn encoded(&self) -> String {
        urlencoding::encode(&self.0).into_owned()
    }
}

impl std::fmt::Display for TranslatedQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    Upstream(TranslatedQuery),
    /// The query selects facet filters, which Sierra cannot apply; under
    /// pool semantics it matches nothing.
    MatchNothing,
}

/// Translate with the default options (identifier queries rejected).
pub fn translate(query: &str) -> Result<Translation> {
    translate_with(query, &TranslateOptions::default())
}

pub fn translate_with(query: &str, options: &TranslateOptions) -> Result<Translation> {
    let expr = parse(query)?;

    let mut fields = Vec::new();
    expr.scoped_fields(&mut fields);
    for field in &fields {
        if is_unsupported(*field, options) {
            return Err(Error::Unsupported { field: *field });
        }
    }
    if fields.contains(&Field::Filter) {
        return Ok(Translation::MatchNothing);
    }

    let rendered = match prune(rewrite(expr, options)) {
        Some(expr) => expr.render(),
        None => MATCH_ALL.to_string(),
    };
    let rendered = rendered.trim();
    let rendered = if rendered.is_empty() || rendered == "()" {
        MATCH_ALL
    } else {
        rendered
    };
    Ok(Translation::Upstream(TranslatedQuery(rendered.to_string())))
}

fn is_unsupported(field: Field, options: &TranslateOptions) -> bool {
    match field {
        Field::Date | Field::JournalTitle | Field::Fulltext | Field::Series => true,
        Field::Identifier => options.identifier_policy == IdentifierPolicy::Reject,
        _ => false,
    }
}

fn rewrite(expr: Expr, options: &TranslateOptions) -> Expr {
    match expr {
        Expr::Empty | Expr::Term(_) | Expr::Phrase(_) | Expr::Coded { .. } => expr,
        Expr::Group(inner) => Expr::Group(Box::new(rewrite(*inner, options))),
        Expr::Not(inner) => Expr::Not(Box::new(rewrite(*inner, options))),
        Expr::Chain { first, rest } => Expr::Chain {
            first: Box::new(rewrite(*first, options)),
            rest: rest
                .into_iter()
                .map(|(op, e)| (op, rewrite(e, options)))
                .collect(),
        },
        Expr::Scoped { field, body } => {
            let body = Box::new(rewrite(*body, options));
            match field {
                Field::Identifier => identifier_disjunction(body),
                _ => Expr::Coded {
                    code: field.upstream_code(),
                    body,
                },
            }
        }
    }
}

fn identifier_disjunction(body: Box<Expr>) -> Expr {
    Expr::Group(Box::new(Expr::Chain {
        first: Box::new(Expr::Coded {
            code: Some("b"),
            body: body.clone(),
        }),
        rest: vec![(
            Some(BoolOp::Or),
            Expr::Coded {
                code: Some("c"),
                body,
            },
        )],
    }))
}

/// Drop clauses and groups that ended up with nothing inside.
fn prune(expr: Expr) -> Option<Expr> {
    match expr {
        Expr::Empty => None,
        Expr::Term(_) | Expr::Phrase(_) => Some(expr),
        Expr::Group(inner) => prune(*inner).map(|e| Expr::Group(Box::new(e))),
        Expr::Not(inner) => prune(*inner).map(|e| Expr::Not(Box::new(e))),
        Expr::Coded { code, body } => prune(*body).map(|body| Expr::Coded {
            code,
            body: Box::new(body),
        }),
        Expr::Scoped { field, body } => prune(*body).map(|body| Expr::Scoped {
            field,
            body: Box::new(body),
        }),
        // An emptied operand takes its leading operator with it. When the
        // head empties, the next survivor becomes the head and a `NOT`
        // joining it stays as a unary negation.
        Expr::Chain { first, rest } => {
            let mut head = prune(*first);
            let mut kept = Vec::with_capacity(rest.len());
            for (op, operand) in rest {
                let Some(operand) = prune(operand) else {
                    continue;
                };
                if head.is_none() {
                    head = Some(match op {
                        Some(BoolOp::Not) => Expr::Not(Box::new(operand)),
                        _ => operand,
                    });
                } else {
                    kept.push((op, operand));
                }
            }

            let head = head?;
            if kept.is_empty() {
                return Some(head);
            }
            Some(Expr::Chain {
                first: Box::new(head),
                rest: kept,
            })
        }
    }
}

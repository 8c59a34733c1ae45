use serde::{Deserialize, Serialize};

/// Search fields a pool query may scope a clause to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Keyword,
    Title,
    Author,
    Subject,
    Identifier,
    Date,
    Published,
    Filter,
    JournalTitle,
    Fulltext,
    Series,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::Keyword,
        Field::Title,
        Field::Author,
        Field::Subject,
        Field::Identifier,
        Field::Date,
        Field::Published,
        Field::Filter,
        Field::JournalTitle,
        Field::Fulltext,
        Field::Series,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Keyword => "keyword",
            Field::Title => "title",
            Field::Author => "author",
            Field::Subject => "subject",
            Field::Identifier => "identifier",
            Field::Date => "date",
            Field::Published => "published",
            Field::Filter => "filter",
            Field::JournalTitle => "journal_title",
            Field::Fulltext => "fulltext",
            Field::Series => "series",
        }
    }

    /// Human label used in "... queries are not supported" messages.
    pub fn label(self) -> &'static str {
        match self {
            Field::Keyword => "Keyword",
            Field::Title => "Title",
            Field::Author => "Author",
            Field::Subject => "Subject",
            Field::Identifier => "Identifier",
            Field::Date => "Date",
            Field::Published => "Published",
            Field::Filter => "Filter",
            Field::JournalTitle => "Journal Title",
            Field::Fulltext => "Full Text",
            Field::Series => "Series",
        }
    }

    /// Sierra field prefix for fields that translate one-to-one.
    ///
    /// `published` maps to the fine inventory field `v`, which holds no
    /// bibliographic data, so the clause never matches but the surrounding
    /// boolean expression stays intact.
    pub fn upstream_code(self) -> Option<&'static str> {
        match self {
            Field::Title => Some("t"),
            Field::Author => Some("a"),
            Field::Subject => Some("d"),
            Field::Published => Some("v"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
    Not,
}

impl BoolOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BoolOp::And => "AND",
            BoolOp::Or => "OR",
            BoolOp::Not => "NOT",
        }
    }
}

/// Parsed pool query.
///
/// Operands at one nesting level are stored flat in source order; the
/// upstream does its own precedence, so the tree only has to render back
/// faithfully. Tree depth therefore follows bracket and `NOT` nesting,
/// never the length of an operator chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// `{}` or `()` with nothing inside
    Empty,
    Term(String),
    Phrase(String),
    Group(Box<Expr>),
    /// `field: {body}`
    Scoped { field: Field, body: Box<Expr> },
    /// Rewritten clause: `code:(body)`, or a bare `(body)` without a code
    Coded {
        code: Option<&'static str>,
        body: Box<Expr>,
    },
    Not(Box<Expr>),
    /// `first op operand op operand ...`; a `None` operator joins operands
    /// written next to each other
    Chain {
        first: Box<Expr>,
        rest: Vec<(Option<BoolOp>, Expr)>,
    },
}

impl Expr {
    /// Visit every scoped clause in document order.
    pub fn scoped_fields(&self, out: &mut Vec<Field>) {
        match self {
            Expr::Empty | Expr::Term(_) | Expr::Phrase(_) => {}
            Expr::Group(inner) | Expr::Not(inner) => inner.scoped_fields(out),
            Expr::Scoped { field, body } => {
                out.push(*field);
                body.scoped_fields(out);
            }
            Expr::Coded { body, .. } => body.scoped_fields(out),
            Expr::Chain { first, rest } => {
                first.scoped_fields(out);
                rest.iter().for_each(|(_, e)| e.scoped_fields(out));
            }
        }
    }

    /// Render in upstream syntax; braces always come out as parentheses.
    pub fn render(&self) -> String {
        match self {
            Expr::Empty => String::new(),
            Expr::Term(word) => word.clone(),
            Expr::Phrase(text) => format!("\"{}\"", text.replace('{', "(").replace('}', ")")),
            Expr::Group(inner) => format!("({})", inner.render()),
            Expr::Scoped { field, body } => format!("{}:({})", field.as_str(), body.render()),
            Expr::Coded { code: Some(code), body } => format!("{code}:({})", body.render()),
            Expr::Coded { code: None, body } => format!("({})", body.render()),
            Expr::Not(inner) => format!("NOT {}", inner.render()),
            Expr::Chain { first, rest } => {
                let mut out = first.render();
                for (op, operand) in rest {
                    out.push(' ');
                    if let Some(op) = op {
                        out.push_str(op.as_str());
                        out.push(' ');
                    }
                    out.push_str(&operand.render());
                }
                out
            }
        }
    }
}

/// Token kinds of the pool query grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// `name:` directly ahead of a `{`
    Field(String),
    LBrace,
    RBrace,
    LParen,
    RParen,
    Word(String),
    /// Double-quoted text, quotes removed
    Phrase(String),
    And,
    Or,
    Not,
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character
    pub pos: usize,
}

impl Token {
    pub fn new(kind: TokenKind, pos: usize) -> Self {
        Self { kind, pos }
    }

    pub fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Field(name) => format!("'{name}:'"),
            TokenKind::LBrace => "'{'".to_string(),
            TokenKind::RBrace => "'}'".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::Word(word) => format!("'{word}'"),
            TokenKind::Phrase(text) => format!("\"{text}\""),
            TokenKind::And => "AND".to_string(),
            TokenKind::Or => "OR".to_string(),
            TokenKind::Not => "NOT".to_string(),
            TokenKind::Eof => "end of query".to_string(),
        }
    }
}

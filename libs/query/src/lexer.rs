//! Pool query lexer
//!
//! Splits a query such as `title: {"moby dick"} AND keyword: {(whale OR sea)}`
//! into tokens. A word ending in `:` becomes a field token only when the next
//! non-blank character opens a brace; anything else stays a plain word so
//! free text like `re:birth` survives untouched.

use crate::error::{Error, Result};
use crate::token::{Token, TokenKind};

pub struct Lexer {
    chars: Vec<(usize, char)>,
    position: usize,
    len: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.char_indices().collect(),
            position: 0,
            len: input.len(),
        }
    }

    /// Tokenize the whole input, ending with an `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.position).map(|(_, c)| *c)
    }

    fn offset(&self) -> usize {
        self.chars
            .get(self.position)
            .map(|(pos, _)| *pos)
            .unwrap_or(self.len)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.current(), Some(c) if c.is_whitespace()) {
            self.position += 1;
        }
    }

    fn next_non_blank(&self) -> Option<char> {
        self.chars[self.position..]
            .iter()
            .map(|(_, c)| *c)
            .find(|c| !c.is_whitespace())
    }

    fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();
        let pos = self.offset();
        let Some(c) = self.current() else {
            return Ok(Token::new(TokenKind::Eof, pos));
        };

        let kind = match c {
            '{' => {
                self.position += 1;
                TokenKind::LBrace
            }
            '}' => {
                self.position += 1;
                TokenKind::RBrace
            }
            '(' => {
                self.position += 1;
                TokenKind::LParen
            }
            ')' => {
                self.position += 1;
                TokenKind::RParen
            }
            '"' => TokenKind::Phrase(self.read_phrase(pos)?),
            _ => self.read_word(),
        };

        Ok(Token::new(kind, pos))
    }

    fn read_phrase(&mut self, start: usize) -> Result<String> {
        self.position += 1; // opening quote
        let mut text = String::new();
        while let Some(c) = self.current() {
            self.position += 1;
            if c == '"' {
                return Ok(text);
            }
            text.push(c);
        }
        Err(Error::malformed(start, "unterminated quoted phrase"))
    }

    fn read_word(&mut self) -> TokenKind {
        let mut word = String::new();
        while let Some(c) = self.current() {
            if c.is_whitespace() || matches!(c, '{' | '}' | '(' | ')' | '"') {
                break;
            }
            word.push(c);
            self.position += 1;
        }

        if let Some(name) = word.strip_suffix(':') {
            if is_field_name(name) && self.next_non_blank() == Some('{') {
                return TokenKind::Field(name.to_string());
            }
        }

        match word.as_str() {
            "AND" => TokenKind::And,
            "OR" => TokenKind::Or,
            "NOT" => TokenKind::Not,
            _ => TokenKind::Word(word),
        }
    }
}

fn is_field_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn field_requires_a_following_brace() {
        assert_eq!(
            kinds("title: {cats}"),
            vec![
                TokenKind::Field("title".into()),
                TokenKind::LBrace,
                TokenKind::Word("cats".into()),
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("re:birth"),
            vec![TokenKind::Word("re:birth".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn phrases_keep_inner_text() {
        assert_eq!(
            kinds(r#""tortoise shell" OR calico"#),
            vec![
                TokenKind::Phrase("tortoise shell".into()),
                TokenKind::Or,
                TokenKind::Word("calico".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn operators_are_case_sensitive() {
        assert_eq!(
            kinds("cats and dogs"),
            vec![
                TokenKind::Word("cats".into()),
                TokenKind::Word("and".into()),
                TokenKind::Word("dogs".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_phrase_is_malformed() {
        let err = Lexer::new(r#"keyword: {"cats}"#).tokenize().unwrap_err();
        assert_eq!(
            err,
            Error::MalformedQuery {
                pos: 10,
                message: "unterminated quoted phrase".into()
            }
        );
    }
}

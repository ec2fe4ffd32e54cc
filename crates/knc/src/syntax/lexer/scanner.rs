//! Lexer implementation using logos

use super::token::{Token, TokenKind};
use crate::common::{CompileError, CompileResult, Span};
use logos::Logos;

/// Lexer for Kotlin declaration source
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    /// Buffer for peeked tokens (supports 2-token lookahead)
    peeked: Vec<Token>,
    at_eof: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            peeked: Vec::new(),
            at_eof: false,
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> CompileResult<Token> {
        // Return from buffer first
        if !self.peeked.is_empty() {
            return Ok(self.peeked.remove(0));
        }

        self.scan_token()
    }

    /// Scan a new token from source
    fn scan_token(&mut self) -> CompileResult<Token> {
        if self.at_eof {
            let len = self.inner.source().len();
            return Ok(Token::new(TokenKind::Eof, Span::new(len, len)));
        }

        match self.inner.next() {
            Some(Ok(kind)) => {
                let span = self.inner.span();
                Ok(Token::new(kind, Span::new(span.start, span.end)))
            }
            Some(Err(())) => {
                let span = self.inner.span();
                Err(CompileError::lexer(
                    format!("unexpected character '{}'", self.inner.slice()),
                    Span::new(span.start, span.end),
                ))
            }
            None => {
                self.at_eof = true;
                let len = self.inner.source().len();
                Ok(Token::new(TokenKind::Eof, Span::new(len, len)))
            }
        }
    }

    /// Peek at the next token without consuming it
    pub fn peek(&mut self) -> CompileResult<&Token> {
        if self.peeked.is_empty() {
            let token = self.scan_token()?;
            self.peeked.push(token);
        }
        Ok(&self.peeked[0])
    }

    /// Peek at the token at offset (0 = next, 1 = after next, etc.)
    pub fn peek_at(&mut self, offset: usize) -> CompileResult<&Token> {
        while self.peeked.len() <= offset {
            let token = self.scan_token()?;
            self.peeked.push(token);
        }
        Ok(&self.peeked[offset])
    }

    /// Check if the next token matches the expected kind
    pub fn check(&mut self, expected: &TokenKind) -> CompileResult<bool> {
        Ok(std::mem::discriminant(&self.peek()?.kind) == std::mem::discriminant(expected))
    }

    /// Check if the token AFTER the current peek matches expected kind (2-token lookahead)
    pub fn check_lookahead(&mut self, expected: &TokenKind) -> CompileResult<bool> {
        let token = self.peek_at(1)?;
        Ok(std::mem::discriminant(&token.kind) == std::mem::discriminant(expected))
    }

    /// Consume the next token if it matches, return true if consumed
    pub fn match_token(&mut self, expected: &TokenKind) -> CompileResult<bool> {
        if self.check(expected)? {
            self.next_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Expect a specific token kind, error if not found
    pub fn expect(&mut self, expected: TokenKind) -> CompileResult<Token> {
        let token = self.next_token()?;
        if std::mem::discriminant(&token.kind) == std::mem::discriminant(&expected) {
            Ok(token)
        } else {
            Err(CompileError::parser(
                format!("expected {}, found {}", expected, token.kind),
                token.span,
            ))
        }
    }

    /// Tokenize the entire source and return all tokens
    pub fn tokenize_all(mut self) -> CompileResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.kind, TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    /// Get the source being lexed
    pub fn source(&self) -> &'a str {
        self.inner.source()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        let source = "package import class object companion enum val var by get set";
        let mut lexer = Lexer::new(source);

        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Package));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Import));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Class));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Object));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Companion));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Enum));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Val));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Var));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::By));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Get));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Set));
    }

    #[test]
    fn test_identifiers() {
        let source = "foo bar_baz _test test123";
        let mut lexer = Lexer::new(source);

        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "foo"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "bar_baz"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "_test"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "test123"
        ));
    }

    #[test]
    fn test_annotation_tokens() {
        let source = "@ThreadLocal object";
        let mut lexer = Lexer::new(source);

        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::At));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "ThreadLocal"
        ));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Object));
    }

    #[test]
    fn test_literals() {
        let source = "42 0xFF 0b1010 3.14 'c' \"text\"";
        let mut lexer = Lexer::new(source);

        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::IntLiteral(s) if s == "42"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::HexLiteral(s) if s == "0xFF"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::BinaryLiteral(s) if s == "0b1010"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::FloatLiteral(s) if s == "3.14"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::CharLiteral(s) if s == "'c'"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::StringLiteral(s) if s == "\"text\""
        ));
    }

    #[test]
    fn test_comments_skipped() {
        let source = "val // line comment\n/* block */ x";
        let mut lexer = Lexer::new(source);

        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Val));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "x"
        ));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Eof));
    }

    #[test]
    fn test_spans() {
        let source = "val x";
        let mut lexer = Lexer::new(source);

        let val = lexer.next_token().unwrap();
        assert_eq!(val.span, Span::new(0, 3));
        let x = lexer.next_token().unwrap();
        assert_eq!(x.span, Span::new(4, 5));
    }

    #[test]
    fn test_peek_does_not_consume() {
        let source = "var y";
        let mut lexer = Lexer::new(source);

        assert!(matches!(lexer.peek().unwrap().kind, TokenKind::Var));
        assert!(matches!(lexer.peek().unwrap().kind, TokenKind::Var));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Var));
    }
}

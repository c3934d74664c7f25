// ABOUTME: Lexer module converting source text into a flat token sequence

use crate::token::{keyword_kind, Literal, Token, TokenKind};

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_alphanumeric(c: char) -> bool {
    is_alpha(c) || is_digit(c)
}

/// Scans a source string into an ordered token sequence terminated by a
/// single `Eof` token. Infallible: unknown characters, lone `&`/`|`, and
/// unterminated strings/comments are silently skipped rather than
/// reported.
pub struct Lexer {
    source: Vec<char>,
    start: usize,
    current: usize,
    line: usize,
    tokens: Vec<Token>,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            source: source.chars().collect(),
            start: 0,
            current: 0,
            line: 1,
            tokens: Vec::new(),
        }
    }

    pub fn scan(mut self) -> Vec<Token> {
        let span = tracing::debug_span!("lex");
        let _enter = span.enter();
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token();
        }
        self.tokens
            .push(Token::new(TokenKind::Eof, "", Literal::None, self.line));
        tracing::debug!(tokens = self.tokens.len(), "lex complete");
        self.tokens
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        c
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.source[self.current]
        }
    }

    fn peek_next(&self) -> char {
        if self.current + 1 >= self.source.len() {
            '\0'
        } else {
            self.source[self.current + 1]
        }
    }

    /// Consumes the next character iff it matches `expected` (maximal munch).
    fn advance_if(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.source[self.current] != expected {
            return false;
        }
        self.current += 1;
        true
    }

    fn lexeme(&self) -> String {
        self.source[self.start..self.current].iter().collect()
    }

    fn add(&mut self, kind: TokenKind) {
        let lexeme = self.lexeme();
        self.tokens.push(Token::new(kind, lexeme, Literal::None, self.line));
    }

    fn add_literal(&mut self, kind: TokenKind, literal: Literal) {
        let lexeme = self.lexeme();
        self.tokens.push(Token::new(kind, lexeme, literal, self.line));
    }

    fn scan_token(&mut self) {
        let c = self.advance();
        match c {
            '(' => self.add(TokenKind::LeftParen),
            ')' => self.add(TokenKind::RightParen),
            '{' => self.add(TokenKind::LeftBrace),
            '}' => self.add(TokenKind::RightBrace),
            '[' => self.add(TokenKind::LeftBracket),
            ']' => self.add(TokenKind::RightBracket),
            ',' => self.add(TokenKind::Comma),
            ';' => self.add(TokenKind::Semicolon),

            '+' => {
                if self.advance_if('+') {
                    self.add(TokenKind::PlusPlus);
                } else if self.advance_if('=') {
                    self.add(TokenKind::PlusEqual);
                } else {
                    self.add(TokenKind::Plus);
                }
            }
            '-' => {
                if self.advance_if('-') {
                    self.add(TokenKind::MinusMinus);
                } else if self.advance_if('=') {
                    self.add(TokenKind::MinusEqual);
                } else {
                    self.add(TokenKind::Minus);
                }
            }
            '*' => {
                if self.advance_if('*') {
                    self.add(TokenKind::StarStar);
                } else if self.advance_if('=') {
                    self.add(TokenKind::StarEqual);
                } else {
                    self.add(TokenKind::Star);
                }
            }
            '/' => {
                if self.advance_if('/') {
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else if self.advance_if('*') {
                    self.block_comment();
                } else if self.advance_if('=') {
                    self.add(TokenKind::SlashEqual);
                } else {
                    self.add(TokenKind::Slash);
                }
            }
            '%' => {
                if self.advance_if('=') {
                    self.add(TokenKind::PercentEqual);
                } else {
                    self.add(TokenKind::Percent);
                }
            }
            '.' => {
                if self.advance_if('=') {
                    self.add(TokenKind::DotEqual);
                } else {
                    self.add(TokenKind::Dot);
                }
            }

            '=' => {
                if self.advance_if('=') {
                    if self.advance_if('=') {
                        self.add(TokenKind::EqualEqualEqual);
                    } else {
                        self.add(TokenKind::EqualEqual);
                    }
                } else {
                    self.add(TokenKind::Equal);
                }
            }
            '!' => {
                if self.advance_if('=') {
                    if self.advance_if('=') {
                        self.add(TokenKind::BangEqualEqual);
                    } else {
                        self.add(TokenKind::BangEqual);
                    }
                } else {
                    self.add(TokenKind::Bang);
                }
            }
            '<' => {
                if self.advance_if('=') {
                    self.add(TokenKind::LessEqual);
                } else {
                    self.add(TokenKind::Less);
                }
            }
            '>' => {
                if self.advance_if('=') {
                    self.add(TokenKind::GreaterEqual);
                } else {
                    self.add(TokenKind::Greater);
                }
            }

            '&' => {
                if self.advance_if('&') {
                    self.add(TokenKind::And);
                }
                // A lone `&` is silently dropped.
            }
            '|' => {
                if self.advance_if('|') {
                    self.add(TokenKind::Or);
                }
                // A lone `|` is silently dropped.
            }

            ' ' | '\t' | '\r' => {}
            '\n' => self.line += 1,

            '"' | '\'' => self.string(c),

            '$' => self.variable(),

            _ => {
                if is_digit(c) {
                    self.number();
                } else if is_alpha(c) {
                    self.identifier();
                } else {
                    tracing::debug!(char = %c, line = self.line, "skipping unknown character");
                }
            }
        }
    }

    fn block_comment(&mut self) {
        loop {
            if self.is_at_end() {
                // Unterminated block comment: silently accepted.
                return;
            }
            if self.peek() == '*' && self.peek_next() == '/' {
                self.advance();
                self.advance();
                return;
            }
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }
    }

    fn string(&mut self, quote: char) {
        let content_start = self.current;
        loop {
            if self.is_at_end() {
                // Unterminated string: silently accepted, no token emitted.
                return;
            }
            if self.peek() == '\\' && self.peek_next() == quote {
                // Backslash-escaped quote: consume the backslash as a skip, keep scanning.
                self.advance();
                self.advance();
                continue;
            }
            if self.peek() == quote {
                break;
            }
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }
        let content: String = self.source[content_start..self.current].iter().collect();
        self.advance(); // closing quote
        self.add_literal(TokenKind::String, Literal::Str(content));
    }

    fn number(&mut self) {
        while is_digit(self.peek()) {
            self.advance();
        }
        if self.peek() == '.' && is_digit(self.peek_next()) {
            self.advance();
            while is_digit(self.peek()) {
                self.advance();
            }
        }
        let text = self.lexeme();
        let value: f64 = text.parse().unwrap_or(0.0);
        self.add_literal(TokenKind::Number, Literal::Number(value));
    }

    fn identifier(&mut self) {
        while is_alphanumeric(self.peek()) {
            self.advance();
        }
        let text = self.lexeme();
        match keyword_kind(&text) {
            Some(kind) => self.add(kind),
            None => self.add_literal(TokenKind::Identifier, Literal::Ident(text)),
        }
    }

    fn variable(&mut self) {
        while is_alphanumeric(self.peek()) {
            self.advance();
        }
        let text = self.lexeme();
        self.add_literal(TokenKind::Variable, Literal::Ident(text));
    }
}

/// Convenience wrapper around [`Lexer::new`]/[`Lexer::scan`].
pub fn scan(source: &str) -> Vec<Token> {
    Lexer::new(source).scan()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        scan(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn always_ends_with_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
        assert_eq!(kinds("$x"), vec![TokenKind::Variable, TokenKind::Eof]);
    }

    #[test]
    fn maximal_munch_operators() {
        assert_eq!(
            kinds("=== == = !== != ! .= ."),
            vec![
                TokenKind::EqualEqualEqual,
                TokenKind::EqualEqual,
                TokenKind::Equal,
                TokenKind::BangEqualEqual,
                TokenKind::BangEqual,
                TokenKind::Bang,
                TokenKind::DotEqual,
                TokenKind::Dot,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lone_ampersand_and_pipe_are_dropped() {
        assert_eq!(kinds("&"), vec![TokenKind::Eof]);
        assert_eq!(kinds("|"), vec![TokenKind::Eof]);
        assert_eq!(kinds("&&"), vec![TokenKind::And, TokenKind::Eof]);
        assert_eq!(kinds("||"), vec![TokenKind::Or, TokenKind::Eof]);
    }

    #[test]
    fn bare_dollar_is_a_valid_variable() {
        let tokens = scan("$");
        assert_eq!(tokens[0].kind, TokenKind::Variable);
        assert_eq!(tokens[0].lexeme, "$");
    }

    #[test]
    fn string_with_escaped_quote() {
        let tokens = scan(r#"'it\'s'"#);
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].literal, Literal::Str("it\\'s".to_string()));
    }

    #[test]
    fn unterminated_string_produces_no_token() {
        assert_eq!(kinds("\"abc"), vec![TokenKind::Eof]);
    }

    #[test]
    fn unterminated_block_comment_is_silently_accepted() {
        assert_eq!(kinds("/* never closes"), vec![TokenKind::Eof]);
    }

    #[test]
    fn newlines_increment_line_counter() {
        let tokens = scan("1\n2\n3");
        let lines: Vec<usize> = tokens.iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![1, 2, 3, 3]);
    }

    #[test]
    fn block_comment_newlines_still_count() {
        let tokens = scan("/* a\nb\nc */ 1");
        assert_eq!(tokens[0].line, 3);
    }

    #[test]
    fn keyword_vs_identifier() {
        assert_eq!(kinds("if"), vec![TokenKind::If, TokenKind::Eof]);
        assert_eq!(kinds("iffy"), vec![TokenKind::Identifier, TokenKind::Eof]);
    }

    #[test]
    fn unknown_characters_are_skipped() {
        assert_eq!(kinds("@#^"), vec![TokenKind::Eof]);
    }

    #[test]
    fn number_literal_payload() {
        let tokens = scan("3.5");
        assert_eq!(tokens[0].literal, Literal::Number(3.5));
    }

    #[test]
    fn round_trip_lexemes_reconstruct_meaningful_source() {
        let src = "$x=10; echo $x;";
        let tokens = scan(src);
        let joined = tokens
            .iter()
            .filter(|t| t.kind != TokenKind::Eof)
            .map(|t| t.lexeme.clone())
            .collect::<Vec<_>>()
            .join("");
        assert_eq!(joined, "$x=10;echo$x;");
    }
}

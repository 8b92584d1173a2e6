// Copyright 2026 Sean Kelleher. All rights reserved.
// Use of this source code is governed by an MIT
// licence that can be found in the LICENCE file.

mod scanner;

use self::scanner::Scanner;

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Ident(String),
    StrLiteral(String),

    Class,
    Def,
    Freeze,
    Module,
    Require,
    Undef,

    ColonColon,
    Dot,
    LessThan,
}

#[derive(Clone, Debug)]
pub enum LexError {
    Unexpected(Location, char),
    UnpairedColon(Location),
    UnterminatedStr(Location),
    InvalidEscapeChar(Location, char),
}

pub type Span = (Location, Token, Location);

pub type Location = (usize, usize);

pub struct Lexer<'input> {
    scanner: Scanner<'input>,
}

impl<'input> Lexer<'input> {
    pub fn new(src: &'input str) -> Self {
        Lexer{scanner: Scanner::new(src)}
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(c) = self.scanner.peek() {
            if c == '#' {
                while let Some(c_) = self.scanner.peek() {
                    if c_ == '\n' {
                        break;
                    }
                    self.scanner.advance();
                }
            } else {
                if !c.is_ascii_whitespace() {
                    return;
                }
                self.scanner.advance();
            }
        }
    }

    fn next_keyword_or_ident(&mut self) -> Token {
        let start = self.scanner.index();
        while let Some(c) = self.scanner.peek() {
            if !c.is_ascii_alphanumeric() && c != '_' {
                break;
            }
            self.scanner.advance();
        }
        let end = self.scanner.index();

        let t = self.scanner.slice(start, end);

        match t {
            "class" => Token::Class,
            "def" => Token::Def,
            "freeze" => Token::Freeze,
            "module" => Token::Module,
            "require" => Token::Require,
            "undef" => Token::Undef,

            _ => Token::Ident(t.to_string()),
        }
    }

    fn next_str_literal(&mut self) -> Result<Token, LexError> {
        let start_loc = self.scanner.loc();
        self.scanner.advance();

        let mut chars = vec![];
        let mut escaped = false;
        loop {
            let cur_loc = self.scanner.loc();
            let c =
                match self.scanner.advance() {
                    Some(c) => c,
                    None => {
                        return Err(LexError::UnterminatedStr(start_loc));
                    },
                };

            if escaped {
                if c == '\\' || c == '"' {
                    chars.push(c);
                } else if c == 'n' {
                    chars.push('\n');
                } else {
                    return Err(LexError::InvalidEscapeChar(cur_loc, c));
                }
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                break;
            } else {
                chars.push(c);
            }
        }

        Ok(Token::StrLiteral(chars.into_iter().collect()))
    }
}

impl<'input> Iterator for Lexer<'input> {
    type Item = Result<Span, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace_and_comments();

        let start_loc = self.scanner.loc();

        let c = self.scanner.peek()?;

        let t =
            if c.is_ascii_alphabetic() || c == '_' {
                self.next_keyword_or_ident()
            } else if c == '"' {
                match self.next_str_literal() {
                    Ok(t) => t,
                    Err(e) => return Some(Err(e)),
                }
            } else if c == ':' {
                self.scanner.advance();
                if let Some(':') = self.scanner.peek() {
                    self.scanner.advance();

                    Token::ColonColon
                } else {
                    return Some(Err(LexError::UnpairedColon(start_loc)));
                }
            } else if c == '.' {
                self.scanner.advance();

                Token::Dot
            } else if c == '<' {
                self.scanner.advance();

                Token::LessThan
            } else {
                return Some(Err(LexError::Unexpected(start_loc, c)));
            };

        let end_loc = self.scanner.loc();

        Some(Ok((start_loc, t, end_loc)))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lexes_statements() {
        let tests = &[
            (
                "class Parser < Object",
                vec![
                    Token::Class,
                    Token::Ident("Parser".to_string()),
                    Token::LessThan,
                    Token::Ident("Object".to_string()),
                ],
            ),
            (
                "def IO::Buffer.resize",
                vec![
                    Token::Def,
                    Token::Ident("IO".to_string()),
                    Token::ColonColon,
                    Token::Ident("Buffer".to_string()),
                    Token::Dot,
                    Token::Ident("resize".to_string()),
                ],
            ),
            (
                "require \"lib/helper.ice\" # load the helper",
                vec![
                    Token::Require,
                    Token::StrLiteral("lib/helper.ice".to_string()),
                ],
            ),
            (
                "freeze ::Util\nundef String.length",
                vec![
                    Token::Freeze,
                    Token::ColonColon,
                    Token::Ident("Util".to_string()),
                    Token::Undef,
                    Token::Ident("String".to_string()),
                    Token::Dot,
                    Token::Ident("length".to_string()),
                ],
            ),
        ];

        for (src, exp_toks) in tests {
            assert_lex(src, exp_toks);
        }
    }

    fn assert_lex(src: &str, exp_toks: &[Token]) {
        let toks: Vec<Token> =
            Lexer::new(src)
                .map(|r| {
                    let (_, t, _) = r.expect("unexpected lex error");

                    t
                })
                .collect();

        assert_eq!(exp_toks, &toks[..], "unexpected tokens for '{src}'");
    }

    #[test]
    fn test_tracks_spans() {
        let exp_spans = vec![
            ((1, 1), Token::Def, (1, 4)),
            ((1, 5), Token::Ident("Foo".to_string()), (1, 8)),
            ((1, 8), Token::Dot, (1, 9)),
            ((1, 9), Token::Ident("bar".to_string()), (1, 12)),
        ];

        let spans: Vec<Span> =
            Lexer::new("def Foo.bar")
                .map(|r| r.expect("unexpected lex error"))
                .collect();

        assert_eq!(exp_spans, spans);
    }

    #[test]
    fn test_rejects_unexpected_chars() {
        let e = first_lex_error("class Foo {");

        assert!(
            matches!(e, LexError::Unexpected((1, 11), '{')),
            "unexpected lex error: {e:?}",
        );
    }

    #[test]
    fn test_rejects_unpaired_colons() {
        let e = first_lex_error("freeze Util:Text");

        assert!(
            matches!(e, LexError::UnpairedColon((1, 12))),
            "unexpected lex error: {e:?}",
        );
    }

    #[test]
    fn test_rejects_unterminated_strs() {
        let e = first_lex_error("require \"lib/helper");

        assert!(
            matches!(e, LexError::UnterminatedStr((1, 9))),
            "unexpected lex error: {e:?}",
        );
    }

    // `first_lex_error` stops at the first error because the lexer doesn't
    // consume the character it couldn't lex.
    fn first_lex_error(src: &str) -> LexError {
        let r = Lexer::new(src).find(Result::is_err)
            .expect("expected a lex error");

        r.expect_err("expected a lex error")
    }
}

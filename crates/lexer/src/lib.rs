pub mod token;

use logos::Logos;
use std::ops::Range;
use token::Token;

/// Tokenize an encoding string, keeping byte spans.
///
/// Lexing never fails: a character logos rejects becomes a one-character
/// `Token::Unknown` and lexing resumes right after it.
pub fn lex(source: &str) -> Vec<(Token, Range<usize>)> {
    let mut tokens = Vec::new();
    let mut base = 0;

    'restart: while base < source.len() {
        let mut lexer = Token::lexer(&source[base..]);

        while let Some(result) = lexer.next() {
            let span = lexer.span();
            let (start, end) = (base + span.start, base + span.end);

            match result {
                Ok(token) => tokens.push((token, start..end)),
                Err(()) => {
                    let Some(ch) = source[start..].chars().next() else {
                        break 'restart;
                    };
                    let next = start + ch.len_utf8();
                    tokens.push((Token::Unknown(ch), start..next));

                    // The rejected slice may hide valid tokens (`@"Foo` without a
                    // closing quote, an overflowing number); re-lex after one char.
                    if next != end {
                        base = next;
                        continue 'restart;
                    }
                }
            }
        }

        break;
    }

    tokens
}

/// Tokens only, for callers that do not need spans.
pub fn lex_tokens(source: &str) -> Vec<Token> {
    lex(source).into_iter().map(|(token, _)| token).collect()
}

#[cfg(test)]
mod tests;

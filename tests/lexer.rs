mod common;

use paste::paste;
use pretty_assertions::assert_eq;

use mcfn::errors::{TokenError, TokenErrorKind};
use mcfn::parse::token::Quote;
use mcfn::parse::{tokenize, tokenize_with, TokenKind, TokenValue, TokenizerConfig};

use self::common::{at, pos};

const CONTINUATION: TokenizerConfig = TokenizerConfig {
    line_continuation: true,
};

fn kinds(src: &str) -> Vec<(TokenKind, String)> {
    kinds_with(src, TokenizerConfig::default())
}

fn kinds_with(src: &str, config: TokenizerConfig) -> Vec<(TokenKind, String)> {
    tokenize_with(src, config)
        .unwrap()
        .iter()
        .map(|token| (token.kind(), token.text.to_string()))
        .collect()
}

fn expect(tokens: &[(TokenKind, &str)]) -> Vec<(TokenKind, String)> {
    tokens
        .iter()
        .map(|&(kind, text)| (kind, text.to_owned()))
        .collect()
}

macro_rules! lossless_tests {
    { $( $name:ident => $src:expr ),+ $(,)? } => {
        $(
            paste! {
                #[test]
                fn [< lossless_ $name >]() {
                    let src: &str = $src;
                    let tokens = tokenize_with(src, CONTINUATION).unwrap();
                    let text: String = tokens.iter().map(|token| token.text.as_ref()).collect();

                    assert_eq!(text, src);
                }
            }
        )+
    };
}

lossless_tests! {
    empty => "",
    words => "say hello world",
    comments => "# header\n  # indented\nsay x\n",
    selector => "@e[type=!minecraft:zombie,distance=..5]",
    nbt => "{a:[B;1b,-2b],b:\"q\\\"uote\",c:-.5f}",
    crlf => "say a\r\nsay b\r\n",
    continuation => "say a \\\n    b",
    unicode => "say héllo §6wörld",
    numbers => "1..5 -3 4.5d 2147483648",
}

#[test]
fn test_words_and_spaces() {
    assert_eq!(
        kinds("say hi"),
        expect(&[
            (TokenKind::Literal, "say"),
            (TokenKind::Space, " "),
            (TokenKind::Literal, "hi"),
        ])
    );
}

#[test]
fn test_tab_is_space() {
    assert_eq!(
        kinds("a\tb"),
        expect(&[
            (TokenKind::Literal, "a"),
            (TokenKind::Space, "\t"),
            (TokenKind::Literal, "b"),
        ])
    );
}

#[test]
fn test_comment_at_line_start() {
    assert_eq!(
        kinds("# comment\nsay hi"),
        expect(&[
            (TokenKind::Comment, "# comment"),
            (TokenKind::Newline, "\n"),
            (TokenKind::Literal, "say"),
            (TokenKind::Space, " "),
            (TokenKind::Literal, "hi"),
        ])
    );
}

#[test]
fn test_indented_comment() {
    assert_eq!(
        kinds("say a\n  # note\n"),
        expect(&[
            (TokenKind::Literal, "say"),
            (TokenKind::Space, " "),
            (TokenKind::Literal, "a"),
            (TokenKind::Newline, "\n  "),
            (TokenKind::Comment, "# note"),
            (TokenKind::Newline, "\n"),
        ])
    );
}

#[test]
fn test_hash_inside_line_is_control() {
    assert_eq!(
        kinds("function #foo:bar"),
        expect(&[
            (TokenKind::Literal, "function"),
            (TokenKind::Space, " "),
            (TokenKind::Control, "#"),
            (TokenKind::Literal, "foo"),
            (TokenKind::Control, ":"),
            (TokenKind::Literal, "bar"),
        ])
    );
}

#[test]
fn test_booleans() {
    assert_eq!(
        kinds("true false truex"),
        expect(&[
            (TokenKind::Boolean, "true"),
            (TokenKind::Space, " "),
            (TokenKind::Boolean, "false"),
            (TokenKind::Space, " "),
            (TokenKind::Literal, "truex"),
        ])
    );
}

#[test]
fn test_double_dot() {
    assert_eq!(
        kinds("1..5"),
        expect(&[
            (TokenKind::Number, "1"),
            (TokenKind::Control, ".."),
            (TokenKind::Number, "5"),
        ])
    );

    assert_eq!(
        kinds("1.5"),
        expect(&[
            (TokenKind::Number, "1"),
            (TokenKind::Control, "."),
            (TokenKind::Number, "5"),
        ])
    );
}

#[test]
fn test_brackets() {
    let tokens = tokenize("[{()}]").unwrap();
    let brackets: Vec<_> = tokens.iter().map(|token| token.value.clone()).collect();

    assert_eq!(
        brackets,
        "[{()}]"
            .chars()
            .map(TokenValue::Bracket)
            .collect::<Vec<_>>()
    );
}

#[test]
fn test_quoted_strings() {
    let tokens = tokenize(r#""a\"b" 'it'"#).unwrap();

    assert_eq!(
        tokens[0].value,
        TokenValue::QuotedString {
            quote: Quote::Double,
            value: "a\"b".into(),
        }
    );
    assert_eq!(tokens[0].text, r#""a\"b""#);

    assert_eq!(
        tokens[2].value,
        TokenValue::QuotedString {
            quote: Quote::Single,
            value: "it".into(),
        }
    );
}

#[test]
fn test_unknown_character() {
    let tokens = kinds("say §");

    assert_eq!(tokens.last(), Some(&(TokenKind::Unknown, "§".to_owned())));
}

#[test]
fn test_positions() {
    let tokens = tokenize("a\n  b").unwrap();

    assert_eq!(tokens[1].text, "\n  ");
    assert_eq!(tokens[1].pos, pos(1, 0, 1));
    assert_eq!(tokens[2].pos, pos(4, 1, 2));

    let tokens = tokenize("é b").unwrap();
    assert_eq!(tokens[2].pos, pos(3, 0, 2));
}

#[test]
fn test_deterministic() {
    let src = "execute as @a[tag=!x] run say {\"a\":1}\n";

    assert_eq!(tokenize(src).unwrap(), tokenize(src).unwrap());
}

#[test]
fn test_unterminated_string() {
    assert_eq!(
        tokenize("\"abc"),
        Err(TokenError::new(TokenErrorKind::UnterminatedString, at(0)))
    );

    assert_eq!(
        tokenize("say \"a\nb\""),
        Err(TokenError::new(TokenErrorKind::UnterminatedString, at(4)))
    );
}

#[test]
fn test_number_range() {
    assert!(tokenize("2147483648").is_ok());
    assert!(tokenize("-2147483648").is_ok());
    assert!(tokenize("3000000000l").is_ok());
    assert!(tokenize("3000000000d").is_ok());
    assert!(tokenize("3000000000.5").is_ok());
    assert!(tokenize("0.3000000000").is_ok());

    assert_eq!(
        tokenize("2147483649"),
        Err(TokenError::new(
            TokenErrorKind::NumberOutOfRange {
                digits: "2147483649".to_owned(),
                bits: 32,
            },
            at(0)
        ))
    );

    assert_eq!(
        tokenize("say 99999999999999999999l"),
        Err(TokenError::new(
            TokenErrorKind::NumberOutOfRange {
                digits: "99999999999999999999".to_owned(),
                bits: 64,
            },
            at(4)
        ))
    );
}

#[test]
fn test_number_range_message() {
    let message = |src: &str| match tokenize(src) {
        Err(e) => e.kind.to_string(),
        Ok(tokens) => panic!("{src:?} tokenized successfully: {tokens:#?}"),
    };

    assert_eq!(
        message("2147483649"),
        "the number literal `2147483649` does not fit in a 32-bit integer"
    );
    assert_eq!(
        message("9223372036854775808L"),
        "the number literal `9223372036854775808` does not fit in a 64-bit integer"
    );
}

#[test]
fn test_control_character() {
    assert_eq!(
        tokenize("say \u{7}"),
        Err(TokenError::new(
            TokenErrorKind::UnrecognizedCharacter('\u{7}'),
            at(4)
        ))
    );
}

#[test]
fn test_line_continuation() {
    assert_eq!(
        kinds_with("say a \\\n  b", CONTINUATION),
        expect(&[
            (TokenKind::Literal, "say"),
            (TokenKind::Space, " "),
            (TokenKind::Literal, "a"),
            (TokenKind::Space, " "),
            (TokenKind::Space, "\\\n  "),
            (TokenKind::Literal, "b"),
        ])
    );

    assert_eq!(
        kinds_with("a \\\r\nb", CONTINUATION),
        expect(&[
            (TokenKind::Literal, "a"),
            (TokenKind::Space, " "),
            (TokenKind::Space, "\\\r\n"),
            (TokenKind::Literal, "b"),
        ])
    );
}

#[test]
fn test_backslash_without_continuation() {
    assert_eq!(
        kinds("say a \\\n  b"),
        expect(&[
            (TokenKind::Literal, "say"),
            (TokenKind::Space, " "),
            (TokenKind::Literal, "a"),
            (TokenKind::Space, " "),
            (TokenKind::Unknown, "\\"),
            (TokenKind::Newline, "\n  "),
            (TokenKind::Literal, "b"),
        ])
    );
}

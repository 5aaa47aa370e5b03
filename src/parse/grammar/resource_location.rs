use tracing::instrument;

use crate::ast::ResourceLocation;
use crate::errors::{ResultExt, SyntaxError, SyntaxErrorKind};
use crate::parse::parser::Parser;
use crate::parse::token::{Token, TokenKind};

fn is_namespace_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '.' | '-')
}

fn is_path_char(c: char) -> bool {
    is_namespace_char(c) || c == '/'
}

fn is_id_token(token: &Token<'_>) -> bool {
    match token.kind() {
        TokenKind::Literal
        | TokenKind::Number
        | TokenKind::Int
        | TokenKind::Float
        | TokenKind::Boolean => true,
        TokenKind::Control => !token.is_control(",") && !token.is_control("="),
        _ => false,
    }
}

impl Parser<'_, '_> {
    /// Parses `[#][namespace:]path`.
    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_resource_location(
        &mut self,
        allow_tag: bool,
    ) -> Result<ResourceLocation, SyntaxError> {
        let pos = self.pos();

        self.parse_resource_location_inner(allow_tag)
            .context("a resource location", pos)
    }

    fn parse_resource_location_inner(
        &mut self,
        allow_tag: bool,
    ) -> Result<ResourceLocation, SyntaxError> {
        let pos = self.pos();

        let is_tag = match self.peek() {
            Some(token) if token.is_control("#") => {
                if !allow_tag {
                    return Err(self.error(SyntaxErrorKind::TagNotAllowed));
                }

                self.bump();

                true
            }

            _ => false,
        };

        let text = self.collect_id_text();

        if text.is_empty() {
            return Err(self.unexpected("a resource location"));
        }

        let invalid = || {
            let shown = if is_tag { format!("#{text}") } else { text.clone() };

            SyntaxError::new(SyntaxErrorKind::InvalidResourceLocation(shown), pos)
        };

        let (namespace, path) = match text.split_once(':') {
            Some((namespace, path)) => (namespace, path),
            None => ("", text.as_str()),
        };

        let valid = !path.is_empty()
            && !path.contains(':')
            && (text.find(':').is_none() || !namespace.is_empty())
            && namespace.chars().all(is_namespace_char)
            && path.chars().all(is_path_char);

        if !valid {
            return Err(invalid());
        }

        Ok(ResourceLocation {
            pos,
            is_tag,
            namespace: namespace.to_owned(),
            path: path.to_owned(),
        })
    }

    fn collect_id_text(&mut self) -> String {
        let mut text = Vec::new();

        while let Some(token) = self.peek().filter(|token| is_id_token(token)) {
            text.push(token.text.as_ref());
            self.bump();
        }

        text.join("")
    }
}

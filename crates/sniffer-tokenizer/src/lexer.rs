//! PHP lexer - splits source text into classified raw tokens
//!
//! The lexer never fails: anything it does not recognise becomes an
//! `Unknown` token, and an unterminated string or comment runs to the end
//! of the input. Concatenating the text of all tokens always reproduces
//! the input exactly.

use std::iter::Peekable;
use std::str::Chars;

use sniffer_core::TokenKind;

/// A token before structural metadata is attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    pub kind: TokenKind,
    pub text: String,
}

impl RawToken {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Operators, longest first
const OPERATORS: &[(&str, TokenKind)] = &[
    ("===", TokenKind::IsIdentical),
    ("!==", TokenKind::IsNotIdentical),
    ("<=>", TokenKind::Spaceship),
    ("**=", TokenKind::AssignOp),
    ("<<=", TokenKind::AssignOp),
    (">>=", TokenKind::AssignOp),
    ("??=", TokenKind::AssignOp),
    ("?->", TokenKind::NullsafeObjectOperator),
    ("...", TokenKind::Ellipsis),
    ("==", TokenKind::IsEqual),
    ("!=", TokenKind::IsNotEqual),
    ("<>", TokenKind::IsNotEqual),
    ("<=", TokenKind::IsSmallerOrEqual),
    (">=", TokenKind::IsGreaterOrEqual),
    ("&&", TokenKind::BooleanAnd),
    ("||", TokenKind::BooleanOr),
    ("??", TokenKind::Coalesce),
    ("->", TokenKind::ObjectOperator),
    ("=>", TokenKind::DoubleArrow),
    ("::", TokenKind::DoubleColon),
    ("++", TokenKind::Inc),
    ("--", TokenKind::Dec),
    ("+=", TokenKind::AssignOp),
    ("-=", TokenKind::AssignOp),
    ("*=", TokenKind::AssignOp),
    ("/=", TokenKind::AssignOp),
    (".=", TokenKind::AssignOp),
    ("%=", TokenKind::AssignOp),
    ("&=", TokenKind::AssignOp),
    ("|=", TokenKind::AssignOp),
    ("^=", TokenKind::AssignOp),
    ("<<", TokenKind::ShiftLeft),
    (">>", TokenKind::ShiftRight),
    ("**", TokenKind::Pow),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Multiply),
    ("/", TokenKind::Divide),
    ("%", TokenKind::Modulus),
    ("=", TokenKind::Equal),
    ("<", TokenKind::LessThan),
    (">", TokenKind::GreaterThan),
    ("!", TokenKind::BooleanNot),
    (".", TokenKind::StringConcat),
    ("&", TokenKind::BitwiseAnd),
    ("|", TokenKind::BitwiseOr),
    ("^", TokenKind::BitwiseXor),
    ("~", TokenKind::BitwiseNot),
    ("?", TokenKind::InlineThen),
    (":", TokenKind::Colon),
    (";", TokenKind::Semicolon),
    (",", TokenKind::Comma),
    ("(", TokenKind::OpenParenthesis),
    (")", TokenKind::CloseParenthesis),
    ("[", TokenKind::OpenSquareBracket),
    ("]", TokenKind::CloseSquareBracket),
    ("{", TokenKind::OpenCurlyBracket),
    ("}", TokenKind::CloseCurlyBracket),
    ("@", TokenKind::Asperand),
    ("$", TokenKind::Dollar),
    ("\\", TokenKind::NsSeparator),
];

/// Keyword kind for a lower-cased word
pub(crate) fn keyword(word: &str) -> Option<TokenKind> {
    let kind = match word {
        "abstract" => TokenKind::Abstract,
        "and" => TokenKind::LogicalAnd,
        "array" => TokenKind::Array,
        "as" => TokenKind::As,
        "break" => TokenKind::Break,
        "case" => TokenKind::Case,
        "catch" => TokenKind::Catch,
        "class" => TokenKind::Class,
        "clone" => TokenKind::Clone,
        "const" => TokenKind::Const,
        "continue" => TokenKind::Continue,
        "declare" => TokenKind::Declare,
        "default" => TokenKind::Default,
        "do" => TokenKind::Do,
        "echo" => TokenKind::Echo,
        "else" => TokenKind::Else,
        "elseif" => TokenKind::ElseIf,
        "empty" => TokenKind::Empty,
        "enddeclare" => TokenKind::EndDeclare,
        "endfor" => TokenKind::EndFor,
        "endforeach" => TokenKind::EndForeach,
        "endif" => TokenKind::EndIf,
        "endswitch" => TokenKind::EndSwitch,
        "endwhile" => TokenKind::EndWhile,
        "enum" => TokenKind::Enum,
        "extends" => TokenKind::Extends,
        "false" => TokenKind::False,
        "final" => TokenKind::Final,
        "finally" => TokenKind::Finally,
        "fn" => TokenKind::Fn,
        "for" => TokenKind::For,
        "foreach" => TokenKind::Foreach,
        "function" => TokenKind::Function,
        "global" => TokenKind::Global,
        "goto" => TokenKind::Goto,
        "if" => TokenKind::If,
        "implements" => TokenKind::Implements,
        "include" => TokenKind::Include,
        "include_once" => TokenKind::IncludeOnce,
        "instanceof" => TokenKind::InstanceOf,
        "insteadof" => TokenKind::InsteadOf,
        "interface" => TokenKind::Interface,
        "isset" => TokenKind::Isset,
        "list" => TokenKind::List,
        "match" => TokenKind::Match,
        "namespace" => TokenKind::Namespace,
        "new" => TokenKind::New,
        "null" => TokenKind::Null,
        "or" => TokenKind::LogicalOr,
        "parent" => TokenKind::Parent,
        "print" => TokenKind::Print,
        "private" => TokenKind::Private,
        "protected" => TokenKind::Protected,
        "public" => TokenKind::Public,
        "readonly" => TokenKind::Readonly,
        "require" => TokenKind::Require,
        "require_once" => TokenKind::RequireOnce,
        "return" => TokenKind::Return,
        "self" => TokenKind::SelfKeyword,
        "static" => TokenKind::Static,
        "switch" => TokenKind::Switch,
        "throw" => TokenKind::Throw,
        "trait" => TokenKind::Trait,
        "true" => TokenKind::True,
        "try" => TokenKind::Try,
        "unset" => TokenKind::Unset,
        "use" => TokenKind::Use,
        "var" => TokenKind::Var,
        "while" => TokenKind::While,
        "xor" => TokenKind::LogicalXor,
        "yield" => TokenKind::Yield,
        _ => return None,
    };
    Some(kind)
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || !ch.is_ascii()
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || !ch.is_ascii()
}

pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<Chars<'a>>,
    position: usize,
    tokens: Vec<RawToken>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
            tokens: Vec::new(),
        }
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next();
        if let Some(c) = ch {
            self.position += c.len_utf8();
        }
        ch
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn at(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    fn at_ignore_case(&self, prefix: &str) -> bool {
        self.rest()
            .get(..prefix.len())
            .is_some_and(|s| s.eq_ignore_ascii_case(prefix))
    }

    /// Consume `n` bytes of ASCII text
    fn skip(&mut self, n: usize) {
        let target = self.position + n;
        while self.position < target && self.advance().is_some() {}
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.advance();
        }
    }

    /// Consume up to and including the next newline, or to the end
    fn advance_line(&mut self) {
        while let Some(ch) = self.advance() {
            if ch == '\n' {
                break;
            }
        }
    }

    fn emit(&mut self, kind: TokenKind, start: usize) {
        if self.position > start {
            let text = &self.input[start..self.position];
            self.tokens.push(RawToken::new(kind, text));
        }
    }

    pub fn tokenize(mut self) -> Vec<RawToken> {
        while self.position < self.input.len() {
            self.lex_inline_html();
            self.lex_php();
        }
        self.tokens
    }

    /// Text outside PHP tags, one token per line, then the open tag
    fn lex_inline_html(&mut self) {
        let mut start = self.position;
        while self.position < self.input.len() {
            if self.at_ignore_case("<?php") || self.at("<?=") {
                break;
            }
            if self.advance() == Some('\n') {
                self.emit(TokenKind::InlineHtml, start);
                start = self.position;
            }
        }
        self.emit(TokenKind::InlineHtml, start);

        let start = self.position;
        if self.at("<?=") {
            self.skip(3);
            self.emit(TokenKind::OpenTagWithEcho, start);
        } else if self.at_ignore_case("<?php") {
            self.skip(5);
            // the open tag owns a single following whitespace character
            if self.at("\r\n") {
                self.skip(2);
            } else if matches!(self.peek(), Some(' ' | '\t' | '\n')) {
                self.advance();
            }
            self.emit(TokenKind::OpenTag, start);
        }
    }

    /// Tokens up to and including the close tag
    fn lex_php(&mut self) {
        while let Some(ch) = self.peek() {
            let start = self.position;

            if self.at("?>") {
                self.skip(2);
                if self.at("\r\n") {
                    self.skip(2);
                } else if self.peek() == Some('\n') {
                    self.advance();
                }
                self.emit(TokenKind::CloseTag, start);
                return;
            }

            match ch {
                ' ' | '\t' | '\r' | '\n' => self.lex_whitespace(),
                '#' if self.at("#[") => {
                    self.skip(2);
                    self.emit(TokenKind::Attribute, start);
                }
                '#' => self.lex_line_comment(),
                '/' if self.at("//") => self.lex_line_comment(),
                '/' if self.at("/**") && self.is_doc_comment() => self.lex_doc_comment(),
                '/' if self.at("/*") => self.lex_block_comment(),
                '$' if self.rest()[1..].starts_with(is_ident_start) => {
                    self.advance();
                    self.advance_while(is_ident_char);
                    self.emit(TokenKind::Variable, start);
                }
                '\'' => self.lex_single_quoted(),
                '"' => self.lex_double_quoted(),
                '`' => self.lex_backtick(),
                '<' if self.at("<<<") => self.lex_heredoc(),
                '0'..='9' => self.lex_number(),
                '.' if self.rest()[1..].starts_with(|c: char| c.is_ascii_digit()) => self.lex_number(),
                c if is_ident_start(c) => {
                    self.advance_while(is_ident_char);
                    let word = &self.input[start..self.position];
                    let kind = keyword(&word.to_ascii_lowercase()).unwrap_or(TokenKind::String);
                    self.emit(kind, start);
                }
                _ => self.lex_operator(),
            }
        }
    }

    /// Spaces and tabs, ending at (and including) a newline
    fn lex_whitespace(&mut self) {
        let start = self.position;
        self.advance_while(|c| matches!(c, ' ' | '\t' | '\r'));
        if self.peek() == Some('\n') {
            self.advance();
        }
        self.emit(TokenKind::Whitespace, start);
    }

    /// `//` and `#` comments, including the newline, stopping before `?>`
    fn lex_line_comment(&mut self) {
        let start = self.position;
        while let Some(ch) = self.peek() {
            if self.at("?>") {
                break;
            }
            self.advance();
            if ch == '\n' {
                break;
            }
        }
        self.emit(TokenKind::Comment, start);
    }

    /// `/* */` comments, one token per line
    fn lex_block_comment(&mut self) {
        let mut start = self.position;
        self.skip(2);
        while self.position < self.input.len() {
            if self.at("*/") {
                self.skip(2);
                break;
            }
            if self.advance() == Some('\n') {
                self.emit(TokenKind::Comment, start);
                start = self.position;
            }
        }
        self.emit(TokenKind::Comment, start);
    }

    fn is_doc_comment(&self) -> bool {
        self.rest()[3..]
            .chars()
            .next()
            .is_some_and(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
    }

    /// `/** */` comments, split into open tag, stars, tags, strings,
    /// whitespace and close tag
    fn lex_doc_comment(&mut self) {
        let start = self.position;
        self.skip(3);
        self.emit(TokenKind::DocCommentOpenTag, start);

        let mut line_start = false;
        while self.position < self.input.len() {
            let start = self.position;

            if self.at("*/") {
                self.skip(2);
                self.emit(TokenKind::DocCommentCloseTag, start);
                return;
            }

            match self.peek() {
                Some('\n') => {
                    self.advance();
                    self.emit(TokenKind::DocCommentWhitespace, start);
                    line_start = true;
                }
                Some('\r') if self.at("\r\n") => {
                    self.skip(2);
                    self.emit(TokenKind::DocCommentWhitespace, start);
                    line_start = true;
                }
                Some(' ' | '\t' | '\r') => {
                    self.advance_while(|c| matches!(c, ' ' | '\t' | '\r'));
                    self.emit(TokenKind::DocCommentWhitespace, start);
                }
                Some('*') if line_start => {
                    self.advance();
                    self.emit(TokenKind::DocCommentStar, start);
                    line_start = false;
                }
                Some('@') if self.rest()[1..].starts_with(|c: char| c.is_ascii_alphabetic() || c == '_' || c == '\\') => {
                    self.advance();
                    self.advance_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '\\' | ':'));
                    self.emit(TokenKind::DocCommentTag, start);
                    line_start = false;
                }
                Some(_) => {
                    self.lex_doc_string();
                    line_start = false;
                }
                None => break,
            }
        }
    }

    /// Free text up to the end of the line or the close tag; trailing
    /// whitespace becomes its own token
    fn lex_doc_string(&mut self) {
        let start = self.position;
        let mut end = start;
        while let Some(ch) = self.peek() {
            if ch == '\n' || self.at("*/") || self.at("\r\n") {
                break;
            }
            self.advance();
            if !matches!(ch, ' ' | '\t' | '\r') {
                end = self.position;
            }
        }
        let trailing = self.position;
        self.tokens
            .push(RawToken::new(TokenKind::DocCommentString, &self.input[start..end]));
        if trailing > end {
            self.tokens
                .push(RawToken::new(TokenKind::DocCommentWhitespace, &self.input[end..trailing]));
        }
    }

    fn lex_single_quoted(&mut self) {
        let start = self.position;
        self.advance();
        while let Some(ch) = self.advance() {
            match ch {
                '\\' => {
                    self.advance();
                }
                '\'' => break,
                _ => {}
            }
        }
        self.emit(TokenKind::ConstantEncapsedString, start);
    }

    fn lex_double_quoted(&mut self) {
        let start = self.position;
        self.advance();
        let mut interpolated = false;
        while let Some(ch) = self.advance() {
            match ch {
                '\\' => {
                    self.advance();
                }
                '"' => break,
                '$' if self.peek().is_some_and(|c| is_ident_start(c) || c == '{') => {
                    interpolated = true;
                }
                '{' if self.peek() == Some('$') => interpolated = true,
                _ => {}
            }
        }
        let kind = if interpolated {
            TokenKind::DoubleQuotedString
        } else {
            TokenKind::ConstantEncapsedString
        };
        self.emit(kind, start);
    }

    fn lex_backtick(&mut self) {
        let start = self.position;
        self.advance();
        while let Some(ch) = self.advance() {
            match ch {
                '\\' => {
                    self.advance();
                }
                '`' => break,
                _ => {}
            }
        }
        self.emit(TokenKind::Backtick, start);
    }

    /// Heredoc and nowdoc bodies, through the closing identifier
    fn lex_heredoc(&mut self) {
        let start = self.position;
        let header = &self.rest()[3..];
        let trimmed = header.trim_start_matches([' ', '\t']);
        let quoted = trimmed.starts_with(['\'', '"']);
        let name_start = if quoted { &trimmed[1..] } else { trimmed };
        let name: String = name_start.chars().take_while(|&c| is_ident_char(c)).collect();

        if name.is_empty() || !name_start.starts_with(is_ident_start) {
            self.skip(2);
            self.emit(TokenKind::ShiftLeft, start);
            return;
        }

        // header line
        self.advance_line();
        loop {
            if self.position >= self.input.len() {
                break;
            }
            let line = self.rest();
            let body = line.trim_start_matches([' ', '\t']);
            let ends = body.starts_with(name.as_str())
                && !body[name.len()..].starts_with(is_ident_char);
            if ends {
                let indent = line.len() - body.len();
                self.skip(indent + name.len());
                break;
            }
            self.advance_line();
        }
        self.emit(TokenKind::Heredoc, start);
    }

    fn lex_number(&mut self) {
        let start = self.position;
        let rest = self.rest();
        let mut float = false;

        if rest.len() > 1 && rest.starts_with('0') && matches!(rest.as_bytes()[1], b'x' | b'X' | b'b' | b'B' | b'o' | b'O') {
            self.skip(2);
            self.advance_while(|c| c.is_ascii_hexdigit() || c == '_');
        } else {
            self.advance_while(|c| c.is_ascii_digit() || c == '_');
            if self.peek() == Some('.') && !self.at("..") {
                float = true;
                self.advance();
                self.advance_while(|c| c.is_ascii_digit() || c == '_');
            }
            if matches!(self.peek(), Some('e' | 'E')) {
                let exp = &self.rest()[1..];
                let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
                if digits.starts_with(|c: char| c.is_ascii_digit()) {
                    float = true;
                    self.skip(1 + exp.len() - digits.len());
                    self.advance_while(|c| c.is_ascii_digit() || c == '_');
                }
            }
        }

        let kind = if float {
            TokenKind::DNumber
        } else {
            TokenKind::LNumber
        };
        self.emit(kind, start);
    }

    fn lex_operator(&mut self) {
        let start = self.position;
        let found = OPERATORS.iter().find(|(op, _)| self.at(op)).copied();
        match found {
            Some((op, kind)) => {
                self.skip(op.len());
                self.emit(kind, start);
            }
            None => {
                self.advance();
                self.emit(TokenKind::Unknown, start);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<(TokenKind, String)> {
        Lexer::new(source)
            .tokenize()
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).into_iter().map(|(k, _)| k).collect()
    }

    #[test]
    fn test_round_trip() {
        let source = "<html>\n<?php\n/** @var int */\n$a = [1, 2.5, 'x', \"$y\"]; // c\n?>\ntail";
        let text: String = lex(source).into_iter().map(|(_, t)| t).collect();
        assert_eq!(text, source);
    }

    #[test]
    fn test_open_tag_takes_one_newline() {
        let tokens = lex("<?php\n\n$a;");
        assert_eq!(tokens[0], (TokenKind::OpenTag, "<?php\n".to_string()));
        assert_eq!(tokens[1], (TokenKind::Whitespace, "\n".to_string()));
        assert_eq!(tokens[2].0, TokenKind::Variable);
    }

    #[test]
    fn test_whitespace_split_per_line() {
        let tokens = lex("<?php $a;  \n\n    $b;");
        let ws: Vec<&str> = tokens
            .iter()
            .filter(|(k, _)| *k == TokenKind::Whitespace)
            .map(|(_, t)| t.as_str())
            .collect();
        assert_eq!(ws, vec!["  \n", "\n", "    "]);
    }

    #[test]
    fn test_comments_include_newline() {
        let tokens = lex("<?php // one\n# two\n/* a\n b */");
        assert_eq!(tokens[1], (TokenKind::Comment, "// one\n".to_string()));
        assert_eq!(tokens[2], (TokenKind::Comment, "# two\n".to_string()));
        assert_eq!(tokens[3], (TokenKind::Comment, "/* a\n".to_string()));
        assert_eq!(tokens[4], (TokenKind::Comment, " b */".to_string()));
    }

    #[test]
    fn test_doc_comment_parts() {
        let tokens = lex("<?php /**\n * Summary here \n * @param int $a\n */");
        let parts: Vec<(TokenKind, &str)> = tokens[1..].iter().map(|(k, t)| (*k, t.as_str())).collect();
        use TokenKind::*;
        assert_eq!(
            parts,
            vec![
                (DocCommentOpenTag, "/**"),
                (DocCommentWhitespace, "\n"),
                (DocCommentWhitespace, " "),
                (DocCommentStar, "*"),
                (DocCommentWhitespace, " "),
                (DocCommentString, "Summary here"),
                (DocCommentWhitespace, " "),
                (DocCommentWhitespace, "\n"),
                (DocCommentWhitespace, " "),
                (DocCommentStar, "*"),
                (DocCommentWhitespace, " "),
                (DocCommentTag, "@param"),
                (DocCommentWhitespace, " "),
                (DocCommentString, "int $a"),
                (DocCommentWhitespace, "\n"),
                (DocCommentWhitespace, " "),
                (DocCommentCloseTag, "*/"),
            ]
        );
    }

    #[test]
    fn test_one_line_doc_comment() {
        use TokenKind::*;
        assert_eq!(
            kinds("<?php /** @var int $x */"),
            vec![
                OpenTag,
                DocCommentOpenTag,
                DocCommentWhitespace,
                DocCommentTag,
                DocCommentWhitespace,
                DocCommentString,
                DocCommentWhitespace,
                DocCommentCloseTag,
            ]
        );
    }

    #[test]
    fn test_strings() {
        let tokens = lex("<?php 'a\\'b' \"plain\" \"$x y\" \"{$a}\"");
        let strings: Vec<TokenKind> = tokens
            .iter()
            .filter(|(k, _)| *k != TokenKind::Whitespace && *k != TokenKind::OpenTag)
            .map(|(k, _)| *k)
            .collect();
        assert_eq!(
            strings,
            vec![
                TokenKind::ConstantEncapsedString,
                TokenKind::ConstantEncapsedString,
                TokenKind::DoubleQuotedString,
                TokenKind::DoubleQuotedString,
            ]
        );
    }

    #[test]
    fn test_heredoc_single_token() {
        let tokens = lex("<?php $a = <<<EOT\nline $x\n  EOT;\n");
        assert_eq!(tokens[5], (TokenKind::Heredoc, "<<<EOT\nline $x\n  EOT".to_string()));
        assert_eq!(tokens[6].0, TokenKind::Semicolon);
    }

    #[test]
    fn test_operators_longest_match() {
        use TokenKind::*;
        assert_eq!(
            kinds("<?php $a===$b&&$c?->d??=1"),
            vec![
                OpenTag,
                Variable,
                IsIdentical,
                Variable,
                BooleanAnd,
                Variable,
                NullsafeObjectOperator,
                String,
                AssignOp,
                LNumber,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        use TokenKind::*;
        assert_eq!(
            kinds("<?php 1 0x1F 1.5 1e3 1_000"),
            vec![OpenTag, LNumber, Whitespace, LNumber, Whitespace, DNumber, Whitespace, DNumber, Whitespace, LNumber]
        );
    }

    #[test]
    fn test_close_tag_returns_to_html() {
        use TokenKind::*;
        assert_eq!(
            kinds("<?php echo 1 ?>\n<p>\n<?= $x ?>"),
            vec![
                OpenTag, Echo, Whitespace, LNumber, Whitespace, CloseTag, InlineHtml, OpenTagWithEcho,
                Whitespace, Variable, Whitespace, CloseTag,
            ]
        );
    }

    #[test]
    fn test_html_before_open_tag_on_same_line() {
        use TokenKind::*;
        assert_eq!(
            lex("<p><?php ?>a<?php  $x;"),
            vec![
                (InlineHtml, "<p>".to_string()),
                (OpenTag, "<?php ".to_string()),
                (CloseTag, "?>".to_string()),
                (InlineHtml, "a".to_string()),
                (OpenTag, "<?php ".to_string()),
                (Whitespace, " ".to_string()),
                (Variable, "$x".to_string()),
                (Semicolon, ";".to_string()),
            ]
        );
    }

    #[test]
    fn test_keywords_case_insensitive() {
        use TokenKind::*;
        assert_eq!(kinds("<?php IF Else"), vec![OpenTag, If, Whitespace, Else]);
    }
}

//! Token kinds, the token record and token matchers

/// Classification of a lexical unit
///
/// Names follow the PHP tokenizer constants (`T_OPEN_TAG` becomes
/// `OpenTag`), with the keyword and punctuation kinds PHP_CodeSniffer adds
/// on top of the native tokenizer (`Closure`, `AnonClass`, brackets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    InlineHtml,
    OpenTag,
    OpenTagWithEcho,
    CloseTag,
    Whitespace,

    // Comments
    Comment,
    DocCommentOpenTag,
    DocCommentCloseTag,
    DocCommentWhitespace,
    DocCommentStar,
    DocCommentTag,
    DocCommentString,
    Attribute,

    // Names and literals
    Variable,
    String,
    NsSeparator,
    LNumber,
    DNumber,
    ConstantEncapsedString,
    DoubleQuotedString,
    Heredoc,

    // Keywords
    Abstract,
    Array,
    As,
    Break,
    Case,
    Catch,
    Class,
    AnonClass,
    Clone,
    Const,
    Continue,
    Declare,
    Default,
    Do,
    Echo,
    Else,
    ElseIf,
    Empty,
    EndDeclare,
    EndFor,
    EndForeach,
    EndIf,
    EndSwitch,
    EndWhile,
    Enum,
    Extends,
    False,
    Final,
    Finally,
    Fn,
    For,
    Foreach,
    Function,
    Closure,
    Global,
    Goto,
    If,
    Implements,
    Include,
    IncludeOnce,
    InstanceOf,
    InsteadOf,
    Interface,
    Isset,
    List,
    LogicalAnd,
    LogicalOr,
    LogicalXor,
    Match,
    Namespace,
    New,
    Null,
    Parent,
    Print,
    Private,
    Protected,
    Public,
    Readonly,
    Require,
    RequireOnce,
    Return,
    SelfKeyword,
    Static,
    Switch,
    Throw,
    Trait,
    True,
    Try,
    Unset,
    Use,
    Var,
    While,
    Yield,

    // Brackets
    OpenCurlyBracket,
    CloseCurlyBracket,
    OpenParenthesis,
    CloseParenthesis,
    OpenSquareBracket,
    CloseSquareBracket,

    // Punctuation and operators
    Semicolon,
    Comma,
    Colon,
    DoubleColon,
    ObjectOperator,
    NullsafeObjectOperator,
    DoubleArrow,
    Equal,
    AssignOp,
    BooleanAnd,
    BooleanOr,
    BooleanNot,
    IsEqual,
    IsNotEqual,
    IsIdentical,
    IsNotIdentical,
    LessThan,
    GreaterThan,
    IsSmallerOrEqual,
    IsGreaterOrEqual,
    Spaceship,
    Coalesce,
    InlineThen,
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulus,
    Pow,
    StringConcat,
    Inc,
    Dec,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    BitwiseNot,
    ShiftLeft,
    ShiftRight,
    Asperand,
    Ellipsis,
    Backtick,
    Dollar,
    Unknown,
}

/// Whitespace and comments
pub const EMPTY_TOKENS: &[TokenKind] = &[
    TokenKind::Whitespace,
    TokenKind::Comment,
    TokenKind::DocCommentOpenTag,
    TokenKind::DocCommentCloseTag,
    TokenKind::DocCommentWhitespace,
    TokenKind::DocCommentStar,
    TokenKind::DocCommentTag,
    TokenKind::DocCommentString,
];

pub const COMMENT_TOKENS: &[TokenKind] = &[
    TokenKind::Comment,
    TokenKind::DocCommentOpenTag,
    TokenKind::DocCommentCloseTag,
    TokenKind::DocCommentWhitespace,
    TokenKind::DocCommentStar,
    TokenKind::DocCommentTag,
    TokenKind::DocCommentString,
];

pub const BOOLEAN_OPERATORS: &[TokenKind] = &[
    TokenKind::BooleanAnd,
    TokenKind::BooleanOr,
    TokenKind::LogicalAnd,
    TokenKind::LogicalOr,
    TokenKind::LogicalXor,
];

/// Kinds that open a brace-delimited scope
pub const SCOPE_OPENERS: &[TokenKind] = &[
    TokenKind::Class,
    TokenKind::AnonClass,
    TokenKind::Interface,
    TokenKind::Trait,
    TokenKind::Enum,
    TokenKind::Namespace,
    TokenKind::Function,
    TokenKind::Closure,
    TokenKind::If,
    TokenKind::ElseIf,
    TokenKind::Else,
    TokenKind::While,
    TokenKind::For,
    TokenKind::Foreach,
    TokenKind::Do,
    TokenKind::Switch,
    TokenKind::Try,
    TokenKind::Catch,
    TokenKind::Finally,
    TokenKind::Declare,
    TokenKind::Match,
];

pub const OO_SCOPES: &[TokenKind] = &[
    TokenKind::Class,
    TokenKind::AnonClass,
    TokenKind::Interface,
    TokenKind::Trait,
    TokenKind::Enum,
];

pub const SCOPE_MODIFIERS: &[TokenKind] = &[
    TokenKind::Public,
    TokenKind::Protected,
    TokenKind::Private,
];

pub const TEXT_STRINGS: &[TokenKind] = &[
    TokenKind::ConstantEncapsedString,
    TokenKind::DoubleQuotedString,
    TokenKind::InlineHtml,
    TokenKind::Heredoc,
];

impl TokenKind {
    pub fn is_empty(self) -> bool {
        EMPTY_TOKENS.contains(&self)
    }

    pub fn is_comment(self) -> bool {
        COMMENT_TOKENS.contains(&self)
    }

    pub fn is_opener(self) -> bool {
        matches!(
            self,
            TokenKind::OpenCurlyBracket
                | TokenKind::OpenParenthesis
                | TokenKind::OpenSquareBracket
                | TokenKind::Attribute
        )
    }

    pub fn is_closer(self) -> bool {
        matches!(
            self,
            TokenKind::CloseCurlyBracket | TokenKind::CloseParenthesis | TokenKind::CloseSquareBracket
        )
    }
}

/// A classified lexical unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// 1-based line of the first character
    pub line: u32,
    /// 1-based column of the first character, counted in characters
    pub column: u32,
    /// Length in characters
    pub length: u32,
    /// Byte offset into the source
    pub offset: u32,
}

impl Token {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_empty()
    }

    /// Byte offset one past the last byte of the token
    pub fn end_offset(&self) -> u32 {
        self.offset + self.text.len() as u32
    }

    /// Line on which the token's last character sits
    pub fn end_line(&self) -> u32 {
        let trimmed = self.text.strip_suffix('\n').unwrap_or(&self.text);
        self.line + trimmed.matches('\n').count() as u32
    }

    pub fn ends_with_newline(&self) -> bool {
        self.text.ends_with('\n')
    }
}

/// Something a token can be tested against
///
/// Navigation queries accept any matcher, so callers can pass a single
/// kind, a slice or array of kinds, or an arbitrary predicate wrapped in
/// [`Where`].
pub trait Matcher {
    fn matches(&self, token: &Token) -> bool;
}

impl Matcher for TokenKind {
    fn matches(&self, token: &Token) -> bool {
        token.kind == *self
    }
}

impl Matcher for [TokenKind] {
    fn matches(&self, token: &Token) -> bool {
        self.contains(&token.kind)
    }
}

impl<const N: usize> Matcher for [TokenKind; N] {
    fn matches(&self, token: &Token) -> bool {
        self.contains(&token.kind)
    }
}

impl<M: Matcher + ?Sized> Matcher for &M {
    fn matches(&self, token: &Token) -> bool {
        (**self).matches(token)
    }
}

/// Predicate matcher
pub struct Where<F>(pub F);

impl<F> Matcher for Where<F>
where
    F: Fn(&Token) -> bool,
{
    fn matches(&self, token: &Token) -> bool {
        (self.0)(token)
    }
}

//! Виды токенов, тривии и узлов дерева.
//!
//! `TokenKind` doubles as the `logos` token definition: trivia variants are lexed
//! like any other token and then attached to their neighbours by the lexer.

use logos::Logos;
use serde::{Deserialize, Serialize};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Keywords - declarations and modifiers
    #[token("class")]
    ClassKeyword,
    #[token("public")]
    PublicKeyword,
    #[token("private")]
    PrivateKeyword,
    #[token("protected")]
    ProtectedKeyword,
    #[token("internal")]
    InternalKeyword,
    #[token("static")]
    StaticKeyword,
    #[token("sealed")]
    SealedKeyword,
    #[token("abstract")]
    AbstractKeyword,
    #[token("virtual")]
    VirtualKeyword,
    #[token("override")]
    OverrideKeyword,
    #[token("readonly")]
    ReadonlyKeyword,
    #[token("partial")]
    PartialKeyword,
    #[token("async")]
    AsyncKeyword,
    #[token("const")]
    ConstKeyword,

    // Keywords - parameters
    #[token("ref")]
    RefKeyword,
    #[token("out")]
    OutKeyword,
    #[token("in")]
    InKeyword,
    #[token("params")]
    ParamsKeyword,

    // Keywords - statements
    #[token("return")]
    ReturnKeyword,
    #[token("throw")]
    ThrowKeyword,
    #[token("if")]
    IfKeyword,
    #[token("else")]
    ElseKeyword,
    #[token("while")]
    WhileKeyword,
    #[token("do")]
    DoKeyword,
    #[token("switch")]
    SwitchKeyword,
    #[token("case")]
    CaseKeyword,
    #[token("default")]
    DefaultKeyword,
    #[token("break")]
    BreakKeyword,
    #[token("continue")]
    ContinueKeyword,

    // Keywords - expressions
    #[token("await")]
    AwaitKeyword,
    #[token("new")]
    NewKeyword,
    #[token("true")]
    TrueKeyword,
    #[token("false")]
    FalseKeyword,
    #[token("null")]
    NullKeyword,

    // Keywords - predefined types
    #[token("var")]
    VarKeyword,
    #[token("void")]
    VoidKeyword,
    #[token("int")]
    IntKeyword,
    #[token("long")]
    LongKeyword,
    #[token("bool")]
    BoolKeyword,
    #[token("string")]
    StringKeyword,
    #[token("object")]
    ObjectKeyword,
    #[token("double")]
    DoubleKeyword,
    #[token("float")]
    FloatKeyword,
    #[token("decimal")]
    DecimalKeyword,
    #[token("char")]
    CharKeyword,
    #[token("byte")]
    ByteKeyword,

    // Delimiters
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
    #[token("?")]
    Question,
    #[token("=>")]
    FatArrow,

    // Operators
    #[token("??")]
    QuestionQuestion,
    #[token("=")]
    Equals,
    #[token("==")]
    EqualsEquals,
    #[token("!=")]
    ExclamationEquals,
    #[token("!")]
    Exclamation,
    #[token("~")]
    Tilde,
    #[token("<")]
    LessThan,
    #[token(">")]
    GreaterThan,
    #[token("<=")]
    LessThanEquals,
    #[token(">=")]
    GreaterThanEquals,
    #[token("&&")]
    AmpersandAmpersand,
    #[token("||")]
    BarBar,
    #[token("&")]
    Ampersand,
    #[token("|")]
    Bar,
    #[token("^")]
    Caret,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Asterisk,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("+=")]
    PlusEquals,
    #[token("-=")]
    MinusEquals,
    #[token("*=")]
    AsteriskEquals,
    #[token("/=")]
    SlashEquals,
    #[token("%=")]
    PercentEquals,
    #[token("&=")]
    AmpersandEquals,
    #[token("|=")]
    BarEquals,
    #[token("^=")]
    CaretEquals,
    #[token("??=")]
    QuestionQuestionEquals,

    // Literals
    #[regex(r"[0-9]+(\.[0-9]+)?[fFdDmMlLuU]?")]
    NumericLiteral,
    #[regex(r#""([^"\\\r\n]|\\.)*""#)]
    StringLiteral,
    #[regex(r"'([^'\\\r\n]|\\.)'")]
    CharLiteral,

    // Identifiers (lower priority to avoid conflicts with keywords)
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", priority = 1)]
    Identifier,

    // Trivia
    #[regex(r"[ \t\f]+")]
    Whitespace,
    #[regex(r"\r\n|\r|\n")]
    EndOfLine,
    #[regex(r"//[^\r\n]*", priority = 2)]
    SingleLineComment,
    #[regex(r"///[^\r\n]*", priority = 3)]
    DocumentationComment,
    #[token("/*", block_comment)]
    MultiLineComment,

    // End of file
    EndOfFile,
}

/// Дочитывает `/* ... */` до первого `*/`; незакрытый комментарий даёт ошибку.
fn block_comment(lex: &mut logos::Lexer<TokenKind>) -> bool {
    match lex.remainder().find("*/") {
        Some(i) => {
            lex.bump(i + 2);
            true
        }
        None => false,
    }
}

impl TokenKind {
    pub fn trivia_kind(self) -> Option<TriviaKind> {
        match self {
            TokenKind::Whitespace => Some(TriviaKind::Whitespace),
            TokenKind::EndOfLine => Some(TriviaKind::EndOfLine),
            TokenKind::SingleLineComment => Some(TriviaKind::SingleLineComment),
            TokenKind::MultiLineComment => Some(TriviaKind::MultiLineComment),
            TokenKind::DocumentationComment => Some(TriviaKind::DocumentationComment),
            _ => None,
        }
    }

    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            TokenKind::PublicKeyword
                | TokenKind::PrivateKeyword
                | TokenKind::ProtectedKeyword
                | TokenKind::InternalKeyword
                | TokenKind::StaticKeyword
                | TokenKind::SealedKeyword
                | TokenKind::AbstractKeyword
                | TokenKind::VirtualKeyword
                | TokenKind::OverrideKeyword
                | TokenKind::ReadonlyKeyword
                | TokenKind::PartialKeyword
                | TokenKind::AsyncKeyword
        )
    }

    pub fn is_parameter_modifier(self) -> bool {
        matches!(
            self,
            TokenKind::RefKeyword | TokenKind::OutKeyword | TokenKind::InKeyword | TokenKind::ParamsKeyword
        )
    }

    pub fn is_predefined_type(self) -> bool {
        matches!(
            self,
            TokenKind::VarKeyword
                | TokenKind::VoidKeyword
                | TokenKind::IntKeyword
                | TokenKind::LongKeyword
                | TokenKind::BoolKeyword
                | TokenKind::StringKeyword
                | TokenKind::ObjectKeyword
                | TokenKind::DoubleKeyword
                | TokenKind::FloatKeyword
                | TokenKind::DecimalKeyword
                | TokenKind::CharKeyword
                | TokenKind::ByteKeyword
        )
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::TrueKeyword
                | TokenKind::FalseKeyword
                | TokenKind::NullKeyword
                | TokenKind::DefaultKeyword
                | TokenKind::NumericLiteral
                | TokenKind::StringLiteral
                | TokenKind::CharLiteral
        )
    }

    pub fn is_assignment_operator(self) -> bool {
        matches!(
            self,
            TokenKind::Equals
                | TokenKind::PlusEquals
                | TokenKind::MinusEquals
                | TokenKind::AsteriskEquals
                | TokenKind::SlashEquals
                | TokenKind::PercentEquals
                | TokenKind::AmpersandEquals
                | TokenKind::BarEquals
                | TokenKind::CaretEquals
                | TokenKind::QuestionQuestionEquals
        )
    }

    /// Binary operator precedence (higher binds tighter). `None` for non-binary tokens.
    pub fn binary_precedence(self) -> Option<u8> {
        let prec = match self {
            TokenKind::QuestionQuestion => 1,
            TokenKind::BarBar => 2,
            TokenKind::AmpersandAmpersand => 3,
            TokenKind::Bar => 4,
            TokenKind::Caret => 5,
            TokenKind::Ampersand => 6,
            TokenKind::EqualsEquals | TokenKind::ExclamationEquals => 7,
            TokenKind::LessThan
            | TokenKind::GreaterThan
            | TokenKind::LessThanEquals
            | TokenKind::GreaterThanEquals => 8,
            TokenKind::Plus | TokenKind::Minus => 9,
            TokenKind::Asterisk | TokenKind::Slash | TokenKind::Percent => 10,
            _ => return None,
        };
        Some(prec)
    }
}

/// Вид тривии (незначимого текста).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriviaKind {
    Whitespace,
    EndOfLine,
    SingleLineComment,
    MultiLineComment,
    DocumentationComment,
}

impl TriviaKind {
    pub fn is_whitespace_or_end_of_line(self) -> bool {
        matches!(self, TriviaKind::Whitespace | TriviaKind::EndOfLine)
    }

    pub fn is_comment(self) -> bool {
        !self.is_whitespace_or_end_of_line()
    }
}

/// Вид узла дерева.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyntaxKind {
    CompilationUnit,
    ClassDeclaration,
    MethodDeclaration,
    ParameterList,
    Parameter,
    Type,
    TypeArgumentList,
    ArrowExpressionClause,

    // Statements
    Block,
    LocalDeclarationStatement,
    VariableDeclaration,
    VariableDeclarator,
    EqualsValueClause,
    LocalFunctionStatement,
    ExpressionStatement,
    ReturnStatement,
    ThrowStatement,
    IfStatement,
    ElseClause,
    WhileStatement,
    DoStatement,
    SwitchStatement,
    SwitchSection,
    CaseSwitchLabel,
    DefaultSwitchLabel,
    BreakStatement,
    ContinueStatement,
    EmptyStatement,

    // Expressions
    IdentifierName,
    PredefinedType,
    LiteralExpression,
    ParenthesizedExpression,
    PrefixUnaryExpression,
    PostfixUnaryExpression,
    AwaitExpression,
    BinaryExpression,
    ConditionalExpression,
    AssignmentExpression,
    InvocationExpression,
    ArgumentList,
    Argument,
    ElementAccessExpression,
    BracketedArgumentList,
    MemberAccessExpression,
    ObjectCreationExpression,
    LambdaExpression,
}

impl SyntaxKind {
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            SyntaxKind::Block
                | SyntaxKind::LocalDeclarationStatement
                | SyntaxKind::LocalFunctionStatement
                | SyntaxKind::ExpressionStatement
                | SyntaxKind::ReturnStatement
                | SyntaxKind::ThrowStatement
                | SyntaxKind::IfStatement
                | SyntaxKind::WhileStatement
                | SyntaxKind::DoStatement
                | SyntaxKind::SwitchStatement
                | SyntaxKind::BreakStatement
                | SyntaxKind::ContinueStatement
                | SyntaxKind::EmptyStatement
        )
    }

    pub fn is_expression(self) -> bool {
        matches!(
            self,
            SyntaxKind::IdentifierName
                | SyntaxKind::PredefinedType
                | SyntaxKind::LiteralExpression
                | SyntaxKind::ParenthesizedExpression
                | SyntaxKind::PrefixUnaryExpression
                | SyntaxKind::PostfixUnaryExpression
                | SyntaxKind::AwaitExpression
                | SyntaxKind::BinaryExpression
                | SyntaxKind::ConditionalExpression
                | SyntaxKind::AssignmentExpression
                | SyntaxKind::InvocationExpression
                | SyntaxKind::ElementAccessExpression
                | SyntaxKind::MemberAccessExpression
                | SyntaxKind::ObjectCreationExpression
                | SyntaxKind::LambdaExpression
        )
    }

    /// Methods, local functions and lambdas: nodes that own a body and parameters.
    pub fn is_function_like(self) -> bool {
        matches!(
            self,
            SyntaxKind::MethodDeclaration | SyntaxKind::LocalFunctionStatement | SyntaxKind::LambdaExpression
        )
    }

    /// Nodes whose children form a statement list.
    pub fn is_statement_list(self) -> bool {
        matches!(self, SyntaxKind::Block | SyntaxKind::SwitchSection)
    }
}

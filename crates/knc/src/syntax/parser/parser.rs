//! Recursive descent parser for the Kotlin declaration subset

use crate::common::{CompileError, CompileResult, Span};
use crate::syntax::ast::*;
use crate::syntax::lexer::{Lexer, Token, TokenKind};

/// Declaration parser
///
/// Parses the declaration structure of a file. Expressions, function bodies,
/// and supertype lists are consumed as balanced token runs; the checkers only
/// need declaration shape and spans.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    source: &'a str,
    next_id: NodeId,
    /// Span of the most recently consumed token
    prev_span: Span,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
            source,
            next_id: 0,
            prev_span: Span::default(),
        }
    }

    /// Parse a complete source file
    pub fn parse_file(&mut self) -> CompileResult<SourceFile> {
        let start = self.lexer.peek()?.span;

        let package = if self.match_token(&TokenKind::Package)? {
            Some(self.parse_dotted_path()?)
        } else {
            None
        };

        let mut imports = Vec::new();
        while self.check(&TokenKind::Import)? {
            imports.push(self.parse_import()?);
        }

        let mut declarations = Vec::new();
        while !self.check(&TokenKind::Eof)? {
            if self.match_token(&TokenKind::Semi)? {
                continue;
            }
            declarations.push(self.parse_declaration()?);
        }

        Ok(SourceFile {
            package,
            imports,
            declarations,
            span: Span::new(start.start, self.prev_span.end),
        })
    }

    // ==================== Header ====================

    fn parse_import(&mut self) -> CompileResult<ImportDirective> {
        let kw = self.expect(TokenKind::Import)?;
        let path_start = self.lexer.peek()?.span;

        let mut segments = vec![self.expect_name()?];
        let mut star = false;
        while self.match_token(&TokenKind::Dot)? {
            if self.match_token(&TokenKind::Star)? {
                star = true;
                break;
            }
            segments.push(self.expect_name()?);
        }

        // Import alias is parsed and discarded; annotation resolution only
        // needs the imported path itself
        if self.match_token(&TokenKind::As)? {
            self.expect_name()?;
        }

        let path = DottedPath::new(segments, path_start.to(self.prev_span));
        Ok(ImportDirective {
            path,
            star,
            span: kw.span.to(self.prev_span),
        })
    }

    fn parse_dotted_path(&mut self) -> CompileResult<DottedPath> {
        let start = self.lexer.peek()?.span;
        let mut segments = vec![self.expect_name()?];
        while self.match_token(&TokenKind::Dot)? {
            segments.push(self.expect_name()?);
        }
        Ok(DottedPath::new(segments, start.to(self.prev_span)))
    }

    // ==================== Declarations ====================

    fn parse_declaration(&mut self) -> CompileResult<Declaration> {
        let annotations = self.parse_annotations()?;
        let start = match annotations.first() {
            Some(annotation) => annotation.span,
            None => self.lexer.peek()?.span,
        };
        let modifiers = self.parse_modifiers()?;

        if self.match_token(&TokenKind::Enum)? {
            self.expect(TokenKind::Class)?;
            return self.parse_class_like(
                start,
                annotations,
                modifiers,
                ClassKeyword::Class,
                ClassFlags { is_enum: true, ..ClassFlags::default() },
            );
        }

        if self.check(&TokenKind::Annotation)? && self.lexer.check_lookahead(&TokenKind::Class)? {
            self.bump()?;
            self.expect(TokenKind::Class)?;
            return self.parse_class_like(
                start,
                annotations,
                modifiers,
                ClassKeyword::Class,
                ClassFlags { is_annotation: true, ..ClassFlags::default() },
            );
        }

        if self.match_token(&TokenKind::Companion)? {
            self.expect(TokenKind::Object)?;
            return self.parse_class_like(
                start,
                annotations,
                modifiers,
                ClassKeyword::Object,
                ClassFlags { is_companion: true, ..ClassFlags::default() },
            );
        }

        if self.match_token(&TokenKind::Class)? {
            return self.parse_class_like(
                start,
                annotations,
                modifiers,
                ClassKeyword::Class,
                ClassFlags::default(),
            );
        }

        if self.match_token(&TokenKind::Interface)? {
            return self.parse_class_like(
                start,
                annotations,
                modifiers,
                ClassKeyword::Interface,
                ClassFlags::default(),
            );
        }

        if self.match_token(&TokenKind::Object)? {
            return self.parse_class_like(
                start,
                annotations,
                modifiers,
                ClassKeyword::Object,
                ClassFlags::default(),
            );
        }

        if self.check(&TokenKind::Val)? || self.check(&TokenKind::Var)? {
            return self.parse_property(start, annotations, modifiers);
        }

        if self.match_token(&TokenKind::Fun)? {
            return self.parse_function(start, annotations, modifiers);
        }

        let token = self.bump()?;
        Err(CompileError::parser(
            format!("expected declaration, found {}", token.kind),
            token.span,
        ))
    }

    fn parse_annotations(&mut self) -> CompileResult<Vec<AnnotationEntry>> {
        let mut annotations = Vec::new();
        while self.check(&TokenKind::At)? {
            let at = self.bump()?;
            let path = self.parse_dotted_path()?;
            let mut end = path.span;
            if self.check(&TokenKind::LParen)? {
                end = self.consume_balanced(&TokenKind::LParen)?;
            }
            annotations.push(AnnotationEntry {
                path,
                span: at.span.to(end),
            });
        }
        Ok(annotations)
    }

    fn parse_modifiers(&mut self) -> CompileResult<Vec<Modifier>> {
        let mut modifiers = Vec::new();
        loop {
            let modifier = match self.lexer.peek()?.kind {
                TokenKind::Public => Modifier::Public,
                TokenKind::Private => Modifier::Private,
                TokenKind::Protected => Modifier::Protected,
                TokenKind::Internal => Modifier::Internal,
                TokenKind::Open => Modifier::Open,
                TokenKind::Abstract => Modifier::Abstract,
                TokenKind::Final => Modifier::Final,
                TokenKind::Sealed => Modifier::Sealed,
                TokenKind::Data => Modifier::Data,
                TokenKind::Override => Modifier::Override,
                TokenKind::Lateinit => Modifier::Lateinit,
                TokenKind::Const => Modifier::Const,
                _ => break,
            };
            self.bump()?;
            modifiers.push(modifier);
        }
        Ok(modifiers)
    }

    fn parse_class_like(
        &mut self,
        start: Span,
        annotations: Vec<AnnotationEntry>,
        modifiers: Vec<Modifier>,
        keyword: ClassKeyword,
        flags: ClassFlags,
    ) -> CompileResult<Declaration> {
        let name = if flags.is_companion && !self.check_name()? {
            None
        } else {
            Some(self.expect_name()?)
        };

        let mut members = Vec::new();

        if self.check(&TokenKind::Lt)? {
            self.consume_balanced(&TokenKind::Lt)?;
        }

        if self.check(&TokenKind::LParen)? {
            self.parse_primary_constructor(&mut members)?;
        }

        if self.match_token(&TokenKind::Colon)? {
            self.skip_supertypes()?;
        }

        if self.check(&TokenKind::LBrace)? {
            self.bump()?;
            if flags.is_enum {
                self.parse_enum_body(&mut members)?;
            } else {
                self.parse_members_until_rbrace(&mut members)?;
            }
            self.expect(TokenKind::RBrace)?;
        }

        let id = self.fresh_id();
        Ok(Declaration::new(
            id,
            DeclKind::Class(ClassDecl {
                name,
                keyword,
                is_enum: flags.is_enum,
                is_companion: flags.is_companion,
                is_annotation: flags.is_annotation,
                annotations,
                modifiers,
                members,
            }),
            start.to(self.prev_span),
        ))
    }

    fn parse_primary_constructor(&mut self, members: &mut Vec<Declaration>) -> CompileResult<()> {
        self.expect(TokenKind::LParen)?;
        if self.match_token(&TokenKind::RParen)? {
            return Ok(());
        }

        loop {
            let annotations = self.parse_annotations()?;
            let start = match annotations.first() {
                Some(annotation) => annotation.span,
                None => self.lexer.peek()?.span,
            };
            self.parse_modifiers()?;

            let is_var = if self.match_token(&TokenKind::Val)? {
                Some(false)
            } else if self.match_token(&TokenKind::Var)? {
                Some(true)
            } else {
                None
            };

            let name = self.expect_name()?;
            let ty = if self.match_token(&TokenKind::Colon)? {
                Some(self.parse_type_ref()?)
            } else {
                None
            };
            let default = if self.match_token(&TokenKind::Eq)? {
                Some(self.parse_expr_stub()?)
            } else {
                None
            };

            // Only val/var parameters declare properties
            if let Some(is_var) = is_var {
                let id = self.fresh_id();
                members.push(Declaration::new(
                    id,
                    DeclKind::PropertyParameter(ParameterDecl {
                        name,
                        is_var,
                        annotations,
                        ty,
                        default,
                    }),
                    start.to(self.prev_span),
                ));
            }

            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
            if self.check(&TokenKind::RParen)? {
                break;
            }
        }

        self.expect(TokenKind::RParen)?;
        Ok(())
    }

    fn skip_supertypes(&mut self) -> CompileResult<()> {
        loop {
            self.parse_type_ref()?;
            if self.check(&TokenKind::LParen)? {
                self.consume_balanced(&TokenKind::LParen)?;
            }
            if self.match_token(&TokenKind::By)? {
                self.parse_expr_stub()?;
            }
            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }
        Ok(())
    }

    fn parse_members_until_rbrace(&mut self, members: &mut Vec<Declaration>) -> CompileResult<()> {
        while !self.check(&TokenKind::RBrace)? && !self.check(&TokenKind::Eof)? {
            if self.match_token(&TokenKind::Semi)? {
                continue;
            }
            if self.match_token(&TokenKind::Init)? {
                self.consume_balanced(&TokenKind::LBrace)?;
                continue;
            }
            if self.match_token(&TokenKind::Constructor)? {
                self.skip_secondary_constructor()?;
                continue;
            }
            members.push(self.parse_declaration()?);
        }
        Ok(())
    }

    fn skip_secondary_constructor(&mut self) -> CompileResult<()> {
        self.consume_balanced(&TokenKind::LParen)?;
        if self.match_token(&TokenKind::Colon)? {
            self.expect(TokenKind::This)?;
            self.consume_balanced(&TokenKind::LParen)?;
        }
        if self.check(&TokenKind::LBrace)? {
            self.consume_balanced(&TokenKind::LBrace)?;
        }
        Ok(())
    }

    fn parse_enum_body(&mut self, members: &mut Vec<Declaration>) -> CompileResult<()> {
        // Entries first, then optional `;` and regular members
        loop {
            if self.check(&TokenKind::RBrace)? || self.check(&TokenKind::Semi)? {
                break;
            }

            let annotations = self.parse_annotations()?;
            let start = match annotations.first() {
                Some(annotation) => annotation.span,
                None => self.lexer.peek()?.span,
            };
            let name = self.expect_name()?;
            if self.check(&TokenKind::LParen)? {
                self.consume_balanced(&TokenKind::LParen)?;
            }

            let mut entry_members = Vec::new();
            if self.check(&TokenKind::LBrace)? {
                self.bump()?;
                self.parse_members_until_rbrace(&mut entry_members)?;
                self.expect(TokenKind::RBrace)?;
            }

            let id = self.fresh_id();
            members.push(Declaration::new(
                id,
                DeclKind::EnumEntry(EnumEntryDecl {
                    name,
                    annotations,
                    members: entry_members,
                }),
                start.to(self.prev_span),
            ));

            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }

        if self.match_token(&TokenKind::Semi)? {
            self.parse_members_until_rbrace(members)?;
        }
        Ok(())
    }

    fn parse_property(
        &mut self,
        start: Span,
        annotations: Vec<AnnotationEntry>,
        modifiers: Vec<Modifier>,
    ) -> CompileResult<Declaration> {
        let keyword = self.bump()?;
        let is_var = matches!(keyword.kind, TokenKind::Var);

        let name = self.expect_name()?;
        let ty = if self.match_token(&TokenKind::Colon)? {
            Some(self.parse_type_ref()?)
        } else {
            None
        };

        let mut initializer = None;
        let mut delegate = None;
        if self.match_token(&TokenKind::By)? {
            delegate = Some(self.parse_expr_stub()?);
        } else if self.match_token(&TokenKind::Eq)? {
            initializer = Some(self.parse_expr_stub()?);
        }

        let (getter, setter) = self.parse_accessors()?;

        let id = self.fresh_id();
        Ok(Declaration::new(
            id,
            DeclKind::Property(PropertyDecl {
                name,
                is_var,
                annotations,
                modifiers,
                ty,
                initializer,
                delegate,
                getter,
                setter,
            }),
            start.to(self.prev_span),
        ))
    }

    fn parse_accessors(&mut self) -> CompileResult<(Option<Accessor>, Option<Accessor>)> {
        let mut getter = None;
        let mut setter = None;

        loop {
            let at_accessor = self.check(&TokenKind::Get)?
                || self.check(&TokenKind::Set)?
                || (self.lexer.peek()?.kind.is_modifier()
                    && (self.lexer.check_lookahead(&TokenKind::Get)?
                        || self.lexer.check_lookahead(&TokenKind::Set)?));
            if !at_accessor {
                break;
            }

            // Accessor visibility, e.g. `private set`
            if self.lexer.peek()?.kind.is_modifier() {
                self.bump()?;
            }

            let keyword = self.bump()?;
            let kind = match keyword.kind {
                TokenKind::Get => AccessorKind::Get,
                TokenKind::Set => AccessorKind::Set,
                _ => unreachable!("accessor lookahead guarantees get/set"),
            };

            let mut has_body = false;
            if self.check(&TokenKind::LParen)? {
                self.consume_balanced(&TokenKind::LParen)?;
                if self.match_token(&TokenKind::Colon)? {
                    self.parse_type_ref()?;
                }
                if self.check(&TokenKind::LBrace)? {
                    self.consume_balanced(&TokenKind::LBrace)?;
                    has_body = true;
                } else if self.match_token(&TokenKind::Eq)? {
                    self.parse_expr_stub()?;
                    has_body = true;
                }
            }

            let accessor = Accessor {
                kind,
                has_body,
                span: keyword.span.to(self.prev_span),
            };
            let slot = match kind {
                AccessorKind::Get => &mut getter,
                AccessorKind::Set => &mut setter,
            };
            if slot.is_some() {
                return Err(CompileError::parser(
                    format!("duplicate {} accessor", keyword.kind),
                    keyword.span,
                ));
            }
            *slot = Some(accessor);
        }

        Ok((getter, setter))
    }

    fn parse_function(
        &mut self,
        start: Span,
        annotations: Vec<AnnotationEntry>,
        modifiers: Vec<Modifier>,
    ) -> CompileResult<Declaration> {
        if self.check(&TokenKind::Lt)? {
            self.consume_balanced(&TokenKind::Lt)?;
        }

        // Receiver-qualified names keep the last segment as the function name
        let mut name = self.expect_name()?;
        while self.match_token(&TokenKind::Dot)? {
            name = self.expect_name()?;
        }

        self.consume_balanced(&TokenKind::LParen)?;
        if self.match_token(&TokenKind::Colon)? {
            self.parse_type_ref()?;
        }
        if self.check(&TokenKind::LBrace)? {
            self.consume_balanced(&TokenKind::LBrace)?;
        } else if self.match_token(&TokenKind::Eq)? {
            self.parse_expr_stub()?;
        }

        let id = self.fresh_id();
        Ok(Declaration::new(
            id,
            DeclKind::Function(FunctionDecl {
                name,
                annotations,
                modifiers,
            }),
            start.to(self.prev_span),
        ))
    }

    // ==================== Types and expressions ====================

    fn parse_type_ref(&mut self) -> CompileResult<TypeRef> {
        let start = self.lexer.peek()?.span;

        if self.check(&TokenKind::LParen)? {
            // Function type: (A, B) -> C
            self.consume_balanced(&TokenKind::LParen)?;
            if self.match_token(&TokenKind::Arrow)? {
                self.parse_type_ref()?;
            }
        } else {
            self.expect_name()?;
            while self.match_token(&TokenKind::Dot)? {
                self.expect_name()?;
            }
            if self.check(&TokenKind::Lt)? {
                self.consume_balanced(&TokenKind::Lt)?;
            }
        }
        while self.match_token(&TokenKind::Question)? {}

        let span = start.to(self.prev_span);
        Ok(TypeRef {
            text: self.source[span.start..span.end].to_string(),
            span,
        })
    }

    /// Consume one expression as a balanced token run and return its extent
    fn parse_expr_stub(&mut self) -> CompileResult<ExprStub> {
        let start = self.lexer.peek()?.span;
        self.parse_expr_operand()?;

        loop {
            let kind = self.lexer.peek()?.kind.clone();
            match kind {
                TokenKind::As | TokenKind::Is => {
                    self.bump()?;
                    // Safe cast: `as?`
                    self.match_token(&TokenKind::Question)?;
                    self.parse_type_ref()?;
                }
                _ if is_infix_operator(&kind) => {
                    self.bump()?;
                    self.parse_expr_operand()?;
                }
                _ => break,
            }
        }

        Ok(ExprStub {
            span: start.to(self.prev_span),
        })
    }

    fn parse_expr_operand(&mut self) -> CompileResult<()> {
        // Prefix operators
        while matches!(
            self.lexer.peek()?.kind,
            TokenKind::Minus
                | TokenKind::Plus
                | TokenKind::Bang
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
        ) {
            self.bump()?;
        }

        // Primary
        let kind = self.lexer.peek()?.kind.clone();
        match kind {
            TokenKind::IntLiteral(_)
            | TokenKind::HexLiteral(_)
            | TokenKind::BinaryLiteral(_)
            | TokenKind::FloatLiteral(_)
            | TokenKind::CharLiteral(_)
            | TokenKind::StringLiteral(_)
            | TokenKind::This
            | TokenKind::Null
            | TokenKind::True
            | TokenKind::False => {
                self.bump()?;
            }
            TokenKind::Object => {
                // Object expression: object : Base { ... }
                self.bump()?;
                if self.match_token(&TokenKind::Colon)? {
                    self.skip_supertypes()?;
                }
                self.consume_balanced(&TokenKind::LBrace)?;
            }
            TokenKind::LParen => {
                self.consume_balanced(&TokenKind::LParen)?;
            }
            TokenKind::LBrace => {
                self.consume_balanced(&TokenKind::LBrace)?;
            }
            _ if self.check_name()? => {
                self.bump()?;
            }
            _ => {
                let token = self.bump()?;
                return Err(CompileError::parser(
                    format!("expected expression, found {}", token.kind),
                    token.span,
                ));
            }
        }

        // Postfix: member access, calls, indexing, trailing lambdas
        loop {
            match self.lexer.peek()?.kind {
                TokenKind::Dot | TokenKind::SafeDot => {
                    self.bump()?;
                    self.expect_name()?;
                }
                TokenKind::ColonColon => {
                    self.bump()?;
                    if !self.match_token(&TokenKind::Class)? {
                        self.expect_name()?;
                    }
                }
                TokenKind::LParen => {
                    self.consume_balanced(&TokenKind::LParen)?;
                }
                TokenKind::LBracket => {
                    self.consume_balanced(&TokenKind::LBracket)?;
                }
                TokenKind::LBrace => {
                    self.consume_balanced(&TokenKind::LBrace)?;
                }
                TokenKind::PlusPlus | TokenKind::MinusMinus | TokenKind::Bang => {
                    self.bump()?;
                }
                _ => break,
            }
        }

        Ok(())
    }

    /// Consume a balanced delimiter run starting at `open`, returning the
    /// span from the opening token through its matching close
    fn consume_balanced(&mut self, open: &TokenKind) -> CompileResult<Span> {
        let close = match open {
            TokenKind::LParen => TokenKind::RParen,
            TokenKind::LBrace => TokenKind::RBrace,
            TokenKind::LBracket => TokenKind::RBracket,
            TokenKind::Lt => TokenKind::Gt,
            _ => {
                let span = self.lexer.peek()?.span;
                return Err(CompileError::parser("expected delimiter", span));
            }
        };

        let first = self.expect(open.clone())?;
        let mut depth = 1usize;
        while depth > 0 {
            let token = self.bump()?;
            if matches!(token.kind, TokenKind::Eof) {
                return Err(CompileError::parser("unclosed delimiter", first.span));
            }
            if std::mem::discriminant(&token.kind) == std::mem::discriminant(open) {
                depth += 1;
            } else if std::mem::discriminant(&token.kind) == std::mem::discriminant(&close) {
                depth -= 1;
            }
        }
        Ok(first.span.to(self.prev_span))
    }

    // ==================== Helpers ====================

    fn fresh_id(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn bump(&mut self) -> CompileResult<Token> {
        let token = self.lexer.next_token()?;
        if !matches!(token.kind, TokenKind::Eof) {
            self.prev_span = token.span;
        }
        Ok(token)
    }

    fn check(&mut self, expected: &TokenKind) -> CompileResult<bool> {
        self.lexer.check(expected)
    }

    fn match_token(&mut self, expected: &TokenKind) -> CompileResult<bool> {
        if self.check(expected)? {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, expected: TokenKind) -> CompileResult<Token> {
        let token = self.bump()?;
        if std::mem::discriminant(&token.kind) == std::mem::discriminant(&expected) {
            Ok(token)
        } else {
            Err(CompileError::parser(
                format!("expected {}, found {}", expected, token.kind),
                token.span,
            ))
        }
    }

    fn check_name(&mut self) -> CompileResult<bool> {
        Ok(matches!(
            self.lexer.peek()?.kind,
            TokenKind::Identifier(_)
                | TokenKind::Get
                | TokenKind::Set
                | TokenKind::Data
                | TokenKind::Companion
                | TokenKind::Annotation
        ))
    }

    /// Accept an identifier, or a soft keyword used as a name
    fn expect_name(&mut self) -> CompileResult<String> {
        let token = self.bump()?;
        match token.kind {
            TokenKind::Identifier(name) => Ok(name),
            TokenKind::Get => Ok("get".to_string()),
            TokenKind::Set => Ok("set".to_string()),
            TokenKind::Data => Ok("data".to_string()),
            TokenKind::Companion => Ok("companion".to_string()),
            TokenKind::Annotation => Ok("annotation".to_string()),
            _ => Err(CompileError::parser(
                format!("expected identifier, found {}", token.kind),
                token.span,
            )),
        }
    }
}

/// Flags distinguishing the class-like declaration forms
#[derive(Debug, Clone, Copy, Default)]
struct ClassFlags {
    is_enum: bool,
    is_companion: bool,
    is_annotation: bool,
}

fn is_infix_operator(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Percent
            | TokenKind::EqEq
            | TokenKind::NotEq
            | TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::LtEq
            | TokenKind::GtEq
            | TokenKind::AmpAmp
            | TokenKind::PipePipe
            | TokenKind::Elvis
            | TokenKind::DotDot
            | TokenKind::In
            | TokenKind::Eq
            | TokenKind::PlusEq
            | TokenKind::MinusEq
            | TokenKind::StarEq
            | TokenKind::SlashEq
            | TokenKind::PercentEq
    )
}

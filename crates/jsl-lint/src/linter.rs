//! The lint driver.
//!
//! `Linter` owns the script registry and the diagnostics produced so far.
//! Each file is split into parts (the whole file, or the scripts of an HTML
//! document), and every part goes through the same pipeline:
//!
//! 1. Recover comment candidates and pick the version (`jsl:content-type`)
//! 2. Parse; a syntax error ends the part, not the file
//! 3. Filter real comments and read control comments
//! 4. Link imports, walk the tree with the scope builder and lint checks
//! 5. Apply `jsl:declare` / `jsl:unused`, run the text checks
//!
//! Identifier warnings need every part and every import, and imports may be
//! cyclic, so they are computed once the outermost `lint_file` or
//! `lint_source` call has linted everything it reached. Reports are then
//! filtered against each file's ignore ranges and rendered into
//! `Diagnostic`s.

use crate::checks::{LintChecks, check_nested_comment, check_trailing_whitespace};
use crate::comments::filter_comments;
use crate::config::LintConfig;
use crate::directives::{DirectiveKeyword, DirectiveParse, parse_control_comment};
use crate::globals::is_builtin_global;
use crate::html::{Fragment, find_html_scripts};
use jsl_binder::{DeclarationKind, DeclareOutcome, ScopeBuilder, ScopeId, ScriptId, ScriptRegistry};
use jsl_common::comments::find_possible_comments;
use jsl_common::{
    CommentSpan, Diagnostic, DiagnosticBag, JsVersion, Position, PositionMapper, Report, Severity, Span,
};
use jsl_parser::{ParseError, ScriptParser, walk};
use std::path::{Path, PathBuf};
use tracing::{debug, info_span};

/// Per-file state while its parts are analyzed.
struct ScriptContext {
    id: ScriptId,
    path: String,
    /// Directory `jsl:import` paths are relative to
    base_dir: PathBuf,
    reports: Vec<Report>,
    document: PositionMapper,
    /// Line maps of embedded scripts, anchored in the document
    parts: Vec<(Span, PositionMapper)>,
}

impl ScriptContext {
    fn new(id: ScriptId, path: String, base_dir: PathBuf, text: &str) -> Self {
        ScriptContext {
            id,
            path,
            base_dir,
            reports: Vec::new(),
            document: PositionMapper::new(text),
            parts: Vec::new(),
        }
    }

    fn report(&mut self, report: Report) {
        self.reports.push(report);
    }

    fn position(&self, offset: u32) -> Position {
        match self.parts.iter().find(|(span, _)| span.contains(offset)) {
            Some((span, mapper)) => mapper.from_offset(offset - span.start),
            None => self.document.from_offset(offset),
        }
    }
}

/// Control comments of one part that take effect after the walk.
#[derive(Default)]
struct PartDirectives {
    ignores: Vec<Span>,
    imports: Vec<(u32, String)>,
    fallthrus: Vec<Span>,
    passes: Vec<Span>,
    declares: Vec<(String, Span)>,
    unused: Vec<(String, Span)>,
}

pub struct Linter<P> {
    parser: P,
    config: LintConfig,
    registry: ScriptRegistry,
    diagnostics: DiagnosticBag,
    /// Linted files waiting for identifier warnings
    pending: Vec<ScriptContext>,
}

impl<P: ScriptParser> Linter<P> {
    pub fn new(parser: P, config: LintConfig) -> Self {
        Linter {
            parser,
            config,
            registry: ScriptRegistry::new(),
            diagnostics: DiagnosticBag::new(),
            pending: Vec::new(),
        }
    }

    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    pub fn registry(&self) -> &ScriptRegistry {
        &self.registry
    }

    pub fn diagnostics(&self) -> &DiagnosticBag {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.take()
    }

    /// Lint a file from disk. A file that was already linted (directly or
    /// as an import) is not linted again.
    pub fn lint_file(&mut self, path: &Path) -> ScriptId {
        let version = self.config.default_version.clone();
        let id = self.lint_path(path, &version);
        self.finish_pending();
        id
    }

    /// Lint in-memory source. `path` names the script in diagnostics,
    /// selects HTML handling by extension and anchors relative imports.
    pub fn lint_source(&mut self, path: &str, source: &str) -> ScriptId {
        let (id, inserted) = self.registry.get_or_insert(path);
        if !inserted {
            return id;
        }
        let _span = info_span!("lint_source", path).entered();
        let file = Path::new(path);
        let base_dir = file.parent().map(Path::to_path_buf).unwrap_or_default();
        let version = self.config.default_version.clone();
        self.lint_text(id, path.to_string(), base_dir, source, is_html(file), &version);
        self.finish_pending();
        id
    }

    fn lint_path(&mut self, path: &Path, version: &JsVersion) -> ScriptId {
        let key = normalize_path(path);
        let (id, inserted) = self.registry.get_or_insert(&key);
        if !inserted {
            debug!(path = %path.display(), "already linted");
            return id;
        }
        let _span = info_span!("lint_file", path = %path.display()).entered();

        let display = path.display().to_string();
        let text = match std::fs::read(path) {
            Ok(bytes) => match self.config.encoding.decode(&bytes) {
                Ok(text) => text,
                Err(err) => {
                    self.io_error(&display, format!("unable to decode {display}: {err}"));
                    return id;
                }
            },
            Err(err) => {
                self.io_error(&display, format!("unable to read {display}: {err}"));
                return id;
            }
        };

        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        self.lint_text(id, display, base_dir, &text, is_html(path), version);
        id
    }

    fn io_error(&mut self, path: &str, message: String) {
        self.diagnostics.add(Diagnostic {
            path: path.to_string(),
            offset: 0,
            line: 0,
            col: 0,
            severity: Severity::Error,
            name: "io_error".to_string(),
            message,
        });
    }

    fn lint_text(
        &mut self,
        id: ScriptId,
        path: String,
        base_dir: PathBuf,
        text: &str,
        html: bool,
        version: &JsVersion,
    ) {
        let mut ctx = ScriptContext::new(id, path, base_dir, text);

        if html {
            let parser = &self.parser;
            let fragments =
                find_html_scripts(text, version, |t, v| parser.is_compilable_unit(t, v));
            for fragment in fragments {
                match fragment {
                    Fragment::Inline {
                        text,
                        start_offset,
                        anchor,
                        version,
                    } => {
                        let span = part_span(start_offset, &text);
                        ctx.parts
                            .push((span, PositionMapper::with_anchor(&text, anchor)));
                        self.lint_part(&mut ctx, &text, start_offset, version);
                    }
                    Fragment::External {
                        src,
                        offset,
                        version,
                    } => self.import_script(&mut ctx, offset, &src, &version),
                }
            }
        } else {
            self.lint_part(&mut ctx, text, 0, version.clone());
        }

        self.pending.push(ctx);
    }

    fn lint_part(
        &mut self,
        ctx: &mut ScriptContext,
        text: &str,
        start_offset: u32,
        mut version: JsVersion,
    ) {
        let candidates = find_possible_comments(text, start_offset);

        // The version has to be known before parsing, so content-type is
        // read from the unfiltered candidates and checked afterwards.
        let mut version_comment = None;
        for candidate in &candidates {
            let DirectiveParse::Directive(directive) = parse_control_comment(&candidate.atom)
            else {
                continue;
            };
            if directive.keyword != DirectiveKeyword::ContentType {
                continue;
            }
            match JsVersion::from_type(&directive.params) {
                Some(selected) => {
                    version = selected;
                    version_comment = Some(candidate.start);
                }
                None => ctx.report(
                    Report::new(candidate.start, "unsupported_version")
                        .arg("version", directive.params.as_str()),
                ),
            }
        }

        let version_offset = version_comment.unwrap_or(start_offset);
        if !version.is_supported() {
            ctx.report(
                Report::new(version_offset, "unsupported_version").arg("version", version.version),
            );
            return;
        }
        if version.e4x {
            ctx.report(Report::new(version_offset, "e4x_deprecated"));
        }

        let tree = match self.parser.parse(text, &version, start_offset) {
            Ok(tree) => tree,
            Err(ParseError::Syntax(err)) => {
                debug!(offset = err.offset, key = %err.message_key, "part aborted");
                ctx.report(err.into());
                return;
            }
            Err(err) => {
                debug!(error = %err, "part aborted");
                ctx.report(Report::new(start_offset, "io_error").arg("error", err.to_string()));
                return;
            }
        };
        ctx.reports
            .extend(tree.warnings().iter().cloned().map(Report::from));

        let comments = filter_comments(candidates, &tree);
        if let Some(offset) = version_comment
            && !comments.iter().any(|c| c.start == offset)
        {
            ctx.report(Report::new(offset, "incorrect_version"));
        }

        let directives = read_directives(ctx, &comments, part_span(start_offset, text));
        self.registry
            .script_mut(ctx.id)
            .ignores
            .extend(directives.ignores.iter().copied());

        for (offset, target) in &directives.imports {
            self.import_script(ctx, *offset, target, &version);
        }

        let scopes = &mut self.registry.script_mut(ctx.id).scopes;
        let (scope_reports, check_reports) = {
            let mut builder = ScopeBuilder::new(scopes);
            let mut checks = LintChecks::new(directives.fallthrus, directives.passes);
            walk(&tree, &mut [&mut builder, &mut checks]);
            (builder.into_reports(), checks.finish())
        };
        ctx.reports.extend(scope_reports);
        ctx.reports.extend(check_reports);

        for (name, span) in &directives.declares {
            let scope = scopes.find_scope(*span);
            let key = match scopes.warn_or_declare(scope, name, DeclarationKind::Var, *span) {
                DeclareOutcome::Declared => continue,
                DeclareOutcome::HidesArg => "var_hides_arg",
                DeclareOutcome::Redeclared => "redeclared_var",
            };
            ctx.report(Report::new(span.start, key).arg("name", name.as_str()));
        }
        for (name, span) in &directives.unused {
            let scope = scopes.find_scope(*span);
            scopes.set_unused(scope, name, *span);
        }

        ctx.reports
            .extend(check_trailing_whitespace(text, start_offset));
    }

    fn import_script(
        &mut self,
        ctx: &mut ScriptContext,
        offset: u32,
        target: &str,
        version: &JsVersion,
    ) {
        match self.resolve_import(&ctx.base_dir, target) {
            Some(path) => {
                debug!(import = target, resolved = %path.display(), "linking import");
                let imported = self.lint_path(&path, version);
                self.registry.import(ctx.id, imported);
            }
            None => ctx.report(
                Report::new(offset, "io_error")
                    .arg("error", format!("unable to resolve import: {target}")),
            ),
        }
    }

    /// Find `target` next to the importing file, then in each include
    /// directory.
    fn resolve_import(&self, base_dir: &Path, target: &str) -> Option<PathBuf> {
        let target = Path::new(target);
        if target.is_absolute() {
            return target.is_file().then(|| target.to_path_buf());
        }
        std::iter::once(base_dir)
            .chain(self.config.include_dirs.iter().map(PathBuf::as_path))
            .map(|dir| dir.join(target))
            .find(|candidate| candidate.is_file())
    }

    fn finish_pending(&mut self) {
        for ctx in std::mem::take(&mut self.pending) {
            self.finish_script(ctx);
        }
    }

    fn finish_script(&mut self, mut ctx: ScriptContext) {
        let script = self.registry.script(ctx.id);
        let warnings = script.scopes.identifier_warnings();

        for undeclared in warnings.undeclared {
            let name = undeclared.name.as_str();
            if self.config.is_declared(name)
                || is_builtin_global(name)
                || self.registry.has_symbol(ctx.id, name)
            {
                continue;
            }
            ctx.report(Report::new(undeclared.span.start, "undeclared_identifier").arg("name", name));
        }

        for hidden in warnings.obstructive {
            ctx.report(
                Report::new(hidden.declaration.span.start, "identifier_hides_another")
                    .arg("name", hidden.name),
            );
        }

        for unreferenced in warnings.unreferenced {
            if unreferenced.scope == ScopeId::ROOT {
                continue;
            }
            let key = match unreferenced.declaration.kind {
                DeclarationKind::Arg => "unreferenced_argument",
                DeclarationKind::Function => "unreferenced_function",
                DeclarationKind::Var => "unreferenced_variable",
            };
            ctx.report(
                Report::new(unreferenced.declaration.span.start, key).arg("name", unreferenced.name),
            );
        }

        self.flush(ctx);
    }

    /// Render the file's reports, dropping ignored and disabled ones.
    fn flush(&mut self, mut ctx: ScriptContext) {
        let script = self.registry.script(ctx.id);
        let mut reports = std::mem::take(&mut ctx.reports);
        reports.sort_by_key(|r| r.offset);

        for report in reports {
            if script.is_ignored(report.offset) {
                continue;
            }
            let (severity, message) = report.describe();
            if severity == Severity::Warning && !self.config.is_enabled(&report.name) {
                continue;
            }
            let position = ctx.position(report.offset);
            self.diagnostics.add(Diagnostic {
                path: ctx.path.clone(),
                offset: report.offset,
                line: position.line,
                col: position.col,
                severity,
                name: report.name,
                message,
            });
        }
    }
}

/// Read the control comments of a part, reporting misuse.
fn read_directives(
    ctx: &mut ScriptContext,
    comments: &[CommentSpan],
    part: Span,
) -> PartDirectives {
    let mut directives = PartDirectives::default();
    let mut open_ignore: Option<u32> = None;

    for comment in comments {
        if let Some(report) = check_nested_comment(comment) {
            ctx.report(report);
        }

        let directive = match parse_control_comment(&comment.atom) {
            DirectiveParse::NotDirective => continue,
            DirectiveParse::NotUnderstood(syntax) => {
                ctx.report(Report::new(comment.start, syntax.not_understood()));
                continue;
            }
            DirectiveParse::Directive(d) if !d.has_valid_params() => {
                ctx.report(Report::new(comment.start, d.syntax.not_understood()));
                continue;
            }
            DirectiveParse::Directive(d) => d,
        };
        debug!(keyword = directive.keyword.as_str(), offset = comment.start, "control comment");

        match directive.keyword {
            DirectiveKeyword::Ignore => {
                if open_ignore.is_some() {
                    ctx.report(Report::new(comment.start, "mismatch_ctrl_comments"));
                }
                open_ignore = Some(comment.start);
            }
            DirectiveKeyword::End => match open_ignore.take() {
                Some(start) => directives.ignores.push(Span::new(start, comment.end)),
                None => ctx.report(Report::new(comment.start, "mismatch_ctrl_comments")),
            },
            DirectiveKeyword::IgnoreAll => directives.ignores.push(part),
            DirectiveKeyword::Import => directives
                .imports
                .push((comment.start, directive.params)),
            DirectiveKeyword::Fallthru => directives.fallthrus.push(comment.span()),
            DirectiveKeyword::Pass => directives.passes.push(comment.span()),
            DirectiveKeyword::Declare => {
                directives.declares.push((directive.params, comment.span()));
            }
            DirectiveKeyword::Unused => directives.unused.push((directive.params, comment.span())),
            // Undeclared identifiers are always checked; content-type
            // was applied before parsing.
            DirectiveKeyword::OptionExplicit | DirectiveKeyword::ContentType => {}
        }
    }

    if let Some(start) = open_ignore {
        ctx.report(Report::new(start, "mismatch_ctrl_comments"));
    }
    directives
}

/// The inclusive span of a part starting at `start_offset`.
fn part_span(start_offset: u32, text: &str) -> Span {
    Span::new(
        start_offset,
        start_offset + (text.len() as u32).saturating_sub(1),
    )
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("htm") || ext.eq_ignore_ascii_case("html"))
}

/// Registry key for a file: its canonical path when it exists.
fn normalize_path(path: &Path) -> String {
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .to_string_lossy()
        .into_owned()
}

//! Calls: user methods and the built-in library.

use snip_diagnostic::ErrorCode;
use snip_ir::{Op, Span, TypeTag};
use snip_parse::ast::{ExprId, ExprKind, Ident};

use super::{conversion_op, MethodChecker};
use crate::library::{self, Signature, StaticOwner};
use crate::ty::{self, ExprInfo, Ty};

/// How a user method was named at the call site.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum CallSite {
    /// `M(...)` inside the declaring class.
    Simple,
    /// `C.M(...)`.
    Qualified,
}

impl MethodChecker<'_> {
    pub(super) fn check_call(&mut self, callee: ExprId, args: &[ExprId]) -> ExprInfo {
        let callee_expr = self.expr(callee);
        match &callee_expr.kind {
            ExprKind::Name(name) => self.check_simple_call(name, callee_expr.span, args),
            ExprKind::Member { receiver, name } => self.check_member_call(*receiver, name, args),
            _ => {
                self.error(ErrorCode::E2001, "Method name expected", callee_expr.span);
                ExprInfo::ERROR
            }
        }
    }

    fn check_simple_call(&mut self, name: &str, span: Span, args: &[ExprId]) -> ExprInfo {
        if self.scopes.lookup(name).is_some() {
            self.error(ErrorCode::E2001, "Method name expected", span);
            return ExprInfo::ERROR;
        }
        match self.current_class().method(name) {
            Some((method, _)) => self.emit_user_call(self.class, method, args, span, CallSite::Simple),
            None => {
                self.error(
                    ErrorCode::E2001,
                    format!("The name '{name}' does not exist in the current context"),
                    span,
                );
                ExprInfo::ERROR
            }
        }
    }

    fn check_member_call(&mut self, receiver: ExprId, name: &Ident, args: &[ExprId]) -> ExprInfo {
        if let Some(owner) = self.static_receiver(receiver) {
            if let StaticOwner::Class(class) = owner {
                return match self.env.classes[class].method(&name.name) {
                    Some((method, _)) => {
                        self.emit_user_call(class, method, args, name.span, CallSite::Qualified)
                    }
                    None => {
                        let display = self.owner_display(owner);
                        self.report_missing_member(&display, name);
                        ExprInfo::ERROR
                    }
                };
            }
            return match library::static_methods(owner, &name.name) {
                Some(candidates) => self.emit_library_call(&name.name, &candidates, args, name.span),
                None => {
                    let display = self.owner_display(owner);
                    self.report_missing_member(&display, name);
                    ExprInfo::ERROR
                }
            };
        }

        let info = self.check_expr(receiver);
        match info.ty {
            Ty::Error => ExprInfo::ERROR,
            Ty::Null => {
                self.report_null_receiver(name.span);
                ExprInfo::ERROR
            }
            Ty::Tag(tag) => match library::instance_methods(tag, &name.name) {
                Some(candidates) => self.emit_library_call(&name.name, &candidates, args, name.span),
                None => {
                    if library::instance_property(tag, &name.name).is_some() {
                        self.error(
                            ErrorCode::E2001,
                            format!(
                                "Non-invocable member '{tag}.{}' cannot be used like a method.",
                                name.name
                            ),
                            name.span,
                        );
                    } else {
                        self.report_missing_member(&tag.display_name(), name);
                    }
                    ExprInfo::ERROR
                }
            },
        }
    }

    fn emit_user_call(
        &mut self,
        class: usize,
        method: usize,
        args: &[ExprId],
        span: Span,
        site: CallSite,
    ) -> ExprInfo {
        let env = self.env;
        let class_sig = &env.classes[class];
        let target = &class_sig.methods[method];

        let needs_instance = !target.is_static
            && (site == CallSite::Qualified || self.method.is_static);
        if needs_instance {
            self.error(
                ErrorCode::E2012,
                format!(
                    "An object reference is required for the non-static field, method, or property '{}'",
                    class_sig.describe(target)
                ),
                span,
            );
            return ExprInfo::ERROR;
        }
        if args.len() != target.params.len() {
            self.report_arity(&target.name, args.len(), span);
            return ExprInfo::ERROR;
        }

        self.check_args(args, &target.params);
        self.builder.emit(Op::Call {
            class: index_u16(class),
            method: index_u16(method),
        });
        ExprInfo::tag(target.return_type)
    }

    /// Check arguments against fixed parameter types, converting each one as
    /// it is pushed.
    pub(super) fn check_args(&mut self, args: &[ExprId], params: &[TypeTag]) {
        for (position, (&arg, &param)) in args.iter().zip(params).enumerate() {
            let info = self.check_expr(arg);
            let conversion = ty::implicit(info, param);
            if conversion.is_valid() {
                self.emit_conversion(conversion, param);
            } else {
                let span = self.expr(arg).span;
                self.report_argument(position, info, param, span);
            }
        }
    }

    /// Pick the first overload whose parameters accept the arguments.
    ///
    /// With several candidates of the right arity, argument types are only
    /// known after the arguments are emitted, so each argument is followed
    /// by a placeholder that later becomes its conversion.
    fn emit_library_call(
        &mut self,
        name: &str,
        candidates: &[Signature],
        args: &[ExprId],
        span: Span,
    ) -> ExprInfo {
        let applicable: Vec<&Signature> = candidates
            .iter()
            .filter(|sig| sig.params.len() == args.len())
            .collect();
        let Some(&first) = applicable.first() else {
            self.report_arity(name, args.len(), span);
            return ExprInfo::ERROR;
        };

        if applicable.len() == 1 {
            self.check_args(args, &first.params);
            self.builder.emit(Op::Intrinsic(first.intrinsic));
            return ExprInfo::tag(first.ret);
        }

        let mut pushed = Vec::with_capacity(args.len());
        for &arg in args {
            let info = self.check_expr(arg);
            let fix = self.builder.emit(Op::Nop);
            pushed.push((info, fix));
        }

        let accepts = |sig: &Signature| {
            sig.params
                .iter()
                .zip(&pushed)
                .all(|(&param, &(info, _))| ty::implicit(info, param).is_valid())
        };
        match applicable.iter().find(|&&sig| accepts(sig)) {
            Some(sig) => {
                for (&param, &(info, fix)) in sig.params.iter().zip(&pushed) {
                    let conversion = ty::implicit(info, param);
                    self.builder.replace(fix, conversion_op(conversion, param));
                }
                self.builder.emit(Op::Intrinsic(sig.intrinsic));
                ExprInfo::tag(sig.ret)
            }
            None => {
                for (position, (&param, &(info, _))) in first.params.iter().zip(&pushed).enumerate() {
                    if !ty::implicit(info, param).is_valid() {
                        let arg_span = self.expr(args[position]).span;
                        self.report_argument(position, info, param, arg_span);
                    }
                }
                ExprInfo::ERROR
            }
        }
    }

    fn report_arity(&mut self, name: &str, count: usize, span: Span) {
        self.error(
            ErrorCode::E2008,
            format!("No overload for method '{name}' takes {count} arguments"),
            span,
        );
    }

    fn report_argument(&mut self, position: usize, info: ExprInfo, param: TypeTag, span: Span) {
        self.error(
            ErrorCode::E2009,
            format!(
                "Argument {}: cannot convert from '{}' to '{param}'",
                position + 1,
                info.ty
            ),
            span,
        );
    }
}

fn index_u16(index: usize) -> u16 {
    u16::try_from(index).unwrap_or(u16::MAX)
}

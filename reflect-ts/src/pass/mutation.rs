//! Pass 2: walks the re-parsed unit and hands every node of interest to its
//! mutator exactly once.
//!
//! The walk is hand-written rather than a visitor because statement mutators
//! splice siblings into the list being walked, and because scopes (declared
//! names, type parameters in reach) open and close around children.
//!
//! Errors do not stop the walk. An unsupported construct fails the unit, but
//! every offending construct is collected and reported together; the caller
//! then skips the prologue and the driver stops before staging.

use crate::ast::class::ClassMember;
use crate::ast::class::ClassOrObjKey;
use crate::ast::class::ClassOrObjVal;
use crate::ast::expr::CallArg;
use crate::ast::expr::Expr;
use crate::ast::expr::LitArrElem;
use crate::ast::expr::ObjMember;
use crate::ast::expr::ObjMemberType;
use crate::ast::func::Func;
use crate::ast::func::FuncBody;
use crate::ast::node::Node;
use crate::ast::pat::Pat;
use crate::ast::stmt::decl::ParamDecl;
use crate::ast::stmt::decl::VarDecl;
use crate::ast::stmt::BlockStmt;
use crate::ast::stmt::EmptyStmt;
use crate::ast::stmt::ForInOfLhs;
use crate::ast::stmt::ForTripleStmtInit;
use crate::ast::stmt::Stmt;
use crate::ast::stx::TopLevel;
use crate::context::Context;
use crate::context::TypeParamAccess;
use crate::error::TransformError;
use crate::mutate;
use crate::mutate::class_decl::member_access;
use crate::mutate::class_decl::member_role;
use crate::mutate::class_decl::type_parameter_names;
use crate::mutate::mutate_func_once;
use crate::mutate::source_file;
use crate::mutate::var_decl;
use crate::mutate::FuncRole;
use std::mem;
use tracing::debug;

/// Mutates `top` in place. Errors do not stop the walk; all of them are
/// returned once it is complete, and the import prologue is only added to a
/// unit that mutated cleanly.
pub fn run(ctx: &mut Context, top: &mut Node<TopLevel>) -> Result<(), Vec<TransformError>> {
  let mut walk = Walk {
    ctx,
    errors: Vec::new(),
  };
  walk.list(&mut top.stx.body);
  let Walk { ctx, errors } = walk;
  if !errors.is_empty() {
    return Err(errors);
  }
  source_file::mutate(ctx, top);
  debug!(mutations = ctx.mutations().len(), "unit mutated");
  Ok(())
}

fn records_mutation(stmt: &Stmt) -> bool {
  matches!(
    stmt,
    Stmt::ClassDecl(_) | Stmt::InterfaceDecl(_) | Stmt::TypeAliasDecl(_) | Stmt::VarDecl(_)
  )
}

struct Walk<'c, 'a> {
  ctx: &'c mut Context<'a>,
  errors: Vec<TransformError>,
}

impl<'c, 'a> Walk<'c, 'a> {
  fn generics(&mut self, names: &[String], access: TypeParamAccess, f: impl FnOnce(&mut Self)) {
    if names.is_empty() {
      return f(self);
    }
    self.ctx.push_generics(names.to_vec(), access);
    f(self);
    self.ctx.pop_generics();
  }

  fn scoped(&mut self, f: impl FnOnce(&mut Self)) {
    self.ctx.push_scope();
    f(self);
    self.ctx.pop_scope();
  }

  // A nested statement list, with its own class and interface declarations.
  fn stmts(&mut self, stmts: &mut Vec<Node<Stmt>>) {
    self.ctx.push_declarations(stmts);
    self.list(stmts);
    self.ctx.pop_declarations();
  }

  fn list(&mut self, stmts: &mut Vec<Node<Stmt>>) {
    // Function declarations and imports are in scope for the whole list.
    for stmt in stmts.iter() {
      match stmt.stx.as_ref() {
        Stmt::Import(import) => {
          for name in import.stx.bindings() {
            self.ctx.declare(name);
          }
        }
        Stmt::FunctionDecl(decl) => {
          if let Some(name) = &decl.stx.name {
            self.ctx.declare(name.stx.name.clone());
          }
        }
        _ => {}
      }
    }
    let mut i = 0;
    while i < stmts.len() {
      let siblings = self.stmt(&mut stmts[i]);
      let inserted = siblings.len();
      stmts.splice(i + 1..i + 1, siblings);
      i += 1 + inserted;
    }
  }

  // A statement in a position that holds exactly one; siblings force a block.
  fn single(&mut self, stmt: &mut Node<Stmt>) {
    let siblings = self.stmt(stmt);
    if siblings.is_empty() {
      return;
    }
    let loc = stmt.loc;
    let placeholder = Node::new(loc, Stmt::Empty(Node::new(loc, EmptyStmt {})));
    let mut body = vec![mem::replace(stmt, placeholder)];
    body.extend(siblings);
    *stmt = Node::new(loc, Stmt::Block(Node::new(loc, BlockStmt { body })));
  }

  fn stmt(&mut self, stmt: &mut Node<Stmt>) -> Vec<Node<Stmt>> {
    let mut siblings = Vec::new();
    if !self.ctx.was_visited(stmt.id) {
      if records_mutation(&stmt.stx) {
        self.ctx.record_mutation(stmt.id);
      }
      match mutate::mutate_stmt(self.ctx, stmt) {
        Ok(out) => siblings = out,
        Err(err) => self.errors.push(err),
      }
      self.ctx.mark_visited(stmt.id);
    }
    self.stmt_children(stmt);
    siblings
  }

  fn stmt_children(&mut self, stmt: &mut Node<Stmt>) {
    match stmt.stx.as_mut() {
      Stmt::Block(block) => self.scoped(|w| w.stmts(&mut block.stx.body)),
      Stmt::Break(_) | Stmt::Continue(_) | Stmt::Empty(_) | Stmt::Import(_) => {}
      Stmt::DoWhile(s) => {
        self.single(&mut s.stx.body);
        self.expr(&mut s.stx.condition);
      }
      Stmt::While(s) => {
        self.expr(&mut s.stx.condition);
        self.single(&mut s.stx.body);
      }
      Stmt::Expr(s) => self.expr(&mut s.stx.expr),
      Stmt::ForIn(s) => {
        let s = s.stx.as_mut();
        self.scoped(|w| {
          w.for_lhs(&mut s.lhs);
          w.expr(&mut s.rhs);
          w.stmts(&mut s.body.stx.body);
        });
      }
      Stmt::ForOf(s) => {
        let s = s.stx.as_mut();
        self.scoped(|w| {
          w.for_lhs(&mut s.lhs);
          w.expr(&mut s.rhs);
          w.stmts(&mut s.body.stx.body);
        });
      }
      Stmt::ForTriple(s) => {
        let s = s.stx.as_mut();
        self.scoped(|w| {
          match &mut s.init {
            ForTripleStmtInit::None => {}
            ForTripleStmtInit::Expr { expr } => w.expr(expr),
            ForTripleStmtInit::Decl { decl } => w.var_decl(decl),
          }
          if let Some(cond) = &mut s.cond {
            w.expr(cond);
          }
          if let Some(post) = &mut s.post {
            w.expr(post);
          }
          w.stmts(&mut s.body.stx.body);
        });
      }
      Stmt::If(s) => {
        self.expr(&mut s.stx.test);
        self.single(&mut s.stx.consequent);
        if let Some(alternate) = &mut s.stx.alternate {
          self.single(alternate);
        }
      }
      Stmt::Label(s) => self.single(&mut s.stx.statement),
      Stmt::Return(s) => {
        if let Some(value) = &mut s.stx.value {
          self.expr(value);
        }
      }
      Stmt::Switch(s) => {
        self.expr(&mut s.stx.test);
        self.scoped(|w| {
          for branch in s.stx.branches.iter_mut() {
            if let Some(case) = &mut branch.stx.case {
              w.expr(case);
            }
            w.stmts(&mut branch.stx.body);
          }
        });
      }
      Stmt::Throw(s) => self.expr(&mut s.stx.value),
      Stmt::Try(s) => {
        let s = s.stx.as_mut();
        self.scoped(|w| w.stmts(&mut s.wrapped.stx.body));
        if let Some(catch) = &mut s.catch {
          self.scoped(|w| {
            if let Some(param) = &mut catch.stx.parameter {
              w.pat(&mut param.stx.pat);
            }
            w.stmts(&mut catch.stx.body);
          });
        }
        if let Some(finally) = &mut s.finally {
          self.scoped(|w| w.stmts(&mut finally.stx.body));
        }
      }
      Stmt::ClassDecl(decl) => {
        let class = decl.stx.as_mut();
        if let Some(extends) = &mut class.extends {
          self.expr(extends);
        }
        let names = type_parameter_names(class);
        let name = class.name_str().map(str::to_string);
        self.class_members(&mut class.members, name.as_deref(), &names);
      }
      Stmt::FunctionDecl(decl) => self.func(&mut decl.stx.function, FuncRole::Function),
      Stmt::VarDecl(decl) => self.declarators(decl),
      Stmt::InterfaceDecl(_) | Stmt::TypeAliasDecl(_) | Stmt::EnumDecl(_) => {}
    }
  }

  // A declaration outside statement position, as in `for (let i: number = 0; ...)`.
  fn var_decl(&mut self, decl: &mut Node<VarDecl>) {
    if !self.ctx.was_visited(decl.id) {
      self.ctx.record_mutation(decl.id);
      if let Err(err) = var_decl::mutate(self.ctx, decl) {
        self.errors.push(err);
      }
      self.ctx.mark_visited(decl.id);
    }
    self.declarators(decl);
  }

  fn declarators(&mut self, decl: &mut Node<VarDecl>) {
    for declarator in decl.stx.declarators.iter_mut() {
      self.pat(&mut declarator.stx.pattern.stx.pat);
      if let Some(init) = &mut declarator.stx.initializer {
        self.expr(init);
      }
    }
  }

  fn for_lhs(&mut self, lhs: &mut ForInOfLhs) {
    match lhs {
      ForInOfLhs::Assign { pat } => self.pat(pat),
      ForInOfLhs::Decl { pattern, .. } => self.pat(&mut pattern.stx.pat),
    }
  }

  fn class_members(&mut self, members: &mut [Node<ClassMember>], class: Option<&str>, names: &[String]) {
    for member in members.iter_mut() {
      let m = member.stx.as_mut();
      let access = member_access(class, m.static_, m.is_constructor());
      let role = member_role(m);
      self.key(&mut m.key);
      self.generics(names, access, |w| match (&mut m.val, role) {
        (ClassOrObjVal::Prop(Some(init)), _) => w.expr(init),
        (val, Some(role)) => {
          if let Some(func) = val.func_mut() {
            w.func(func, role);
          }
        }
        _ => {}
      });
    }
  }

  fn func(&mut self, func: &mut Node<Func>, role: FuncRole) {
    if let Err(err) = mutate_func_once(self.ctx, func, role) {
      self.errors.push(err);
    }
    let names = func.stx.type_parameter_names();
    let f = func.stx.as_mut();
    self.scoped(|w| {
      w.generics(&names, TypeParamAccess::Local, |w| {
        for param in f.parameters.iter_mut() {
          w.param(param);
        }
        match &mut f.body {
          Some(FuncBody::Block(body)) => w.stmts(body),
          Some(FuncBody::Expression(expr)) => w.expr(expr),
          None => {}
        }
      });
    });
  }

  fn param(&mut self, param: &mut Node<ParamDecl>) {
    self.pat(&mut param.stx.pattern.stx.pat);
    if let Some(default) = &mut param.stx.default_value {
      self.expr(default);
    }
  }

  fn pat(&mut self, pat: &mut Node<Pat>) {
    match pat.stx.as_mut() {
      Pat::Id(_) => {}
      Pat::Arr(arr) => {
        for elem in arr.stx.elements.iter_mut().flatten() {
          self.pat(&mut elem.target);
          if let Some(default) = &mut elem.default_value {
            self.expr(default);
          }
        }
        if let Some(rest) = &mut arr.stx.rest {
          self.pat(rest);
        }
      }
      Pat::Obj(obj) => {
        for prop in obj.stx.properties.iter_mut() {
          self.key(&mut prop.stx.key);
          self.pat(&mut prop.stx.target);
          if let Some(default) = &mut prop.stx.default_value {
            self.expr(default);
          }
        }
      }
    }
  }

  fn key(&mut self, key: &mut ClassOrObjKey) {
    if let ClassOrObjKey::Computed(expr) = key {
      self.expr(expr);
    }
  }

  fn args(&mut self, args: &mut [Node<CallArg>]) {
    for arg in args.iter_mut() {
      self.expr(&mut arg.stx.value);
    }
  }

  fn obj_member(&mut self, member: &mut Node<ObjMember>) {
    match &mut member.stx.typ {
      ObjMemberType::Valued { key, val } => {
        self.key(key);
        let role = match val {
          ClassOrObjVal::Getter(_) => FuncRole::Getter,
          ClassOrObjVal::Setter(_) => FuncRole::Setter,
          ClassOrObjVal::Method(_) => FuncRole::Method,
          ClassOrObjVal::Prop(Some(value)) => return self.expr(value),
          ClassOrObjVal::Prop(None) | ClassOrObjVal::IndexSignature(_) => return,
        };
        if let Some(func) = val.func_mut() {
          self.func(func, role);
        }
      }
      ObjMemberType::Shorthand { .. } => {}
      ObjMemberType::Rest { val } => self.expr(val),
    }
  }

  fn expr(&mut self, expr: &mut Node<Expr>) {
    match expr.stx.as_mut() {
      Expr::ArrowFunc(arrow) => self.func(&mut arrow.stx.func, FuncRole::Function),
      Expr::Func(func) => self.func(&mut func.stx.func, FuncRole::Function),
      Expr::Class(class) => {
        let class = class.stx.as_mut();
        if let Some(extends) = &mut class.extends {
          self.expr(extends);
        }
        // Class expressions have no symbol to reach type parameters through.
        self.class_members(&mut class.members, None, &[]);
      }
      Expr::Binary(binary) => {
        self.expr(&mut binary.stx.left);
        self.expr(&mut binary.stx.right);
      }
      Expr::Call(call) => {
        self.expr(&mut call.stx.callee);
        self.args(&mut call.stx.arguments);
      }
      Expr::New(new) => {
        self.expr(&mut new.stx.callee);
        self.args(&mut new.stx.arguments);
      }
      Expr::ComputedMember(member) => {
        self.expr(&mut member.stx.object);
        self.expr(&mut member.stx.member);
      }
      Expr::Member(member) => self.expr(&mut member.stx.left),
      Expr::Cond(cond) => {
        self.expr(&mut cond.stx.test);
        self.expr(&mut cond.stx.consequent);
        self.expr(&mut cond.stx.alternate);
      }
      Expr::Unary(unary) => self.expr(&mut unary.stx.argument),
      Expr::LitArr(arr) => {
        for elem in arr.stx.elements.iter_mut() {
          match elem {
            LitArrElem::Single(e) | LitArrElem::Rest(e) => self.expr(e),
            LitArrElem::Empty => {}
          }
        }
      }
      Expr::LitObj(obj) => {
        for member in obj.stx.members.iter_mut() {
          self.obj_member(member);
        }
      }
      Expr::Id(_)
      | Expr::Super(_)
      | Expr::This(_)
      | Expr::LitBool(_)
      | Expr::LitNull(_)
      | Expr::LitNum(_)
      | Expr::LitStr(_) => {}
    }
  }
}

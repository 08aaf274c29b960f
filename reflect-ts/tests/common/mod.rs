#![allow(dead_code)]

use ahash::AHashMap;
use derive_visitor::Drive;
use derive_visitor::Visitor;
use reflect_ts::ast::class::ClassMember;
use reflect_ts::ast::class::ClassOrObjMethod;
use reflect_ts::ast::class::ClassOrObjVal;
use reflect_ts::ast::func::Func;
use reflect_ts::ast::func::FuncBody;
use reflect_ts::ast::node::Node;
use reflect_ts::ast::node::NodeId;
use reflect_ts::ast::pat::ClassOrFuncName;
use reflect_ts::ast::render;
use reflect_ts::ast::stmt::decl::ClassDecl;
use reflect_ts::ast::stmt::decl::FuncDecl;
use reflect_ts::ast::stmt::decl::ParamDecl;
use reflect_ts::ast::stmt::decl::VarDeclMode;
use reflect_ts::ast::stmt::decl::VarDeclarator;
use reflect_ts::ast::stmt::Stmt;
use reflect_ts::ast::stx::TopLevel;
use reflect_ts::ast::ts_stmt::InterfaceDecl;
use reflect_ts::ast::ts_stmt::TypeAliasDecl;
use reflect_ts::ast::type_expr::TypeBoolean;
use reflect_ts::ast::type_expr::TypeEntityName;
use reflect_ts::ast::type_expr::TypeExpr;
use reflect_ts::ast::type_expr::TypeMember;
use reflect_ts::ast::type_expr::TypeNumber;
use reflect_ts::ast::type_expr::TypeParameter;
use reflect_ts::ast::type_expr::TypePropertyKey;
use reflect_ts::ast::type_expr::TypePropertySignature;
use reflect_ts::ast::type_expr::TypeReference;
use reflect_ts::ast::type_expr::TypeString;
use reflect_ts::build;
use reflect_ts::diagnostics::Diagnostic;
use reflect_ts::diagnostics::FileId;
use reflect_ts::frontend::FrontEnd;
use reflect_ts::frontend::SyntaxTree;
use reflect_ts::frontend::TypeInference;
use reflect_ts::ids;
use reflect_ts::ids::IdGen;
use reflect_ts::loc::Loc;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

/// A front end over units stored as JSON syntax trees.
///
/// Inference answers by binding name (`"x"` for `let x`, `"f()"` for the
/// return type of function `f`). Units outside the staging directory report
/// `errors` semantic errors each.
#[derive(Default)]
pub struct Fixture {
  pub inferred: AHashMap<String, Node<TypeExpr>>,
  pub errors: usize,
  pub parsed: Vec<PathBuf>,
  pub emitted: Vec<PathBuf>,
  names: AHashMap<(FileId, NodeId), String>,
  next_file: u32,
}

impl Fixture {
  pub fn new() -> Fixture {
    Fixture::default()
  }

  pub fn infer(mut self, binding: &str, ty: Node<TypeExpr>) -> Fixture {
    self.inferred.insert(binding.to_string(), ty);
    self
  }

  pub fn with_errors(mut self, errors: usize) -> Fixture {
    self.errors = errors;
    self
  }
}

fn front_end_error(message: String) -> Vec<Diagnostic> {
  vec![Diagnostic::error("TS1005", message, Loc::default().to_span(FileId(0)))]
}

impl TypeInference for Fixture {
  fn infer_type(&self, file: FileId, node: NodeId) -> Option<Node<TypeExpr>> {
    let name = self.names.get(&(file, node))?;
    self.inferred.get(name).cloned()
  }
}

impl FrontEnd for Fixture {
  fn parse(&mut self, roots: &[PathBuf]) -> Result<Vec<SyntaxTree>, Vec<Diagnostic>> {
    let mut trees = Vec::new();
    for root in roots {
      let text = fs::read_to_string(root).map_err(|e| front_end_error(format!("{}: {e}", root.display())))?;
      let mut top: Node<TopLevel> = serde_json::from_str(&text).map_err(|e| front_end_error(e.to_string()))?;
      ids::assign_ids(&mut top, &mut IdGen::new());
      let file = FileId(self.next_file);
      self.next_file += 1;
      let mut names = BindingNames::default();
      top.drive(&mut names);
      for (id, name) in names.found {
        self.names.insert((file, id), name);
      }
      self.parsed.push(root.clone());
      trees.push(SyntaxTree {
        file,
        path: root.clone(),
        is_declaration: root.to_string_lossy().ends_with(".d.ts"),
        text,
        top,
      });
    }
    Ok(trees)
  }

  fn diagnostics(&self, tree: &SyntaxTree) -> Vec<Diagnostic> {
    if is_staged(&tree.path) {
      return Vec::new();
    }
    (0..self.errors)
      .map(|i| Diagnostic::error("TS2322", format!("semantic error {i}"), Loc(0, 1).to_span(tree.file)))
      .collect()
  }

  fn print(&self, tree: &SyntaxTree) -> String {
    serde_json::to_string_pretty(&tree.top).expect("syntax trees serialize")
  }

  fn emit(&mut self, trees: &[SyntaxTree], root: &Path, out_dir: &Path) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for tree in trees {
      let relative = tree.path.strip_prefix(root).unwrap_or(tree.path.as_path());
      let out = out_dir.join(relative).with_extension("js");
      match fs::write(&out, render::top_level_text(&tree.top)) {
        Ok(()) => self.emitted.push(out),
        Err(e) => diagnostics.push(Diagnostic::error(
          "TS5033",
          format!("{}: {e}", out.display()),
          Loc::default().to_span(tree.file),
        )),
      }
    }
    diagnostics
  }
}

pub fn is_staged(path: &Path) -> bool {
  path.components().any(|c| c.as_os_str() == ".reflect-ts")
}

type VarDeclaratorNode = Node<VarDeclarator>;
type ParamDeclNode = Node<ParamDecl>;
type ClassMemberNode = Node<ClassMember>;
type FuncDeclNode = Node<FuncDecl>;

#[derive(Default, Visitor)]
#[visitor(VarDeclaratorNode(enter), ParamDeclNode(enter), ClassMemberNode(enter), FuncDeclNode(enter))]
struct BindingNames {
  found: Vec<(NodeId, String)>,
}

impl BindingNames {
  fn enter_var_declarator_node(&mut self, node: &VarDeclaratorNode) {
    if let Some(name) = node.stx.pattern.stx.pat.stx.as_ident() {
      self.found.push((node.id, name.to_string()));
    }
  }

  fn enter_param_decl_node(&mut self, node: &ParamDeclNode) {
    if let Some(name) = node.stx.name() {
      self.found.push((node.id, name.to_string()));
    }
  }

  fn enter_class_member_node(&mut self, node: &ClassMemberNode) {
    if let Some(name) = node.stx.key.direct_name() {
      self.found.push((node.id, name.to_string()));
    }
  }

  fn enter_func_decl_node(&mut self, node: &FuncDeclNode) {
    if let Some(name) = &node.stx.name {
      self.found.push((node.stx.function.id, format!("{}()", name.stx.name)));
    }
  }
}

/// Writes `top` as the unit `name` under `dir`.
pub fn write_unit(dir: &Path, name: &str, top: &Node<TopLevel>) -> PathBuf {
  let path = dir.join(name);
  fs::write(&path, serde_json::to_string(top).expect("syntax trees serialize")).expect("unit written");
  path
}

/// Compares rendered output, showing a line diff on mismatch.
pub fn assert_text(actual: &str, expected: &str) {
  if actual != expected {
    let diff = similar::TextDiff::from_lines(expected, actual);
    panic!("rendered output differs:\n{}", diff.unified_diff().header("expected", "actual"));
  }
}

pub fn loc() -> Loc {
  Loc::default()
}

pub fn ty(t: TypeExpr) -> Node<TypeExpr> {
  Node::new(loc(), t)
}

pub fn number() -> Node<TypeExpr> {
  ty(TypeExpr::Number(Node::new(loc(), TypeNumber {})))
}

pub fn string() -> Node<TypeExpr> {
  ty(TypeExpr::String(Node::new(loc(), TypeString {})))
}

pub fn boolean() -> Node<TypeExpr> {
  ty(TypeExpr::Boolean(Node::new(loc(), TypeBoolean {})))
}

pub fn type_ref(name: &str, args: Vec<Node<TypeExpr>>) -> Node<TypeExpr> {
  ty(TypeExpr::TypeReference(Node::new(
    loc(),
    TypeReference {
      name: TypeEntityName::ident(name),
      type_arguments: (!args.is_empty()).then_some(args),
    },
  )))
}

pub fn type_param(name: &str) -> Node<TypeParameter> {
  Node::new(
    loc(),
    TypeParameter {
      name: name.into(),
      constraint: None,
      default: None,
    },
  )
}

pub fn unit(body: Vec<Node<Stmt>>) -> Node<TopLevel> {
  Node::new(loc(), TopLevel { body })
}

/// Numbers a unit the way a front end would.
pub fn parsed(body: Vec<Node<Stmt>>) -> Node<TopLevel> {
  let mut top = unit(body);
  ids::assign_ids(&mut top, &mut IdGen::new());
  top
}

pub fn let_stmt(name: &str, annotation: Option<Node<TypeExpr>>, value: f64) -> Node<Stmt> {
  let mut stmt = build::var_decl_stmt(loc(), VarDeclMode::Let, name, build::number(loc(), value));
  if let Stmt::VarDecl(decl) = stmt.stx.as_mut() {
    decl.stx.declarators[0].stx.type_annotation = annotation;
  }
  stmt
}

pub fn type_alias(name: &str, type_expr: Node<TypeExpr>) -> Node<Stmt> {
  Node::new(
    loc(),
    Stmt::TypeAliasDecl(Node::new(
      loc(),
      TypeAliasDecl {
        export: false,
        declare: false,
        name: name.into(),
        type_parameters: None,
        type_expr,
      },
    )),
  )
}

pub fn interface_stmt(name: &str, declare: bool, props: Vec<(&str, Node<TypeExpr>)>) -> Node<Stmt> {
  let members = props
    .into_iter()
    .map(|(key, t)| {
      let signature = TypePropertySignature {
        readonly: false,
        optional: false,
        key: TypePropertyKey::Identifier(key.into()),
        type_annotation: Some(t),
      };
      Node::new(loc(), TypeMember::Property(Node::new(loc(), signature)))
    })
    .collect();
  Node::new(
    loc(),
    Stmt::InterfaceDecl(Node::new(
      loc(),
      InterfaceDecl {
        export: false,
        declare,
        name: name.into(),
        type_parameters: None,
        extends: vec![],
        members,
      },
    )),
  )
}

pub fn func(params: Vec<(&str, Node<TypeExpr>)>, return_type: Option<Node<TypeExpr>>, body: Option<FuncBody>) -> Node<Func> {
  let parameters = params
    .into_iter()
    .map(|(name, t)| {
      let mut p = build::param(loc(), name);
      p.stx.type_annotation = Some(t);
      p
    })
    .collect();
  Node::new(
    loc(),
    Func {
      arrow: false,
      async_: false,
      generator: false,
      type_parameters: None,
      parameters,
      return_type,
      body,
    },
  )
}

pub fn function_decl(name: &str, function: Node<Func>) -> Node<Stmt> {
  Node::new(
    loc(),
    Stmt::FunctionDecl(Node::new(
      loc(),
      FuncDecl {
        export: false,
        export_default: false,
        name: Some(Node::new(loc(), ClassOrFuncName { name: name.into() })),
        function,
      },
    )),
  )
}

pub fn prop(name: &str, t: Node<TypeExpr>) -> Node<ClassMember> {
  Node::new(
    loc(),
    ClassMember {
      decorators: vec![],
      key: build::direct_key(loc(), name),
      static_: false,
      readonly: false,
      optional: false,
      accessibility: None,
      type_annotation: Some(t),
      val: ClassOrObjVal::Prop(None),
    },
  )
}

pub fn method(name: &str, function: Node<Func>) -> Node<ClassMember> {
  Node::new(
    loc(),
    ClassMember {
      decorators: vec![],
      key: build::direct_key(loc(), name),
      static_: false,
      readonly: false,
      optional: false,
      accessibility: None,
      type_annotation: None,
      val: ClassOrObjVal::Method(Node::new(loc(), ClassOrObjMethod { func: function })),
    },
  )
}

pub fn class_decl(name: &str, members: Vec<Node<ClassMember>>) -> ClassDecl {
  ClassDecl {
    decorators: vec![],
    export: false,
    export_default: false,
    declare: false,
    abstract_: false,
    name: Some(Node::new(loc(), ClassOrFuncName { name: name.into() })),
    type_parameters: None,
    extends: None,
    extends_type_arguments: None,
    implements: vec![],
    members,
  }
}

pub fn class_stmt(decl: ClassDecl) -> Node<Stmt> {
  Node::new(loc(), Stmt::ClassDecl(Node::new(loc(), decl)))
}

mod common;

use common::*;
use reflect_ts::ast::func::FuncBody;
use reflect_ts::build;
use reflect_ts::pipeline::Stage;
use reflect_ts::report::Event;
use reflect_ts::transform;
use reflect_ts::TransformOptions;
use std::fs;
use tempfile::TempDir;

fn project() -> TempDir {
  tempfile::tempdir().expect("temp dir")
}

#[test]
fn transforms_and_emits_next_to_the_entry() {
  let dir = project();
  let f = func(
    vec![("a", string())],
    Some(number()),
    Some(FuncBody::Block(vec![build::return_stmt(loc(), Some(build::number(loc(), 1.0)))])),
  );
  let entry = write_unit(
    dir.path(),
    "main.ts",
    &unit(vec![let_stmt("x", Some(number()), 1.0), function_decl("f", f)]),
  );

  let mut fe = Fixture::new();
  let mut events: Vec<Event> = Vec::new();
  let outcome = transform(&mut fe, &entry, &TransformOptions::default(), &mut events).unwrap();

  let emitted = fs::read_to_string(dir.path().join("main.js")).unwrap();
  assert_text(
    &emitted,
    concat!(
      "import _t from \"ts-runtime/lib\";\n",
      "let x: number = _t.number().assert(1);\n",
      "function f(a: string): number { const _returnType = _t.return(_t.number()); ",
      "_t.param(\"a\", _t.string()).assert(a); return _returnType.assert(1); }",
    ),
  );
  assert_eq!(
    outcome.stages,
    vec![
      Stage::Init,
      Stage::ParseOriginal,
      Stage::DiagnoseOriginal,
      Stage::Pass1Rewrite,
      Stage::WriteTemp,
      Stage::ParseTemp,
      Stage::Pass2Rewrite,
      Stage::WriteTemp2,
      Stage::ParseFinal,
      Stage::Emit,
      Stage::Cleanup,
    ]
  );
  assert_eq!(outcome.files, vec![dir.path().join(".reflect-ts").join("main.ts")]);
  assert!(outcome.mutations >= 2);
  assert!(!outcome.temp_dir.exists());
  assert_eq!(events.first(), Some(&Event::Start { entry: entry.clone() }));
  assert_eq!(events.last(), Some(&Event::End { success: true }));
  // Entry, staged unit after pass 1, staged unit after pass 2.
  assert_eq!(fe.parsed.len(), 3);
  assert!(fe.parsed[1..].iter().all(|p| is_staged(p)));
}

#[test]
fn inferred_types_become_annotations() {
  let dir = project();
  let entry = write_unit(dir.path(), "main.ts", &unit(vec![let_stmt("y", None, 2.0)]));
  let mut fe = Fixture::new().infer("y", number());
  transform(&mut fe, &entry, &TransformOptions::default(), &mut Vec::<Event>::new()).unwrap();
  let emitted = fs::read_to_string(dir.path().join("main.js")).unwrap();
  assert!(emitted.ends_with("let y: number = _t.number().assert(2);"), "{emitted}");
}

#[test]
fn inference_misses_fail_and_clean_up() {
  let dir = project();
  let entry = write_unit(dir.path(), "main.ts", &unit(vec![let_stmt("z", None, 3.0)]));
  let mut fe = Fixture::new();
  let mut events: Vec<Event> = Vec::new();
  let diagnostics = transform(&mut fe, &entry, &TransformOptions::default(), &mut events).unwrap_err();
  assert_eq!(diagnostics.len(), 1);
  assert_eq!(diagnostics[0].code, "RTS0002");
  assert_eq!(diagnostics[0].notes, vec!["while inferring the type of `z`".to_string()]);
  assert!(!dir.path().join(".reflect-ts").exists());
  assert!(!dir.path().join("main.js").exists());
  assert_eq!(events.last(), Some(&Event::End { success: false }));
  assert!(events.iter().any(|e| matches!(e, Event::Diagnostics { total: 1, .. })));
}

#[test]
fn unsupported_constructs_fail_with_their_kind() {
  use reflect_ts::ast::type_expr::TypeExpr;
  use reflect_ts::ast::type_expr::TypeOperator;
  use reflect_ts::ast::type_expr::TypeOperatorExpr;
  use reflect_ts::ast::node::Node;

  let keyof = ty(TypeExpr::TypeOperator(Node::new(
    loc(),
    TypeOperatorExpr {
      operator: TypeOperator::KeyOf,
      type_expr: number(),
    },
  )));
  let dir = project();
  let entry = write_unit(dir.path(), "main.ts", &unit(vec![let_stmt("k", Some(keyof), 0.0)]));
  let diagnostics = transform(&mut Fixture::new(), &entry, &TransformOptions::default(), &mut Vec::<Event>::new()).unwrap_err();
  assert_eq!(diagnostics.len(), 1);
  assert_eq!(diagnostics[0].code, "RTS0001");
  assert_eq!(diagnostics[0].message, "No reflection for syntax kind 'TypeOperator' found.");
}

#[test]
fn keeps_staged_units_on_request() {
  let dir = project();
  let entry = write_unit(dir.path(), "main.ts", &unit(vec![let_stmt("x", Some(number()), 1.0)]));
  let options = TransformOptions {
    keep_temp_files: true,
    ..TransformOptions::default()
  };
  let outcome = transform(&mut Fixture::new(), &entry, &options, &mut Vec::<Event>::new()).unwrap();
  assert!(!outcome.stages.contains(&Stage::Cleanup));
  let staged = dir.path().join(".reflect-ts").join("main.ts");
  let text = fs::read_to_string(&staged).unwrap();
  // The staged unit is the pass 2 output, still a parseable tree.
  assert!(text.contains("\"assert\""));

  // A later run starts from a clean staging directory.
  fs::write(dir.path().join(".reflect-ts").join("stale.ts"), "{}").unwrap();
  transform(&mut Fixture::new(), &entry, &options, &mut Vec::<Event>::new()).unwrap();
  assert!(!dir.path().join(".reflect-ts").join("stale.ts").exists());
}

#[test]
fn front_end_errors_are_batched_and_do_not_stop_emission() {
  let dir = project();
  let entry = write_unit(dir.path(), "main.ts", &unit(vec![let_stmt("x", Some(number()), 1.0)]));
  let mut fe = Fixture::new().with_errors(25);
  let mut events: Vec<Event> = Vec::new();
  let diagnostics = transform(&mut fe, &entry, &TransformOptions::default(), &mut events).unwrap_err();
  assert_eq!(diagnostics.len(), 25);
  assert!(dir.path().join("main.js").exists());
  let batches: Vec<usize> = events
    .iter()
    .filter_map(|e| match e {
      Event::Diagnostics { batch, total } => {
        assert_eq!(*total, 25);
        Some(batch.len())
      }
      _ => None,
    })
    .collect();
  assert_eq!(batches, vec![10, 10, 5]);
  let Some(Event::Diagnostics { batch, .. }) = events.iter().find(|e| matches!(e, Event::Diagnostics { .. })) else {
    panic!("no diagnostics reported");
  };
  assert!(batch[0].starts_with("error[TS2322]: semantic error 0\n --> "));
}

#[test]
fn final_diagnostics_are_opt_in() {
  let dir = project();
  let entry = write_unit(dir.path(), "main.ts", &unit(vec![let_stmt("x", Some(number()), 1.0)]));
  let options = TransformOptions {
    final_diagnostics: true,
    ..TransformOptions::default()
  };
  let outcome = transform(&mut Fixture::new(), &entry, &options, &mut Vec::<Event>::new()).unwrap();
  assert!(outcome.stages.contains(&Stage::DiagnoseFinal));
  assert!(outcome.diagnostics.is_empty());
}

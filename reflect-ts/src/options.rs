use serde::Deserialize;
use serde::Serialize;

/// Configuration of one transformation run.
///
/// Deserializes from camelCase JSON; absent keys take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformOptions {
  /// The compiled program uses strict null checks, so nullable wrapping never
  /// applies.
  pub strict_null_checks: bool,
  /// Wrap primitive and literal reflections with `n(...)` to admit `null` and
  /// `undefined`. Off unless enabled explicitly.
  pub nullable_wrapping: bool,
  /// Prepend `import "module-alias/register";` to every unit.
  pub module_aliasing: bool,
  /// Staging directory for intermediate units, next to the entry unit.
  pub temp_folder_name: String,
  pub keep_temp_files: bool,
  /// Prefix of the runtime library identifier and of generated locals.
  pub library_namespace: String,
  pub library_alias: String,
  /// Module specifier the runtime library is imported from.
  pub library_module: String,
  /// Also report diagnostics of the final program.
  pub final_diagnostics: bool,
  /// Maximum number of diagnostics reported per batch.
  pub diagnostic_batch_size: usize,
  /// Maximum number of diagnostics reported in total, when bounded.
  pub max_diagnostics: Option<usize>,
}

impl Default for TransformOptions {
  fn default() -> Self {
    TransformOptions {
      strict_null_checks: false,
      nullable_wrapping: false,
      module_aliasing: false,
      temp_folder_name: ".reflect-ts".to_string(),
      keep_temp_files: false,
      library_namespace: "_".to_string(),
      library_alias: "t".to_string(),
      library_module: "ts-runtime/lib".to_string(),
      final_diagnostics: false,
      diagnostic_batch_size: 10,
      max_diagnostics: None,
    }
  }
}

impl TransformOptions {
  pub fn from_json(text: &str) -> serde_json::Result<TransformOptions> {
    serde_json::from_str(text)
  }

  /// Identifier the runtime library is bound to, e.g. `_t`.
  pub fn lib_ident(&self) -> String {
    format!("{}{}", self.library_namespace, self.library_alias)
  }

  /// Name of a generated local, e.g. `_returnType`.
  pub fn local(&self, name: &str) -> String {
    format!("{}{name}", self.library_namespace)
  }

  /// Whether primitive reflections get wrapped with `n(...)`.
  pub fn wraps_nullable(&self) -> bool {
    self.nullable_wrapping && !self.strict_null_checks
  }

  pub(crate) fn batch_size(&self) -> usize {
    self.diagnostic_batch_size.max(1)
  }
}

#[cfg(test)]
mod tests {
  use super::TransformOptions;

  #[test]
  fn defaults_apply_to_missing_keys() {
    let options = TransformOptions::from_json(r#"{ "moduleAliasing": true, "libraryAlias": "rt" }"#).unwrap();
    assert!(options.module_aliasing);
    assert_eq!(options.lib_ident(), "_rt");
    assert_eq!(options.temp_folder_name, ".reflect-ts");
    assert_eq!(options.diagnostic_batch_size, 10);
    assert!(!options.wraps_nullable());
    assert_eq!(options.max_diagnostics, None);
  }

  #[test]
  fn strict_null_checks_disable_wrapping() {
    let mut options = TransformOptions {
      nullable_wrapping: true,
      ..TransformOptions::default()
    };
    assert!(options.wraps_nullable());
    options.strict_null_checks = true;
    assert!(!options.wraps_nullable());
  }

  #[test]
  fn locals_use_namespace() {
    let options = TransformOptions::default();
    assert_eq!(options.local("returnType"), "_returnType");
    assert_eq!(options.local("typeParameters"), "_typeParameters");
  }
}

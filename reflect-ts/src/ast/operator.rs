use serde::Deserialize;
use serde::Serialize;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum OperatorName {
  Addition,
  Assignment,
  AssignmentAddition,
  BitwiseAnd,
  BitwiseNot,
  BitwiseOr,
  Comma,
  Division,
  Equality,
  GreaterThan,
  GreaterThanOrEqual,
  In,
  Inequality,
  Instanceof,
  LessThan,
  LessThanOrEqual,
  LogicalAnd,
  LogicalNot,
  LogicalOr,
  Multiplication,
  NullishCoalescing,
  Remainder,
  StrictEquality,
  StrictInequality,
  Subtraction,
  Typeof,
  UnaryNegation,
  UnaryPlus,
  Void,
  Await,
  Delete,
}

impl OperatorName {
  pub fn text(self) -> &'static str {
    match self {
      OperatorName::Addition | OperatorName::UnaryPlus => "+",
      OperatorName::Assignment => "=",
      OperatorName::AssignmentAddition => "+=",
      OperatorName::BitwiseAnd => "&",
      OperatorName::BitwiseNot => "~",
      OperatorName::BitwiseOr => "|",
      OperatorName::Comma => ",",
      OperatorName::Division => "/",
      OperatorName::Equality => "==",
      OperatorName::GreaterThan => ">",
      OperatorName::GreaterThanOrEqual => ">=",
      OperatorName::In => "in",
      OperatorName::Inequality => "!=",
      OperatorName::Instanceof => "instanceof",
      OperatorName::LessThan => "<",
      OperatorName::LessThanOrEqual => "<=",
      OperatorName::LogicalAnd => "&&",
      OperatorName::LogicalNot => "!",
      OperatorName::LogicalOr => "||",
      OperatorName::Multiplication => "*",
      OperatorName::NullishCoalescing => "??",
      OperatorName::Remainder => "%",
      OperatorName::StrictEquality => "===",
      OperatorName::StrictInequality => "!==",
      OperatorName::Subtraction | OperatorName::UnaryNegation => "-",
      OperatorName::Typeof => "typeof",
      OperatorName::Void => "void",
      OperatorName::Await => "await",
      OperatorName::Delete => "delete",
    }
  }

  /// Keyword operators need a space before their operand.
  pub fn is_keyword(self) -> bool {
    matches!(
      self,
      OperatorName::Typeof
        | OperatorName::Void
        | OperatorName::Await
        | OperatorName::Delete
        | OperatorName::In
        | OperatorName::Instanceof
    )
  }
}

use super::*;
use stackmath::{render, NodeId};

mod errors {
  use super::*;

  #[test]
  fn insufficient_operands_keeps_partial_result() {
    let evaluation = evaluate_source("5 +").unwrap();
    assert!(!evaluation.is_ok());
    assert_eq!(
      evaluation.error,
      Some(EvalError::InsufficientOperands {
        name: "+".to_string(),
        needed: 2,
        have: 1,
      })
    );
    assert_eq!(evaluation.nodes().len(), 1);
    assert_eq!(evaluation.values(), &[5.0]);
    assert_eq!(evaluation.top_level, vec![NodeId(0)]);
    let partial: Vec<String> =
      render(&evaluation).iter().map(|f| f.to_string()).collect();
    assert_eq!(partial, vec!["5 = 5"]);
  }

  #[test]
  fn unknown_variable_appends_nothing() {
    let evaluation = evaluate_source("y 1 +").unwrap();
    assert_eq!(
      evaluation.error,
      Some(EvalError::UnknownVariable {
        name: "y".to_string()
      })
    );
    assert!(evaluation.nodes().is_empty());
    assert!(evaluation.top_level.is_empty());
  }

  #[test]
  fn tokens_after_the_error_are_ignored() {
    let evaluation = evaluate_source("1 2 + nope 3 =z").unwrap();
    assert_eq!(evaluation.nodes().len(), 3);
    assert_eq!(evaluation.top_level_values(), vec![3.0]);
    assert!(evaluation.environment.is_empty());
  }

  #[test]
  fn empty_stack_on_assignment() {
    let evaluation = evaluate_source("=x").unwrap();
    assert_eq!(
      evaluation.error,
      Some(EvalError::EmptyStackOnAssignment {
        name: "x".to_string()
      })
    );
    assert!(!evaluation.environment.contains("x"));
  }

  #[test]
  fn constant_needs_no_operands() {
    let evaluation = evaluate_source("PI pow").unwrap();
    assert_eq!(
      evaluation.error,
      Some(EvalError::InsufficientOperands {
        name: "pow".to_string(),
        needed: 2,
        have: 1,
      })
    );
    assert_eq!(evaluation.top_level_values(), vec![std::f64::consts::PI]);
  }

  #[test]
  fn environment_survives_a_failure() {
    let evaluation = evaluate_source("4 =w sqrt sqrt sqrt +").unwrap();
    assert_eq!(evaluation.environment.get("w"), Some(4.0));
    assert_eq!(evaluation.nodes().len(), 5);
    assert!(matches!(
      evaluation.error,
      Some(EvalError::InsufficientOperands { have: 1, .. })
    ));
  }
}

mod reference {
  use super::*;

  #[test]
  fn unknown_reference() {
    let evaluation = evaluate_source("$y").unwrap();
    assert_eq!(
      evaluation.error,
      Some(EvalError::UnknownVariable {
        name: "y".to_string()
      })
    );
  }

  #[test]
  fn known_reference_is_not_implemented() {
    let evaluation = evaluate_source("3 =x $x").unwrap();
    assert_eq!(
      evaluation.error,
      Some(EvalError::UnimplementedFeature {
        feature: "$x".to_string()
      })
    );
    assert_eq!(evaluation.nodes().len(), 2);
    assert_eq!(evaluation.environment.get("x"), Some(3.0));
  }
}

mod messages {
  use super::*;

  #[test]
  fn interpret_reports_the_first_error() {
    match interpret("5 +") {
      Err(InterpreterError::EvaluationError(error)) => assert_eq!(
        error.to_string(),
        "Not enough operands for operator: + (needs 2, have 1)"
      ),
      other => panic!("Expected an EvaluationError, got {:?}", other),
    }
  }

  #[test]
  fn display_text() {
    let unknown = EvalError::UnknownVariable {
      name: "q".to_string(),
    };
    assert_eq!(unknown.to_string(), "Unknown variable: q");
    let unimplemented = EvalError::UnimplementedFeature {
      feature: "$q".to_string(),
    };
    assert_eq!(unimplemented.to_string(), "Not implemented: $q");
    let assign = EvalError::EmptyStackOnAssignment {
      name: "q".to_string(),
    };
    assert_eq!(assign.to_string(), "Nothing on the stack to assign to q");
  }
}

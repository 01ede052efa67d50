use super::*;

mod arithmetic {
  use super::*;

  mod integer {
    use super::*;

    #[test]
    fn addition() {
      assert_eq!(interpret("1 2 +").unwrap(), "1 + 2 = 3");
      assert_eq!(interpret("1 2 + 3 +").unwrap(), "1 + 2 + 3 = 6");
    }

    #[test]
    fn subtraction_is_left_associative() {
      assert_eq!(interpret("7 3 - 1 -").unwrap(), "7 - 3 - 1 = 3");
      assert_eq!(interpret("7 3 1 - -").unwrap(), "7 - (3 - 1) = 5");
    }

    #[test]
    fn multiplication() {
      assert_eq!(interpret("3 4 *").unwrap(), "3 × 4 = 12");
      assert_eq!(interpret("2 3 * 4 *").unwrap(), "2 × 3 × 4 = 24");
      assert_eq!(interpret("2 3 4 * *").unwrap(), "2 × (3 × 4) = 24");
    }

    #[test]
    fn mixed_precedence() {
      assert_eq!(interpret("2 3 + 4 *").unwrap(), "(2 + 3) × 4 = 20");
      assert_eq!(interpret("2 3 4 * +").unwrap(), "2 + 3 × 4 = 14");
      assert_eq!(interpret("2 3 * 4 +").unwrap(), "2 × 3 + 4 = 10");
    }

    #[test]
    fn remainder() {
      assert_eq!(interpret("7 3 %").unwrap(), "7 mod 3 = 1");
      assert_eq!(interpret("1 7 3 % +").unwrap(), "1 + 7 mod 3 = 2");
      assert_eq!(interpret("1 7 + 3 %").unwrap(), "(1 + 7) mod 3 = 2");
    }

    #[test]
    fn negative_numbers() {
      assert_eq!(interpret("3 -2 *").unwrap(), "3 × -2 = -6");
      assert_eq!(interpret("-1 3 +").unwrap(), "-1 + 3 = 2");
    }
  }

  mod division {
    use super::*;

    #[test]
    fn classic_program() {
      assert_eq!(
        interpret("1 2 3 * 4 / - 5 +").unwrap(),
        "1 - (2 × 3)/4 + 5 = 4.5"
      );
    }

    #[test]
    fn compound_numerator() {
      let evaluation = evaluate_source("1 2 + 3 /").unwrap();
      assert_eq!(evaluation.top_level_values(), vec![1.0]);
      assert_eq!(interpret("1 2 + 3 /").unwrap(), "(1 + 2)/3 = 1");
    }

    #[test]
    fn division_by_zero_is_not_an_error() {
      assert_eq!(interpret("1 0 /").unwrap(), "1/0 = ∞");
      assert_eq!(interpret("-1 0 /").unwrap(), "-1/0 = -∞");
      assert_eq!(interpret("0 0 /").unwrap(), "0/0 = NaN");
    }

    #[test]
    fn repeating_decimal() {
      assert_eq!(interpret("1 3 /").unwrap(), "1/3 = 0.3333333333333333");
    }
  }

  mod float {
    use super::*;

    #[test]
    fn addition() {
      assert_eq!(interpret("1.5 2.5 +").unwrap(), "1.5 + 2.5 = 4");
      assert_eq!(
        interpret("0.1 0.2 +").unwrap(),
        "0.1 + 0.2 = 0.30000000000000004"
      );
    }

    #[test]
    fn leading_point_and_exponent() {
      assert_eq!(interpret(".5 1e3 *").unwrap(), "0.5 × 1000 = 500");
    }

    #[test]
    fn infinity_literals() {
      assert_eq!(interpret("Infinity").unwrap(), "∞ = ∞");
      assert_eq!(interpret("-Infinity 1 +").unwrap(), "-∞ + 1 = -∞");
      assert_eq!(interpret("Infinity Infinity -").unwrap(), "∞ - ∞ = NaN");
    }

    #[test]
    fn literal_is_the_leading_number() {
      assert_eq!(interpret("3abc").unwrap(), "3 = 3");
      assert_eq!(interpret("1.2.3 2 *").unwrap(), "1.2 × 2 = 2.4");
      assert_eq!(interpret("2e 1 +").unwrap(), "2 + 1 = 3");
    }

    #[test]
    fn infinity_spelling_is_exact() {
      let evaluation = evaluate_source("inf").unwrap();
      assert_eq!(
        evaluation.error,
        Some(EvalError::UnknownVariable {
          name: "inf".to_string()
        })
      );
    }
  }

  mod results {
    use super::*;

    #[test]
    fn every_stack_entry_is_a_result() {
      assert_eq!(interpret("1 2").unwrap(), "1 = 1\n2 = 2");
      assert_eq!(interpret("1 2 3 +").unwrap(), "1 = 1\n2 + 3 = 5");
    }

    #[test]
    fn empty_program() {
      assert_eq!(interpret("").unwrap(), "");
      assert_eq!(interpret("  \n ").unwrap(), "");
    }
  }
}

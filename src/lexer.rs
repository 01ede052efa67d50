use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "stackmath.pest"]
pub struct StackParser;

impl StackParser {
  pub fn parse_program(
    input: &str,
  ) -> Result<pest::iterators::Pairs<'_, Rule>, Box<pest::error::Error<Rule>>>
  {
    Self::parse(Rule::Program, input).map_err(Box::new)
  }
}

/// Split program text into its whitespace separated tokens.
///
/// The grammar accepts every input, so the error branch only guards
/// against a broken grammar file.
pub fn tokenize(
  text: &str,
) -> Result<Vec<&str>, Box<pest::error::Error<Rule>>> {
  let program = StackParser::parse_program(text)?;
  Ok(
    program
      .flatten()
      .filter(|pair| pair.as_rule() == Rule::Token)
      .map(|pair| pair.as_str())
      .collect(),
  )
}

// tests/step_parser_props.rs

use proptest::prelude::*;
use watchrun::exec::{parse_steps, STEP_DELIMITER};

// Tokens that can never be mistaken for the delimiter.
fn token() -> impl Strategy<Value = String> {
    "[a-z0-9=./-]{1,8}"
}

// A step as the user would type it: a command followed by some args.
fn segment() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(token(), 1..5)
}

fn join(segments: &[Vec<String>], trailing_delimiter: bool) -> Vec<String> {
    let mut tokens = Vec::new();
    for (i, seg) in segments.iter().enumerate() {
        if i > 0 {
            tokens.push(STEP_DELIMITER.to_string());
        }
        tokens.extend(seg.iter().cloned());
    }
    if trailing_delimiter {
        tokens.push(STEP_DELIMITER.to_string());
    }
    tokens
}

proptest! {
    #[test]
    fn one_step_per_segment(segments in proptest::collection::vec(segment(), 1..6)) {
        let tokens = join(&segments, false);
        let delimiters = tokens.iter().filter(|t| *t == STEP_DELIMITER).count();

        let steps = parse_steps(&tokens);
        prop_assert_eq!(steps.len(), delimiters + 1);

        for (step, seg) in steps.iter().zip(&segments) {
            prop_assert_eq!(&step.cmd, &seg[0]);
            prop_assert_eq!(&step.args[..], &seg[1..]);
        }
    }

    #[test]
    fn trailing_delimiter_does_not_add_a_step(segments in proptest::collection::vec(segment(), 1..6)) {
        let tokens = join(&segments, true);
        let delimiters = tokens.iter().filter(|t| *t == STEP_DELIMITER).count();

        let steps = parse_steps(&tokens);
        prop_assert_eq!(steps.len(), delimiters);
        prop_assert_eq!(steps, parse_steps(&join(&segments, false)));
    }

    #[test]
    fn no_token_is_lost(segments in proptest::collection::vec(segment(), 0..6)) {
        let tokens = join(&segments, false);
        let steps = parse_steps(&tokens);

        let rebuilt: Vec<String> = steps
            .iter()
            .enumerate()
            .flat_map(|(i, s)| {
                let mut out = Vec::new();
                if i > 0 {
                    out.push(STEP_DELIMITER.to_string());
                }
                out.push(s.cmd.clone());
                out.extend(s.args.iter().cloned());
                out
            })
            .collect();
        prop_assert_eq!(rebuilt, tokens);
    }
}

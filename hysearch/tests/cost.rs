use hysearch::cost::{ExampleOutcome, cost, evaluate, evaluate_example, solves};
use hysearch::example::Example;
use hytoken::program::Program;
use hytoken::tests_utils::{AtGoal, Line, Move};
use hytoken::token::{BoolToken, Not, Token};

fn two_steps_right() -> Program<Line> {
    Program::new(vec![Token::atom(Move(1)), Token::atom(Move(1))])
}

fn walk_to_goal() -> Program<Line> {
    Program::new(vec![Token::loop_while(
        Not::new(AtGoal).into_ref(),
        vec![Token::atom(Move(1))],
    )])
}

#[test]
fn matching_program_costs_nothing() {
    let examples = vec![
        Example::new(Line::new(0, 3), Line::new(3, 3)),
        Example::new(Line::new(2, 3), Line::new(3, 3)),
    ];
    assert_eq!(cost(&examples, &walk_to_goal()), 0.0);
    assert!(solves(&examples, &walk_to_goal()));
}

#[test]
fn mismatches_add_their_distance() {
    let examples = vec![
        Example::new(Line::new(0, 3), Line::new(3, 3)),
        Example::new(Line::new(1, 3), Line::new(3, 3)),
        Example::new(Line::new(4, 3), Line::new(3, 3)),
    ];
    // Outputs are 2, 3 and 6.
    assert_eq!(cost(&examples, &two_steps_right()), 1.0 + 0.0 + 3.0);
    assert!(!solves(&examples, &two_steps_right()));

    let outcomes = evaluate(&examples, &two_steps_right());
    assert_eq!(
        outcomes[0],
        ExampleOutcome::Mismatched {
            output: Line::new(2, 3),
            distance: 1.0
        }
    );
    assert!(outcomes[1].is_matched());
}

#[test]
fn failed_execution_costs_infinity() {
    let falls_off = Example::new(Line::new(9, 3), Line::new(3, 3));
    let outcome = evaluate_example(&falls_off, &two_steps_right());
    match &outcome {
        ExampleOutcome::Failed { error } => assert!(error.is_invalid_transition()),
        other => panic!("expected a failure, got {:?}", other),
    }
    assert_eq!(outcome.cost(), f64::INFINITY);

    let examples = vec![Example::new(Line::new(0, 3), Line::new(2, 3)), falls_off];
    assert_eq!(cost(&examples, &two_steps_right()), f64::INFINITY);
}

#[test]
fn resource_limits_are_recovered_as_infinite_cost() {
    let spins_forever = Program::new(vec![Token::loop_while(
        Not::new(AtGoal).into_ref(),
        vec![],
    )]);
    let examples = vec![Example::new(Line::new(0, 3), Line::new(3, 3))];
    let outcomes = evaluate(&examples, &spins_forever);
    match &outcomes[0] {
        ExampleOutcome::Failed { error } => assert!(error.is_loop_limit_exceeded()),
        other => panic!("expected a loop limit failure, got {:?}", other),
    }
    assert_eq!(cost(&examples, &spins_forever), f64::INFINITY);
}

#[test]
fn empty_example_set_costs_nothing() {
    assert_eq!(cost::<Line>(&[], &two_steps_right()), 0.0);
}

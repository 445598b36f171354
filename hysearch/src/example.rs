use hytoken::env::Environment;

/// Input/output pair a program must reproduce.
#[derive(Debug, Clone, PartialEq)]
pub struct Example<E> {
    pub input: E,
    pub output: E,
}

impl<E: Environment> Example<E> {
    pub fn new(input: E, output: E) -> Self {
        Example { input, output }
    }
}

impl<E> From<(E, E)> for Example<E> {
    fn from((input, output): (E, E)) -> Self {
        Example { input, output }
    }
}

/// A synthesis task: examples to learn from and held-out examples to check
/// generalization.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase<E> {
    /// Identifier used in reports (for loaded tasks, usually the source file stem).
    pub name: String,
    pub training_examples: Vec<Example<E>>,
    pub test_examples: Vec<Example<E>>,
}

impl<E: Environment> TestCase<E> {
    pub fn new(
        name: impl Into<String>,
        training_examples: Vec<Example<E>>,
        test_examples: Vec<Example<E>>,
    ) -> Self {
        TestCase {
            name: name.into(),
            training_examples,
            test_examples,
        }
    }

    /// All examples, training first.
    pub fn examples(&self) -> impl Iterator<Item = &Example<E>> {
        self.training_examples.iter().chain(&self.test_examples)
    }
}

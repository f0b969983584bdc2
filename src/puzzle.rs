use crate::difficulty::DifficultyLevel;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    /// Apply the operator with floor division for `/`.
    ///
    /// Returns `None` on a zero divisor or overflow.
    pub fn apply(self, a: i64, b: i64) -> Option<i64> {
        match self {
            Operator::Add => a.checked_add(b),
            Operator::Subtract => a.checked_sub(b),
            Operator::Multiply => a.checked_mul(b),
            Operator::Divide => {
                let q = a.checked_div(b)?;
                if a % b != 0 && ((a < 0) != (b < 0)) {
                    Some(q - 1)
                } else {
                    Some(q)
                }
            }
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One drill question. The answer is always computed from the operands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Puzzle {
    operand_a: i64,
    operand_b: i64,
    operator: Operator,
    answer: i64,
    difficulty: DifficultyLevel,
}

impl Puzzle {
    /// Build a puzzle, rejecting zero divisors, inexact division and overflow.
    pub fn new(
        operand_a: i64,
        operator: Operator,
        operand_b: i64,
        difficulty: DifficultyLevel,
    ) -> Option<Self> {
        if operator == Operator::Divide && operand_a.checked_rem(operand_b) != Some(0) {
            return None;
        }
        let answer = operator.apply(operand_a, operand_b)?;
        Some(Self {
            operand_a,
            operand_b,
            operator,
            answer,
            difficulty,
        })
    }

    pub fn operand_a(&self) -> i64 {
        self.operand_a
    }

    pub fn operand_b(&self) -> i64 {
        self.operand_b
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn answer(&self) -> i64 {
        self.answer
    }

    pub fn difficulty(&self) -> DifficultyLevel {
        self.difficulty
    }

    /// The literal expression shown to the user, e.g. `"12 * 7"`.
    pub fn question_text(&self) -> String {
        format!("{} {} {}", self.operand_a, self.operator, self.operand_b)
    }

    pub fn is_correct(&self, answer: i64) -> bool {
        self.answer == answer
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.question_text())
    }
}

const EASY_OPERATORS: &[Operator] = &[Operator::Add, Operator::Subtract, Operator::Multiply];
const FULL_OPERATORS: &[Operator] = &[
    Operator::Add,
    Operator::Subtract,
    Operator::Multiply,
    Operator::Divide,
];

/// Produces puzzles within the numeric ranges of each tier.
///
/// The random source is injected so tests can seed it.
#[derive(Debug, Clone)]
pub struct PuzzleGenerator<R: Rng = StdRng> {
    rng: R,
}

impl PuzzleGenerator<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl Default for PuzzleGenerator<StdRng> {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl<R: Rng> PuzzleGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Draw a puzzle for `difficulty`. Operands the range table can't produce a
    /// valid puzzle from are redrawn.
    pub fn generate(&mut self, difficulty: DifficultyLevel) -> Puzzle {
        loop {
            let (a, operator, b) = match difficulty {
                DifficultyLevel::Easy => self.easy_operands(),
                DifficultyLevel::Medium => self.medium_operands(),
                DifficultyLevel::Hard => self.hard_operands(),
            };
            match Puzzle::new(a, operator, b, difficulty) {
                Some(puzzle) => return puzzle,
                None => tracing::warn!(a, %operator, b, "rejected generated operands"),
            }
        }
    }

    /// Generate from a level name; unknown names get an `Easy` puzzle.
    pub fn generate_named(&mut self, difficulty: &str) -> Puzzle {
        self.generate(DifficultyLevel::from_name_or_easy(difficulty))
    }

    fn pick_operator(&mut self, operators: &[Operator]) -> Operator {
        operators[self.rng.gen_range(0..operators.len())]
    }

    fn easy_operands(&mut self) -> (i64, Operator, i64) {
        let operator = self.pick_operator(EASY_OPERATORS);
        let (a, b) = match operator {
            Operator::Add => {
                let a: i64 = self.rng.gen_range(1..=8);
                (a, self.rng.gen_range(1..=9 - a))
            }
            Operator::Subtract => {
                let a: i64 = self.rng.gen_range(1..=9);
                (a, self.rng.gen_range(1..=a))
            }
            _ => (self.rng.gen_range(1..=9), self.rng.gen_range(1..=9)),
        };
        (a, operator, b)
    }

    fn medium_operands(&mut self) -> (i64, Operator, i64) {
        let operator = self.pick_operator(FULL_OPERATORS);
        let (a, b) = match operator {
            Operator::Multiply => {
                let small: i64 = self.rng.gen_range(2..=9);
                let large = self.rng.gen_range(10..=99);
                if self.rng.gen_bool(0.5) {
                    (small, large)
                } else {
                    (large, small)
                }
            }
            Operator::Divide => self.exact_division(2..=12, 2..=20),
            Operator::Add => {
                let a: i64 = self.rng.gen_range(5..=80);
                (a, self.rng.gen_range(5..=99 - a))
            }
            Operator::Subtract => {
                let a: i64 = self.rng.gen_range(20..=99);
                (a, self.rng.gen_range(5..=a))
            }
        };
        (a, operator, b)
    }

    fn hard_operands(&mut self) -> (i64, Operator, i64) {
        let operator = self.pick_operator(FULL_OPERATORS);
        let (a, b) = match operator {
            Operator::Multiply => (self.rng.gen_range(10..=50), self.rng.gen_range(2..=20)),
            Operator::Divide => self.exact_division(5..=25, 10..=40),
            Operator::Add => (self.rng.gen_range(20..=500), self.rng.gen_range(20..=500)),
            Operator::Subtract => {
                let a: i64 = self.rng.gen_range(100..=999);
                (a, self.rng.gen_range(10..=a - 10))
            }
        };
        (a, operator, b)
    }

    fn exact_division(
        &mut self,
        divisors: std::ops::RangeInclusive<i64>,
        quotients: std::ops::RangeInclusive<i64>,
    ) -> (i64, i64) {
        let divisor = self.rng.gen_range(divisors);
        let quotient = self.rng.gen_range(quotients);
        (divisor * quotient, divisor)
    }
}

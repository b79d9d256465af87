//! A deliberately tiny in-memory engine for exercising the service layer.
//!
//! [`FactEngine`] is a fixture, not a solver: ground facts only, conjunctive
//! queries with first-order matching, no rules, no operators. It exists so
//! the collector, mutator, catalog, and tool surface have a real
//! [`LogicEngine`] to run against in tests, including the awkward paths —
//! unbounded searches, mid-program faults, and engines without the
//! enumeration capability.
//!
//! Dialect:
//! - Programs are `.`-terminated ground clauses: `parent(tom, bob).`
//! - Queries are comma-joined goals: `parent(tom, X), parent(X, Y)`
//! - Tokens starting with an uppercase letter or `_` are variables; `_` is
//!   anonymous and never bound into a solution.
//! - `spin_forever(X)` enumerates integers without end, checking its cancel
//!   token each step. It drives the timeout and cancellation tests.
//!
//! Facts take effect clause by clause, so a fault mid-program keeps the
//! clauses loaded before it (at-least-applied). The fact store is a
//! `DashMap`, so concurrent consults and queries are internally
//! synchronized.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;

use crate::cancel::CancelToken;
use crate::catalog::{PredicateDescriptor, PredicateIndex};
use crate::engine::{LogicEngine, Solution, Solutions, Term};
use crate::error::EngineFault;

type PredicateKey = (String, usize);

/// In-memory ground-fact engine.
pub struct FactEngine {
    facts: DashMap<PredicateKey, Vec<Vec<Term>>>,
    open_iterators: Arc<AtomicUsize>,
    expose_index: bool,
}

impl FactEngine {
    /// Engine with the predicate-enumeration capability.
    pub fn new() -> Self {
        Self {
            facts: DashMap::new(),
            open_iterators: Arc::new(AtomicUsize::new(0)),
            expose_index: true,
        }
    }

    /// Engine whose `predicate_index()` is `None`, for `Unsupported` tests.
    pub fn sealed() -> Self {
        Self {
            expose_index: false,
            ..Self::new()
        }
    }

    /// Number of solution iterators currently alive. Tests use this to
    /// verify that engine-side resources are released on every exit path.
    pub fn open_iterators(&self) -> usize {
        self.open_iterators.load(Ordering::SeqCst)
    }

    fn insert_fact(&self, name: String, args: Vec<Term>) {
        let key = (name, args.len());
        self.facts.entry(key).or_default().push(args);
    }
}

impl Default for FactEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LogicEngine for FactEngine {
    fn solve<'a>(
        &'a self,
        query: &str,
        cancel: CancelToken,
    ) -> Result<Box<dyn Solutions + 'a>, EngineFault> {
        let goals = parse_query(query)?;
        // Candidate facts are snapshotted per goal, so enumeration order is
        // stable within this execution even under concurrent consults.
        let resolved: Vec<ResolvedGoal> = goals
            .into_iter()
            .map(|goal| {
                let kind = if goal.name == "spin_forever" && goal.args.len() == 1 {
                    GoalKind::Spin
                } else {
                    let key = (goal.name.clone(), goal.args.len());
                    let rows = self
                        .facts
                        .get(&key)
                        .map(|entry| entry.value().clone())
                        .unwrap_or_default();
                    GoalKind::Facts(rows)
                };
                ResolvedGoal {
                    args: goal.args,
                    kind,
                }
            })
            .collect();

        self.open_iterators.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FactSolutions {
            cancel,
            goals: resolved,
            frames: Vec::new(),
            subst: Vec::new(),
            started: false,
            done: false,
            open_iterators: Arc::clone(&self.open_iterators),
        }))
    }

    fn consult(&self, program: &str) -> Result<(), EngineFault> {
        let mut clauses: Vec<&str> = program.split('.').collect();
        let tail = clauses.pop().unwrap_or_default();
        for clause in clauses {
            let clause = clause.trim();
            if clause.is_empty() {
                continue;
            }
            let (name, args) = parse_fact(clause)?;
            self.insert_fact(name, args);
        }
        if !tail.trim().is_empty() {
            return Err(EngineFault::syntax(format!(
                "clause not terminated by '.': \"{}\"",
                tail.trim()
            )));
        }
        Ok(())
    }

    fn predicate_index(&self) -> Option<&dyn PredicateIndex> {
        if self.expose_index { Some(self) } else { None }
    }
}

impl PredicateIndex for FactEngine {
    fn predicates(&self) -> Result<Vec<PredicateDescriptor>, EngineFault> {
        Ok(self
            .facts
            .iter()
            .map(|entry| PredicateDescriptor::new(entry.key().0.clone(), entry.key().1))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

enum Pattern {
    Var(String),
    Atom(Term),
}

struct Goal {
    name: String,
    args: Vec<Pattern>,
}

enum GoalKind {
    Facts(Vec<Vec<Term>>),
    Spin,
}

struct ResolvedGoal {
    args: Vec<Pattern>,
    kind: GoalKind,
}

fn parse_query(query: &str) -> Result<Vec<Goal>, EngineFault> {
    let query = query.trim().trim_end_matches('.');
    split_top_level(query)
        .into_iter()
        .map(parse_goal)
        .collect()
}

/// Split on commas outside parentheses.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

fn parse_goal(text: &str) -> Result<Goal, EngineFault> {
    let (name, raw_args) = parse_structure(text)?;
    let args = raw_args
        .into_iter()
        .map(|token| {
            if is_variable(&token) {
                Ok(Pattern::Var(token))
            } else {
                check_atom(&token)?;
                Ok(Pattern::Atom(Term::new(token)))
            }
        })
        .collect::<Result<Vec<_>, EngineFault>>()?;
    Ok(Goal { name, args })
}

fn parse_fact(text: &str) -> Result<(String, Vec<Term>), EngineFault> {
    let (name, raw_args) = parse_structure(text)?;
    let args = raw_args
        .into_iter()
        .map(|token| {
            if is_variable(&token) {
                return Err(EngineFault::semantic(format!(
                    "variable \"{token}\" not allowed in a fact"
                )));
            }
            check_atom(&token)?;
            Ok(Term::new(token))
        })
        .collect::<Result<Vec<_>, EngineFault>>()?;
    Ok((name, args))
}

/// Parse `name` or `name(arg, ...)` into the functor name and raw argument
/// tokens.
fn parse_structure(text: &str) -> Result<(String, Vec<String>), EngineFault> {
    let text = text.trim();
    if text.is_empty() {
        return Err(EngineFault::syntax("empty goal"));
    }
    let (name, args) = match text.find('(') {
        None => (text, Vec::new()),
        Some(open) => {
            let Some(inner) = text[open + 1..].strip_suffix(')') else {
                return Err(EngineFault::syntax(format!(
                    "unbalanced parentheses in \"{text}\""
                )));
            };
            let name = &text[..open];
            let args = if inner.trim().is_empty() {
                Vec::new()
            } else {
                split_top_level(inner)
                    .into_iter()
                    .map(|a| {
                        let a = a.trim();
                        if a.is_empty() {
                            Err(EngineFault::syntax(format!("empty argument in \"{text}\"")))
                        } else {
                            Ok(a.to_owned())
                        }
                    })
                    .collect::<Result<Vec<_>, EngineFault>>()?
            };
            (name, args)
        }
    };
    check_functor(name)?;
    Ok((name.to_owned(), args))
}

fn is_variable(token: &str) -> bool {
    token
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_uppercase() || c == '_')
}

fn check_functor(name: &str) -> Result<(), EngineFault> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(EngineFault::syntax(format!(
            "invalid predicate name \"{name}\""
        )))
    }
}

fn check_atom(token: &str) -> Result<(), EngineFault> {
    let valid = !token.is_empty()
        && token.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(EngineFault::syntax(format!("invalid atom \"{token}\"")))
    }
}

// ---------------------------------------------------------------------------
// Solution enumeration
// ---------------------------------------------------------------------------

/// Depth-first backtracking over the snapshotted candidate facts.
///
/// Frames form a choice-point stack: one per goal currently satisfied, each
/// remembering which candidate to try next and how much of the substitution
/// belongs to earlier goals. Holds no engine locks; the open-iterator count
/// drops with the value.
struct FactSolutions {
    cancel: CancelToken,
    goals: Vec<ResolvedGoal>,
    frames: Vec<Frame>,
    subst: Vec<(String, Term)>,
    started: bool,
    done: bool,
    open_iterators: Arc<AtomicUsize>,
}

struct Frame {
    goal: usize,
    next_candidate: u64,
    subst_len: usize,
}

impl Drop for FactSolutions {
    fn drop(&mut self) {
        self.open_iterators.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Solutions for FactSolutions {
    fn next_solution(&mut self) -> Result<Option<Solution>, EngineFault> {
        if self.done {
            return Ok(None);
        }
        if !self.started {
            self.started = true;
            if self.goals.is_empty() {
                self.done = true;
                return Ok(None);
            }
            self.frames.push(Frame {
                goal: 0,
                next_candidate: 0,
                subst_len: 0,
            });
        }

        loop {
            if self.cancel.is_cancelled() {
                self.done = true;
                return Err(EngineFault::Cancelled);
            }
            let Some(top) = self.frames.last_mut() else {
                self.done = true;
                return Ok(None);
            };
            let goal_idx = top.goal;
            let candidate = top.next_candidate;
            top.next_candidate += 1;
            let checkpoint = top.subst_len;
            self.subst.truncate(checkpoint);

            let goal = &self.goals[goal_idx];
            let matched = match &goal.kind {
                GoalKind::Spin => {
                    let value = [Term::new(candidate.to_string())];
                    try_match(&goal.args, &value, &mut self.subst)
                }
                GoalKind::Facts(rows) => {
                    let Some(row) = rows.get(candidate as usize) else {
                        self.frames.pop();
                        continue;
                    };
                    try_match(&goal.args, row, &mut self.subst)
                }
            };
            if !matched {
                continue;
            }

            if goal_idx + 1 == self.goals.len() {
                let mut solution = Solution::new();
                for (var, term) in &self.subst {
                    solution.bind(var.clone(), term.clone());
                }
                return Ok(Some(solution));
            }
            self.frames.push(Frame {
                goal: goal_idx + 1,
                next_candidate: 0,
                subst_len: self.subst.len(),
            });
        }
    }
}

/// Match goal arguments against one ground row, extending the substitution.
/// On mismatch the substitution is restored and `false` returned.
fn try_match(args: &[Pattern], row: &[Term], subst: &mut Vec<(String, Term)>) -> bool {
    let checkpoint = subst.len();
    if args.len() != row.len() {
        return false;
    }
    for (pattern, value) in args.iter().zip(row) {
        match pattern {
            Pattern::Atom(atom) => {
                if atom != value {
                    subst.truncate(checkpoint);
                    return false;
                }
            }
            Pattern::Var(name) if name == "_" => {}
            Pattern::Var(name) => {
                match subst.iter().find(|(bound, _)| bound == name) {
                    Some((_, bound_value)) => {
                        if bound_value != value {
                            subst.truncate(checkpoint);
                            return false;
                        }
                    }
                    None => subst.push((name.clone(), value.clone())),
                }
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_solutions(engine: &FactEngine, query: &str) -> Vec<Solution> {
        let mut iter = engine.solve(query, CancelToken::unbounded()).unwrap();
        let mut out = Vec::new();
        while let Some(s) = iter.next_solution().unwrap() {
            out.push(s);
        }
        out
    }

    #[test]
    fn ground_goal_succeeds_once_with_empty_bindings() {
        let engine = FactEngine::new();
        engine.consult("parent(tom, bob).").unwrap();

        let solutions = all_solutions(&engine, "parent(tom, bob)");
        assert_eq!(solutions.len(), 1);
        assert!(solutions[0].is_empty());
    }

    #[test]
    fn conjunction_joins_on_shared_variables() {
        let engine = FactEngine::new();
        engine
            .consult("parent(tom, bob). parent(bob, ann). parent(liz, sue).")
            .unwrap();

        let solutions = all_solutions(&engine, "parent(tom, X), parent(X, Y)");
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].get("X").unwrap().as_str(), "bob");
        assert_eq!(solutions[0].get("Y").unwrap().as_str(), "ann");
    }

    #[test]
    fn anonymous_variable_is_never_bound() {
        let engine = FactEngine::new();
        engine.consult("parent(tom, bob). parent(tom, liz).").unwrap();

        let solutions = all_solutions(&engine, "parent(tom, _)");
        assert_eq!(solutions.len(), 2);
        assert!(solutions[0].is_empty());
    }

    #[test]
    fn unknown_predicate_yields_no_solutions() {
        let engine = FactEngine::new();
        assert!(all_solutions(&engine, "nothing(X)").is_empty());
    }

    #[test]
    fn zero_arity_facts() {
        let engine = FactEngine::new();
        engine.consult("halted.").unwrap();
        assert_eq!(all_solutions(&engine, "halted").len(), 1);
        assert!(all_solutions(&engine, "running").is_empty());
    }

    #[test]
    fn variable_in_fact_is_a_fault() {
        let engine = FactEngine::new();
        let err = engine.consult("parent(tom, X).").unwrap_err();
        assert!(matches!(err, EngineFault::Semantic { .. }));
    }

    #[test]
    fn unterminated_clause_is_a_syntax_fault() {
        let engine = FactEngine::new();
        let err = engine.consult("p(a). q(b)").unwrap_err();
        assert!(matches!(err, EngineFault::Syntax { .. }));
        // The terminated clause before the fault was kept.
        assert_eq!(all_solutions(&engine, "p(a)").len(), 1);
    }

    #[test]
    fn cancelled_token_stops_spin_mid_search() {
        let engine = FactEngine::new();
        let cancel = CancelToken::unbounded();
        let mut iter = engine.solve("spin_forever(X)", cancel.clone()).unwrap();

        assert!(iter.next_solution().unwrap().is_some());
        cancel.cancel();
        let err = iter.next_solution().unwrap_err();
        assert!(matches!(err, EngineFault::Cancelled));
    }

    #[test]
    fn iterator_count_tracks_drops() {
        let engine = FactEngine::new();
        engine.consult("p(a).").unwrap();
        {
            let _iter = engine.solve("p(X)", CancelToken::unbounded()).unwrap();
            assert_eq!(engine.open_iterators(), 1);
        }
        assert_eq!(engine.open_iterators(), 0);
    }
}

//! The per-request call trace.
//!
//! One [`History`] node is recorded per dispatched call. Nodes also carry the remaining recursion
//! budget: [`History::enter`] is the only place where nesting depth is bounded, so the combined
//! multicall depth across the CCIP and ENSIP-10 layers never exceeds the configured limit.

use super::CallError;
use alloy_primitives::{hex, Bytes};
use std::fmt;

/// How the arguments of a call are shown in the trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Show {
    /// Rendered arguments.
    Args(Vec<String>),
    /// The arguments are not rendered, e.g. the inner calls of a multicall.
    Suppressed,
}

impl Default for Show {
    fn default() -> Self {
        Self::Args(Vec::new())
    }
}

/// A node of the call trace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    /// The remaining recursion budget.
    level: usize,
    /// The name of the matched function.
    pub name: Option<String>,
    /// The calldata processed at this node.
    pub calldata: Option<Bytes>,
    /// The displayed arguments.
    pub show: Show,
    /// Whether the record source returned a record. Only set on the resolve stage.
    pub record: Option<bool>,
    /// The error that failed this call.
    pub error: Option<String>,
    /// One node per multicall element.
    pub children: Vec<History>,
    /// The next stage of the same call.
    pub next: Option<Box<History>>,
}

impl History {
    /// Creates a root node with the given recursion budget.
    pub fn new(level: usize) -> Self {
        Self { level, ..Default::default() }
    }

    /// Returns the remaining recursion budget.
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Appends a child one level deeper and returns it.
    pub fn enter(&mut self) -> Result<&mut Self, CallError> {
        let level = self.level.checked_sub(1).ok_or(CallError::RecursionLimit)?;
        let index = self.children.len();
        self.children.push(Self::new(level));
        Ok(&mut self.children[index])
    }

    /// Enters one child per element and returns the new children in order.
    ///
    /// Fails without partial effect if the budget is exhausted and `count` is non-zero.
    pub fn enter_many(&mut self, count: usize) -> Result<&mut [Self], CallError> {
        let start = self.children.len();
        if count > 0 {
            let level = self.level.checked_sub(1).ok_or(CallError::RecursionLimit)?;
            self.children.extend(std::iter::repeat_with(|| Self::new(level)).take(count));
        }
        Ok(&mut self.children[start..])
    }

    /// Links a next stage with the same budget and returns it.
    pub fn then(&mut self) -> &mut Self {
        self.next.insert(Box::new(Self::new(self.level)))
    }

    /// Returns the last stage of the chain starting at this node.
    pub fn head(&self) -> &Self {
        let mut head = self;
        while let Some(next) = &head.next {
            head = next;
        }
        head
    }

    /// Returns the error of the first failing stage, if any.
    pub fn failure(&self) -> Option<&str> {
        let mut stage = Some(self);
        while let Some(history) = stage {
            if let Some(error) = &history.error {
                return Some(error);
            }
            stage = history.next.as_deref();
        }
        None
    }
}

impl fmt::Display for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, &self.calldata) {
            (Some(name), _) => f.write_str(name)?,
            (None, Some(calldata)) => {
                write!(f, "<{}>", hex::encode_prefixed(&calldata[..calldata.len().min(4)]))?
            }
            (None, None) => f.write_str("<null>")?,
        }
        f.write_str("(")?;
        if let Show::Args(args) = &self.show {
            f.write_str(&args.join(","))?;
        }
        f.write_str(")")?;
        if !self.children.is_empty() {
            write!(f, "^{} [", self.children.len())?;
            for (i, child) in self.children.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{child}")?;
            }
            f.write_str("]")?;
        }
        if let Some(error) = &self.error {
            write!(f, "<{error}>")?;
        }
        if let Some(next) = &self.next {
            write!(f, ".{next}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_at_zero_fails() {
        assert!(matches!(History::new(0).enter(), Err(CallError::RecursionLimit)));
    }

    #[test]
    fn test_enter_beyond_budget_fails() {
        let mut root = History::new(1);
        let child = root.enter().unwrap();
        assert_eq!(child.level(), 0);
        assert!(matches!(child.enter(), Err(CallError::RecursionLimit)));
    }

    #[test]
    fn test_enter_many() {
        let mut root = History::new(1);
        assert_eq!(root.enter_many(3).unwrap().len(), 3);
        assert!(root.children.iter().all(|c| c.level() == 0));

        let mut exhausted = History::new(0);
        assert!(exhausted.enter_many(0).unwrap().is_empty());
        assert!(matches!(exhausted.enter_many(2), Err(CallError::RecursionLimit)));
        assert!(exhausted.children.is_empty());
    }

    #[test]
    fn test_then_keeps_level() {
        let mut root = History::new(2);
        root.name = Some("resolve".to_string());
        let next = root.then();
        next.name = Some("text".to_string());
        assert_eq!(next.level(), 2);
        assert_eq!(root.head().name.as_deref(), Some("text"));
    }

    #[test]
    fn test_display() {
        let mut root = History::new(2);
        root.name = Some("multicall".to_string());
        root.show = Show::Suppressed;
        let a = root.enter().unwrap();
        a.name = Some("f".to_string());
        a.show = Show::Args(vec!["1".to_string(), "2".to_string()]);
        let b = root.enter().unwrap();
        b.calldata = Some(Bytes::from(vec![0xde, 0xad, 0xbe, 0xef, 0x01]));
        b.error = Some("unsupported ccip method: 0xdeadbeef".to_string());
        root.then().name = Some("g".to_string());

        assert_eq!(
            root.to_string(),
            "multicall()^2 [f(1,2) <0xdeadbeef>()<unsupported ccip method: 0xdeadbeef>].g()"
        );
        assert_eq!(History::new(0).to_string(), "<null>()");
    }

    #[test]
    fn test_failure_walks_stages() {
        let mut root = History::new(1);
        assert_eq!(root.failure(), None);
        root.then().error = Some("boom".to_string());
        assert_eq!(root.failure(), Some("boom"));
    }
}

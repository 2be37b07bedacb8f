//! Calculation history.
//!
//! Provides an immutable log of completed calculations. Entries are created
//! once and never edited; the log as a whole can only grow or be cleared.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Record of a single completed calculation.
///
/// # Example
///
/// ```rust
/// use keycalc::core::HistoryItem;
/// use chrono::Utc;
/// use uuid::Uuid;
///
/// let item = HistoryItem {
///     id: Uuid::new_v4(),
///     expression: "2 + 3".to_string(),
///     result: "5".to_string(),
///     timestamp: Utc::now(),
///     ai_generated: false,
/// };
/// assert!(!item.ai_generated);
/// ```
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct HistoryItem {
    /// Unique identifier, usable as a list key
    pub id: Uuid,
    /// What was computed, e.g. `"2 + 3"` or the solver query
    pub expression: String,
    /// The result text as it was shown
    pub result: String,
    /// When the calculation completed
    pub timestamp: DateTime<Utc>,
    /// Whether the result came from the natural-language solver
    pub ai_generated: bool,
}

/// Ordered log of calculations.
///
/// History is immutable - `record` returns a new history with the item
/// added, leaving the original untouched.
///
/// # Example
///
/// ```rust
/// use keycalc::core::{History, HistoryItem};
/// use chrono::Utc;
/// use uuid::Uuid;
///
/// let history = History::new();
/// let history = history.record(HistoryItem {
///     id: Uuid::new_v4(),
///     expression: "6 × 7".to_string(),
///     result: "42".to_string(),
///     timestamp: Utc::now(),
///     ai_generated: false,
/// });
///
/// assert_eq!(history.len(), 1);
/// assert_eq!(history.latest().unwrap().result, "42");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    items: Vec<HistoryItem>,
}

impl History {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Record an item, returning a new history.
    ///
    /// This is a pure function - it does not mutate the existing history.
    ///
    /// # Example
    ///
    /// ```rust
    /// use keycalc::core::{History, HistoryItem};
    /// use chrono::Utc;
    /// use uuid::Uuid;
    ///
    /// let history = History::new();
    /// let item = HistoryItem {
    ///     id: Uuid::new_v4(),
    ///     expression: "1 + 1".to_string(),
    ///     result: "2".to_string(),
    ///     timestamp: Utc::now(),
    ///     ai_generated: false,
    /// };
    ///
    /// let new_history = history.record(item);
    /// assert_eq!(new_history.len(), 1);
    /// assert_eq!(history.len(), 0); // Original unchanged
    /// ```
    pub fn record(&self, item: HistoryItem) -> Self {
        let mut items = self.items.clone();
        items.push(item);
        Self { items }
    }

    /// Return an empty history. Kept as an explicit operation so the
    /// "clear history" user action reads as one.
    pub fn clear(&self) -> Self {
        Self::new()
    }

    /// All items in the order they were recorded.
    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    /// Items most recent first, the order a history panel lists them.
    pub fn newest_first(&self) -> impl Iterator<Item = &HistoryItem> {
        self.items.iter().rev()
    }

    /// The most recently recorded item.
    pub fn latest(&self) -> Option<&HistoryItem> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// How many items came from the natural-language solver.
    pub fn ai_generated_count(&self) -> usize {
        self.items.iter().filter(|item| item.ai_generated).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(expression: &str, result: &str, ai_generated: bool) -> HistoryItem {
        HistoryItem {
            id: Uuid::new_v4(),
            expression: expression.to_string(),
            result: result.to_string(),
            timestamp: Utc::now(),
            ai_generated,
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history = History::new();
        assert!(history.is_empty());
        assert_eq!(history.len(), 0);
        assert!(history.latest().is_none());
    }

    #[test]
    fn record_is_immutable() {
        let history = History::new();
        let new_history = history.record(item("2 + 2", "4", false));

        assert_eq!(history.len(), 0);
        assert_eq!(new_history.len(), 1);
    }

    #[test]
    fn newest_first_reverses_insertion_order() {
        let history = History::new()
            .record(item("1 + 1", "2", false))
            .record(item("2 + 2", "4", false))
            .record(item("what is 3 squared", "9", true));

        let results: Vec<&str> = history
            .newest_first()
            .map(|item| item.result.as_str())
            .collect();
        assert_eq!(results, vec!["9", "4", "2"]);
        assert_eq!(history.items()[0].result, "2");
    }

    #[test]
    fn clear_empties_without_touching_original() {
        let history = History::new().record(item("1 + 1", "2", false));
        let cleared = history.clear();

        assert!(cleared.is_empty());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn counts_ai_generated_items() {
        let history = History::new()
            .record(item("1 + 1", "2", false))
            .record(item("half of ten", "5", true));

        assert_eq!(history.ai_generated_count(), 1);
    }

    #[test]
    fn history_serializes_correctly() {
        let history = History::new().record(item("6 ÷ 3", "2", false));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: History = serde_json::from_str(&json).unwrap();

        assert_eq!(history, deserialized);
    }
}

//! The `State` value type.
//!
//! A state is identified by its code alone. Label and the initial/terminal
//! flags are metadata that can be declared once and merged into every other
//! mention of the same code.

use super::error::{ConfigError, MergeError};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt::{self, Debug, Display};
use std::hash::{Hash, Hasher};

/// Bound for state codes.
///
/// Blanket-implemented for every type that is cloneable, hashable,
/// comparable, debuggable and thread-safe.
pub trait Code: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> Code for T where T: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

/// A named point in a machine's life cycle.
///
/// Two states with the same code are the same state, whatever their
/// labels say. A state also compares equal to its bare code, so transitions
/// can refer to a state tersely and declare its metadata only once.
///
/// # Example
///
/// ```rust
/// use statekeeper::core::State;
///
/// let draft = State::new("draft").with_label("Draft").as_initial();
///
/// assert_eq!(draft, "draft");
/// assert_eq!(draft, State::new("draft"));
/// assert!(draft.is_initial());
/// assert!(!draft.is_terminal());
/// assert_eq!(draft.to_string(), "Draft (draft)");
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct State<C> {
    pub code: C,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_initial: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_terminal: Option<bool>,
}

impl<C: Code> State<C> {
    /// A state with no metadata.
    pub fn new(code: C) -> Self {
        Self {
            code,
            label: None,
            is_initial: None,
            is_terminal: None,
        }
    }

    /// Attach a human readable label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Explicitly mark this state as the machine's entry state.
    pub fn as_initial(mut self) -> Self {
        self.is_initial = Some(true);
        self
    }

    /// Explicitly mark this state as terminal.
    pub fn as_terminal(mut self) -> Self {
        self.is_terminal = Some(true);
        self
    }

    pub fn is_initial(&self) -> bool {
        self.is_initial.unwrap_or(false)
    }

    pub fn is_terminal(&self) -> bool {
        self.is_terminal.unwrap_or(false)
    }

    /// Merge the metadata of another declaration of the same state.
    ///
    /// Non-null values win over null ones. Two different non-null values
    /// for the same attribute are a configuration error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statekeeper::core::State;
    ///
    /// let mut terse = State::new(1);
    /// terse.merge_data(&State::new(1).with_label("accepted")).unwrap();
    /// assert_eq!(terse.label.as_deref(), Some("accepted"));
    ///
    /// let conflicting = State::new(1).with_label("denied");
    /// assert!(terse.merge_data(&conflicting).is_err());
    /// assert!(terse.merge_data(&State::new(2)).is_err());
    /// ```
    pub fn merge_data(&mut self, other: &State<C>) -> Result<(), MergeError> {
        if self.code != other.code {
            return Err(MergeError::CodeMismatch {
                left: format!("{:?}", self.code),
                right: format!("{:?}", other.code),
            });
        }
        self.absorb(other)?;
        Ok(())
    }

    /// Attribute-wise merge, assuming the codes already match.
    pub(crate) fn absorb(&mut self, other: &State<C>) -> Result<(), ConfigError> {
        merge_attribute(&mut self.label, &other.label, &self.code, "label")?;
        merge_attribute(&mut self.is_initial, &other.is_initial, &self.code, "is_initial")?;
        merge_attribute(&mut self.is_terminal, &other.is_terminal, &self.code, "is_terminal")?;
        Ok(())
    }
}

fn merge_attribute<T: Clone + PartialEq, C: Debug>(
    ours: &mut Option<T>,
    theirs: &Option<T>,
    code: &C,
    attribute: &'static str,
) -> Result<(), ConfigError> {
    match (ours.as_ref(), theirs) {
        (Some(a), Some(b)) if a != b => Err(ConfigError::ConflictingAttribute {
            code: format!("{:?}", code),
            attribute,
        }),
        (None, Some(b)) => {
            *ours = Some(b.clone());
            Ok(())
        }
        _ => Ok(()),
    }
}

impl<C: Code> From<C> for State<C> {
    fn from(code: C) -> Self {
        State::new(code)
    }
}

impl<C: PartialEq> PartialEq for State<C> {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl<C: Eq> Eq for State<C> {}

impl<C: PartialEq> PartialEq<C> for State<C> {
    fn eq(&self, other: &C) -> bool {
        self.code == *other
    }
}

impl<C: Hash> Hash for State<C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl<C> Borrow<C> for State<C> {
    fn borrow(&self) -> &C {
        &self.code
    }
}

impl<C: Display> Display for State<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{} ({})", label, self.code),
            None => write!(f, "{}", self.code),
        }
    }
}

// `code == state` can't be written generically (orphan rule), so cover the
// code types people actually use.
macro_rules! impl_code_eq {
    ($($ty:ty),* $(,)?) => {
        $(
            impl PartialEq<State<$ty>> for $ty {
                fn eq(&self, other: &State<$ty>) -> bool {
                    *self == other.code
                }
            }
        )*
    };
}

impl_code_eq!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, char, bool, String);

impl<'a> PartialEq<State<&'a str>> for &'a str {
    fn eq(&self, other: &State<&'a str>) -> bool {
        *self == other.code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::collections::{HashMap, HashSet};

    fn hash_of<T: Hash + ?Sized>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn state_equals_its_code_both_ways() {
        assert_eq!(State::new(0), 0);
        assert_eq!(0, State::new(0));
        assert_eq!(State::new("moo").with_label("this is a moo"), "moo");
        assert_eq!("moo", State::new("moo"));
        assert_ne!(State::new(1), 0);
    }

    #[test]
    fn equality_ignores_labels() {
        assert_eq!(State::new(1).with_label("a"), State::new(1).with_label("b"));
        assert_ne!(State::new(1), State::new(2));
    }

    #[test]
    fn hash_matches_code_hash() {
        assert_eq!(hash_of(&State::new(7u32)), hash_of(&7u32));
        assert_eq!(
            hash_of(&State::new(String::from("x"))),
            hash_of(&String::from("x"))
        );
    }

    #[test]
    fn state_keyed_maps_can_be_queried_by_code() {
        let mut config = HashMap::new();
        config.insert(State::new(0), 1);
        config.insert(State::new(1), 2);
        config.insert(State::new(2), 3);

        assert_eq!(config.get(&0), Some(&1));

        let keys: HashSet<i32> = config.keys().map(|s| s.code).collect();
        let values: HashSet<i32> = config.values().copied().collect();
        let only_keys: HashSet<i32> = keys.difference(&values).copied().collect();
        assert_eq!(only_keys, HashSet::from([0]));
    }

    #[test]
    fn merge_prefers_non_null_values() {
        let mut state = State::new(3);
        state
            .merge_data(&State::new(3).with_label("three").as_terminal())
            .unwrap();
        state.merge_data(&State::new(3)).unwrap();

        assert_eq!(state.label.as_deref(), Some("three"));
        assert_eq!(state.is_terminal, Some(true));
        assert_eq!(state.is_initial, None);
    }

    #[test]
    fn merge_rejects_conflicting_metadata() {
        let mut state = State::new(3).with_label("three");
        let err = state
            .merge_data(&State::new(3).with_label("drei"))
            .unwrap_err();

        assert!(matches!(
            err,
            MergeError::Config(ConfigError::ConflictingAttribute {
                attribute: "label",
                ..
            })
        ));
    }

    #[test]
    fn merge_rejects_conflicting_flags() {
        let mut state = State::new(3).as_initial();
        let mut other = State::new(3);
        other.is_initial = Some(false);

        assert!(state.merge_data(&other).is_err());
    }

    #[test]
    fn merge_rejects_different_codes() {
        let mut state = State::new(3);
        let err = state.merge_data(&State::new(4)).unwrap_err();

        assert!(matches!(err, MergeError::CodeMismatch { .. }));
    }

    #[test]
    fn display_uses_label_when_present() {
        assert_eq!(State::new(0).with_label("initial").to_string(), "initial (0)");
        assert_eq!(State::new(0).to_string(), "0");
    }

    #[test]
    fn state_serializes_without_empty_metadata() {
        let state = State::new("draft").with_label("Draft");
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"code":"draft","label":"Draft"}"#);

        let restored: State<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, String::from("draft"));
        assert_eq!(restored.label.as_deref(), Some("Draft"));
    }
}

//! Macros for ergonomic spec construction.

/// Build a [`TransitionSpec`](crate::core::TransitionSpec) from nested
/// `source => { symbol => destination }` blocks.
///
/// Sources and destinations are anything convertible into a `State`; symbols
/// are anything convertible into `Option<Y>`, so `None` declares the
/// "no symbol" transition.
///
/// # Example
///
/// ```
/// use statekeeper::core::{State, StateTable, TransitionSpec};
/// use statekeeper::transitions;
///
/// let spec: TransitionSpec<i32, &str> = transitions! {
///     State::new(0).with_label("initial") => { "success" => State::new(1).with_label("label1"), "fail" => 2 },
///     1 => { None => 2 },
/// };
///
/// let table = StateTable::build(&spec).unwrap();
/// assert_eq!(table.initial(), &0);
/// assert_eq!(table.terminals(), vec![&2]);
/// ```
#[macro_export]
macro_rules! transitions {
    (
        $(
            $source:expr => { $( $symbol:expr => $destination:expr ),* $(,)? }
        ),* $(,)?
    ) => {
        $crate::core::TransitionSpec::new()
            $(
                .from($source, |outgoing| outgoing $( .on($symbol, $destination) )*)
            )*
    };
}

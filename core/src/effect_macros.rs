//! Declarative macros for ergonomic effect construction

/// Create an `Effect::Future` from an async block
///
/// The block is moved into the future and must evaluate to `Option<Action>`.
///
/// # Example
///
/// ```
/// use tasklane_core::{async_effect, effect::Effect};
///
/// #[derive(Debug)]
/// enum Action {
///     Confirmed,
/// }
///
/// let effect: Effect<Action> = async_effect! {
///     Some(Action::Confirmed)
/// };
/// assert!(matches!(effect, Effect::Future(_)));
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

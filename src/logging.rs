//! Log sinks for the engines.
//!
//! The library only emits `tracing` events. Engines take an optional
//! [`Dispatch`]; when one is set, the operation runs with that dispatcher as
//! the thread-local default, so no process-wide logger is required.

use tracing::Dispatch;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Build the default sink: timestamped, structured lines on standard output.
///
/// `RUST_LOG` overrides `level` when set.
pub fn stdout_dispatch(level: LevelFilter) -> Dispatch {
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .with_target(false)
        .finish();

    Dispatch::new(subscriber)
}

/// Run `f` with `dispatch` as the default subscriber, if one is given.
pub(crate) fn in_scope<T>(dispatch: Option<&Dispatch>, f: impl FnOnce() -> T) -> T {
    match dispatch {
        Some(dispatch) => tracing::dispatcher::with_default(dispatch, f),
        None => f(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_scope_returns_value() {
        let dispatch = stdout_dispatch(LevelFilter::OFF);
        assert_eq!(in_scope(Some(&dispatch), || 41 + 1), 42);
        assert_eq!(in_scope(None, || "plain"), "plain");
    }
}

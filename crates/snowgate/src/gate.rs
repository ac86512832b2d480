//! Authorization gate for async operations.
//!
//! A [`Gated`] pairs an [`Authorizer`] with a protected operation. Each call
//! first awaits the authorizer; only a `true` verdict lets the operation run,
//! and its result is returned untouched. A `false` verdict short-circuits with
//! [`Unauthorized`], converted into the operation's own error type.
//!
//! The authorizer is passed in explicitly. Request-scoped state (a session, a
//! bearer token, a token store handle) is captured when the authorizer is
//! built, never looked up from ambient globals.
//!
//! ```
//! use snowgate::{Unauthorized, gate};
//!
//! #[derive(Debug)]
//! enum AppError {
//!     Unauthorized,
//! }
//!
//! impl From<Unauthorized> for AppError {
//!     fn from(_: Unauthorized) -> Self {
//!         AppError::Unauthorized
//!     }
//! }
//!
//! # futures::executor::block_on(async {
//! let add = gate(
//!     || async { true },
//!     |(a, b): (u32, u32)| async move { Ok::<_, AppError>(a + b) },
//! );
//! assert_eq!(add.call((2, 3)).await.unwrap(), 5);
//! # });
//! ```

use core::{any::type_name, fmt, future::Future};
use thiserror::Error;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// The caller failed the authorization check.
#[derive(Error, Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[error("caller is not authorized")]
pub struct Unauthorized;

/// An asynchronous "is the current caller authorized" oracle.
///
/// Implementations may perform I/O (e.g. a token store lookup) and must
/// tolerate concurrent calls from many in-flight requests. Any
/// `Fn() -> impl Future<Output = bool>` closure is an `Authorizer`.
///
/// The returned future is not required to be `Send`, so authorizers holding
/// thread-local request state (an `Rc` session on a `LocalSet`) work too.
/// With a concrete authorizer type, [`Gated::call`] is `Send` whenever that
/// authorizer's future is.
pub trait Authorizer {
    /// Resolves to `true` if the caller may proceed.
    fn is_authorized(&self) -> impl Future<Output = bool>;
}

impl<F, Fut> Authorizer for F
where
    F: Fn() -> Fut,
    Fut: Future<Output = bool>,
{
    fn is_authorized(&self) -> impl Future<Output = bool> {
        self()
    }
}

/// A protected operation wrapped behind an [`Authorizer`].
///
/// Construct with [`gate`], [`Gated::new`] or
/// [`RequiresAuthorization::requires_authorization`].
#[derive(Clone)]
pub struct Gated<A, F> {
    authorizer: A,
    operation: F,
    name: &'static str,
}

impl<A, F> Gated<A, F> {
    /// Wraps `operation`, naming it after its type.
    pub fn new(authorizer: A, operation: F) -> Self {
        Self {
            authorizer,
            operation,
            name: type_name::<F>(),
        }
    }

    /// Overrides the reported operation name. Useful for closures, whose type
    /// names are compiler generated.
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Name of the wrapped operation, the type name of `F` unless overridden.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The oracle consulted on every call.
    pub fn authorizer(&self) -> &A {
        &self.authorizer
    }

    /// The protected operation.
    pub fn operation(&self) -> &F {
        &self.operation
    }

    /// Unwraps the gate, returning the protected operation.
    pub fn into_inner(self) -> F {
        self.operation
    }
}

impl<A, F> Gated<A, F>
where
    A: Authorizer,
{
    /// Runs the operation with `args` if the authorizer allows it.
    ///
    /// The authorizer is queried on every call; nothing is cached. Several
    /// arguments travel as a tuple.
    ///
    /// # Errors
    ///
    /// Returns `E::from(Unauthorized)` when the authorizer resolves to
    /// `false`, in which case the operation is not invoked. Otherwise returns
    /// whatever the operation returns.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip_all, fields(operation = self.name))
    )]
    pub async fn call<Args, Fut, T, E>(&self, args: Args) -> Result<T, E>
    where
        F: Fn(Args) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<Unauthorized>,
    {
        if !self.authorizer.is_authorized().await {
            #[cfg(feature = "tracing")]
            tracing::debug!(operation = self.name, "rejected unauthorized call");
            return Err(Unauthorized.into());
        }
        (self.operation)(args).await
    }
}

impl<A, F> fmt::Debug for Gated<A, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gated")
            .field("operation", &self.name)
            .field("authorizer", &type_name::<A>())
            .finish()
    }
}

/// Wraps `operation` so it only runs when `authorizer` resolves to `true`.
pub fn gate<A, F>(authorizer: A, operation: F) -> Gated<A, F>
where
    A: Authorizer,
{
    Gated::new(authorizer, operation)
}

/// Extension method form of [`gate`].
pub trait RequiresAuthorization: Sized {
    fn requires_authorization<A>(self, authorizer: A) -> Gated<A, Self>
    where
        A: Authorizer,
    {
        Gated::new(authorizer, self)
    }
}

impl<F> RequiresAuthorization for F {}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::join_all;
    use std::sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    };

    #[derive(Debug, PartialEq, Eq)]
    enum AppError {
        Unauthorized,
        NotFound(u64),
    }

    impl From<Unauthorized> for AppError {
        fn from(_: Unauthorized) -> Self {
            Self::Unauthorized
        }
    }

    fn allow(verdict: bool) -> impl Fn() -> futures::future::Ready<bool> + Clone {
        move || futures::future::ready(verdict)
    }

    fn counting_op(
        calls: Arc<AtomicUsize>,
    ) -> impl Fn(u64) -> futures::future::Ready<Result<u64, AppError>> {
        move |n| {
            calls.fetch_add(1, Ordering::SeqCst);
            futures::future::ready(if n == 0 {
                Err(AppError::NotFound(n))
            } else {
                Ok(n * 2)
            })
        }
    }

    #[tokio::test]
    async fn rejects_without_invoking_operation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gated = gate(allow(false), counting_op(calls.clone()));

        assert_eq!(gated.call(21).await, Err(AppError::Unauthorized));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn passes_result_through_when_authorized() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gated = gate(allow(true), counting_op(calls.clone()));

        assert_eq!(gated.call(21).await, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn passes_operation_error_through_unchanged() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gated = gate(allow(true), counting_op(calls.clone()));

        assert_eq!(gated.call(0).await, Err(AppError::NotFound(0)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn does_not_memoize_results() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gated = gate(allow(true), counting_op(calls.clone()));

        assert_eq!(gated.call(5).await, Ok(10));
        assert_eq!(gated.call(5).await, Ok(10));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn queries_authorizer_on_every_call() {
        let authorized = Arc::new(AtomicBool::new(true));
        let checks = Arc::new(AtomicUsize::new(0));
        let authorizer = {
            let authorized = authorized.clone();
            let checks = checks.clone();
            move || {
                checks.fetch_add(1, Ordering::SeqCst);
                let verdict = authorized.load(Ordering::SeqCst);
                async move {
                    tokio::task::yield_now().await;
                    verdict
                }
            }
        };
        let calls = Arc::new(AtomicUsize::new(0));
        let gated = gate(authorizer, counting_op(calls.clone()));

        assert_eq!(gated.call(1).await, Ok(2));
        authorized.store(false, Ordering::SeqCst);
        assert_eq!(gated.call(1).await, Err(AppError::Unauthorized));
        authorized.store(true, Ordering::SeqCst);
        assert_eq!(gated.call(1).await, Ok(2));

        assert_eq!(checks.load(Ordering::SeqCst), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn tuple_arguments_and_async_operation() {
        let gated = (|(guild, user): (u64, String)| async move {
            tokio::task::yield_now().await;
            Ok::<_, AppError>(format!("{user}@{guild}"))
        })
        .requires_authorization(allow(true));

        let out = gated.call((42, "ferris".to_owned())).await.unwrap();
        assert_eq!(out, "ferris@42");
    }

    #[tokio::test]
    async fn concurrent_calls_are_independent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gated = Arc::new(gate(allow(true), counting_op(calls.clone())));

        let handles = (1..=32_u64).map(|n| {
            let gated = gated.clone();
            tokio::spawn(async move { gated.call(n).await })
        });
        let results = join_all(handles).await;

        for (n, res) in (1..=32_u64).zip(results) {
            assert_eq!(res.unwrap(), Ok(n * 2));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 32);
    }

    #[tokio::test]
    async fn crate_error_converts_from_unauthorized() {
        let gated = gate(allow(false), |_: ()| async { Ok::<(), crate::Error>(()) });
        let err = gated.call(()).await.unwrap_err();
        assert!(matches!(err, crate::Error::Unauthorized));
    }

    #[test]
    fn accepts_non_send_authorizer() {
        use std::{cell::Cell, rc::Rc};

        let session = Rc::new(Cell::new(false));
        let authorizer = {
            let session = session.clone();
            move || {
                let session = session.clone();
                async move { session.get() }
            }
        };
        let calls = Arc::new(AtomicUsize::new(0));
        let gated = gate(authorizer, counting_op(calls.clone()));

        futures::executor::block_on(async {
            assert_eq!(gated.call(4).await, Err(AppError::Unauthorized));
            session.set(true);
            assert_eq!(gated.call(4).await, Ok(8));
        });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn preserves_operation_name() {
        async fn list_guilds(_: ()) -> Result<Vec<u64>, AppError> {
            Ok(vec![])
        }

        let gated = gate(allow(true), list_guilds);
        assert!(gated.name().ends_with("list_guilds"), "{}", gated.name());
        assert!(format!("{gated:?}").contains("list_guilds"));

        let renamed = gated.with_name("guilds");
        assert_eq!(renamed.name(), "guilds");
    }
}

#[cfg(feature = "ssr")]
pub mod tracing;

#[cfg(feature = "ssr")]
pub use self::tracing::trace_requests;

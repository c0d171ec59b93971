//! Close-once lifecycle shared by frame readers and writers

use crate::error::FrameError;
use crate::raw::{RawReader, RawWriter};
use crate::Result;
use std::mem;

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// Something with an explicit close step
pub(crate) trait Close {
    fn close(&mut self) -> Result<()>;
}

impl Close for Box<dyn RawReader> {
    fn close(&mut self) -> Result<()> {
        RawReader::close(&mut **self)
    }
}

impl Close for Box<dyn RawWriter> {
    fn close(&mut self) -> Result<()> {
        RawWriter::close(&mut **self)
    }
}

/// Result values that end the stream, and close the resource under close-on-error
pub(crate) trait Terminal {
    fn is_terminal(&self) -> bool;
}

impl Terminal for () {
    fn is_terminal(&self) -> bool {
        false
    }
}

impl<T> Terminal for Option<T> {
    fn is_terminal(&self) -> bool {
        self.is_none()
    }
}

#[derive(Debug)]
enum Lifecycle<T> {
    Open(T),
    Closed,
}

/// Wraps a low-level reader or writer with a one-way `Open -> Closed` transition
///
/// Closing drops the wrapped value. Resources that do not own their stream skip
/// the wrapped value's own close step.
#[derive(Debug)]
pub(crate) struct ClosableResource<T> {
    state: Lifecycle<T>,
    owned: bool,
    close_on_error: bool,
}

impl<T: Close> ClosableResource<T> {
    pub(crate) fn new(inner: T, owned: bool, close_on_error: bool) -> Self {
        Self {
            state: Lifecycle::Open(inner),
            owned,
            close_on_error,
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        matches!(self.state, Lifecycle::Closed)
    }

    /// Run `op` against the open resource
    ///
    /// With close-on-error, an error or a terminal result closes the resource before
    /// returning. If that close fails too, both errors are returned together.
    pub(crate) fn access<R, F>(&mut self, op: F) -> Result<R>
    where
        R: Terminal,
        F: FnOnce(&mut T) -> Result<R>,
    {
        let inner = match &mut self.state {
            Lifecycle::Open(inner) => inner,
            Lifecycle::Closed => return Err(FrameError::Closed),
        };

        let result = op(inner);
        if !self.close_on_error {
            return result;
        }
        let terminal = match &result {
            Ok(value) => value.is_terminal(),
            Err(_) => true,
        };
        if !terminal {
            return result;
        }
        #[cfg(feature = "logging")]
        if let Err(e) = &result {
            warn!("Closing after failed operation: {}", e);
        }

        match (result, self.close()) {
            (result, Ok(())) => result,
            (Ok(_), Err(close)) => Err(close),
            (Err(error), Err(close)) => Err(FrameError::CloseFailed {
                error: Box::new(error),
                close: Box::new(close),
            }),
        }
    }

    /// Close the resource; closing again is a no-op
    pub(crate) fn close(&mut self) -> Result<()> {
        let inner = match mem::replace(&mut self.state, Lifecycle::Closed) {
            Lifecycle::Open(inner) => inner,
            Lifecycle::Closed => return Ok(()),
        };

        if !self.owned {
            #[cfg(feature = "logging")]
            debug!("close_noop: stream is not owned");
            return Ok(());
        }

        let mut inner = inner;
        #[cfg(feature = "logging")]
        debug!("close: releasing stream");
        inner.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct Counted {
        closes: Arc<AtomicUsize>,
        fail_close: bool,
    }

    impl Close for Counted {
        fn close(&mut self) -> Result<()> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            if self.fail_close {
                return Err(FrameError::Closed);
            }
            Ok(())
        }
    }

    #[test]
    fn test_close_is_idempotent_and_calls_inner_once() {
        let closes = Arc::new(AtomicUsize::new(0));
        let mut res = ClosableResource::new(
            Counted {
                closes: closes.clone(),
                ..Counted::default()
            },
            true,
            true,
        );
        assert!(res.close().is_ok());
        assert!(res.close().is_ok());
        assert!(res.is_closed());
        assert_eq!(closes.load(Ordering::SeqCst), 1);
        assert_eq!(res.access(|_| Ok(())), Err(FrameError::Closed));
    }

    #[test]
    fn test_not_owned_skips_inner_close() {
        let closes = Arc::new(AtomicUsize::new(0));
        let mut res = ClosableResource::new(
            Counted {
                closes: closes.clone(),
                ..Counted::default()
            },
            false,
            true,
        );
        res.close().unwrap();
        assert!(res.is_closed());
        assert_eq!(closes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_error_closes_when_enabled() {
        let mut res = ClosableResource::new(Counted::default(), true, true);
        let err = res.access(|_| -> Result<()> { Err(FrameError::CountOverflow(1)) });
        assert_eq!(err, Err(FrameError::CountOverflow(1)));
        assert_eq!(res.access(|_| Ok(())), Err(FrameError::Closed));
    }

    #[test]
    fn test_end_of_stream_closes_when_enabled() {
        let mut res = ClosableResource::new(Counted::default(), true, true);
        assert_eq!(res.access(|_| Ok(Some(1))), Ok(Some(1)));
        assert_eq!(res.access(|_| Ok(None::<u8>)), Ok(None));
        assert!(res.is_closed());
    }

    #[test]
    fn test_errors_repeat_when_disabled() {
        let mut res = ClosableResource::new(Counted::default(), true, false);
        for _ in 0..3 {
            let err = res.access(|_| -> Result<()> { Err(FrameError::CountOverflow(1)) });
            assert_eq!(err, Err(FrameError::CountOverflow(1)));
        }
        assert_eq!(res.access(|_| Ok(None::<u8>)), Ok(None));
        assert!(!res.is_closed());
    }

    #[test]
    fn test_failed_close_is_combined_with_error() {
        let mut res = ClosableResource::new(
            Counted {
                fail_close: true,
                ..Counted::default()
            },
            true,
            true,
        );
        let err = res
            .access(|_| -> Result<()> { Err(FrameError::SizeOverflow(4)) })
            .unwrap_err();
        assert_eq!(err.cause(), &FrameError::SizeOverflow(4));
        assert!(matches!(err, FrameError::CloseFailed { .. }));
    }
}

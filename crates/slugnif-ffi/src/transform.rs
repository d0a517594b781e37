//! External text-transform routines.
//!
//! The bridge never looks inside the routine it calls. [`Transform`] is the
//! whole contract: bytes in, bytes or nothing out. Adapters here turn a raw
//! C function pointer or a symbol in a shared library into a `Transform`.

use std::ffi::{c_char, CStr};
use std::path::{Path, PathBuf};

use libloading::Library;
use parking_lot::Mutex;
use slugnif_core::{BoundedBuffer, MAX_CAPACITY};

use crate::error::{FfiError, Result};

/// An opaque, pure text transformation.
///
/// Returning `None` signals that the routine produced no usable output.
/// Implementations must be safe to call from several threads at once.
pub trait Transform: Send + Sync {
    fn transform(&self, input: &BoundedBuffer) -> Option<Vec<u8>>;
}

impl<F> Transform for F
where
    F: Fn(&[u8]) -> Option<Vec<u8>> + Send + Sync,
{
    fn transform(&self, input: &BoundedBuffer) -> Option<Vec<u8>> {
        self(input.as_bytes())
    }
}

/// C ABI of a transform routine: `const char* f(char* input)`.
pub type RawTransformFn = unsafe extern "C" fn(*mut c_char) -> *const c_char;

/// A C routine called through a function pointer.
///
/// The input is copied into a private scratch buffer of the declared
/// capacity, so the callee may write up to `capacity` bytes in place. The
/// returned string is copied out before the call returns, because the
/// callee only keeps it valid until its next invocation.
pub struct CTransform {
    func: RawTransformFn,
    capacity: usize,
    /// Held around each call when the routine is not reentrant.
    serialize: Option<Mutex<()>>,
}

impl CTransform {
    /// Wrap a raw function pointer. The capacity is clamped to
    /// `1..=MAX_CAPACITY`.
    ///
    /// # Safety
    ///
    /// `func` must follow the transform contract: it reads a NUL-terminated
    /// string from a buffer of at least `capacity` bytes, writes no further
    /// than `capacity` bytes into it, and returns either null or a pointer
    /// to a NUL-terminated string that stays valid until its next call.
    pub unsafe fn new(func: RawTransformFn, capacity: usize, reentrant: bool) -> Self {
        Self {
            func,
            capacity: capacity.clamp(1, MAX_CAPACITY),
            serialize: (!reentrant).then(|| Mutex::new(())),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_reentrant(&self) -> bool {
        self.serialize.is_none()
    }

    fn call(&self, input: &BoundedBuffer) -> Option<Vec<u8>> {
        let src = input.as_bytes_with_nul();
        if src.len() > self.capacity {
            tracing::debug!(
                len = src.len(),
                capacity = self.capacity,
                "input does not fit transform scratch buffer"
            );
            return None;
        }
        let mut scratch = vec![0u8; self.capacity];
        scratch[..src.len()].copy_from_slice(src);

        // SAFETY: scratch is `capacity` bytes and NUL-terminated, which is
        // what `new`'s contract requires of the callee. A non-null result is
        // read and copied before the lock (if any) is released.
        unsafe {
            let ret = (self.func)(scratch.as_mut_ptr().cast::<c_char>());
            if ret.is_null() {
                return None;
            }
            Some(CStr::from_ptr(ret).to_bytes().to_vec())
        }
    }
}

impl Transform for CTransform {
    fn transform(&self, input: &BoundedBuffer) -> Option<Vec<u8>> {
        match &self.serialize {
            Some(lock) => {
                let _guard = lock.lock();
                self.call(input)
            }
            None => self.call(input),
        }
    }
}

impl std::fmt::Debug for CTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CTransform")
            .field("capacity", &self.capacity)
            .field("reentrant", &self.is_reentrant())
            .finish()
    }
}

/// A transform resolved from a symbol in a shared library.
///
/// Keeps the library mapped for as long as the transform lives.
pub struct LibraryTransform {
    path: PathBuf,
    symbol: String,
    inner: CTransform,
    _library: Library,
}

impl LibraryTransform {
    /// Open `path` and resolve `symbol` as a transform routine.
    ///
    /// # Safety
    ///
    /// Loading a library runs its initializers, and the resolved symbol is
    /// trusted to have the [`RawTransformFn`] ABI and to honor the contract
    /// described on [`CTransform::new`].
    pub unsafe fn open(
        path: impl AsRef<Path>,
        symbol: &str,
        capacity: usize,
        reentrant: bool,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let library = Library::new(&path).map_err(|e| FfiError::LibraryLoad {
            path: path.clone(),
            detail: e.to_string(),
        })?;

        let func: RawTransformFn = {
            let sym = library
                .get::<RawTransformFn>(symbol.as_bytes())
                .map_err(|e| FfiError::SymbolNotFound {
                    symbol: symbol.to_string(),
                    path: path.clone(),
                    detail: e.to_string(),
                })?;
            *sym
        };

        tracing::info!(library = %path.display(), symbol, capacity, "resolved transform symbol");

        Ok(Self {
            inner: CTransform::new(func, capacity, reentrant),
            path,
            symbol: symbol.to_string(),
            _library: library,
        })
    }
}

impl Transform for LibraryTransform {
    fn transform(&self, input: &BoundedBuffer) -> Option<Vec<u8>> {
        self.inner.transform(input)
    }
}

impl std::fmt::Debug for LibraryTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibraryTransform")
            .field("path", &self.path)
            .field("symbol", &self.symbol)
            .field("inner", &self.inner)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    static GREETING: &[u8] = b"hi\0";

    unsafe extern "C" fn upper_in_place(input: *mut c_char) -> *const c_char {
        let mut p = input;
        while *p != 0 {
            *p = (*p as u8).to_ascii_uppercase() as c_char;
            p = p.add(1);
        }
        input
    }

    unsafe extern "C" fn always_null(_input: *mut c_char) -> *const c_char {
        std::ptr::null()
    }

    unsafe extern "C" fn static_greeting(_input: *mut c_char) -> *const c_char {
        GREETING.as_ptr().cast()
    }

    #[test]
    fn closure_transform_sees_payload_only() {
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        let t = move |bytes: &[u8]| {
            counter.store(bytes.len(), Ordering::SeqCst);
            Some(bytes.to_vec())
        };
        let buf = BoundedBuffer::from_bytes(b"abc", 10).unwrap();
        assert_eq!(t.transform(&buf), Some(b"abc".to_vec()));
        assert_eq!(seen.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn c_transform_copies_result() {
        let t = unsafe { CTransform::new(upper_in_place, 100, true) };
        let buf = BoundedBuffer::from_bytes(b"hello", 100).unwrap();
        assert_eq!(t.transform(&buf), Some(b"HELLO".to_vec()));
        assert!(t.is_reentrant());
        // The caller's buffer is untouched; the callee wrote into scratch.
        assert_eq!(buf.as_bytes(), b"hello");
    }

    #[test]
    fn c_transform_null_is_none() {
        let t = unsafe { CTransform::new(always_null, 100, false) };
        let buf = BoundedBuffer::from_bytes(b"x", 100).unwrap();
        assert_eq!(t.transform(&buf), None);
        assert!(!t.is_reentrant());
    }

    #[test]
    fn c_transform_static_return_buffer() {
        let t = unsafe { CTransform::new(static_greeting, 100, false) };
        let buf = BoundedBuffer::from_bytes(b"anything", 100).unwrap();
        assert_eq!(t.transform(&buf), Some(b"hi".to_vec()));
    }

    #[test]
    fn c_transform_capacity_is_clamped() {
        let t = unsafe { CTransform::new(upper_in_place, usize::MAX, true) };
        assert_eq!(t.capacity(), MAX_CAPACITY);
        let buf = BoundedBuffer::from_bytes(b"ok", usize::MAX).unwrap();
        assert_eq!(t.transform(&buf), Some(b"OK".to_vec()));
    }

    #[test]
    fn c_transform_rejects_input_larger_than_scratch() {
        let t = unsafe { CTransform::new(upper_in_place, 4, true) };
        let buf = BoundedBuffer::from_bytes(b"toolong", 100).unwrap();
        assert_eq!(t.transform(&buf), None);
    }

    #[test]
    fn missing_library_is_load_error() {
        let err = unsafe { LibraryTransform::open("/nonexistent/libnope.so", "f", 100, false) }
            .unwrap_err();
        assert!(matches!(err, FfiError::LibraryLoad { .. }));
    }
}

//! Buffers and buffer callbacks

use std::ffi::c_void;

use super::callbacks::BUFFER_CALLBACKS;
use super::Cronet;
use crate::ffi::marshal::native_bytes;
use crate::ffi::symbols::BufferCallbackOnDestroyFn;
use crate::ffi::{BufferCallbackHandle, BufferHandle, ClientContext};

impl Cronet {
    /// Create a buffer
    pub fn buffer_create(&self) -> BufferHandle {
        unsafe { (self.sym().buffer_create)() }
    }

    /// Destroy the buffer
    pub fn buffer_destroy(&self, buffer: BufferHandle) {
        unsafe { (self.sym().buffer_destroy)(buffer) }
    }

    /// Attach caller data to the buffer
    pub fn buffer_set_client_context(&self, buffer: BufferHandle, context: ClientContext) {
        unsafe { (self.sym().buffer_set_client_context)(buffer, context) }
    }

    /// Caller data attached to the buffer
    pub fn buffer_get_client_context(&self, buffer: BufferHandle) -> ClientContext {
        unsafe { (self.sym().buffer_get_client_context)(buffer) }
    }

    /// Wrap caller-owned memory in `buffer`.
    ///
    /// `callback` is invoked by the native side once the buffer no longer
    /// references `data`.
    ///
    /// # Safety
    ///
    /// `data` must be valid for reads and writes of `size` bytes until
    /// `callback` has been invoked for this buffer.
    pub unsafe fn buffer_init_with_data_and_callback(
        &self,
        buffer: BufferHandle,
        data: *mut c_void,
        size: u64,
        callback: BufferCallbackHandle,
    ) {
        (self.sym().buffer_init_with_data_and_callback)(buffer, data, size, callback)
    }

    /// Let the native side allocate `size` bytes for `buffer`
    pub fn buffer_init_with_alloc(&self, buffer: BufferHandle, size: u64) {
        unsafe { (self.sym().buffer_init_with_alloc)(buffer, size) }
    }

    /// Size in bytes (0 if uninitialized)
    pub fn buffer_get_size(&self, buffer: BufferHandle) -> u64 {
        unsafe { (self.sym().buffer_get_size)(buffer) }
    }

    /// Raw address of the buffer's memory (null if uninitialized)
    pub fn buffer_get_data(&self, buffer: BufferHandle) -> *mut c_void {
        unsafe { (self.sym().buffer_get_data)(buffer) }
    }

    /// Copy the first `len` bytes of the buffer's memory.
    ///
    /// `len` is clamped to the buffer size.
    pub fn buffer_copy_bytes(&self, buffer: BufferHandle, len: u64) -> Vec<u8> {
        let size = self.buffer_get_size(buffer).min(len);
        let data = self.buffer_get_data(buffer);
        let size = usize::try_from(size).unwrap_or(usize::MAX);
        unsafe { native_bytes(data, size) }.to_vec()
    }

    /// Buffer callback calling the raw `on_destroy` function
    pub fn buffer_callback_create_with(
        &self,
        on_destroy: BufferCallbackOnDestroyFn,
    ) -> BufferCallbackHandle {
        unsafe { (self.sym().buffer_callback_create_with)(on_destroy) }
    }

    /// Destroy `callback`; its handler, if any, is never called afterwards
    pub fn buffer_callback_destroy(&self, callback: BufferCallbackHandle) {
        let slot = self.sym().buffer_callback_destroy;
        BUFFER_CALLBACKS.destroy(callback.addr(), || unsafe { slot(callback) })
    }

    /// Attach caller data to the buffer callback
    pub fn buffer_callback_set_client_context(
        &self,
        callback: BufferCallbackHandle,
        context: ClientContext,
    ) {
        unsafe { (self.sym().buffer_callback_set_client_context)(callback, context) }
    }

    /// Caller data attached to the buffer callback
    pub fn buffer_callback_get_client_context(&self, callback: BufferCallbackHandle) -> ClientContext {
        unsafe { (self.sym().buffer_callback_get_client_context)(callback) }
    }
}

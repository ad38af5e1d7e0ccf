//! Runnables and executors
//!
//! The native engine hands work to an executor as runnables; the executor's
//! `Execute` callback decides where `Cronet_Runnable_Run` is invoked.

use super::callbacks::{EXECUTORS, RUNNABLES};
use super::Cronet;
use crate::ffi::symbols::{ExecutorExecuteFn, RunnableRunFn};
use crate::ffi::{ClientContext, ExecutorHandle, RunnableHandle};

impl Cronet {
    /// Runnable calling the raw `run` function
    pub fn runnable_create_with(&self, run: RunnableRunFn) -> RunnableHandle {
        unsafe { (self.sym().runnable_create_with)(run) }
    }

    /// Destroy `runnable`; its handler, if any, is never called afterwards
    pub fn runnable_destroy(&self, runnable: RunnableHandle) {
        let slot = self.sym().runnable_destroy;
        RUNNABLES.destroy(runnable.addr(), || unsafe { slot(runnable) })
    }

    /// Attach caller data to the runnable
    pub fn runnable_set_client_context(&self, runnable: RunnableHandle, context: ClientContext) {
        unsafe { (self.sym().runnable_set_client_context)(runnable, context) }
    }

    /// Caller data attached to the runnable
    pub fn runnable_get_client_context(&self, runnable: RunnableHandle) -> ClientContext {
        unsafe { (self.sym().runnable_get_client_context)(runnable) }
    }

    /// Run the task. The caller still owns `runnable` afterwards.
    pub fn runnable_run(&self, runnable: RunnableHandle) {
        unsafe { (self.sym().runnable_run)(runnable) }
    }

    /// Executor calling the raw `execute` function
    pub fn executor_create_with(&self, execute: ExecutorExecuteFn) -> ExecutorHandle {
        unsafe { (self.sym().executor_create_with)(execute) }
    }

    /// Destroy `executor`; its handler, if any, is never called afterwards
    pub fn executor_destroy(&self, executor: ExecutorHandle) {
        let slot = self.sym().executor_destroy;
        EXECUTORS.destroy(executor.addr(), || unsafe { slot(executor) })
    }

    /// Attach caller data to the executor
    pub fn executor_set_client_context(&self, executor: ExecutorHandle, context: ClientContext) {
        unsafe { (self.sym().executor_set_client_context)(executor, context) }
    }

    /// Caller data attached to the executor
    pub fn executor_get_client_context(&self, executor: ExecutorHandle) -> ClientContext {
        unsafe { (self.sym().executor_get_client_context)(executor) }
    }

    /// Hand `runnable` to `executor`, which takes ownership of it
    pub fn executor_execute(&self, executor: ExecutorHandle, runnable: RunnableHandle) {
        unsafe { (self.sym().executor_execute)(executor, runnable) }
    }
}

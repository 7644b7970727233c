use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use xem_globals::EndpointAddress;

#[derive(Debug)]
struct Shared<T> {
    items: Mutex<VecDeque<T>>,
    changed: Condvar,
}

/// FIFO of simulated endpoint values.
///
/// Clones share the same queue, so a test or feeder thread can keep pushing
/// while the simulator pops.
#[derive(Debug)]
pub struct SimulatedQueue<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for SimulatedQueue<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Default for SimulatedQueue<T> {
    fn default() -> Self {
        Self {
            shared: Arc::new(Shared {
                items: Mutex::new(VecDeque::new()),
                changed: Condvar::new(),
            }),
        }
    }
}

impl<T> SimulatedQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.shared
            .items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, item: T) {
        self.lock().push_back(item);
        self.shared.changed.notify_all();
    }

    pub fn pop(&self) -> Option<T> {
        let item = self.lock().pop_front();
        if item.is_some() {
            self.shared.changed.notify_all();
        }
        item
    }

    /// Waits up to `timeout` for an item to arrive.
    pub fn pop_timeout(&self, timeout: Duration) -> Option<T> {
        let guard = self.lock();
        let (mut guard, _) = self
            .shared
            .changed
            .wait_timeout_while(guard, timeout, |items| items.is_empty())
            .unwrap_or_else(PoisonError::into_inner);
        let item = guard.pop_front();
        drop(guard);
        if item.is_some() {
            self.shared.changed.notify_all();
        }
        item
    }

    /// Applies `f` to the head of the queue without removing it.
    pub fn peek_map<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.lock().front().map(f)
    }

    /// Visits every queued item in order without consuming any.
    pub fn inspect<R>(&self, f: impl FnOnce(&VecDeque<T>) -> R) -> R {
        f(&self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// `true` if the queue is empty now or drains within `timeout`.
    pub fn is_eventually_empty(&self, timeout: Duration) -> bool {
        self.wait_until(timeout, |items| items.is_empty())
    }

    /// `true` if the queue holds an item now or receives one within `timeout`.
    pub fn is_eventually_not_empty(&self, timeout: Duration) -> bool {
        self.wait_until(timeout, |items| !items.is_empty())
    }

    fn wait_until(&self, timeout: Duration, done: impl Fn(&VecDeque<T>) -> bool) -> bool {
        let guard = self.lock();
        let (guard, _) = self
            .shared
            .changed
            .wait_timeout_while(guard, timeout, |items| !done(items))
            .unwrap_or_else(PoisonError::into_inner);
        done(&guard)
    }
}

impl<T: Clone> SimulatedQueue<T> {
    pub fn peek(&self) -> Option<T> {
        self.peek_map(T::clone)
    }
}

impl<T> FromIterator<T> for SimulatedQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let queue = Self::new();
        queue.lock().extend(iter);
        queue
    }
}

/// Endpoint bindings of a simulator.
#[derive(Debug, Clone, Default)]
pub struct SimulatedQueues {
    wire_outs: BTreeMap<EndpointAddress, SimulatedQueue<u32>>,
    pipe_outs: BTreeMap<EndpointAddress, SimulatedQueue<Vec<u8>>>,
}

impl SimulatedQueues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `queue` to wire-out `addr`, replacing any earlier binding.
    pub fn with_wire_out(mut self, addr: EndpointAddress, queue: SimulatedQueue<u32>) -> Self {
        self.wire_outs.insert(addr, queue);
        self
    }

    /// Binds `queue` to pipe-out `addr`, replacing any earlier binding.
    pub fn with_pipe_out(
        mut self,
        addr: EndpointAddress,
        queue: SimulatedQueue<Vec<u8>>,
    ) -> Self {
        self.pipe_outs.insert(addr, queue);
        self
    }

    pub fn wire_out(&self, addr: EndpointAddress) -> Option<&SimulatedQueue<u32>> {
        self.wire_outs.get(&addr)
    }

    pub fn pipe_out(&self, addr: EndpointAddress) -> Option<&SimulatedQueue<Vec<u8>>> {
        self.pipe_outs.get(&addr)
    }

    /// Wire-out bindings in ascending endpoint order.
    pub fn wire_outs(&self) -> impl Iterator<Item = (EndpointAddress, &SimulatedQueue<u32>)> {
        self.wire_outs.iter().map(|(addr, queue)| (*addr, queue))
    }

    /// Pipe-out bindings in ascending endpoint order.
    pub fn pipe_outs(
        &self,
    ) -> impl Iterator<Item = (EndpointAddress, &SimulatedQueue<Vec<u8>>)> {
        self.pipe_outs.iter().map(|(addr, queue)| (*addr, queue))
    }
}

use std::{
	collections::HashMap,
	sync::{Arc, Mutex},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Async mutexes keyed by session id. Entries are dropped once nobody holds or awaits them.
#[derive(Default)]
pub(crate) struct SessionLocks {
	inner: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}
impl SessionLocks {
	pub(crate) async fn acquire(&self, session_id: &str) -> SessionGuard<'_> {
		let lock = {
			let mut map = self.inner.lock().unwrap_or_else(|err| err.into_inner());

			map.entry(session_id.to_string()).or_default().clone()
		};
		let guard = lock.clone().lock_owned().await;

		SessionGuard { locks: self, session_id: session_id.to_string(), lock, guard: Some(guard) }
	}

	#[cfg(test)]
	fn len(&self) -> usize {
		self.inner.lock().unwrap_or_else(|err| err.into_inner()).len()
	}
}

pub(crate) struct SessionGuard<'a> {
	locks: &'a SessionLocks,
	session_id: String,
	lock: Arc<AsyncMutex<()>>,
	guard: Option<OwnedMutexGuard<()>>,
}
impl Drop for SessionGuard<'_> {
	fn drop(&mut self) {
		// Release first so the remaining strong count is the map entry, this guard and waiters.
		self.guard.take();

		let mut map = self.locks.inner.lock().unwrap_or_else(|err| err.into_inner());

		if Arc::strong_count(&self.lock) == 2 {
			map.remove(&self.session_id);
		}
	}
}

//! Graceful shutdown coordination.

use tokio::sync::broadcast;

/// Broadcasts a shutdown notification to the accept loop and open connections
#[derive(Debug, Clone)]
pub struct ShutdownCoordinator {
	sender: broadcast::Sender<()>,
}

impl ShutdownCoordinator {
	/// Create a new coordinator
	///
	/// # Examples
	///
	/// ```
	/// use multiform_server::ShutdownCoordinator;
	///
	/// let coordinator = ShutdownCoordinator::new();
	/// let mut receiver = coordinator.subscribe();
	/// coordinator.shutdown();
	/// assert!(receiver.try_recv().is_ok());
	/// ```
	pub fn new() -> Self {
		let (sender, _) = broadcast::channel(1);
		Self { sender }
	}

	pub fn subscribe(&self) -> broadcast::Receiver<()> {
		self.sender.subscribe()
	}

	/// Notify every subscriber. Calling this with no subscribers is a no-op.
	pub fn shutdown(&self) {
		let _ = self.sender.send(());
	}
}

impl Default for ShutdownCoordinator {
	fn default() -> Self {
		Self::new()
	}
}

/// Resolves when the process receives Ctrl-C
pub async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		tracing::error!(error = %e, "failed to install Ctrl-C handler");
		std::future::pending::<()>().await;
	}
	tracing::info!("shutdown signal received");
}

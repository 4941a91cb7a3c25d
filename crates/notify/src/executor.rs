//! Runs a claimed [`Job`].

use crate::dispatcher::Dispatcher;
use crate::error::NotifyError;
use crate::queue::Job;
use crate::sender::DeliverySender;

/// Maps each job kind onto the dispatcher or the sender.
#[derive(Clone)]
pub struct JobExecutor {
    dispatcher: Dispatcher,
    sender: DeliverySender,
}

impl JobExecutor {
    pub fn new(dispatcher: Dispatcher, sender: DeliverySender) -> Self {
        Self { dispatcher, sender }
    }

    pub async fn execute(&self, job: &Job) -> Result<(), NotifyError> {
        match job {
            Job::SendNotification { notification_id } => {
                let outcome = self.sender.send(*notification_id).await?;
                tracing::debug!(notification_id, ?outcome, "Send job finished");
            }
            Job::NotifyEventUpdate { event_id } => {
                self.dispatcher.notify_event_update(*event_id).await?;
            }
            Job::NotifyEventCancelled { event_id } => {
                self.dispatcher.notify_event_cancelled(*event_id).await?;
            }
        }
        Ok(())
    }
}

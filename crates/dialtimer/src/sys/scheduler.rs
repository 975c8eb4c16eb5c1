use async_channel::Sender;
use dialkit::{Scheduler, TaskKey, Ticket};
use std::collections::HashMap;
use std::time::Duration;

/// Runs controller tasks as glib timeouts on the main context. Each firing is
/// pushed onto `sink`; the UI forwards it back to the controller.
pub struct GlibScheduler {
    sink: Sender<Ticket>,
    sources: HashMap<TaskKey, glib::SourceId>,
}

impl GlibScheduler {
    pub fn new(sink: Sender<Ticket>) -> Self {
        Self {
            sink,
            sources: HashMap::new(),
        }
    }
}

impl Scheduler for GlibScheduler {
    fn start(&mut self, ticket: Ticket, period: Duration) {
        self.stop(ticket.key);
        let sink = self.sink.clone();
        let id = glib::timeout_add_local(period, move || forward(&sink, ticket));
        self.sources.insert(ticket.key, id);
    }

    fn stop(&mut self, key: TaskKey) {
        let Some(id) = self.sources.remove(&key) else {
            return;
        };
        // a source whose receiver went away has already removed itself
        if let Some(source) = glib::MainContext::ref_thread_default().find_source_by_id(&id) {
            source.destroy();
        }
    }
}

/// Pushes one firing to the UI. The timeout ends itself once nobody is
/// listening anymore.
fn forward(sink: &Sender<Ticket>, ticket: Ticket) -> glib::ControlFlow {
    match sink.try_send(ticket) {
        Ok(()) => glib::ControlFlow::Continue,
        Err(e) if e.is_closed() => {
            log::debug!("{} has no receiver, stopping its timeout", ticket);
            glib::ControlFlow::Break
        }
        Err(e) => {
            log::warn!("Dropped {}: {}", ticket, e);
            glib::ControlFlow::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket() -> Ticket {
        Ticket {
            key: TaskKey::Countdown,
            generation: 3,
        }
    }

    #[test]
    fn test_forward_delivers_while_listening() {
        let (tx, rx) = async_channel::unbounded();
        assert_eq!(forward(&tx, ticket()), glib::ControlFlow::Continue);
        assert_eq!(rx.try_recv().unwrap(), ticket());
    }

    #[test]
    fn test_forward_stops_without_receiver() {
        let (tx, rx) = async_channel::unbounded::<Ticket>();
        drop(rx);
        assert_eq!(forward(&tx, ticket()), glib::ControlFlow::Break);
    }
}

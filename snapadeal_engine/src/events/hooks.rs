use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{
    DealApprovedEvent,
    DealPurchasedEvent,
    DealRejectedEvent,
    EventHandler,
    EventProducer,
    Handler,
};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub deal_approved_producer: Vec<EventProducer<DealApprovedEvent>>,
    pub deal_rejected_producer: Vec<EventProducer<DealRejectedEvent>>,
    pub deal_purchased_producer: Vec<EventProducer<DealPurchasedEvent>>,
}

pub struct EventHandlers {
    pub on_deal_approved: Option<EventHandler<DealApprovedEvent>>,
    pub on_deal_rejected: Option<EventHandler<DealRejectedEvent>>,
    pub on_deal_purchased: Option<EventHandler<DealPurchasedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_deal_approved = hooks.on_deal_approved.map(|f| EventHandler::new(buffer_size, f));
        let on_deal_rejected = hooks.on_deal_rejected.map(|f| EventHandler::new(buffer_size, f));
        let on_deal_purchased = hooks.on_deal_purchased.map(|f| EventHandler::new(buffer_size, f));
        Self { on_deal_approved, on_deal_rejected, on_deal_purchased }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_deal_approved {
            result.deal_approved_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_deal_rejected {
            result.deal_rejected_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_deal_purchased {
            result.deal_purchased_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_deal_approved {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_deal_rejected {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_deal_purchased {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_deal_approved: Option<Handler<DealApprovedEvent>>,
    pub on_deal_rejected: Option<Handler<DealRejectedEvent>>,
    pub on_deal_purchased: Option<Handler<DealPurchasedEvent>>,
}

impl EventHooks {
    pub fn on_deal_approved<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(DealApprovedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_deal_approved = Some(Arc::new(f));
        self
    }

    pub fn on_deal_rejected<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(DealRejectedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_deal_rejected = Some(Arc::new(f));
        self
    }

    pub fn on_deal_purchased<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(DealPurchasedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_deal_purchased = Some(Arc::new(f));
        self
    }
}

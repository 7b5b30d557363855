pub mod store;
pub mod mongo_store;
pub mod db_init;
pub mod moralis;
pub mod mailer;
pub mod jobs;

pub mod price_service;
pub mod alerts_service;
pub mod spike_monitor;

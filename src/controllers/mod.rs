pub mod home_controller;
pub mod prices_controller;
pub mod alerts_controller;
pub mod docs_controller;

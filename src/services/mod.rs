pub mod chatbot;
pub mod payment;
pub mod rates;
pub mod seed_data;
pub mod timesheet;

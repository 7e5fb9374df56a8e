pub mod sms;
pub mod whatsapp;

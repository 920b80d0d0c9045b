mod log_sender;
mod message_builder;
mod resend;
mod sender_factory;
mod smtp;

pub use log_sender::LogEmailSender;
pub use message_builder::{render, RenderedEmail, PROBLEMSET_URL};
pub use resend::{from_address_for_domain, ResendEmailSender};
pub use sender_factory::create_sender;
pub use smtp::SmtpEmailSender;

mod aggregate;
mod repository;
mod value_objects;

pub use aggregate::User;
pub use repository::UserRepository;
pub use value_objects::ExternalHandle;
